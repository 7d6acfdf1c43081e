//! Remote procedure call parameters.

/// One positional argument to a remote procedure.
///
/// The broker wire protocol distinguishes three parameter kinds; their
/// contents are opaque to this layer and are handed to the transport in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RpcParam {
    /// A plain string value.
    Literal(String),
    /// A by-reference parameter naming a backend variable.
    Reference(String),
    /// A subscripted array: ordered `(subscript, value)` pairs.
    List(Vec<(String, String)>),
}

impl RpcParam {
    /// Creates a literal parameter from anything string-like.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Creates a by-reference parameter.
    pub fn reference(name: impl Into<String>) -> Self {
        Self::Reference(name.into())
    }

    /// Creates a list parameter from `(subscript, value)` pairs.
    pub fn list<S, V>(entries: impl IntoIterator<Item = (S, V)>) -> Self
    where
        S: Into<String>,
        V: Into<String>,
    {
        Self::List(
            entries
                .into_iter()
                .map(|(s, v)| (s.into(), v.into()))
                .collect(),
        )
    }
}

impl From<&str> for RpcParam {
    fn from(value: &str) -> Self {
        Self::Literal(value.to_owned())
    }
}

impl From<String> for RpcParam {
    fn from(value: String) -> Self {
        Self::Literal(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_literals_from_strings() {
        assert_eq!(
            RpcParam::from("123"),
            RpcParam::Literal("123".to_owned())
        );
        assert_eq!(
            RpcParam::literal(String::from("abc")),
            RpcParam::Literal("abc".to_owned())
        );
    }

    #[test]
    fn builds_lists_preserving_order() {
        let param = RpcParam::list([("1", "first"), ("2", "second")]);
        assert_eq!(
            param,
            RpcParam::List(vec![
                ("1".to_owned(), "first".to_owned()),
                ("2".to_owned(), "second".to_owned()),
            ])
        );
    }
}
