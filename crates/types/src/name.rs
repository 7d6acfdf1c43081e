//! Remote procedure names.

use std::fmt;

/// The backend rejects procedure names longer than this.
const MAX_RPC_NAME_LEN: usize = 40;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace.
    #[error("remote procedure name cannot be empty")]
    Empty,
    /// The input text exceeded the backend's name length limit.
    #[error("remote procedure name exceeds {MAX_RPC_NAME_LEN} characters (got {0})")]
    TooLong(usize),
}

/// The name of a remote procedure in the backend's RPC catalog.
///
/// Wraps a `String` that is guaranteed to be non-empty after trimming and
/// within the backend's 40-character name limit. The name itself is opaque to
/// this layer; which procedures exist is a contract with the backend catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RpcName(String);

impl RpcName {
    /// Creates a new `RpcName` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty or too long, an error is returned.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        if trimmed.chars().count() > MAX_RPC_NAME_LEN {
            return Err(TextError::TooLong(trimmed.chars().count()));
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RpcName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for RpcName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for RpcName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for RpcName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RpcName::new(&s).map_err(serde::de::Error::custom)
    }
}
