//! Internal entry numbers.
//!
//! An IEN is the backend's primary key for a record within a given file. On
//! the wire it is a decimal string; zero is never a valid entry number and is
//! used by the backend to mean "no record".

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating an [`Ien`].
#[derive(Debug, thiserror::Error)]
pub enum IenError {
    /// The input was empty or contained only whitespace.
    #[error("IEN cannot be empty")]
    Empty,
    /// The input was not a decimal integer.
    #[error("IEN is not a decimal integer: {0:?}")]
    NotNumeric(String),
    /// Zero means "no record" on the wire and is not a valid entry number.
    #[error("IEN cannot be zero")]
    Zero,
}

/// An internal entry number: a non-zero record key within a backend file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ien(u64);

impl Ien {
    /// Creates an `Ien` from a raw value, rejecting zero.
    pub fn new(value: u64) -> Result<Self, IenError> {
        if value == 0 {
            return Err(IenError::Zero);
        }
        Ok(Self(value))
    }

    /// Parses an `Ien` from its wire form (a decimal string).
    ///
    /// The input is trimmed of surrounding whitespace. Empty input,
    /// non-numeric input and zero are all rejected.
    pub fn parse(input: &str) -> Result<Self, IenError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(IenError::Empty);
        }
        let value = trimmed
            .parse::<u64>()
            .map_err(|_| IenError::NotNumeric(trimmed.to_owned()))?;
        Self::new(value)
    }

    /// Returns the raw entry number.
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ien {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Ien {
    type Err = IenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ien::parse(s)
    }
}

impl serde::Serialize for Ien {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Ien {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ien::parse(&s).map_err(serde::de::Error::custom)
    }
}
