use mrpc_broker::TransportError;
use mrpc_query::ReplyError;
use mrpc_types::{FmDateError, IenError};

/// Errors produced while turning broker replies into domain objects.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// A row was missing a field the record layout requires.
    #[error("{record} row is missing required field {index}")]
    MissingField {
        /// The record layout being parsed.
        record: &'static str,
        /// Zero-based positional field index.
        index: usize,
    },
    /// A row field did not parse as an internal entry number.
    #[error("invalid IEN: {0}")]
    InvalidIen(#[from] IenError),
    /// A row field did not parse as a FileMan date.
    #[error("invalid FileMan date: {0}")]
    InvalidDate(#[from] FmDateError),
    /// No constructor is registered under the given discriminator.
    #[error("no record constructor registered for {0:?}")]
    UnknownDiscriminator(String),
    /// A constructor was already registered under the given discriminator.
    #[error("record constructor for {0:?} registered twice")]
    DuplicateDiscriminator(String),
    /// The broker call itself failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// The reply carried a server-signalled error line.
    #[error("reply error: {0}")]
    Reply(#[from] ReplyError),
}

pub type DomainResult<T> = std::result::Result<T, DomainError>;
