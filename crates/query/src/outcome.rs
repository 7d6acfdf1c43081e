//! The uniform query result envelope.

use mrpc_broker::TransportError;

use crate::reply::ReplyError;

/// Error code used for failures that carry no backend code: lost
/// connections and server-signalled status lines.
pub const LOCAL_ERROR_CODE: i32 = 0;

/// How one fetch ended, as consumed by the UI status line.
///
/// Every fetch, synchronous or asynchronous, settles in exactly one of
/// these variants. Errors never propagate across the async boundary any
/// other way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryOutcome<R> {
    /// The fetch completed and parsed into typed rows (possibly none).
    Rows(Vec<R>),
    /// The context lacked a required parameter; the fetch was not attempted.
    NotApplicable,
    /// The fetch was cancelled before it settled.
    Aborted,
    /// The transport or the backend reported an error.
    Failed {
        /// Backend error code, or [`LOCAL_ERROR_CODE`] when none exists.
        code: i32,
        /// Human-readable error text.
        message: String,
    },
}

impl<R> QueryOutcome<R> {
    /// Returns the rows if the fetch succeeded.
    pub fn rows(self) -> Option<Vec<R>> {
        match self {
            Self::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// Returns whether the fetch produced rows.
    pub fn is_rows(&self) -> bool {
        matches!(self, Self::Rows(_))
    }

    pub(crate) fn from_transport_error(error: TransportError) -> Self {
        match error {
            TransportError::Remote { code, message } => Self::Failed { code, message },
            other => Self::Failed {
                code: LOCAL_ERROR_CODE,
                message: other.to_string(),
            },
        }
    }

    pub(crate) fn from_reply_error(error: ReplyError) -> Self {
        match error {
            ReplyError::ServerSignaled { message } => Self::Failed {
                code: LOCAL_ERROR_CODE,
                message,
            },
        }
    }
}
