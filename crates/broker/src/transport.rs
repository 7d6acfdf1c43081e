//! The transport boundary.
//!
//! [`RpcTransport`] is the seam between this crate and the actual broker
//! session. Implementations own the persistent connection, wire framing and
//! serialization; this layer only sees opaque call handles and textual
//! payloads.

use std::num::NonZeroU32;

use crate::params::RpcParam;

/// Errors surfaced by a transport implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The remote procedure was rejected or failed on the backend.
    #[error("remote call failed ({code}): {message}")]
    Remote {
        /// Backend error code.
        code: i32,
        /// Human-readable error text from the backend.
        message: String,
    },
    /// The broker connection is not established.
    #[error("broker connection is not established")]
    NotConnected,
}

/// Identifies one outstanding asynchronous call.
///
/// Handles are issued by the transport and are unique per call across the
/// shared connection. The wire encodes "no call" as zero; in this API that
/// state is `Option<CallHandle>` and the handle itself is always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallHandle(NonZeroU32);

impl CallHandle {
    /// Creates a handle from a raw value, rejecting zero.
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(Self)
    }

    /// Maps the wire encoding to a handle, treating zero as "no call".
    pub fn from_wire(raw: u32) -> Option<Self> {
        Self::new(raw)
    }

    /// Returns the raw handle value.
    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

impl std::fmt::Display for CallHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The broker session as consumed by this crate.
///
/// ## Delivery contract
///
/// For every call that `start_async` accepts, the transport reports exactly
/// one completion or one error, never both and never neither, unless the call
/// is aborted first. The host marshals those reports onto one logical thread
/// per consumer and routes them to the owning dispatcher's
/// [`AsyncDispatcher::on_complete`](crate::AsyncDispatcher::on_complete) /
/// [`AsyncDispatcher::on_error`](crate::AsyncDispatcher::on_error) by handle.
///
/// One transport instance is shared by many dispatchers; handles are globally
/// unique per call, so dispatchers cannot observe each other's traffic.
pub trait RpcTransport {
    /// Starts an asynchronous remote call.
    ///
    /// Returns `None` when the call could not be started, in which case no
    /// callback will ever be delivered for it.
    fn start_async(&self, operation: &str, params: &[RpcParam]) -> Option<CallHandle>;

    /// Aborts an outstanding asynchronous call.
    ///
    /// Idempotent; aborting an unknown or already-settled handle is a no-op.
    fn abort_call(&self, handle: CallHandle);

    /// Executes a remote call synchronously, blocking the calling thread.
    fn call_sync(&self, operation: &str, params: &[RpcParam]) -> Result<String, TransportError>;
}
