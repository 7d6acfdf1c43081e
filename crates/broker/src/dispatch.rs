//! Asynchronous call correlation.
//!
//! [`AsyncDispatcher`] owns at most one in-flight asynchronous call against a
//! shared [`RpcTransport`] and maps the transport's completion callbacks back
//! to the consumer that issued the call. Issuing a new call while one is
//! outstanding aborts the old one first; a callback whose handle does not
//! match the tracked handle is a stale delivery from a superseded call and is
//! discarded without side effects.
//!
//! There is no retry, timeout or queuing at this layer. If the transport
//! never calls back, the dispatcher stays pending until the consumer aborts;
//! watchdog policy belongs to the caller.

use std::rc::Rc;

use mrpc_types::RpcName;

use crate::params::RpcParam;
use crate::transport::{CallHandle, RpcTransport};

/// The single outcome of one asynchronous call request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// The remote procedure completed; carries the raw textual payload.
    Success(String),
    /// The remote procedure failed on the backend or in transit.
    Error {
        /// Backend error code.
        code: i32,
        /// Human-readable error text.
        message: String,
    },
    /// The call was aborted locally before it settled.
    Aborted,
}

/// Delivered to the consumer exactly once per issued call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEvent {
    /// The remote operation name the originating request was issued with.
    pub operation: String,
    /// How the call ended.
    pub outcome: CallOutcome,
}

type Deliver = Box<dyn FnOnce(CallEvent)>;

struct PendingCall {
    handle: CallHandle,
    operation: String,
    deliver: Deliver,
}

/// Single-slot correlator between a consumer and the shared transport.
///
/// States are *idle* and *pending(handle)*. `invoke` moves idle → pending
/// when the transport accepts the call; a matching completion, a matching
/// error or an explicit [`abort`](Self::abort) moves pending → idle. The
/// dispatcher is reusable indefinitely.
///
/// Not `Send`: all calls and callbacks on one dispatcher are marshalled onto
/// a single logical thread by the host (see the crate docs).
pub struct AsyncDispatcher {
    transport: Rc<dyn RpcTransport>,
    pending: Option<PendingCall>,
}

impl AsyncDispatcher {
    /// Creates an idle dispatcher over a shared transport.
    pub fn new(transport: Rc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            pending: None,
        }
    }

    /// Returns whether a call is currently in flight.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Returns the handle of the in-flight call, if any.
    ///
    /// This is the host's routing key for delivering `on_complete` /
    /// `on_error` to the right dispatcher.
    pub fn pending_handle(&self) -> Option<CallHandle> {
        self.pending.as_ref().map(|call| call.handle)
    }

    /// Issues a new asynchronous call, aborting any in-flight one first.
    ///
    /// `deliver` is called exactly once with the call's outcome, unless the
    /// transport refuses to start the call, in which case no callback will
    /// ever arrive and the dispatcher stays idle. Callers that must detect a
    /// refused start can check [`is_pending`](Self::is_pending) afterwards.
    pub fn invoke(
        &mut self,
        operation: &RpcName,
        params: &[RpcParam],
        deliver: impl FnOnce(CallEvent) + 'static,
    ) {
        self.abort();

        match self.transport.start_async(operation.as_str(), params) {
            Some(handle) => {
                self.pending = Some(PendingCall {
                    handle,
                    operation: operation.as_str().to_owned(),
                    deliver: Box::new(deliver),
                });
            }
            None => {
                tracing::warn!(
                    operation = operation.as_str(),
                    "transport refused to start async call"
                );
            }
        }
    }

    /// Aborts the in-flight call, if any.
    ///
    /// Asks the transport to abort, resets to idle and synchronously delivers
    /// an [`CallOutcome::Aborted`] event carrying the original operation name.
    /// A no-op when idle, and therefore idempotent.
    pub fn abort(&mut self) {
        if let Some(call) = self.pending.take() {
            self.transport.abort_call(call.handle);
            (call.deliver)(CallEvent {
                operation: call.operation,
                outcome: CallOutcome::Aborted,
            });
        }
    }

    /// Transport callback: the call identified by `handle` completed.
    ///
    /// A handle that does not match the tracked call is a stale delivery from
    /// a superseded request (an abort and a completion crossing in flight);
    /// it is logged and discarded without touching state.
    pub fn on_complete(&mut self, handle: CallHandle, payload: String) {
        self.settle(handle, CallOutcome::Success(payload));
    }

    /// Transport callback: the call identified by `handle` failed.
    ///
    /// Mismatched handles are discarded exactly as in
    /// [`on_complete`](Self::on_complete).
    pub fn on_error(&mut self, handle: CallHandle, code: i32, message: String) {
        self.settle(handle, CallOutcome::Error { code, message });
    }

    fn settle(&mut self, handle: CallHandle, outcome: CallOutcome) {
        let matches = self.pending_handle() == Some(handle);
        if !matches {
            tracing::debug!(
                stale_handle = handle.get(),
                current_handle = self.pending_handle().map(|h| h.get()),
                "discarding callback for a handle this dispatcher is not tracking"
            );
            return;
        }

        if let Some(call) = self.pending.take() {
            (call.deliver)(CallEvent {
                operation: call.operation,
                outcome,
            });
        }
    }
}
