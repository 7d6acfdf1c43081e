//! # mRPC Broker
//!
//! Client-side call plumbing for an M-language RPC broker session.
//!
//! The broker connection itself (socket handling, wire framing, the polling
//! thread that surfaces host-pushed events) is an external collaborator,
//! abstracted here as the [`RpcTransport`] trait. This crate owns what sits
//! on top of that boundary:
//!
//! - [`CallHandle`], [`RpcParam`], [`TransportError`]: the vocabulary of the
//!   transport boundary.
//! - [`AsyncDispatcher`]: the single-slot call correlator that ties the
//!   transport's completion callbacks back to the originating request and
//!   supports explicit cancellation.
//!
//! ## Threading
//!
//! The host environment marshals all transport callbacks onto one logical
//! thread per dispatcher: no two callbacks on the same dispatcher run
//! concurrently with each other or with `invoke`/`abort`. The types here rely
//! on that guarantee and use `Rc` sharing rather than locks.

pub mod dispatch;
pub mod params;
pub mod transport;

pub use dispatch::{AsyncDispatcher, CallEvent, CallOutcome};
pub use params::RpcParam;
pub use transport::{CallHandle, RpcTransport, TransportError};
