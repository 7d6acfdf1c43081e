//! # mRPC Query
//!
//! Pull- and push-based fetching of typed result lists over the broker.
//!
//! A [`QueryAdapter`] binds one named remote operation to an argument-building
//! policy and a row parser, then exposes the pair of fetch shapes the UI layer
//! consumes:
//!
//! - [`QueryAdapter::fetch_sync`]: blocking call on the current thread.
//! - [`QueryAdapter::fetch_async`]: dispatch through the adapter's own
//!   [`AsyncDispatcher`](mrpc_broker::AsyncDispatcher), with a
//!   [`FetchHandle`] for cancellation.
//!
//! Both shapes normalise raw textual payloads through the [`reply`] parsing
//! policy and deliver a uniform [`QueryOutcome`] envelope; transport and
//! server-signalled errors surface as the envelope's `Failed` variant, never
//! as panics or unwound errors crossing the async boundary.

pub mod adapter;
pub mod context;
pub mod outcome;
pub mod reply;

pub use adapter::{FetchHandle, QueryAdapter};
pub use context::QueryContext;
pub use outcome::{QueryOutcome, LOCAL_ERROR_CODE};
pub use reply::{parse_reply, ReplyError};
