//! # mRPC Types
//!
//! Validated wire-level value types shared across the mRPC client crates.
//!
//! The M-language backend identifies records by internal entry number and
//! encodes timestamps in its own fractional calendar format. This crate owns
//! the parsing, validation and canonical rendering of those values so the
//! broker and query layers can pass them around as plain typed data:
//!
//! - [`Ien`]: internal entry number, the backend's primary key within a file.
//! - [`FmDate`]: FileMan date/time with conversion to and from chrono types.
//! - [`RpcName`]: validated name of a remote procedure.
//!
//! **No transport concerns**: everything here is a pure value type. Call
//! dispatch and reply handling live in `mrpc-broker` and `mrpc-query`.

pub mod fmdate;
pub mod ien;
pub mod name;

pub use fmdate::{FmDate, FmDateError};
pub use ien::{Ien, IenError};
pub use name::{RpcName, TextError};
