//! # mRPC Domain
//!
//! Thin domain-object wrappers over the broker's delimited replies.
//!
//! This crate keeps the clinical record model deliberately shallow (full
//! clinical semantics live on the backend) and concentrates on three things:
//!
//! - [`records`]: positional-field record stubs ([`Institution`],
//!   [`Provider`], [`DocumentStub`]) parsed from caret-delimited rows.
//! - [`registry`]: an explicit discriminator-to-constructor map
//!   ([`FactoryRegistry`]) resolved at startup; no reflection, no runtime
//!   class lookup.
//! - [`lookup`]: an explicitly owned, injected cache of lookup lists
//!   ([`LookupCache`]) with explicit invalidation; no process-wide statics.

pub mod error;
pub mod lookup;
pub mod records;
pub mod registry;

pub use error::DomainError;
pub use lookup::{LookupCache, LookupEntry, LookupTable};
pub use records::{ClinicalRecord, DocumentStub, Institution, Provider};
pub use registry::{standard_registry, FactoryRegistry, RecordConstructor};
