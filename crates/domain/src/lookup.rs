//! Lookup-list caching.
//!
//! Institution lists, provider title lists and similar lookup tables change
//! rarely and are fetched with cheap synchronous calls. [`LookupCache`] holds
//! one parsed copy per operation so repeated consumers (every view with an
//! institution picker) share a single fetch.
//!
//! The cache is an ordinary owned object: construct one at startup, inject it
//! where needed, and call [`invalidate`](LookupCache::invalidate) when the
//! backend data is known to have changed. There is no hidden process-wide
//! state.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use mrpc_broker::{RpcParam, RpcTransport};
use mrpc_query::reply;
use mrpc_types::{Ien, RpcName};

use crate::error::{DomainError, DomainResult};

/// One entry of a lookup list. Layout: `IEN^name^abbreviation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupEntry {
    pub ien: Ien,
    pub name: String,
    pub abbreviation: Option<String>,
}

impl LookupEntry {
    fn from_fields(fields: &[String]) -> DomainResult<Self> {
        let ien = fields
            .first()
            .map(String::as_str)
            .ok_or(DomainError::MissingField {
                record: "lookup entry",
                index: 0,
            })
            .and_then(|raw| Ien::parse(raw).map_err(DomainError::from))?;
        let name = fields
            .get(1)
            .cloned()
            .ok_or(DomainError::MissingField {
                record: "lookup entry",
                index: 1,
            })?;
        let abbreviation = fields
            .get(2)
            .filter(|value| !value.is_empty())
            .cloned();

        Ok(Self {
            ien,
            name,
            abbreviation,
        })
    }
}

/// Describes how one lookup list is fetched.
#[derive(Debug, Clone)]
pub struct LookupTable {
    /// The remote procedure that lists the table.
    pub operation: RpcName,
    /// Fixed call arguments (lookup lists take none or constants).
    pub params: Vec<RpcParam>,
    /// Field delimiter the procedure replies with (`^` or `;`).
    pub field_delimiter: char,
}

impl LookupTable {
    /// A caret-delimited table with no call arguments.
    pub fn new(operation: RpcName) -> Self {
        Self {
            operation,
            params: Vec::new(),
            field_delimiter: '^',
        }
    }

    /// Overrides the field delimiter.
    pub fn with_field_delimiter(mut self, delimiter: char) -> Self {
        self.field_delimiter = delimiter;
        self
    }
}

/// Explicitly owned cache of lookup lists, keyed by operation name.
pub struct LookupCache {
    transport: Rc<dyn RpcTransport>,
    tables: RefCell<HashMap<String, Rc<Vec<LookupEntry>>>>,
}

impl LookupCache {
    /// Creates an empty cache over a shared transport.
    pub fn new(transport: Rc<dyn RpcTransport>) -> Self {
        Self {
            transport,
            tables: RefCell::new(HashMap::new()),
        }
    }

    /// Returns the entries of a table, fetching on first use.
    ///
    /// The returned list is shared; clones of the `Rc` stay valid across
    /// invalidation (consumers holding one simply keep the stale snapshot
    /// until they re-fetch).
    pub fn get(&self, table: &LookupTable) -> DomainResult<Rc<Vec<LookupEntry>>> {
        if let Some(entries) = self.tables.borrow().get(table.operation.as_str()) {
            return Ok(Rc::clone(entries));
        }

        let payload = self
            .transport
            .call_sync(table.operation.as_str(), &table.params)?;
        let rows = reply::parse_reply(&payload, table.field_delimiter)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in &rows {
            entries.push(LookupEntry::from_fields(row)?);
        }

        tracing::debug!(
            operation = table.operation.as_str(),
            entries = entries.len(),
            "cached lookup list"
        );

        let entries = Rc::new(entries);
        self.tables
            .borrow_mut()
            .insert(table.operation.as_str().to_owned(), Rc::clone(&entries));
        Ok(entries)
    }

    /// Drops the cached copy of one table; the next `get` re-fetches.
    pub fn invalidate(&self, operation: &RpcName) {
        self.tables.borrow_mut().remove(operation.as_str());
    }

    /// Drops every cached table.
    pub fn clear(&self) {
        self.tables.borrow_mut().clear();
    }
}
