//! Positional-field record stubs.
//!
//! List procedures describe records as one delimited row each; field 0 is the
//! IEN and the remaining field layout is a contract with the backend's RPC
//! catalog. The stubs here carry only what the UI layer needs to render a
//! list entry and to fetch detail later by IEN.

use serde::{Deserialize, Serialize};

use mrpc_types::{FmDate, Ien};

use crate::error::DomainError;

/// Returns the field at `index`, or the missing-field error for `record`.
fn field<'a>(
    fields: &'a [String],
    index: usize,
    record: &'static str,
) -> Result<&'a str, DomainError> {
    fields
        .get(index)
        .map(String::as_str)
        .ok_or(DomainError::MissingField { record, index })
}

/// Returns the field at `index` if it is present and non-empty.
fn optional_field(fields: &[String], index: usize) -> Option<&str> {
    fields
        .get(index)
        .map(String::as_str)
        .filter(|value| !value.is_empty())
}

/// A treating facility. Layout: `IEN^name^station number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Institution {
    pub ien: Ien,
    pub name: String,
    pub station_number: Option<String>,
}

impl Institution {
    /// Builds an institution from one reply row.
    pub fn from_fields(fields: &[String]) -> Result<Self, DomainError> {
        Ok(Self {
            ien: Ien::parse(field(fields, 0, "institution")?)?,
            name: field(fields, 1, "institution")?.to_owned(),
            station_number: optional_field(fields, 2).map(str::to_owned),
        })
    }
}

/// A care provider. Layout: `IEN^name^title`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub ien: Ien,
    pub name: String,
    pub title: Option<String>,
}

impl Provider {
    /// Builds a provider from one reply row.
    pub fn from_fields(fields: &[String]) -> Result<Self, DomainError> {
        Ok(Self {
            ien: Ien::parse(field(fields, 0, "provider")?)?,
            name: field(fields, 1, "provider")?.to_owned(),
            title: optional_field(fields, 2).map(str::to_owned),
        })
    }
}

/// A clinical document list entry. Layout:
/// `IEN^title^reference date^author`.
///
/// The reference date is the backend's FileMan timestamp for the document;
/// rows may omit it for unsigned drafts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentStub {
    pub ien: Ien,
    pub title: String,
    pub reference_date: Option<FmDate>,
    pub author: Option<String>,
}

impl DocumentStub {
    /// Builds a document stub from one reply row.
    pub fn from_fields(fields: &[String]) -> Result<Self, DomainError> {
        let reference_date = match optional_field(fields, 2) {
            Some(raw) => Some(FmDate::parse(raw)?),
            None => None,
        };

        Ok(Self {
            ien: Ien::parse(field(fields, 0, "document")?)?,
            title: field(fields, 1, "document")?.to_owned(),
            reference_date,
            author: optional_field(fields, 3).map(str::to_owned),
        })
    }
}

/// Tagged union of the record stubs, as produced by the
/// [`standard_registry`](crate::registry::standard_registry).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClinicalRecord {
    Institution(Institution),
    Provider(Provider),
    Document(DocumentStub),
}

impl ClinicalRecord {
    /// The record's IEN, whatever its variant.
    pub fn ien(&self) -> Ien {
        match self {
            Self::Institution(record) => record.ien,
            Self::Provider(record) => record.ien,
            Self::Document(record) => record.ien,
        }
    }
}
