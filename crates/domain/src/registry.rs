//! Record construction by discriminator.
//!
//! Polymorphic replies name their record kind with a string discriminator.
//! [`FactoryRegistry`] maps each discriminator to a plain constructor
//! function; the map is populated once at startup, so an unknown
//! discriminator at parse time is a configuration or contract error, never a
//! reflective fallback.

use std::collections::HashMap;

use crate::error::DomainError;

/// Constructs one record from a row of positional fields.
pub type RecordConstructor<T> = fn(&[String]) -> Result<T, DomainError>;

/// An explicit discriminator-to-constructor map.
#[derive(Debug, Clone)]
pub struct FactoryRegistry<T> {
    constructors: HashMap<String, RecordConstructor<T>>,
}

impl<T> Default for FactoryRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FactoryRegistry<T> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Registers a constructor under a discriminator.
    ///
    /// Registering the same discriminator twice is an error: the registry is
    /// resolved once at startup and a silent overwrite would hide a wiring
    /// mistake.
    pub fn register(
        &mut self,
        discriminator: impl Into<String>,
        constructor: RecordConstructor<T>,
    ) -> Result<(), DomainError> {
        let discriminator = discriminator.into();
        if self.constructors.contains_key(&discriminator) {
            return Err(DomainError::DuplicateDiscriminator(discriminator));
        }
        self.constructors.insert(discriminator, constructor);
        Ok(())
    }

    /// Constructs a record of the kind named by `discriminator`.
    pub fn construct(&self, discriminator: &str, fields: &[String]) -> Result<T, DomainError> {
        let constructor = self
            .constructors
            .get(discriminator)
            .ok_or_else(|| DomainError::UnknownDiscriminator(discriminator.to_owned()))?;
        constructor(fields)
    }

    /// Returns whether a constructor is registered for `discriminator`.
    pub fn contains(&self, discriminator: &str) -> bool {
        self.constructors.contains_key(discriminator)
    }
}

/// Wires the registry for the standard record stubs.
///
/// Intended to be called once at startup and passed by reference to
/// consumers.
pub fn standard_registry() -> Result<FactoryRegistry<crate::records::ClinicalRecord>, DomainError> {
    use crate::records::{ClinicalRecord, DocumentStub, Institution, Provider};

    let mut registry = FactoryRegistry::new();
    registry.register("institution", |fields| {
        Institution::from_fields(fields).map(ClinicalRecord::Institution)
    })?;
    registry.register("provider", |fields| {
        Provider::from_fields(fields).map(ClinicalRecord::Provider)
    })?;
    registry.register("document", |fields| {
        DocumentStub::from_fields(fields).map(ClinicalRecord::Document)
    })?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ClinicalRecord;

    fn fields(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| (*v).to_owned()).collect()
    }

    #[test]
    fn constructs_by_discriminator() {
        let registry = standard_registry().expect("startup wiring");

        let record = registry
            .construct("provider", &fields(&["99", "WELBY,MARCUS", "PHYSICIAN"]))
            .expect("registered discriminator");
        assert!(matches!(record, ClinicalRecord::Provider(_)));

        let record = registry
            .construct("document", &fields(&["1201", "NOTE", "3200101"]))
            .expect("registered discriminator");
        assert!(matches!(record, ClinicalRecord::Document(_)));
    }

    #[test]
    fn unknown_discriminator_is_an_error() {
        let registry = standard_registry().expect("startup wiring");
        let err = registry
            .construct("hologram", &fields(&["1", "X"]))
            .expect_err("unregistered discriminator");
        assert!(matches!(err, DomainError::UnknownDiscriminator(name) if name == "hologram"));
    }

    #[test]
    fn duplicate_registration_is_an_error() {
        let mut registry: FactoryRegistry<ClinicalRecord> = FactoryRegistry::new();
        registry
            .register("institution", |fields| {
                crate::records::Institution::from_fields(fields).map(ClinicalRecord::Institution)
            })
            .expect("first registration");

        let err = registry
            .register("institution", |fields| {
                crate::records::Institution::from_fields(fields).map(ClinicalRecord::Institution)
            })
            .expect_err("second registration must fail");
        assert!(matches!(err, DomainError::DuplicateDiscriminator(name) if name == "institution"));
    }

    #[test]
    fn constructor_errors_pass_through() {
        let registry = standard_registry().expect("startup wiring");
        let err = registry
            .construct("institution", &fields(&["0", "CAMP MASTER"]))
            .expect_err("zero IEN must fail construction");
        assert!(matches!(err, DomainError::InvalidIen(_)));
    }
}
