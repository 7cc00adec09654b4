//! Record schemas and collection dispatch.
//!
//! # Responsibility
//! - Turn untrusted decoded JSON into canonical, storable records.
//! - Map each collection tag to its compiled schema without runtime lookup.
//!
//! # Invariants
//! - Validation collects every violation before failing; it never stops at
//!   the first bad field.
//! - A `CanonicalRecord` always has every field populated, including `id`.

use crate::model::household::Household;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod household;

pub use household::validate_household;

/// Field name used for violations that concern the payload as a whole.
pub const ROOT_FIELD: &str = "<root>";

/// Named record collections known to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Household,
}

impl Collection {
    /// Store-level collection name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Household => "Household",
        }
    }

    /// Validates `payload` against this collection's schema.
    pub fn validate(self, payload: &Value) -> Result<CanonicalRecord, ValidationError> {
        match self {
            Self::Household => validate_household(payload).map(CanonicalRecord::Household),
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Fully validated record, tagged by the collection it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalRecord {
    Household(Household),
}

impl CanonicalRecord {
    pub fn collection(&self) -> Collection {
        match self {
            Self::Household(_) => Collection::Household,
        }
    }

    /// Store key of this record.
    pub fn id(&self) -> String {
        match self {
            Self::Household(household) => household.id.to_string(),
        }
    }

    /// Wire form used as an envelope result item.
    pub fn to_value(&self) -> serde_json::Result<Value> {
        match self {
            Self::Household(household) => serde_json::to_value(household),
        }
    }
}

/// One rule violation on one field path (e.g. `members[0].age`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl Display for FieldViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every violation found in one payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn violations(&self) -> &[FieldViolation] {
        &self.violations
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns whether any violation targets `field` exactly.
    pub fn has_field(&self, field: &str) -> bool {
        self.violations
            .iter()
            .any(|violation| violation.field == field)
    }

    pub(crate) fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.into(),
            message: message.into(),
        });
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (index, violation) in self.violations.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::{CanonicalRecord, Collection, ValidationError};
    use serde_json::json;

    #[test]
    fn collection_name_is_the_store_key_prefix() {
        assert_eq!(Collection::Household.name(), "Household");
        assert_eq!(Collection::Household.to_string(), "Household");
    }

    #[test]
    fn collection_validate_dispatches_to_household_schema() {
        let record = Collection::Household
            .validate(&json!({"income": 10, "members": [{"age": 1, "gender": "male"}]}))
            .unwrap();
        assert_eq!(record.collection(), Collection::Household);
        let CanonicalRecord::Household(household) = &record;
        assert_eq!(record.id(), household.id.to_string());
    }

    #[test]
    fn validation_error_display_joins_all_violations() {
        let mut error = ValidationError::default();
        error.push("income", "This field is required.");
        error.push("members", "This field is required.");

        assert_eq!(
            error.to_string(),
            "income: This field is required.; members: This field is required."
        );
        assert!(error.has_field("income"));
        assert!(!error.has_field("age"));
    }
}
