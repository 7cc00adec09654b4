//! Core domain logic for the household API.
//! This crate owns validation, persistence and response formatting; HTTP
//! transport lives in `household_server`.

pub mod db;
pub mod fpl;
pub mod logging;
pub mod model;
pub mod response;
pub mod schema;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::household::{Gender, Household, HouseholdId, Member};
pub use response::{Envelope, ErrorBody};
pub use schema::{CanonicalRecord, Collection, FieldViolation, ValidationError};
pub use service::collection_service::CollectionService;
pub use service::household_service::{FplSummary, HouseholdService};
pub use store::{Record, RecordStore, SqliteRecordStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
