//! Collection-oriented key-value store.
//!
//! # Responsibility
//! - Define the create/find-one/find-all contract used by services.
//! - Own the canonical JSON encoding of stored records.
//!
//! # Invariants
//! - Each entry is `collection + id -> canonical JSON document`.
//! - `create` overwrites an existing id silently; callers supply fresh ids.
//! - "Not found" is `Ok(None)`, never an error. Errors mean the store itself
//!   failed or holds undecodable data.
//! - `encode_record` followed by `decode_record` yields an equal record.

use crate::db::DbError;
use crate::model::household::Household;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod sqlite;

pub use sqlite::SqliteRecordStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// A value that can be kept in a store collection under its own id.
pub trait Record: Serialize + DeserializeOwned {
    /// Store key for this record.
    fn record_id(&self) -> String;
}

impl Record for Household {
    fn record_id(&self) -> String {
        self.id.to_string()
    }
}

/// Infrastructure failure of the record store.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    Encode {
        collection: String,
        source: serde_json::Error,
    },
    Decode {
        collection: String,
        id: String,
        source: serde_json::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode { collection, source } => {
                write!(f, "failed to encode {collection} record: {source}")
            }
            Self::Decode {
                collection,
                id,
                source,
            } => write!(
                f,
                "invalid persisted {collection} record `{id}`: {source}"
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode { source, .. } | Self::Decode { source, .. } => Some(source),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store contract shared by every backend.
pub trait RecordStore {
    /// Writes `record` under its id in `collection` and returns that id.
    fn create<T: Record>(&self, collection: &str, record: &T) -> StoreResult<String>;

    /// Reads one record by id; `Ok(None)` when absent.
    fn find_one<T: Record>(&self, collection: &str, id: &str) -> StoreResult<Option<T>>;

    /// Reads every record of `collection` in store-determined order.
    fn find_all<T: Record>(&self, collection: &str) -> StoreResult<Vec<T>>;
}

/// Serializes a record into its canonical stored form.
pub fn encode_record<T: Record>(record: &T) -> serde_json::Result<String> {
    serde_json::to_string(record)
}

/// Parses a stored document back into a record.
pub fn decode_record<T: Record>(encoded: &str) -> serde_json::Result<T> {
    serde_json::from_str(encoded)
}

#[cfg(test)]
mod tests {
    use super::{decode_record, encode_record, Record};
    use crate::model::household::{Gender, Household, Member};
    use uuid::Uuid;

    #[test]
    fn encoded_household_uses_canonical_fields() {
        let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
        let household = Household::with_id(id, 900000.0, vec![Member::new(45, Gender::Female)]);

        let value: serde_json::Value =
            serde_json::from_str(&encode_record(&household).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "11111111-2222-4333-8444-555555555555",
                "income": 900000.0,
                "members": [{"age": 45, "gender": "female"}]
            })
        );
        assert_eq!(household.record_id(), id.to_string());
    }

    #[test]
    fn encode_decode_roundtrip_preserves_awkward_floats() {
        for income in [0.0, 0.1, 1.0 / 3.0, 12345.678_901_234_5, 1e15 + 0.5] {
            let household = Household::new(
                income,
                vec![Member::new(0, Gender::Male), Member::new(u32::MAX, Gender::Female)],
            );
            let decoded: Household = decode_record(&encode_record(&household).unwrap()).unwrap();
            assert_eq!(decoded, household);
            assert_eq!(decoded.income.to_bits(), income.to_bits());
        }
    }

    #[test]
    fn decode_rejects_non_canonical_documents() {
        let err = decode_record::<Household>(r#"{"id":"not-a-uuid","income":1,"members":[]}"#);
        assert!(err.is_err());
    }
}
