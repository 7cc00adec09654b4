//! Generic create/find service over one store collection.
//!
//! # Responsibility
//! - Validate payloads with the collection's schema before persistence.
//! - Translate store outcomes into response envelopes.
//!
//! # Invariants
//! - Nothing reaches the store without passing schema validation.
//! - Store failures become a generic 500 envelope; internal detail is only
//!   logged, never returned.
//! - No record is cached; every read goes to the store.

use crate::model::household::Household;
use crate::response::Envelope;
use crate::schema::{CanonicalRecord, Collection};
use crate::store::{RecordStore, StoreError, StoreResult};
use log::{error, info};
use serde_json::{json, Value};

/// Envelope-returning CRUD facade for a single collection.
pub struct CollectionService<S: RecordStore> {
    store: S,
    collection: Collection,
}

impl<S: RecordStore> CollectionService<S> {
    pub fn new(store: S, collection: Collection) -> Self {
        Self { store, collection }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Validates and stores `payload`.
    ///
    /// Returns `success([{id}])`, or `bad_request` listing every violation.
    pub fn create(&self, payload: &Value) -> Envelope {
        let record = match self.collection.validate(payload) {
            Ok(record) => record,
            Err(violations) => {
                info!(
                    "event=record_create module=service status=rejected collection={} violations={}",
                    self.collection,
                    violations.violations().len()
                );
                return Envelope::bad_request(Some(&violations.to_string()));
            }
        };

        match self.persist(&record) {
            Ok(id) => {
                info!(
                    "event=record_create module=service status=ok collection={} id={}",
                    self.collection, id
                );
                Envelope::success(vec![json!({ "id": id })])
            }
            Err(err) => self.store_failure("record_create", &err),
        }
    }

    /// Finds one record by id, or a 404 naming the collection and id.
    pub fn find_one(&self, id: &str) -> Envelope {
        match self.load_one(id) {
            Ok(Some(record)) => match record.to_value() {
                Ok(value) => Envelope::success(vec![value]),
                Err(err) => self.store_failure("record_find_one", &err),
            },
            Ok(None) => self.not_found(id),
            Err(err) => self.store_failure("record_find_one", &err),
        }
    }

    /// Lists every record; an empty collection is a successful empty list.
    pub fn find_all(&self) -> Envelope {
        let records = match self.load_all() {
            Ok(records) => records,
            Err(err) => return self.store_failure("record_find_all", &err),
        };

        match records
            .iter()
            .map(CanonicalRecord::to_value)
            .collect::<serde_json::Result<Vec<_>>>()
        {
            Ok(values) => Envelope::success(values),
            Err(err) => self.store_failure("record_find_all", &err),
        }
    }

    /// Reads one typed record without envelope formatting.
    pub fn load_one(&self, id: &str) -> StoreResult<Option<CanonicalRecord>> {
        let name = self.collection.name();
        match self.collection {
            Collection::Household => Ok(self
                .store
                .find_one::<Household>(name, id)?
                .map(CanonicalRecord::Household)),
        }
    }

    /// Reads every typed record without envelope formatting.
    pub fn load_all(&self) -> StoreResult<Vec<CanonicalRecord>> {
        let name = self.collection.name();
        match self.collection {
            Collection::Household => Ok(self
                .store
                .find_all::<Household>(name)?
                .into_iter()
                .map(CanonicalRecord::Household)
                .collect()),
        }
    }

    /// 404 envelope used whenever `id` is absent from this collection.
    pub fn not_found(&self, id: &str) -> Envelope {
        Envelope::not_found(
            Some(&format!("{} with id {} was not found", self.collection, id)),
            None,
        )
    }

    /// Logs an infrastructure failure and returns the generic 500 envelope.
    pub fn store_failure(&self, event: &str, err: &dyn std::error::Error) -> Envelope {
        error!(
            "event={} module=service status=error collection={} error={}",
            event, self.collection, err
        );
        Envelope::server_error(None)
    }

    fn persist(&self, record: &CanonicalRecord) -> Result<String, StoreError> {
        let name = record.collection().name();
        match record {
            CanonicalRecord::Household(household) => self.store.create(name, household),
        }
    }
}
