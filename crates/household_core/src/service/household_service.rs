//! Household use-case service.
//!
//! # Responsibility
//! - Provide household create/find entry points over the `Household`
//!   collection.
//! - Derive the FPL percentage from a stored household.
//!
//! # Invariants
//! - FPL derivation is a single store read followed by pure computation.
//! - A missing household yields the same 404 envelope as `find_one`.

use crate::fpl::fpl_percentage;
use crate::model::household::Household;
use crate::response::Envelope;
use crate::schema::{CanonicalRecord, Collection};
use crate::service::collection_service::CollectionService;
use crate::store::RecordStore;
use chrono::Datelike;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result item of `get_fpl_percentage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FplSummary {
    /// `income / threshold`; a ratio, not multiplied by 100.
    pub fpl_percentage: f64,
    pub income: f64,
    pub household_size: usize,
    /// Calendar year of the request. Informational only.
    pub year: i32,
}

impl FplSummary {
    pub fn for_household(household: &Household, year: i32) -> Self {
        let household_size = household.size();
        Self {
            fpl_percentage: fpl_percentage(household.income, household_size),
            income: household.income,
            household_size,
            year,
        }
    }
}

/// Household facade over a record store.
pub struct HouseholdService<S: RecordStore> {
    records: CollectionService<S>,
}

impl<S: RecordStore> HouseholdService<S> {
    pub fn new(store: S) -> Self {
        Self {
            records: CollectionService::new(store, Collection::Household),
        }
    }

    pub fn create(&self, payload: &Value) -> Envelope {
        self.records.create(payload)
    }

    pub fn find_one(&self, id: &str) -> Envelope {
        self.records.find_one(id)
    }

    pub fn find_all(&self) -> Envelope {
        self.records.find_all()
    }

    /// Computes the FPL percentage of household `id` for the current year.
    pub fn get_fpl_percentage(&self, id: &str) -> Envelope {
        self.get_fpl_percentage_for_year(id, chrono::Local::now().year())
    }

    /// Same as `get_fpl_percentage` with an explicit informational year.
    ///
    /// The guideline table stays pinned to `fpl::REFERENCE_YEAR`.
    pub fn get_fpl_percentage_for_year(&self, id: &str, year: i32) -> Envelope {
        let household = match self.records.load_one(id) {
            Ok(Some(CanonicalRecord::Household(household))) => household,
            Ok(None) => return self.records.not_found(id),
            Err(err) => return self.records.store_failure("household_fpl", &err),
        };

        let summary = FplSummary::for_household(&household, year);
        info!(
            "event=household_fpl module=service status=ok id={} household_size={}",
            household.id, summary.household_size
        );
        match serde_json::to_value(&summary) {
            Ok(value) => Envelope::success(vec![value]),
            Err(err) => self.records.store_failure("household_fpl", &err),
        }
    }
}
