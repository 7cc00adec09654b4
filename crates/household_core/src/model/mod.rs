//! Domain model for household records.
//!
//! # Responsibility
//! - Define canonical data structures persisted by the record store.
//! - Keep the wire shape (`id`, `income`, `members`) stable across layers.
//!
//! # Invariants
//! - Every household is identified by a stable `HouseholdId`.
//! - Records are immutable once stored; there is no update/delete path.

pub mod household;
