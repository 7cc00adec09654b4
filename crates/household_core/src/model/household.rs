//! Household domain model.
//!
//! # Responsibility
//! - Define the canonical household record and its nested members.
//! - Expose derived facts used by metric calculations.
//!
//! # Invariants
//! - `id` is stable and never reused for another household.
//! - Values of these types only exist after schema validation passed, so
//!   `income >= 0` and `members` is non-empty.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a stored household.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type HouseholdId = Uuid;

/// Fixed gender enumeration accepted by the member schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// All accepted wire values, in declaration order.
    pub const CHOICES: [&'static str; 2] = ["male", "female"];

    /// Parses the exact lowercase wire value.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Self::Male),
            "female" => Some(Self::Female),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// One person inside a household. Has no identity of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Member {
    pub age: u32,
    pub gender: Gender,
}

impl Member {
    pub fn new(age: u32, gender: Gender) -> Self {
        Self { age, gender }
    }
}

/// Canonical household record as held in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Household {
    /// Generated server-side unless the caller supplied one.
    pub id: HouseholdId,
    /// Annual household income, never negative.
    pub income: f64,
    /// Ordered member list, never empty.
    pub members: Vec<Member>,
}

impl Household {
    /// Creates a household with a freshly generated id.
    pub fn new(income: f64, members: Vec<Member>) -> Self {
        Self::with_id(Uuid::new_v4(), income, members)
    }

    /// Creates a household with a caller-provided id.
    pub fn with_id(id: HouseholdId, income: f64, members: Vec<Member>) -> Self {
        Self {
            id,
            income,
            members,
        }
    }

    /// Number of members; the input to poverty guideline lookups.
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{Gender, Household, Member};

    #[test]
    fn gender_parse_accepts_only_exact_choices() {
        assert_eq!(Gender::parse("male"), Some(Gender::Male));
        assert_eq!(Gender::parse("female"), Some(Gender::Female));
        assert_eq!(Gender::parse("Female"), None);
        assert_eq!(Gender::parse(""), None);
    }

    #[test]
    fn new_household_generates_distinct_ids() {
        let members = vec![Member::new(30, Gender::Male)];
        let first = Household::new(1000.0, members.clone());
        let second = Household::new(1000.0, members);

        assert!(!first.id.is_nil());
        assert_ne!(first.id, second.id);
        assert_eq!(first.size(), 1);
    }
}
