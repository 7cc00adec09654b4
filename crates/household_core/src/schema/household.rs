//! Household and member schema rules.
//!
//! # Invariants
//! - `income` parses as a float and is `>= 0`.
//! - `members` is a non-empty list of valid members.
//! - `age` parses as an integer and is `>= 0`.
//! - `gender` is one of `Gender::CHOICES`.
//! - Unknown fields are rejected at every level.

use super::{ValidationError, ROOT_FIELD};
use crate::model::household::{Gender, Household, HouseholdId, Member};
use serde_json::{Map, Value};
use uuid::Uuid;

const HOUSEHOLD_FIELDS: [&str; 3] = ["id", "income", "members"];
const MEMBER_FIELDS: [&str; 2] = ["age", "gender"];

const REQUIRED: &str = "This field is required.";
const ROGUE_FIELD: &str = "Rogue field.";
const NOT_OBJECT: &str = "Value is not a JSON object.";
const NOT_MEMBER_OBJECT: &str = "Value is not a member object.";
const NOT_LIST: &str = "Value is not a list.";
const MIN_MEMBERS: &str = "Please provide at least 1 item.";
const NEGATIVE_INCOME: &str = "Income must be a float greater than or equal to zero";
const NEGATIVE_AGE: &str = "Age must be an integer greater than or equal to zero";

/// Validates an untrusted household payload into a canonical `Household`.
///
/// A missing or `null` `id` is replaced by a fresh v4 UUID. All violations
/// found anywhere in the payload are returned together.
pub fn validate_household(payload: &Value) -> Result<Household, ValidationError> {
    let mut errors = ValidationError::default();
    let Some(object) = payload.as_object() else {
        errors.push(ROOT_FIELD, NOT_OBJECT);
        return Err(errors);
    };

    reject_rogue_fields(object, &HOUSEHOLD_FIELDS, None, &mut errors);

    let id = match object.get("id") {
        None | Some(Value::Null) => Some(Uuid::new_v4()),
        Some(value) => check(value, "id", &mut errors, parse_id),
    };
    let income = required(object, "income", "income", &mut errors, parse_income);
    let members = match object.get("members") {
        None | Some(Value::Null) => {
            errors.push("members", REQUIRED);
            None
        }
        Some(value) => validate_members(value, &mut errors),
    };

    match (id, income, members) {
        (Some(id), Some(income), Some(members)) if errors.is_empty() => {
            Ok(Household::with_id(id, income, members))
        }
        _ => Err(errors),
    }
}

fn validate_members(value: &Value, errors: &mut ValidationError) -> Option<Vec<Member>> {
    let Value::Array(items) = value else {
        errors.push("members", NOT_LIST);
        return None;
    };
    if items.is_empty() {
        errors.push("members", MIN_MEMBERS);
        return None;
    }

    let mut members = Vec::with_capacity(items.len());
    let mut all_valid = true;
    for (index, item) in items.iter().enumerate() {
        match validate_member(item, &format!("members[{index}]"), errors) {
            Some(member) => members.push(member),
            None => all_valid = false,
        }
    }

    all_valid.then_some(members)
}

fn validate_member(value: &Value, path: &str, errors: &mut ValidationError) -> Option<Member> {
    let Some(object) = value.as_object() else {
        errors.push(path, NOT_MEMBER_OBJECT);
        return None;
    };

    reject_rogue_fields(object, &MEMBER_FIELDS, Some(path), errors);

    let age = required(object, "age", &format!("{path}.age"), errors, parse_age);
    let gender = required(
        object,
        "gender",
        &format!("{path}.gender"),
        errors,
        parse_gender,
    );

    Some(Member::new(age?, gender?))
}

fn required<T>(
    object: &Map<String, Value>,
    key: &str,
    path: &str,
    errors: &mut ValidationError,
    rule: impl FnOnce(&Value) -> Result<T, String>,
) -> Option<T> {
    match object.get(key) {
        None | Some(Value::Null) => {
            errors.push(path, REQUIRED);
            None
        }
        Some(value) => check(value, path, errors, rule),
    }
}

fn check<T>(
    value: &Value,
    path: &str,
    errors: &mut ValidationError,
    rule: impl FnOnce(&Value) -> Result<T, String>,
) -> Option<T> {
    match rule(value) {
        Ok(parsed) => Some(parsed),
        Err(message) => {
            errors.push(path, message);
            None
        }
    }
}

fn reject_rogue_fields(
    object: &Map<String, Value>,
    allowed: &[&str],
    prefix: Option<&str>,
    errors: &mut ValidationError,
) {
    for key in object.keys() {
        if allowed.contains(&key.as_str()) {
            continue;
        }
        match prefix {
            Some(prefix) => errors.push(format!("{prefix}.{key}"), ROGUE_FIELD),
            None => errors.push(key.as_str(), ROGUE_FIELD),
        }
    }
}

fn parse_id(value: &Value) -> Result<HouseholdId, String> {
    value
        .as_str()
        .and_then(|text| Uuid::parse_str(text.trim()).ok())
        .ok_or_else(|| format!("Value '{}' is not a valid UUID.", describe(value)))
}

fn parse_income(value: &Value) -> Result<f64, String> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|income| income.is_finite())
    .ok_or_else(|| format!("Value '{}' is not float.", describe(value)))?;

    if parsed < 0.0 {
        return Err(NEGATIVE_INCOME.to_string());
    }
    Ok(parsed)
}

fn parse_age(value: &Value) -> Result<u32, String> {
    let parsed = match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|age| age.fract() == 0.0 && age.abs() <= i64::MAX as f64)
                .map(|age| age as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| format!("Value '{}' is not int.", describe(value)))?;

    if parsed < 0 {
        return Err(NEGATIVE_AGE.to_string());
    }
    u32::try_from(parsed).map_err(|_| format!("Age must be at most {}", u32::MAX))
}

fn parse_gender(value: &Value) -> Result<Gender, String> {
    value.as_str().and_then(Gender::parse).ok_or_else(|| {
        let choices = Gender::CHOICES
            .iter()
            .map(|choice| format!("'{choice}'"))
            .collect::<Vec<_>>()
            .join(", ");
        format!("Value must be one of [{choices}].")
    })
}

fn describe(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::validate_household;
    use crate::model::household::Gender;
    use crate::schema::ROOT_FIELD;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn valid_payload_produces_canonical_record_with_generated_id() {
        let household = validate_household(&json!({
            "income": 100000,
            "members": [{"age": 45, "gender": "female"}, {"age": "7", "gender": "male"}]
        }))
        .unwrap();

        assert!(!household.id.is_nil());
        assert_eq!(household.income, 100000.0);
        assert_eq!(household.members.len(), 2);
        assert_eq!(household.members[1].age, 7);
        assert_eq!(household.members[1].gender, Gender::Male);
    }

    #[test]
    fn explicit_id_is_preserved() {
        let id = Uuid::parse_str("11111111-2222-4333-8444-555555555555").unwrap();
        let household = validate_household(&json!({
            "id": id.to_string(),
            "income": "12.5",
            "members": [{"age": 0, "gender": "male"}]
        }))
        .unwrap();

        assert_eq!(household.id, id);
        assert_eq!(household.income, 12.5);
    }

    #[test]
    fn missing_fields_are_all_reported() {
        let err = validate_household(&json!({})).unwrap_err();

        assert!(err.has_field("income"));
        assert!(err.has_field("members"));
        assert_eq!(err.violations().len(), 2);
        assert!(err.to_string().contains("This field is required."));
    }

    #[test]
    fn empty_members_is_rejected_without_income_violation() {
        let err = validate_household(&json!({"income": 100000, "members": []})).unwrap_err();
        let message = err.to_string();

        assert!(message.contains("members"));
        assert!(!message.contains("income"));
    }

    #[test]
    fn negative_income_mentions_lower_bound() {
        let err = validate_household(&json!({
            "income": -100000,
            "members": [{"age": 45, "gender": "female"}]
        }))
        .unwrap_err();
        let message = err.to_string();

        assert!(message.contains("income"));
        assert!(message.contains("greater than or equal to zero"));
    }

    #[test]
    fn non_numeric_age_reports_type_mismatch() {
        let err = validate_household(&json!({
            "income": 100000,
            "members": [{"age": "forty", "gender": "female"}]
        }))
        .unwrap_err();
        let message = err.to_string();

        assert!(err.has_field("members[0].age"));
        assert!(message.contains("'forty' is not int"));
    }

    #[test]
    fn violations_across_fields_are_collected_together() {
        let err = validate_household(&json!({
            "members": [
                {"age": -1, "gender": "female"},
                {"age": 4.5, "gender": "other", "name": "x"}
            ],
            "extra": true
        }))
        .unwrap_err();

        assert!(err.has_field("income"));
        assert!(err.has_field("extra"));
        assert!(err.has_field("members[0].age"));
        assert!(err.has_field("members[1].age"));
        assert!(err.has_field("members[1].gender"));
        assert!(err.has_field("members[1].name"));
        assert!(err.to_string().contains("['male', 'female']"));
    }

    #[test]
    fn wrong_shapes_are_rejected() {
        let err = validate_household(&json!([1, 2])).unwrap_err();
        assert!(err.has_field(ROOT_FIELD));

        let err = validate_household(&json!({
            "id": 7,
            "income": true,
            "members": {"age": 1}
        }))
        .unwrap_err();
        assert!(err.has_field("id"));
        assert!(err.to_string().contains("'true' is not float"));
        assert!(err.has_field("members"));

        let err = validate_household(&json!({"income": 1, "members": ["bob"]})).unwrap_err();
        assert!(err.has_field("members[0]"));
    }

    #[test]
    fn null_required_fields_count_as_missing() {
        let err = validate_household(&json!({
            "income": null,
            "members": [{"age": null, "gender": "male"}]
        }))
        .unwrap_err();

        assert!(err.has_field("income"));
        assert!(err.has_field("members[0].age"));
    }
}
