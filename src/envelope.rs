//! Shapes raw upstream bodies into [`ResultEnvelope`]s.
//!
//! Upstream services disagree on field names (`name` vs `fullName`, `id` vs `_id`)
//! and on scalar types (IDs arrive as strings or numbers). Every field is read
//! through [`first_present`], which walks an ordered alias list and keeps the
//! first non-empty scalar.

use crate::errors::AppError;
use crate::models::{MobileInfo, ResultEnvelope, UserRecord, VehicleDetails, VehicleResult};
use serde_json::{Map, Value};

pub const NAME_ALIASES: &[&str] = &["name", "fullName"];
pub const MOBILE_ALIASES: &[&str] = &["mobile", "phone"];
pub const ID_ALIASES: &[&str] = &["id", "_id"];

/// Number of trailing chassis characters the vehicle-mobile service expects.
pub const CHASSIS_SUFFIX_LEN: usize = 5;

/// String form of a scalar, or `None` for empty/zero/null/non-scalar values.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        _ => None,
    }
}

/// Resolves the first alias in `aliases` that holds a non-empty scalar.
pub fn first_present(map: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    aliases
        .iter()
        .filter_map(|key| map.get(*key))
        .find_map(scalar_text)
}

fn field(map: &Map<String, Value>, key: &str) -> Option<String> {
    first_present(map, &[key])
}

/// Removes `key` from `map`, returning its text form.
fn take_field(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    map.remove(key).as_ref().and_then(scalar_text)
}

/// JavaScript-style truthiness, used to decide whether a body means "nothing found".
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Builds a user envelope from a user-record body.
///
/// Returns `None` when the body carries no record: a falsy scalar, an empty
/// object, or anything that is not a JSON object. A non-empty object is a hit
/// even if every field in it is empty.
pub fn build_user_envelope(body: Value) -> Option<ResultEnvelope> {
    let Value::Object(map) = body else {
        return None;
    };
    if map.is_empty() {
        return None;
    }

    Some(ResultEnvelope::User(user_record_from_map(map)))
}

pub fn user_record_from_map(map: Map<String, Value>) -> UserRecord {
    UserRecord {
        name: first_present(&map, NAME_ALIASES),
        mobile: first_present(&map, MOBILE_ALIASES),
        email: field(&map, "email"),
        id: first_present(&map, ID_ALIASES),
        fname: field(&map, "fname"),
        address: field(&map, "address"),
        circle: field(&map, "circle"),
        alt: field(&map, "alt"),
        raw: map,
    }
}

/// Extracts the vehicle record from a vehicle-detail body.
///
/// `None` means the registration is unknown: the body is falsy, is not an
/// object, or has a missing/falsy `data` field.
pub fn extract_vehicle_details(body: Value) -> Option<VehicleDetails> {
    let Value::Object(mut envelope) = body else {
        return None;
    };
    let data = envelope.remove("data").filter(is_truthy)?;

    let mut map = match data {
        Value::Object(map) => map,
        // `data` present but not an object: a record with no readable fields.
        _ => Map::new(),
    };

    // Only a string chassis number can key the secondary lookup.
    let chassis_no = match map.remove("chassis_no") {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        _ => None,
    };

    Some(VehicleDetails {
        owner_name: take_field(&mut map, "owner_name"),
        maker_model: take_field(&mut map, "maker_model"),
        registration_no: take_field(&mut map, "registration_no"),
        chassis_no,
        engine_no: take_field(&mut map, "engine_no"),
        vehicle_color: take_field(&mut map, "vehicle_color"),
        fuel_type: take_field(&mut map, "fuel_type"),
        registration_date: take_field(&mut map, "registration_date"),
        vehicle_class: take_field(&mut map, "vehicle_class"),
        rc_status: take_field(&mut map, "rc_status"),
        insurance_company: take_field(&mut map, "insurance_company"),
        insurance_upto: take_field(&mut map, "insurance_upto"),
        registration_authority: take_field(&mut map, "registration_authority"),
        extra: map,
    })
}

/// Parses a vehicle-mobile body.
///
/// A falsy body yields `Ok(None)`; anything other than a JSON object is an
/// unexpected shape and reported as an error for the caller to discard.
pub fn parse_mobile_info(body: Value) -> Result<Option<MobileInfo>, AppError> {
    if !is_truthy(&body) {
        return Ok(None);
    }
    let Value::Object(map) = body else {
        return Err(AppError::ExternalApiError(
            "Vehicle mobile response was not a JSON object".to_string(),
        ));
    };

    Ok(Some(MobileInfo {
        status: field(&map, "status"),
        mobile_number: field(&map, "mobile_number"),
        raw: map,
    }))
}

/// Last [`CHASSIS_SUFFIX_LEN`] characters of a chassis number, if it is long enough.
pub fn chassis_suffix(chassis_no: &str) -> Option<&str> {
    let count = chassis_no.chars().count();
    if count < CHASSIS_SUFFIX_LEN {
        return None;
    }
    let start = chassis_no
        .char_indices()
        .nth(count - CHASSIS_SUFFIX_LEN)
        .map(|(idx, _)| idx)?;
    Some(&chassis_no[start..])
}

pub fn build_vehicle_envelope(
    vehicle_details: VehicleDetails,
    mobile_info: Option<MobileInfo>,
) -> ResultEnvelope {
    ResultEnvelope::Vehicle(VehicleResult {
        vehicle_details,
        mobile_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user(body: Value) -> UserRecord {
        match build_user_envelope(body) {
            Some(ResultEnvelope::User(record)) => record,
            other => panic!("expected user envelope, got {:?}", other),
        }
    }

    #[test]
    fn test_name_prefers_first_alias() {
        assert_eq!(user(json!({"name": "A", "fullName": "B"})).display_name(), "A");
        assert_eq!(user(json!({"fullName": "B"})).display_name(), "B");
        assert_eq!(user(json!({"mobile": "9876543210"})).display_name(), "Unknown");
    }

    #[test]
    fn test_empty_alias_falls_through() {
        let record = user(json!({"name": "", "fullName": "Meera", "mobile": "", "phone": "98"}));
        assert_eq!(record.name.as_deref(), Some("Meera"));
        assert_eq!(record.mobile.as_deref(), Some("98"));
    }

    #[test]
    fn test_numeric_ids_are_stringified() {
        let record = user(json!({"_id": 123456789012u64}));
        assert_eq!(record.id.as_deref(), Some("123456789012"));

        let record = user(json!({"id": "A1", "_id": "B2"}));
        assert_eq!(record.id.as_deref(), Some("A1"));
    }

    #[test]
    fn test_user_not_found_shapes() {
        assert!(build_user_envelope(json!({})).is_none());
        assert!(build_user_envelope(json!(null)).is_none());
        assert!(build_user_envelope(json!(false)).is_none());
        assert!(build_user_envelope(json!("")).is_none());
        assert!(build_user_envelope(json!([])).is_none());
        assert!(build_user_envelope(json!(["x"])).is_none());
    }

    #[test]
    fn test_object_with_only_falsy_fields_is_found() {
        let record = user(json!({"name": "", "mobile": null}));
        assert_eq!(record.display_name(), "Unknown");
        assert_eq!(record.raw.len(), 2);
    }

    #[test]
    fn test_vehicle_details_require_data() {
        assert!(extract_vehicle_details(json!({"error": "not found"})).is_none());
        assert!(extract_vehicle_details(json!({"data": null})).is_none());
        assert!(extract_vehicle_details(json!(null)).is_none());

        let details = extract_vehicle_details(json!({
            "data": {"registration_no": "DL11PG8009", "owner_name": "R*** K****", "extra": 1}
        }))
        .unwrap();
        assert_eq!(details.registration_no.as_deref(), Some("DL11PG8009"));
        assert_eq!(details.rc_status_label(), "Unknown");
        assert_eq!(details.extra, Map::from_iter([("extra".to_string(), json!(1))]));
    }

    #[test]
    fn test_numeric_chassis_is_not_a_chassis_number() {
        let details = extract_vehicle_details(json!({
            "data": {"registration_no": "DL11PG8009", "chassis_no": 1234567}
        }))
        .unwrap();
        assert_eq!(details.chassis_no, None);
        assert!(!details.extra.contains_key("chassis_no"));
    }

    #[test]
    fn test_vehicle_envelope_matches_wire_contract() {
        let details = extract_vehicle_details(json!({
            "data": {
                "registration_no": "DL11PG8009",
                "chassis_no": "MA3ERLF1S00123456",
                "rc_status": "ACTIVE",
                "seating_capacity": 5
            }
        }))
        .unwrap();
        let mobile_info =
            parse_mobile_info(json!({"status": "success", "mobile_number": "9876543210"})).unwrap();

        let value = serde_json::to_value(build_vehicle_envelope(details, mobile_info)).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "vehicle",
                "data": {
                    "vehicle_details": {
                        "registration_no": "DL11PG8009",
                        "chassis_no": "MA3ERLF1S00123456",
                        "rc_status": "ACTIVE",
                        "seating_capacity": 5
                    },
                    "mobile_info": {"status": "success", "mobile_number": "9876543210"}
                }
            })
        );
    }

    #[test]
    fn test_mobile_info_parsing() {
        assert_eq!(parse_mobile_info(json!(null)).unwrap(), None);
        assert!(parse_mobile_info(json!("ok")).is_err());

        let info = parse_mobile_info(json!({"status": "success", "mobile_number": 9876543210u64}))
            .unwrap()
            .unwrap();
        assert_eq!(info.verified_number(), Some("9876543210"));
    }

    #[test]
    fn test_chassis_suffix() {
        assert_eq!(chassis_suffix("MA3ERLF1S00123456"), Some("23456"));
        assert_eq!(chassis_suffix("12345"), Some("12345"));
        assert_eq!(chassis_suffix("1234"), None);
        assert_eq!(chassis_suffix(""), None);
        assert_eq!(chassis_suffix("ÄÖÜ123"), Some("ÖÜ123"));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!(-1)));
    }
}
