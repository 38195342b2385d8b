use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::normalizer::SearchType;

/// Placeholder shown when an upstream record carries no usable value.
pub const UNKNOWN_PLACEHOLDER: &str = "Unknown";

// ============ Envelope Payloads ============

/// Registration details of a vehicle. Upstream may omit any field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maker_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chassis_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_no: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vehicle_class: Option<String>,
    /// Registration certificate status, e.g. `ACTIVE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rc_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub insurance_upto: Option<String>,
    /// Issuing RTO.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_authority: Option<String>,
    /// Upstream keys with no typed field above, passed through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VehicleDetails {
    /// RC status for display; a missing status is still a found vehicle.
    pub fn rc_status_label(&self) -> &str {
        self.rc_status.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER)
    }

    pub fn is_rc_active(&self) -> bool {
        self.rc_status.as_deref() == Some("ACTIVE")
    }
}

/// Owner contact returned by the chassis-based secondary lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MobileInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
    /// The response body as received; not part of the envelope.
    #[serde(skip)]
    pub raw: Map<String, Value>,
}

impl MobileInfo {
    /// The owner's number, only when the service reported `success` and sent one.
    pub fn verified_number(&self) -> Option<&str> {
        if self.status.as_deref() != Some("success") {
            return None;
        }
        self.mobile_number.as_deref().filter(|n| !n.is_empty())
    }
}

/// Vehicle payload of the envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleResult {
    pub vehicle_details: VehicleDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile_info: Option<MobileInfo>,
}

/// A person record from the user-record service, with field aliases resolved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Resolved from `name`, then `fullName`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Resolved from `mobile`, then `phone`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Resolved from `id`, then `_id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Father's name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// Telecom circle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circle: Option<String>,
    /// Alternate contact number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip)]
    pub raw: Map<String, Value>,
}

impl UserRecord {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNKNOWN_PLACEHOLDER)
    }

    /// Uppercased first character of the display name.
    pub fn initial(&self) -> String {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    /// Address with the upstream `!` separators rendered as commas.
    pub fn formatted_address(&self) -> Option<String> {
        self.address.as_ref().map(|a| a.replace('!', ", "))
    }
}

// ============ Envelope & Outcome ============

/// The single normalized result handed to presentation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum ResultEnvelope {
    User(UserRecord),
    Vehicle(VehicleResult),
}

impl ResultEnvelope {
    pub fn kind(&self) -> &'static str {
        match self {
            ResultEnvelope::User(_) => "user",
            ResultEnvelope::Vehicle(_) => "vehicle",
        }
    }
}

/// Presentation state of one search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "payload", rename_all = "kebab-case")]
pub enum SearchOutcome {
    #[default]
    Idle,
    Loading,
    Success(ResultEnvelope),
    NoResults,
    Error(String),
}

impl SearchOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SearchOutcome::Success(_) | SearchOutcome::NoResults | SearchOutcome::Error(_)
        )
    }

    pub fn envelope(&self) -> Option<&ResultEnvelope> {
        match self {
            SearchOutcome::Success(envelope) => Some(envelope),
            _ => None,
        }
    }
}

// ============ HTTP Request Bodies ============

/// Body of `POST /api/v1/user-lookup`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLookupRequest {
    pub search_type: SearchType,
    #[serde(default)]
    pub search_value: Option<String>,
}

/// Body of `POST /api/v1/vehicle-lookup`.
#[derive(Debug, Clone, Deserialize)]
pub struct VehicleLookupRequest {
    #[serde(default)]
    pub registration: Option<String>,
}

/// Body of `POST /api/v1/search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub search_type: SearchType,
    #[serde(default)]
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_is_adjacently_tagged() {
        let envelope = ResultEnvelope::Vehicle(VehicleResult {
            vehicle_details: VehicleDetails {
                registration_no: Some("DL11PG8009".to_string()),
                ..Default::default()
            },
            mobile_info: None,
        });

        let value = serde_json::to_value(&envelope).unwrap();
        assert_eq!(
            value,
            json!({
                "kind": "vehicle",
                "data": {"vehicle_details": {"registration_no": "DL11PG8009"}}
            })
        );
    }

    #[test]
    fn test_vehicle_details_pass_through_untyped_keys() {
        let mut extra = Map::new();
        extra.insert("seating_capacity".to_string(), json!(5));
        let details = VehicleDetails {
            chassis_no: Some("MA3ERLF1S00123456".to_string()),
            extra,
            ..Default::default()
        };

        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(
            value,
            json!({"chassis_no": "MA3ERLF1S00123456", "seating_capacity": 5})
        );

        let back: VehicleDetails = serde_json::from_value(value).unwrap();
        assert_eq!(back, details);
    }

    #[test]
    fn test_raw_bodies_stay_out_of_the_wire_format() {
        let mut raw = Map::new();
        raw.insert("status".to_string(), json!("success"));
        raw.insert("mobile_number".to_string(), json!("9876543210"));
        let info = MobileInfo {
            status: Some("success".to_string()),
            mobile_number: Some("9876543210".to_string()),
            raw: raw.clone(),
        };
        assert_eq!(
            serde_json::to_value(&info).unwrap(),
            json!({"status": "success", "mobile_number": "9876543210"})
        );

        let user = UserRecord {
            name: Some("Asha".to_string()),
            raw,
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&user).unwrap(), json!({"name": "Asha"}));
    }

    #[test]
    fn test_outcome_wire_format() {
        assert_eq!(
            serde_json::to_value(SearchOutcome::NoResults).unwrap(),
            json!({"state": "no-results"})
        );
        assert_eq!(
            serde_json::to_value(SearchOutcome::Error("boom".to_string())).unwrap(),
            json!({"state": "error", "payload": "boom"})
        );

        let success = SearchOutcome::Success(ResultEnvelope::User(UserRecord {
            name: Some("Asha".to_string()),
            ..Default::default()
        }));
        let value = serde_json::to_value(&success).unwrap();
        assert_eq!(value["payload"]["kind"], "user");
        assert_eq!(value["payload"]["data"]["name"], "Asha");
        assert!(success.is_terminal());
        assert!(!SearchOutcome::Loading.is_terminal());
    }

    #[test]
    fn test_rc_status_falls_back_to_unknown() {
        let details = VehicleDetails::default();
        assert_eq!(details.rc_status_label(), "Unknown");
        assert!(!details.is_rc_active());

        let active = VehicleDetails {
            rc_status: Some("ACTIVE".to_string()),
            ..Default::default()
        };
        assert!(active.is_rc_active());
    }

    #[test]
    fn test_verified_number_requires_success_status() {
        let ok = MobileInfo {
            status: Some("success".to_string()),
            mobile_number: Some("9876543210".to_string()),
            ..Default::default()
        };
        assert_eq!(ok.verified_number(), Some("9876543210"));

        let failed = MobileInfo {
            status: Some("failed".to_string()),
            mobile_number: Some("9876543210".to_string()),
            ..Default::default()
        };
        assert_eq!(failed.verified_number(), None);

        let blank = MobileInfo {
            status: Some("success".to_string()),
            mobile_number: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(blank.verified_number(), None);
    }

    #[test]
    fn test_user_display_helpers() {
        let user = UserRecord {
            name: Some("ravi kumar".to_string()),
            address: Some("12 MG Road!Indiranagar!Bengaluru".to_string()),
            ..Default::default()
        };
        assert_eq!(user.initial(), "R");
        assert_eq!(
            user.formatted_address().as_deref(),
            Some("12 MG Road, Indiranagar, Bengaluru")
        );

        let anonymous = UserRecord::default();
        assert_eq!(anonymous.display_name(), "Unknown");
        assert_eq!(anonymous.initial(), "U");
    }

    #[test]
    fn test_request_bodies_deserialize() {
        let req: UserLookupRequest =
            serde_json::from_value(json!({"searchType": "mobile", "searchValue": "98765"}))
                .unwrap();
        assert_eq!(req.search_type, SearchType::Mobile);
        assert_eq!(req.search_value.as_deref(), Some("98765"));

        let req: VehicleLookupRequest = serde_json::from_value(json!({})).unwrap();
        assert!(req.registration.is_none());
    }
}
