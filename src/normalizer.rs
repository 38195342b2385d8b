//! Canonicalizes raw user input before it reaches the orchestrator.

use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which identifier the caller is searching by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchType {
    Mobile,
    /// National ID (Aadhaar).
    #[serde(alias = "aadhaar")]
    NationalId,
    Vehicle,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Mobile => "mobile",
            SearchType::NationalId => "nationalId",
            SearchType::Vehicle => "vehicle",
        }
    }

    /// Human-readable label for the identifier field.
    pub fn label(&self) -> &'static str {
        match self {
            SearchType::Mobile => "Mobile Number",
            SearchType::NationalId => "Aadhaar / ID Number",
            SearchType::Vehicle => "Vehicle Registration Number",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mobile" | "phone" => Ok(SearchType::Mobile),
            "nationalid" | "national-id" | "national_id" | "aadhaar" | "id" => {
                Ok(SearchType::NationalId)
            }
            "vehicle" | "registration" | "rc" => Ok(SearchType::Vehicle),
            other => Err(AppError::BadRequest(format!(
                "Unknown search type '{}' (expected mobile, national-id or vehicle)",
                other
            ))),
        }
    }
}

/// Canonical form of `raw` for the given search type.
///
/// Vehicle registrations are uppercased with every whitespace character removed.
/// Mobile numbers and national IDs keep only their ASCII digits.
pub fn normalize(search_type: SearchType, raw: &str) -> String {
    match search_type {
        SearchType::Vehicle => raw
            .chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_uppercase)
            .collect(),
        SearchType::Mobile | SearchType::NationalId => {
            raw.chars().filter(|c| c.is_ascii_digit()).collect()
        }
    }
}

/// A search as submitted by the caller, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub search_type: SearchType,
    pub raw_value: String,
}

/// A search whose value has been normalized and is known to be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSearch {
    search_type: SearchType,
    value: String,
}

impl SearchRequest {
    pub fn new(search_type: SearchType, raw_value: impl Into<String>) -> Self {
        Self {
            search_type,
            raw_value: raw_value.into(),
        }
    }

    /// Normalizes the raw value, rejecting input that is empty afterwards.
    pub fn normalize(&self) -> Result<NormalizedSearch, AppError> {
        let value = normalize(self.search_type, &self.raw_value);
        if value.is_empty() {
            return Err(AppError::BadRequest(match self.search_type {
                SearchType::Vehicle => "Registration number is required".to_string(),
                _ => "Search value is required".to_string(),
            }));
        }

        Ok(NormalizedSearch {
            search_type: self.search_type,
            value,
        })
    }
}

impl NormalizedSearch {
    pub fn search_type(&self) -> SearchType {
        self.search_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_registration_is_uppercased_and_compacted() {
        assert_eq!(normalize(SearchType::Vehicle, "DL 11 pg 8009"), "DL11PG8009");
        assert_eq!(normalize(SearchType::Vehicle, " mh\t12\nab 1234 "), "MH12AB1234");
    }

    #[test]
    fn test_mobile_and_id_keep_digits_only() {
        assert_eq!(
            normalize(SearchType::Mobile, "+91 98765-43210"),
            "919876543210"
        );
        assert_eq!(
            normalize(SearchType::NationalId, "1234 5678 9012"),
            "123456789012"
        );
        assert_eq!(normalize(SearchType::Mobile, "abc"), "");
    }

    #[test]
    fn test_empty_after_normalization_is_rejected() {
        let err = SearchRequest::new(SearchType::Mobile, " - ( ) ")
            .normalize()
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let err = SearchRequest::new(SearchType::Vehicle, "   ")
            .normalize()
            .unwrap_err();
        assert_eq!(err.user_message(), "Registration number is required");
    }

    #[test]
    fn test_normalized_search_keeps_type() {
        let search = SearchRequest::new(SearchType::NationalId, "1234-5678")
            .normalize()
            .unwrap();
        assert_eq!(search.search_type(), SearchType::NationalId);
        assert_eq!(search.value(), "12345678");
    }

    #[test]
    fn test_search_type_wire_names() {
        let parsed: SearchType = serde_json::from_str("\"nationalId\"").unwrap();
        assert_eq!(parsed, SearchType::NationalId);
        let aliased: SearchType = serde_json::from_str("\"aadhaar\"").unwrap();
        assert_eq!(aliased, SearchType::NationalId);
        assert_eq!(
            serde_json::to_string(&SearchType::Vehicle).unwrap(),
            "\"vehicle\""
        );
    }

    #[test]
    fn test_search_type_from_str() {
        assert_eq!("national-id".parse::<SearchType>().unwrap(), SearchType::NationalId);
        assert_eq!("Vehicle".parse::<SearchType>().unwrap(), SearchType::Vehicle);
        assert!("email".parse::<SearchType>().is_err());
    }
}
