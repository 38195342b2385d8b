use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    ResultEnvelope, SearchOutcome, SearchQuery, UserLookupRequest, VehicleLookupRequest,
};
use crate::normalizer::{SearchRequest, SearchType};
use crate::orchestrator::LookupOrchestrator;
use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Orchestrator over the user, vehicle-detail and vehicle-mobile services.
    pub orchestrator: LookupOrchestrator,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let orchestrator = LookupOrchestrator::from_config(&config)?;
        Ok(Self {
            config,
            orchestrator,
        })
    }
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "lookup-portal",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/v1/user-lookup
///
/// Looks up a person by mobile number or national ID.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `payload` - `{searchType, searchValue}`.
///
/// # Returns
///
/// * `Result<Json<ResultEnvelope>, AppError>` - The user envelope, 404 when the
///   upstream has no record, 400 for a missing value.
pub async fn user_lookup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<UserLookupRequest>,
) -> Result<Json<ResultEnvelope>, AppError> {
    tracing::info!(
        "POST /user-lookup - type: {}, value: {:?}",
        payload.search_type,
        payload.search_value
    );

    if payload.search_type == SearchType::Vehicle {
        return Err(AppError::BadRequest(
            "Use /api/v1/vehicle-lookup for vehicle searches".to_string(),
        ));
    }

    let raw = payload
        .search_value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest("Search value is required".to_string()))?;

    let request = SearchRequest::new(payload.search_type, raw);
    state
        .orchestrator
        .run(&request)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// POST /api/v1/vehicle-lookup
///
/// Looks up a vehicle by registration and, when possible, its owner's mobile number.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `payload` - `{registration}`.
///
/// # Returns
///
/// * `Result<Json<ResultEnvelope>, AppError>` - The vehicle envelope, 404 when the
///   registration is unknown, 400 for a missing registration.
pub async fn vehicle_lookup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<VehicleLookupRequest>,
) -> Result<Json<ResultEnvelope>, AppError> {
    tracing::info!("POST /vehicle-lookup - registration: {:?}", payload.registration);

    let raw = payload
        .registration
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::BadRequest("Registration number is required".to_string()))?;

    let request = SearchRequest::new(SearchType::Vehicle, raw);
    state
        .orchestrator
        .run(&request)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))
}

/// POST /api/v1/search
///
/// Single entry point for all search types. Always answers with a terminal
/// `SearchOutcome`; only invalid input is rejected with 400.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(query): Json<SearchQuery>,
) -> Result<Json<SearchOutcome>, AppError> {
    tracing::info!("POST /search - type: {}", query.search_type);

    let request = SearchRequest::new(query.search_type, query.value);
    // Reject before any network call so validation never looks like an upstream error.
    request.normalize()?;

    Ok(Json(state.orchestrator.search(&request).await))
}
