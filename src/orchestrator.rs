//! Lookup orchestration.
//!
//! Per search, one of two flows runs:
//! 1. Mobile / national ID: a single user-record call.
//! 2. Vehicle: a vehicle-detail call, then (when the chassis number is long
//!    enough) a best-effort vehicle-mobile call keyed on the chassis suffix.
//!
//! Primary failures decide the outcome. Secondary failures never do.

use crate::config::Config;
use crate::envelope::{self, build_vehicle_envelope};
use crate::errors::{AppError, ResultExt};
use crate::models::{MobileInfo, ResultEnvelope, SearchOutcome};
use crate::normalizer::{SearchRequest, SearchType};
use crate::services::{
    UserLookupKey, UserRecordService, VehicleDetailService, VehicleMobileService,
};
use std::fmt;
use tracing::Instrument;
use uuid::Uuid;

/// Stages a single lookup passes through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStage {
    Received,
    Normalized,
    PrimaryFetch,
    SecondaryFetch,
    Assembled,
    Done,
}

impl fmt::Display for LookupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LookupStage::Received => "received",
            LookupStage::Normalized => "normalized",
            LookupStage::PrimaryFetch => "primary-fetch",
            LookupStage::SecondaryFetch => "secondary-fetch",
            LookupStage::Assembled => "assembled",
            LookupStage::Done => "done",
        };
        f.write_str(name)
    }
}

fn enter(stage: LookupStage) {
    tracing::debug!(stage = %stage, "lookup stage");
}

/// Runs searches against the three upstream services.
///
/// Holds no per-request state; one instance is shared by every request.
#[derive(Clone)]
pub struct LookupOrchestrator {
    users: UserRecordService,
    vehicle_details: VehicleDetailService,
    vehicle_mobile: VehicleMobileService,
}

impl LookupOrchestrator {
    pub fn new(
        users: UserRecordService,
        vehicle_details: VehicleDetailService,
        vehicle_mobile: VehicleMobileService,
    ) -> Self {
        Self {
            users,
            vehicle_details,
            vehicle_mobile,
        }
    }

    /// Builds all three upstream services from configuration over one shared
    /// connection pool.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let client = reqwest::Client::builder().build().map_err(|e| {
            AppError::InternalError(format!("Failed to create HTTP client: {}", e))
        })?;

        Ok(Self::new(
            UserRecordService::new(config, client.clone())?,
            VehicleDetailService::new(config, client.clone())?,
            VehicleMobileService::new(config, client)?,
        ))
    }

    /// Runs a search end to end and maps the result onto a terminal outcome.
    ///
    /// Not-found maps to `NoResults`; any other failure maps to `Error` with a
    /// displayable message.
    pub async fn search(&self, request: &SearchRequest) -> SearchOutcome {
        match self.run(request).await {
            Ok(Some(envelope)) => SearchOutcome::Success(envelope),
            Ok(None) => SearchOutcome::NoResults,
            Err(e) if e.is_not_found() => SearchOutcome::NoResults,
            Err(e) => SearchOutcome::Error(e.user_message()),
        }
    }

    /// Normalizes and dispatches a search.
    ///
    /// `Ok(None)` means the primary upstream had no record.
    pub async fn run(&self, request: &SearchRequest) -> Result<Option<ResultEnvelope>, AppError> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "lookup",
            %request_id,
            search_type = %request.search_type
        );

        async move {
            enter(LookupStage::Received);
            let search = request.normalize()?;
            enter(LookupStage::Normalized);

            let result = match search.search_type() {
                SearchType::Mobile => {
                    self.lookup_user(UserLookupKey::Mobile, search.value()).await
                }
                SearchType::NationalId => {
                    self.lookup_user(UserLookupKey::NationalId, search.value()).await
                }
                SearchType::Vehicle => self.lookup_vehicle(search.value()).await,
            };

            enter(LookupStage::Done);
            match &result {
                Ok(Some(envelope)) => tracing::info!("✓ Lookup found a {} record", envelope.kind()),
                Ok(None) => tracing::info!("Lookup found no record"),
                Err(e) => tracing::error!("Lookup failed: {}", e),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Mobile / national-ID flow: one call to the user-record service.
    pub async fn lookup_user(
        &self,
        key: UserLookupKey,
        value: &str,
    ) -> Result<Option<ResultEnvelope>, AppError> {
        enter(LookupStage::PrimaryFetch);
        let record = self
            .users
            .fetch(key, value)
            .await
            .with_context(|| format!("{} lookup", key))?;

        enter(LookupStage::Assembled);
        Ok(record.map(ResultEnvelope::User))
    }

    /// Vehicle flow: detail lookup, then best-effort owner mobile lookup.
    pub async fn lookup_vehicle(
        &self,
        registration: &str,
    ) -> Result<Option<ResultEnvelope>, AppError> {
        enter(LookupStage::PrimaryFetch);
        let Some(details) = self
            .vehicle_details
            .fetch(registration)
            .await
            .context("vehicle details lookup")?
        else {
            return Ok(None);
        };

        let mobile_info = match details.chassis_no.as_deref().and_then(envelope::chassis_suffix) {
            Some(suffix) => {
                enter(LookupStage::SecondaryFetch);
                // The only place a secondary failure is handled: it is logged and
                // dropped so the vehicle result goes out without owner contact.
                match self.lookup_mobile_info(registration, suffix).await {
                    Ok(info) => info,
                    Err(e) => {
                        tracing::warn!("Mobile lookup failed for {}: {}", registration, e);
                        None
                    }
                }
            }
            None => {
                tracing::info!(
                    "Chassis number too short for mobile lookup: {:?}",
                    details.chassis_no
                );
                None
            }
        };

        enter(LookupStage::Assembled);
        Ok(Some(build_vehicle_envelope(details, mobile_info)))
    }

    /// Owner mobile lookup keyed on registration and chassis suffix.
    ///
    /// Fails on any non-2xx status, transport error, or unexpected body shape.
    pub async fn lookup_mobile_info(
        &self,
        registration: &str,
        chassis_suffix: &str,
    ) -> Result<Option<MobileInfo>, AppError> {
        self.vehicle_mobile.fetch(registration, chassis_suffix).await
    }
}
