use crate::config::Config;
use crate::envelope;
use crate::errors::AppError;
use crate::gateway_client::{parse_base_url, UpstreamClient};
use crate::models::{MobileInfo, ResultEnvelope, UserRecord, VehicleDetails};
use std::fmt;
use url::Url;

/// Which key the user-record service is queried by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserLookupKey {
    Mobile,
    NationalId,
}

impl UserLookupKey {
    /// Path segment under `/user/`.
    pub fn path_segment(self) -> &'static str {
        match self {
            UserLookupKey::Mobile => "mobile",
            UserLookupKey::NationalId => "id",
        }
    }
}

impl fmt::Display for UserLookupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserLookupKey::Mobile => f.write_str("mobile"),
            UserLookupKey::NationalId => f.write_str("national ID"),
        }
    }
}

/// Client for the user-record service.
///
/// `GET {base}/user/mobile/{value}` and `GET {base}/user/id/{value}`, answering
/// with a person object or `{}` when nothing matches.
#[derive(Clone)]
pub struct UserRecordService {
    upstream: UpstreamClient,
    base_url: Url,
}

impl UserRecordService {
    pub fn new(config: &Config, client: reqwest::Client) -> Result<Self, AppError> {
        Ok(Self {
            upstream: UpstreamClient::new(client, "User API"),
            base_url: parse_base_url("USER_API_URL", &config.user_api_url)?,
        })
    }

    /// Look up a person by mobile number or national ID. `None` means not found.
    pub async fn fetch(
        &self,
        key: UserLookupKey,
        value: &str,
    ) -> Result<Option<UserRecord>, AppError> {
        let segment = key.path_segment();
        let url = self.lookup_url(segment, value)?;
        tracing::info!("User API: looking up {} {}", segment, value);

        let Some(body) = self.upstream.fetch_json(url).await? else {
            return Ok(None);
        };

        match envelope::build_user_envelope(body) {
            Some(ResultEnvelope::User(record)) => {
                tracing::info!("User API: record found for {} {}", segment, value);
                Ok(Some(record))
            }
            _ => {
                tracing::info!("User API: empty response for {} {}", segment, value);
                Ok(None)
            }
        }
    }

    fn lookup_url(&self, segment: &str, value: &str) -> Result<Url, AppError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::InternalError(format!("USER_API_URL cannot be a base: {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["user", segment, value]);
        Ok(url)
    }
}

/// Client for the vehicle-detail service: `GET {base}?reg={registration}`.
#[derive(Clone)]
pub struct VehicleDetailService {
    upstream: UpstreamClient,
    base_url: Url,
}

impl VehicleDetailService {
    pub fn new(config: &Config, client: reqwest::Client) -> Result<Self, AppError> {
        Ok(Self {
            upstream: UpstreamClient::new(client, "Vehicle details API"),
            base_url: parse_base_url("VEHICLE_DETAILS_API_URL", &config.vehicle_details_api_url)?,
        })
    }

    /// Fetch registration details. `None` when the registration is unknown.
    pub async fn fetch(&self, registration: &str) -> Result<Option<VehicleDetails>, AppError> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("reg", registration);

        tracing::info!("Vehicle details API: looking up {}", registration);

        let Some(body) = self.upstream.fetch_json(url).await? else {
            return Ok(None);
        };

        let details = envelope::extract_vehicle_details(body);
        if details.is_none() {
            tracing::info!("Vehicle details API: no data for {}", registration);
        }
        Ok(details)
    }
}

/// Client for the vehicle-mobile service: `GET {base}?reg={registration}&chassis={suffix}`.
#[derive(Clone)]
pub struct VehicleMobileService {
    upstream: UpstreamClient,
    base_url: Url,
}

impl VehicleMobileService {
    pub fn new(config: &Config, client: reqwest::Client) -> Result<Self, AppError> {
        Ok(Self {
            upstream: UpstreamClient::new(client, "Vehicle mobile API"),
            base_url: parse_base_url("VEHICLE_MOBILE_API_URL", &config.vehicle_mobile_api_url)?,
        })
    }

    /// Fetch the owner's mobile number.
    ///
    /// Non-2xx answers are reported as `ExternalApiError` like transport failures:
    /// every failure of this lookup is handled the same way by its caller.
    pub async fn fetch(
        &self,
        registration: &str,
        chassis_suffix: &str,
    ) -> Result<Option<MobileInfo>, AppError> {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("reg", registration)
            .append_pair("chassis", chassis_suffix);

        tracing::info!(
            "Vehicle mobile API: looking up {} (chassis suffix {})",
            registration,
            chassis_suffix
        );

        let body = self.upstream.fetch_json(url).await?.ok_or_else(|| {
            AppError::ExternalApiError("Vehicle mobile API returned non-success status".to_string())
        })?;

        envelope::parse_mobile_info(body)
    }
}
