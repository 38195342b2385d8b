use serde::Deserialize;

/// Default cap on incoming request bodies. Lookup payloads are a couple of short strings.
const DEFAULT_BODY_LIMIT_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    /// Base URL of the user-record service (`/user/mobile/..`, `/user/id/..` hang off it).
    pub user_api_url: String,
    /// Full URL of the vehicle-detail endpoint, queried with `?reg=`.
    pub vehicle_details_api_url: String,
    /// Full URL of the vehicle-mobile endpoint, queried with `?reg=&chassis=`.
    pub vehicle_mobile_api_url: String,
    pub body_limit_bytes: usize,
}

impl Config {
    pub fn new(
        user_api_url: impl Into<String>,
        vehicle_details_api_url: impl Into<String>,
        vehicle_mobile_api_url: impl Into<String>,
    ) -> Self {
        Self {
            port: 3000,
            user_api_url: user_api_url.into(),
            vehicle_details_api_url: vehicle_details_api_url.into(),
            vehicle_mobile_api_url: vehicle_mobile_api_url.into(),
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }

    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            user_api_url: required_url("USER_API_URL")?,
            vehicle_details_api_url: required_url("VEHICLE_DETAILS_API_URL")?,
            vehicle_mobile_api_url: required_url("VEHICLE_MOBILE_API_URL")?,
            body_limit_bytes: match std::env::var("LOOKUP_BODY_LIMIT_BYTES") {
                Ok(raw) => raw.trim().parse().map_err(|_| {
                    anyhow::anyhow!("LOOKUP_BODY_LIMIT_BYTES must be a positive integer")
                })?,
                Err(_) => DEFAULT_BODY_LIMIT_BYTES,
            },
        };

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("User API URL: {}", config.user_api_url);
        tracing::debug!("Vehicle details API URL: {}", config.vehicle_details_api_url);
        tracing::debug!("Vehicle mobile API URL: {}", config.vehicle_mobile_api_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

fn required_url(name: &str) -> anyhow::Result<String> {
    let url = std::env::var(name)
        .map_err(|_| anyhow::anyhow!("{} environment variable required", name))?;
    if url.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", name);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", name);
    }
    Ok(url.trim().to_string())
}
