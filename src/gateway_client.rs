use crate::errors::AppError;
use reqwest::header::ACCEPT;
use serde_json::Value;
use url::Url;

/// Thin JSON-over-HTTP client shared by every upstream service.
///
/// One GET per call, no retries and no client-side timeout: a failed attempt is
/// reported to the caller straight away.
#[derive(Clone)]
pub struct UpstreamClient {
    client: reqwest::Client,
    name: &'static str,
}

impl UpstreamClient {
    /// Creates a client labelled `name` in logs and error messages.
    pub fn new(client: reqwest::Client, name: &'static str) -> Self {
        Self { client, name }
    }

    /// Fetches `url` and decodes the body as JSON.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(body))` - 2xx response with a JSON body.
    /// * `Ok(None)` - the upstream answered with a non-2xx status.
    /// * `Err(AppError::ExternalApiError)` - no response, or the body was not JSON.
    pub async fn fetch_json(&self, url: Url) -> Result<Option<Value>, AppError> {
        tracing::debug!("{}: GET {}", self.name, url);

        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("{} request failed: {}", self.name, e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("{} returned non-success status {}", self.name, status);
            return Ok(None);
        }

        let body: Value = response.json().await.map_err(|e| {
            AppError::ExternalApiError(format!("Failed to parse {} response: {}", self.name, e))
        })?;

        Ok(Some(body))
    }
}

/// Parses a configured base URL, naming the offending setting on failure.
pub fn parse_base_url(name: &str, raw: &str) -> Result<Url, AppError> {
    Url::parse(raw)
        .map_err(|e| AppError::InternalError(format!("Invalid {} URL '{}': {}", name, raw, e)))
}
