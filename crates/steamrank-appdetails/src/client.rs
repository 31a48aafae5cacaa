//! HTTP client for the Steam store `appdetails` endpoint.
//!
//! Wraps `reqwest` with a bounded timeout, validates the per-app envelope
//! (`{ "<appid>": { "success": bool, "data": {...} } }`) and hands the data
//! payload to [`crate::normalize`].

use std::time::Duration;

use reqwest::{Client, Url};
use steamrank_core::NormalizedMetadata;

use crate::error::AppDetailsError;
use crate::normalize::normalize_app_data;
use crate::retry::retry_with_backoff;
use crate::types::AppData;

/// Client for the `appdetails` endpoint.
///
/// The endpoint is configurable so tests can point it at a mock server.
pub struct AppDetailsClient {
    client: Client,
    endpoint: Url,
    primary_currency: String,
}

impl AppDetailsClient {
    /// Creates a client for a custom endpoint URL.
    ///
    /// # Errors
    ///
    /// Returns [`AppDetailsError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AppDetailsError::InvalidEndpoint`] if
    /// `endpoint` is not a valid URL.
    pub fn with_endpoint(
        endpoint: &str,
        timeout_secs: u64,
        user_agent: &str,
        primary_currency: &str,
    ) -> Result<Self, AppDetailsError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(user_agent)
            .build()?;

        let endpoint = Url::parse(endpoint)
            .map_err(|e| AppDetailsError::InvalidEndpoint(format!("'{endpoint}': {e}")))?;

        Ok(Self {
            client,
            endpoint,
            primary_currency: primary_currency.to_owned(),
        })
    }

    /// Fetches and normalizes the details of one app.
    ///
    /// Makes exactly one request; failures are never retried here.
    ///
    /// # Errors
    ///
    /// - [`AppDetailsError::Http`] on network failure or timeout.
    /// - [`AppDetailsError::UnexpectedStatus`] on a non-2xx status.
    /// - [`AppDetailsError::Deserialize`] if the body is not JSON or the
    ///   data payload has the wrong shape.
    /// - [`AppDetailsError::MissingEntry`], [`AppDetailsError::Unsuccessful`]
    ///   or [`AppDetailsError::MissingData`] when Steam has no usable entry.
    pub async fn fetch_app_details(
        &self,
        appid: &str,
    ) -> Result<NormalizedMetadata, AppDetailsError> {
        let url = self.build_url(appid);
        let body = self.request_json(appid, &url).await?;
        let data = Self::extract_data(appid, body)?;
        Ok(normalize_app_data(&data, &self.primary_currency))
    }

    /// Like [`Self::fetch_app_details`], retrying transient failures
    /// (timeouts, connection errors, 429 and 5xx) up to `max_retries` times.
    ///
    /// # Errors
    ///
    /// Returns the last error once retries are exhausted, or the first
    /// non-transient error.
    pub async fn fetch_app_details_with_retry(
        &self,
        appid: &str,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<NormalizedMetadata, AppDetailsError> {
        retry_with_backoff(max_retries, backoff_base_ms, || {
            self.fetch_app_details(appid)
        })
        .await
    }

    fn build_url(&self, appid: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("appids", appid);
        url
    }

    async fn request_json(
        &self,
        appid: &str,
        url: &Url,
    ) -> Result<serde_json::Value, AppDetailsError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(AppDetailsError::UnexpectedStatus {
                appid: appid.to_owned(),
                status: status.as_u16(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AppDetailsError::Deserialize {
            context: format!("appdetails(appids={appid})"),
            source: e,
        })
    }

    /// Walks the envelope down to the `data` payload.
    fn extract_data(appid: &str, mut body: serde_json::Value) -> Result<AppData, AppDetailsError> {
        let entry = body
            .get_mut(appid)
            .filter(|e| e.is_object())
            .map(serde_json::Value::take)
            .ok_or_else(|| AppDetailsError::MissingEntry {
                appid: appid.to_owned(),
            })?;

        let success = entry
            .get("success")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false);
        if !success {
            return Err(AppDetailsError::Unsuccessful {
                appid: appid.to_owned(),
            });
        }

        let data = entry
            .get("data")
            .filter(|d| d.is_object())
            .cloned()
            .ok_or_else(|| AppDetailsError::MissingData {
                appid: appid.to_owned(),
            })?;

        serde_json::from_value(data).map_err(|e| AppDetailsError::Deserialize {
            context: format!("appdetails data for app {appid}"),
            source: e,
        })
    }
}
