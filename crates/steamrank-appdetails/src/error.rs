use thiserror::Error;

/// Errors returned by [`crate::AppDetailsClient`].
///
/// The first three variants mean the request itself failed; the last three
/// mean Steam answered but had nothing usable for the app. See
/// [`AppDetailsError::is_no_data`].
#[derive(Debug, Error)]
pub enum AppDetailsError {
    /// Network, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid appdetails endpoint {0}")]
    InvalidEndpoint(String),

    #[error("unexpected HTTP status {status} for app {appid}")]
    UnexpectedStatus { appid: String, status: u16 },

    /// The response body is not valid JSON, or an entry has the wrong shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The body has no object keyed by the requested app id.
    #[error("no appdetails entry for app {appid}")]
    MissingEntry { appid: String },

    /// The entry reports `"success": false` (delisted or invalid id).
    #[error("appdetails success=false for app {appid}")]
    Unsuccessful { appid: String },

    /// The entry succeeded but carries no `data` object.
    #[error("appdetails entry for app {appid} has no data payload")]
    MissingData { appid: String },
}

impl AppDetailsError {
    /// `true` when Steam responded but the app has no usable metadata.
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(
            self,
            AppDetailsError::MissingEntry { .. }
                | AppDetailsError::Unsuccessful { .. }
                | AppDetailsError::MissingData { .. }
        )
    }
}
