//! Steam `appdetails` response types.
//!
//! The endpoint returns `{ "<appid>": { "success": bool, "data": { ... } } }`.
//! Only the fields the catalog stores are modelled; everything else is
//! ignored by serde.

use serde::Deserialize;

/// The `data` payload of a successful entry.
///
/// Fields are kept raw: a value of the wrong type reads as absent rather
/// than failing the whole entry.
#[derive(Debug, Default, Deserialize)]
pub struct AppData {
    #[serde(default)]
    pub header_image: Option<serde_json::Value>,
    #[serde(default)]
    pub is_free: Option<serde_json::Value>,
    #[serde(default)]
    pub price_overview: Option<serde_json::Value>,
}

impl AppData {
    /// The header image URL, if it is a string.
    #[must_use]
    pub fn header_image(&self) -> Option<&str> {
        self.header_image.as_ref().and_then(serde_json::Value::as_str)
    }

    /// `true` only for a JSON `true`.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.is_free
            .as_ref()
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false)
    }
}

/// The `price_overview` block. `final` is in minor units (cents for USD).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceOverview {
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, rename = "final")]
    pub final_price: Option<i64>,
}
