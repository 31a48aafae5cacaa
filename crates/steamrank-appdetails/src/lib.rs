//! Client for the Steam store `appdetails` endpoint.
//!
//! [`AppDetailsClient`] fetches one app per request and reduces the entry to
//! a [`steamrank_core::NormalizedMetadata`]. Normalization rules live in
//! [`normalize`] so they can be exercised without HTTP.

pub mod client;
pub mod error;
pub mod normalize;
mod retry;
pub mod types;

pub use client::AppDetailsClient;
pub use error::AppDetailsError;
pub use normalize::{normalize_app_data, normalize_price};
pub use types::{AppData, PriceOverview};
