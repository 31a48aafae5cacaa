//! Normalization of an `appdetails` data payload into catalog metadata.

use steamrank_core::{NormalizedMetadata, PriceRepresentation};

use crate::types::{AppData, PriceOverview};

/// Computes the stored price for an app.
///
/// A free app is always [`PriceRepresentation::Free`], whatever the price
/// block says. Otherwise the block's `final` amount is scaled to two decimals
/// in `primary_currency` and passed through unscaled in any other currency.
/// No block, or a block without `final`, means no price.
#[must_use]
pub fn normalize_price(
    is_free: bool,
    price_overview: Option<&PriceOverview>,
    primary_currency: &str,
) -> Option<PriceRepresentation> {
    if is_free {
        return Some(PriceRepresentation::Free);
    }

    let overview = price_overview?;
    let minor = overview.final_price?;

    if overview.currency.as_deref() == Some(primary_currency) {
        Some(PriceRepresentation::primary_from_minor(minor))
    } else {
        Some(PriceRepresentation::Minor(minor))
    }
}

/// Reads the raw `price_overview` value, ignoring anything that is not a
/// well-formed object.
fn parse_price_overview(raw: Option<&serde_json::Value>) -> Option<PriceOverview> {
    let value = raw.filter(|v| v.is_object())?;
    match serde_json::from_value::<PriceOverview>(value.clone()) {
        Ok(overview) => Some(overview),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring malformed price_overview");
            None
        }
    }
}

/// Converts an [`AppData`] payload into [`NormalizedMetadata`].
#[must_use]
pub fn normalize_app_data(data: &AppData, primary_currency: &str) -> NormalizedMetadata {
    let is_free = data.is_free();
    let overview = if is_free {
        None
    } else {
        parse_price_overview(data.price_overview.as_ref())
    };

    NormalizedMetadata {
        profile_img: data.header_image().map(str::to_owned),
        price: normalize_price(is_free, overview.as_ref(), primary_currency),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn overview(currency: &str, final_price: Option<i64>) -> PriceOverview {
        PriceOverview {
            currency: Some(currency.to_string()),
            final_price,
        }
    }

    #[test]
    fn free_wins_over_price_block() {
        let block = overview("USD", Some(1099));
        assert_eq!(
            normalize_price(true, Some(&block), "USD"),
            Some(PriceRepresentation::Free)
        );
        assert_eq!(
            normalize_price(true, None, "USD"),
            Some(PriceRepresentation::Free)
        );
    }

    #[test]
    fn primary_currency_is_scaled() {
        let price = normalize_price(false, Some(&overview("USD", Some(1099))), "USD").unwrap();
        assert_eq!(price.to_string(), "10.99");
    }

    #[test]
    fn other_currency_is_unscaled() {
        let price = normalize_price(false, Some(&overview("KRW", Some(1099))), "USD").unwrap();
        assert_eq!(price, PriceRepresentation::Minor(1099));
        assert_eq!(price.to_string(), "1099");
    }

    #[test]
    fn missing_currency_is_treated_as_other() {
        let block = PriceOverview {
            currency: None,
            final_price: Some(500),
        };
        assert_eq!(
            normalize_price(false, Some(&block), "USD"),
            Some(PriceRepresentation::Minor(500))
        );
    }

    #[test]
    fn missing_final_leaves_price_unset() {
        assert_eq!(
            normalize_price(false, Some(&overview("USD", None)), "USD"),
            None
        );
    }

    #[test]
    fn no_block_and_not_free_leaves_price_unset() {
        assert_eq!(normalize_price(false, None, "USD"), None);
    }

    #[test]
    fn normalize_app_data_reads_header_image_and_price() {
        let data: AppData = serde_json::from_value(json!({
            "name": "Portal 2",
            "is_free": false,
            "header_image": "https://cdn.example/620/header.jpg",
            "price_overview": { "currency": "USD", "initial": 1999, "final": 999 }
        }))
        .unwrap();

        let meta = normalize_app_data(&data, "USD");
        assert_eq!(
            meta.profile_img.as_deref(),
            Some("https://cdn.example/620/header.jpg")
        );
        assert_eq!(meta.price_string().as_deref(), Some("9.99"));
    }

    #[test]
    fn normalize_app_data_ignores_non_object_price_block() {
        let data: AppData = serde_json::from_value(json!({
            "is_free": false,
            "price_overview": []
        }))
        .unwrap();

        assert_eq!(normalize_app_data(&data, "USD"), NormalizedMetadata::default());
    }

    #[test]
    fn normalize_app_data_ignores_malformed_price_block() {
        let data: AppData = serde_json::from_value(json!({
            "header_image": "img.jpg",
            "price_overview": { "currency": "USD", "final": "ten" }
        }))
        .unwrap();

        let meta = normalize_app_data(&data, "USD");
        assert_eq!(meta.profile_img.as_deref(), Some("img.jpg"));
        assert!(meta.price.is_none());
    }

    #[test]
    fn normalize_app_data_without_fields_is_empty() {
        let meta = normalize_app_data(&AppData::default(), "USD");
        assert_eq!(meta, NormalizedMetadata::default());
    }

    #[test]
    fn normalize_app_data_ignores_wrongly_typed_fields() {
        let data: AppData = serde_json::from_value(json!({
            "is_free": "yes",
            "header_image": 42,
            "price_overview": { "currency": "USD", "final": 1099 }
        }))
        .unwrap();

        let meta = normalize_app_data(&data, "USD");
        assert!(meta.profile_img.is_none());
        assert_eq!(meta.price_string().as_deref(), Some("10.99"));
    }

    #[test]
    fn null_header_image_is_absent() {
        let data: AppData = serde_json::from_value(json!({
            "is_free": true,
            "header_image": null
        }))
        .unwrap();

        let meta = normalize_app_data(&data, "USD");
        assert!(meta.profile_img.is_none());
        assert_eq!(meta.price, Some(PriceRepresentation::Free));
    }
}
