//! Normalized store metadata produced by the fetcher and written by the
//! reconciler.

use rust_decimal::Decimal;

/// Price value stored for titles the store lists as free to play.
pub const FREE_TOKEN: &str = "free";

/// A normalized price, rendered to its stored string form only at the
/// database boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceRepresentation {
    /// The title is free; always wins over any price block.
    Free,
    /// Price in the primary currency, scaled to two fractional digits.
    Primary(Decimal),
    /// Minor-unit price in any other currency, left unscaled for
    /// currency-specific formatting downstream.
    Minor(i64),
}

impl PriceRepresentation {
    /// Builds a primary-currency price from a minor-unit amount, e.g.
    /// `1099` becomes `10.99`.
    #[must_use]
    pub fn primary_from_minor(minor: i64) -> Self {
        PriceRepresentation::Primary(Decimal::new(minor, 2))
    }
}

impl std::fmt::Display for PriceRepresentation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceRepresentation::Free => f.write_str(FREE_TOKEN),
            PriceRepresentation::Primary(amount) => write!(f, "{amount:.2}"),
            PriceRepresentation::Minor(minor) => write!(f, "{minor}"),
        }
    }
}

/// Cover image and price extracted from one `appdetails` entry.
///
/// Both fields may be absent; that is still a successful fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedMetadata {
    /// The entry's `header_image` URL.
    pub profile_img: Option<String>,
    pub price: Option<PriceRepresentation>,
}

impl NormalizedMetadata {
    /// Price rendered the way the `games.price` column stores it.
    #[must_use]
    pub fn price_string(&self) -> Option<String> {
        self.price.as_ref().map(ToString::to_string)
    }
}
