use serde::{Deserialize, Serialize};

/// Central-bank daily rate sheet.
pub const DEFAULT_RATE_FEED_URL: &str = "https://www.tcmb.gov.tr/kurlar/today.xml";

/// Simulated metal markup over the purchase price.
pub const DEFAULT_METAL_MARKUP: f64 = 1.08;

/// Simulated crypto markup over the purchase price.
pub const DEFAULT_CRYPTO_MARKUP: f64 = 1.12;

/// User-configurable settings, stored inside the encrypted ledger file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Currency all prices are expressed in (e.g., "TRY").
    pub home_currency: String,

    /// URL of the central-bank XML rate sheet.
    pub rate_feed_url: String,

    /// Factor applied to a metal's purchase price to simulate its current price.
    pub metal_markup: f64,

    /// Factor applied to a coin's purchase price to simulate its current price.
    pub crypto_markup: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            home_currency: "TRY".to_string(),
            rate_feed_url: DEFAULT_RATE_FEED_URL.to_string(),
            metal_markup: DEFAULT_METAL_MARKUP,
            crypto_markup: DEFAULT_CRYPTO_MARKUP,
        }
    }
}
