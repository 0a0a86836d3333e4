use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One currency quote against the home currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    /// ISO code (e.g., "USD")
    pub code: String,

    /// Display name (e.g., "Amerikan Doları")
    pub name: String,

    /// Price the bank pays per unit
    pub buy_rate: f64,

    /// Price the bank charges per unit; used to value currency positions
    pub sell_rate: f64,

    /// Flag glyph for display
    pub flag: String,

    /// When the quote was fetched; `None` for static fallback quotes
    pub last_update: Option<DateTime<Utc>>,
}

impl ExchangeRate {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        buy_rate: f64,
        sell_rate: f64,
        flag: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into().to_uppercase(),
            name: name.into(),
            buy_rate,
            sell_rate,
            flag: flag.into(),
            last_update: None,
        }
    }

    /// Sell rate, if it can serve as a live price (positive and finite).
    pub fn usable_sell_rate(&self) -> Option<f64> {
        (self.sell_rate.is_finite() && self.sell_rate > 0.0).then_some(self.sell_rate)
    }
}

/// Where a [`RateTable`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateSource {
    /// Live central-bank sheet (or another registered live provider)
    CentralBank,
    /// Static table substituted because no live provider delivered
    Fallback,
}

impl std::fmt::Display for RateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateSource::CentralBank => write!(f, "central-bank"),
            RateSource::Fallback => write!(f, "fallback"),
        }
    }
}

/// The displayable currency list produced by one refresh. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    pub rates: Vec<ExchangeRate>,
    pub source: RateSource,
    pub fetched_at: DateTime<Utc>,
    /// Informational note shown to the user (set when the fallback was used)
    pub message: Option<String>,
}

impl RateTable {
    /// Find a quote by currency code (case-insensitive).
    pub fn quote(&self, code: &str) -> Option<&ExchangeRate> {
        let upper = code.trim().to_uppercase();
        self.rates.iter().find(|r| r.code == upper)
    }

    /// Usable sell rate for a currency code.
    pub fn sell_rate(&self, code: &str) -> Option<f64> {
        self.quote(code).and_then(ExchangeRate::usable_sell_rate)
    }

    pub fn is_fallback(&self) -> bool {
        self.source == RateSource::Fallback
    }
}
