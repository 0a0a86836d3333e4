use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::asset::currency_flag;
use crate::models::rate::ExchangeRate;
use super::traits::RateProvider;

/// Static TRY quotes shown when no live provider delivers: (code, name, buy, sell).
pub const FALLBACK_RATES: &[(&str, &str, f64, f64)] = &[
    ("USD", "Amerikan Doları", 32.15, 32.25),
    ("EUR", "Euro", 35.20, 35.30),
    ("GBP", "İngiliz Sterlini", 41.50, 41.65),
    ("CHF", "İsviçre Frangı", 36.80, 36.95),
    ("JPY", "Japon Yeni", 0.215, 0.218),
    ("SAR", "Suudi Arabistan Riyali", 8.57, 8.60),
    ("CAD", "Kanada Doları", 23.75, 23.85),
    ("AUD", "Avustralya Doları", 21.30, 21.40),
    ("NOK", "Norveç Kronu", 3.05, 3.07),
    ("SEK", "İsveç Kronu", 3.10, 3.12),
    ("DKK", "Danimarka Kronu", 4.75, 4.78),
    ("CNY", "Çin Yuanı", 4.45, 4.48),
];

/// The fallback table as quotes, in table order.
pub fn fallback_rates() -> Vec<ExchangeRate> {
    FALLBACK_RATES
        .iter()
        .map(|(code, name, buy, sell)| ExchangeRate::new(*code, *name, *buy, *sell, currency_flag(code)))
        .collect()
}

/// Provider wrapper around [`FALLBACK_RATES`]. Never fails, never empty.
pub struct FallbackProvider;

impl FallbackProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FallbackProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RateProvider for FallbackProvider {
    fn name(&self) -> &str {
        "Fallback"
    }

    fn is_live(&self) -> bool {
        false
    }

    async fn fetch_rates(&self) -> Result<Vec<ExchangeRate>, CoreError> {
        Ok(fallback_rates())
    }
}
