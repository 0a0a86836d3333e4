use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::rate::ExchangeRate;

/// Abstraction over every source of currency quotes.
///
/// The central-bank feed and the static fallback table both implement it,
/// so a different live feed can be registered without touching the services.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait RateProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Whether the quotes are live market data. Static tables return `false`.
    fn is_live(&self) -> bool {
        true
    }

    /// Fetch the current quote list. May return an empty list.
    async fn fetch_rates(&self) -> Result<Vec<ExchangeRate>, CoreError>;
}
