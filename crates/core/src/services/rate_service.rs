use chrono::Utc;
use log::{info, warn};

use crate::models::rate::{ExchangeRate, RateSource, RateTable};
use crate::providers::fallback::{fallback_rates, FallbackProvider};
use crate::providers::registry::RateProviderRegistry;
use crate::providers::traits::RateProvider;

/// Fetches currency quotes and guarantees a displayable list.
///
/// Strategy:
/// - Ask providers in registry order; the first non-empty list wins. A
///   provider that is not live yields a table tagged as fallback data.
/// - A provider error or an empty list is logged and the next provider is tried.
/// - When nothing live delivers, the fallback table is substituted with an
///   informational message. `refresh` therefore never fails.
///
/// No retry, no cancellation: a slow or failed fetch just leaves the previous
/// table in place until the next refresh.
pub struct RateService {
    registry: RateProviderRegistry,
    fallback: Box<dyn RateProvider>,
    latest: Option<RateTable>,
}

impl RateService {
    pub fn new(registry: RateProviderRegistry) -> Self {
        Self::with_fallback(registry, Box::new(FallbackProvider::new()))
    }

    pub fn with_fallback(registry: RateProviderRegistry, fallback: Box<dyn RateProvider>) -> Self {
        Self {
            registry,
            fallback,
            latest: None,
        }
    }

    /// Names of the live providers, in the order they are asked.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    /// Fetch a fresh table and remember it as the latest.
    pub async fn refresh(&mut self) -> &RateTable {
        let table = self.fetch_table().await;
        self.latest.insert(table)
    }

    /// The table from the last refresh, if any.
    pub fn latest(&self) -> Option<&RateTable> {
        self.latest.as_ref()
    }

    /// Quote for a currency code from the latest table.
    pub fn quote(&self, code: &str) -> Option<&ExchangeRate> {
        self.latest.as_ref().and_then(|t| t.quote(code))
    }

    /// Usable sell rate for a currency code from the latest table.
    pub fn sell_rate(&self, code: &str) -> Option<f64> {
        self.latest.as_ref().and_then(|t| t.sell_rate(code))
    }

    async fn fetch_table(&self) -> RateTable {
        let mut failures = Vec::new();

        for provider in self.registry.providers() {
            match provider.fetch_rates().await {
                Ok(rates) if !rates.is_empty() => {
                    info!("Fetched {} rates from {}", rates.len(), provider.name());
                    // A static table registered in the chain is still sample data.
                    let (source, message) = if provider.is_live() {
                        (RateSource::CentralBank, None)
                    } else {
                        (
                            RateSource::Fallback,
                            Some(format!("{} provides sample rates", provider.name())),
                        )
                    };
                    return RateTable {
                        rates,
                        source,
                        fetched_at: Utc::now(),
                        message,
                    };
                }
                Ok(_) => {
                    warn!("{} returned no usable rates", provider.name());
                    failures.push(format!("{}: no rates", provider.name()));
                }
                Err(e) => {
                    warn!("{} rate fetch failed: {e}", provider.name());
                    failures.push(format!("{}: {e}", provider.name()));
                }
            }
        }

        let rates = match self.fallback.fetch_rates().await {
            Ok(rates) if !rates.is_empty() => rates,
            Ok(_) => fallback_rates(),
            Err(e) => {
                warn!("{} failed: {e}", self.fallback.name());
                fallback_rates()
            }
        };

        let message = if failures.is_empty() {
            "No live rate source configured, showing sample rates".to_string()
        } else {
            format!("Live rates unavailable ({}), showing sample rates", failures.join("; "))
        };
        warn!("{message}");

        RateTable {
            rates,
            source: RateSource::Fallback,
            fetched_at: Utc::now(),
            message: Some(message),
        }
    }
}
