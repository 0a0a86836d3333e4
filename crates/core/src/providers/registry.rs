use crate::models::settings::Settings;

use super::tcmb::TcmbProvider;
use super::traits::RateProvider;

/// Ordered chain of live rate providers.
///
/// The rate service asks them in registration order and takes the first
/// non-empty answer. The static fallback table is not registered here;
/// the rate service substitutes it when the whole chain comes up empty.
pub struct RateProviderRegistry {
    providers: Vec<Box<dyn RateProvider>>,
}

impl RateProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with the central-bank feed configured from settings.
    pub fn new_with_defaults(settings: &Settings) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(TcmbProvider::with_url(settings.rate_feed_url.clone())));
        registry
    }

    /// Register a provider at the end of the chain.
    pub fn register(&mut self, provider: Box<dyn RateProvider>) {
        self.providers.push(provider);
    }

    /// All providers, in priority order.
    pub fn providers(&self) -> impl Iterator<Item = &dyn RateProvider> {
        self.providers.iter().map(|p| p.as_ref())
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for RateProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
