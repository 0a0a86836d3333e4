pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use log::debug;
use uuid::Uuid;

use errors::CoreError;
use models::{
    analytics::{ClassSummary, LedgerSummary},
    asset::AssetClass,
    ledger::{Ledger, LedgerFile},
    position::{Position, PositionView},
    rate::RateTable,
    request::{NewPositionRequest, QuickInvestRequest},
    settings::Settings,
};
use providers::registry::RateProviderRegistry;
use services::{
    analytics_service::AnalyticsService,
    ledger_service::LedgerService,
    pricing_service::{validate_markup, PricingPolicy},
    rate_service::RateService,
};
use storage::manager::StorageManager;
use storage::store::LedgerStore;

/// Main entry point for the portfolio-ledger core library.
/// Owns one user session's ledger, settings and rate cache.
#[must_use]
pub struct LedgerTracker {
    ledger: Ledger,
    settings: Settings,
    policy: PricingPolicy,
    ledger_service: LedgerService,
    rate_service: RateService,
    analytics_service: AnalyticsService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for LedgerTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerTracker")
            .field("positions", &self.ledger.len())
            .field("settings", &self.settings)
            .field("rates", &self.rate_service.latest().map(|t| t.source))
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl LedgerTracker {
    /// Create an empty ledger with default settings.
    pub fn create_new() -> Self {
        Self::build(LedgerFile::default())
    }

    /// Create an empty ledger with the given settings.
    pub fn with_settings(settings: Settings) -> Self {
        Self::build(LedgerFile {
            ledger: Ledger::new(),
            settings,
        })
    }

    /// Replace the live rate providers (e.g., a different feed, or a stub in tests).
    /// Any previously fetched table is discarded.
    pub fn with_rate_registry(mut self, registry: RateProviderRegistry) -> Self {
        self.rate_service = RateService::new(registry);
        self
    }

    /// Load from encrypted bytes (password required).
    pub fn load_from_bytes(encrypted: &[u8], password: &str) -> Result<Self, CoreError> {
        let file = StorageManager::load_from_bytes(encrypted, password)?;
        Ok(Self::build(file))
    }

    /// Save to encrypted bytes. Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self, password: &str) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.snapshot(), password)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from an encrypted file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<Self, CoreError> {
        let file = StorageManager::load_from_file(path, password)?;
        Ok(Self::build(file))
    }

    /// Save to an encrypted file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str, password: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.snapshot(), path, password)?;
        self.dirty = false;
        Ok(())
    }

    /// Open a user's ledger from a store.
    pub fn open(store: &dyn LedgerStore, user_id: &str, password: &str) -> Result<Self, CoreError> {
        let file = store.load(user_id, password)?;
        Ok(Self::build(file))
    }

    /// Persist into a store, creating the user's record if it does not exist yet.
    pub fn save_to(
        &mut self,
        store: &dyn LedgerStore,
        user_id: &str,
        password: &str,
    ) -> Result<(), CoreError> {
        let file = self.snapshot();
        if store.exists(user_id)? {
            store.save(user_id, password, &file)?;
        } else {
            store.create(user_id, password, &file)?;
        }
        self.dirty = false;
        Ok(())
    }

    // ── Rates ───────────────────────────────────────────────────────

    /// Fetch a fresh rate table. Falls back to the static table when no
    /// live source delivers, so this always yields a non-empty list.
    pub async fn refresh_rates(&mut self) -> &RateTable {
        self.rate_service.refresh().await
    }

    /// The table from the last refresh, if any.
    #[must_use]
    pub fn rates(&self) -> Option<&RateTable> {
        self.rate_service.latest()
    }

    /// Names of the live rate providers, in the order they are asked.
    #[must_use]
    pub fn rate_provider_names(&self) -> Vec<String> {
        self.rate_service.provider_names()
    }

    // ── Positions ───────────────────────────────────────────────────

    /// Record a purchase. Returns the new position's id.
    pub fn add_position(&mut self, request: &NewPositionRequest) -> Result<Uuid, CoreError> {
        let id = self.ledger_service.add_position(
            &mut self.ledger,
            request,
            &self.policy,
            self.rate_service.latest(),
        )?;
        self.dirty = true;
        Ok(id)
    }

    /// Buy a currency at its current sell rate (zero initial profit).
    /// Requires a rate table, see [`refresh_rates`](Self::refresh_rates).
    pub fn quick_invest(&mut self, request: &QuickInvestRequest) -> Result<Uuid, CoreError> {
        let id = self
            .ledger_service
            .quick_invest(&mut self.ledger, request, self.rate_service.latest())?;
        self.dirty = true;
        Ok(id)
    }

    /// Set a new current price on every matching position.
    /// Returns the number of positions updated.
    pub fn reprice(
        &mut self,
        asset_class: AssetClass,
        asset_code: &str,
        current_unit_price: f64,
    ) -> Result<usize, CoreError> {
        let updated =
            self.ledger_service
                .reprice(&mut self.ledger, asset_class, asset_code, current_unit_price)?;
        if updated > 0 {
            self.dirty = true;
        }
        Ok(updated)
    }

    /// Re-price all currency positions from the latest rate table.
    /// Returns the number of positions updated (zero before the first refresh).
    pub fn apply_latest_rates(&mut self) -> usize {
        let Some(table) = self.rate_service.latest() else {
            return 0;
        };
        let updated = self.ledger_service.reprice_from_rates(&mut self.ledger, table);
        if updated > 0 {
            self.dirty = true;
        }
        updated
    }

    /// Delete a position. Unknown ids are ignored; returns whether one was removed.
    pub fn delete_position(&mut self, asset_class: AssetClass, id: Uuid) -> bool {
        let removed = self
            .ledger_service
            .remove_position(&mut self.ledger, asset_class, id)
            .is_some();
        if removed {
            self.dirty = true;
        }
        removed
    }

    /// Positions of one class, newest first.
    #[must_use]
    pub fn positions(&self, asset_class: AssetClass) -> &[Position] {
        self.ledger.positions(asset_class)
    }

    /// A single position by id, whatever its class.
    #[must_use]
    pub fn position(&self, id: Uuid) -> Option<&Position> {
        self.ledger.find(id)
    }

    /// Positions of one class with derived figures, newest first.
    #[must_use]
    pub fn valued_positions(&self, asset_class: AssetClass) -> Vec<PositionView> {
        self.ledger
            .positions(asset_class)
            .iter()
            .map(Position::view)
            .collect()
    }

    #[must_use]
    pub fn position_count(&self) -> usize {
        self.ledger.len()
    }

    /// Drop every position, keeping settings.
    pub fn reset_data(&mut self) {
        if !self.ledger.is_empty() {
            debug!("Resetting ledger ({} positions)", self.ledger.len());
            self.ledger.clear();
            self.dirty = true;
        }
    }

    // ── Analytics ───────────────────────────────────────────────────

    #[must_use]
    pub fn class_summary(&self, asset_class: AssetClass) -> ClassSummary {
        self.analytics_service.class_summary(&self.ledger, asset_class)
    }

    #[must_use]
    pub fn summary(&self) -> LedgerSummary {
        self.analytics_service
            .ledger_summary(&self.ledger, &self.settings.home_currency)
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn pricing_policy(&self) -> &PricingPolicy {
        &self.policy
    }

    /// Set the home currency. Must be exactly 3 ASCII letters.
    pub fn set_home_currency(&mut self, currency: &str) -> Result<(), CoreError> {
        let trimmed = currency.trim().to_uppercase();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::ValidationError(format!(
                "Invalid currency code '{currency}': must be exactly 3 ASCII letters (e.g., TRY, USD)"
            )));
        }
        self.settings.home_currency = trimmed;
        self.dirty = true;
        Ok(())
    }

    /// Set the simulated markup of metals or coins. Currencies are always live.
    /// Affects positions added afterwards only.
    pub fn set_markup(&mut self, asset_class: AssetClass, factor: f64) -> Result<(), CoreError> {
        validate_markup(factor)?;
        match asset_class {
            AssetClass::Metal => self.settings.metal_markup = factor,
            AssetClass::Crypto => self.settings.crypto_markup = factor,
            AssetClass::Currency => {
                return Err(CoreError::ValidationError(
                    "Currency positions are priced from live quotes, not a markup".into(),
                ))
            }
        }
        self.policy = PricingPolicy::from_settings(&self.settings);
        self.dirty = true;
        Ok(())
    }

    /// Point the central-bank provider at another URL.
    /// Rebuilds the provider registry, discarding the cached table.
    pub fn set_rate_feed_url(&mut self, url: &str) -> Result<(), CoreError> {
        let trimmed = url.trim();
        if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
            return Err(CoreError::ValidationError(format!(
                "Invalid rate feed URL '{url}': must start with http:// or https://"
            )));
        }
        self.settings.rate_feed_url = trimmed.to_string();
        self.rate_service = RateService::new(RateProviderRegistry::new_with_defaults(&self.settings));
        self.dirty = true;
        Ok(())
    }

    /// Returns `true` if anything changed since the last save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Export all positions, with derived figures, as JSON.
    pub fn export_positions_to_json(&self) -> Result<String, CoreError> {
        let views: Vec<PositionView> = AssetClass::ALL
            .iter()
            .flat_map(|class| self.valued_positions(*class))
            .collect();
        serde_json::to_string_pretty(&views)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize positions to JSON: {e}")))
    }

    /// Unencrypted JSON snapshot of ledger and settings (debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize ledger: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    fn snapshot(&self) -> LedgerFile {
        LedgerFile {
            ledger: self.ledger.clone(),
            settings: self.settings.clone(),
        }
    }

    fn build(file: LedgerFile) -> Self {
        let LedgerFile { ledger, settings } = file;
        let registry = RateProviderRegistry::new_with_defaults(&settings);

        Self {
            policy: PricingPolicy::from_settings(&settings),
            rate_service: RateService::new(registry),
            ledger_service: LedgerService::new(),
            analytics_service: AnalyticsService::new(),
            ledger,
            settings,
            dirty: false,
        }
    }
}
