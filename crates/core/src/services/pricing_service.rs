use serde::{Deserialize, Serialize};

use crate::errors::CoreError;
use crate::models::asset::AssetClass;
use crate::models::rate::RateTable;
use crate::models::settings::Settings;

/// How the current unit price of a new position is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PriceSource {
    /// Sell rate of the asset code in the latest rate table.
    LiveQuote,
    /// Purchase price × factor.
    ///
    /// Simulation stand-in for assets without a market feed. The figures it
    /// produces are not market data.
    FixedMarkup(f64),
}

impl PriceSource {
    /// Current unit price for a purchase, or `None` when no price is available
    /// (no table yet, unknown code, or an unusable quote).
    pub fn current_price(
        &self,
        asset_code: &str,
        purchase_unit_price: f64,
        rates: Option<&RateTable>,
    ) -> Option<f64> {
        match self {
            PriceSource::LiveQuote => rates.and_then(|t| t.sell_rate(asset_code)),
            PriceSource::FixedMarkup(factor) => {
                let price = purchase_unit_price * factor;
                (price.is_finite() && price > 0.0).then_some(price)
            }
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, PriceSource::FixedMarkup(_))
    }
}

/// Which [`PriceSource`] values each asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPolicy {
    pub currency: PriceSource,
    pub metal: PriceSource,
    pub crypto: PriceSource,
}

impl PricingPolicy {
    /// Live quotes for currencies; markup simulation for metals and coins.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            currency: PriceSource::LiveQuote,
            metal: PriceSource::FixedMarkup(settings.metal_markup),
            crypto: PriceSource::FixedMarkup(settings.crypto_markup),
        }
    }

    pub fn source_for(&self, asset_class: AssetClass) -> PriceSource {
        match asset_class {
            AssetClass::Currency => self.currency,
            AssetClass::Metal => self.metal,
            AssetClass::Crypto => self.crypto,
        }
    }

    /// Replace the source of one class, e.g. once a real metal feed exists.
    pub fn set_source(&mut self, asset_class: AssetClass, source: PriceSource) {
        match asset_class {
            AssetClass::Currency => self.currency = source,
            AssetClass::Metal => self.metal = source,
            AssetClass::Crypto => self.crypto = source,
        }
    }
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

/// Check a markup factor: finite and strictly positive.
pub fn validate_markup(factor: f64) -> Result<(), CoreError> {
    if !factor.is_finite() || factor <= 0.0 {
        return Err(CoreError::ValidationError(format!(
            "Markup factor must be a positive number, got {factor}"
        )));
    }
    Ok(())
}
