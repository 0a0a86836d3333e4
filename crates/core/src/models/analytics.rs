use serde::{Deserialize, Serialize};

use super::asset::AssetClass;

/// Aggregate figures for one asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSummary {
    pub asset_class: AssetClass,

    /// Number of positions in the class
    pub position_count: usize,

    /// Σ quantity × purchase price
    pub total_invested: f64,

    /// Σ quantity × current price
    pub total_value: f64,

    /// Σ profit
    pub profit: f64,

    /// profit / total_invested × 100, or 0 for an empty class
    pub profit_percent: f64,
}

/// Aggregate figures for the whole ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Currency every figure is expressed in
    pub home_currency: String,

    pub position_count: usize,
    pub total_invested: f64,
    pub total_value: f64,
    pub profit: f64,
    pub profit_percent: f64,

    /// One entry per asset class, in `AssetClass::ALL` order
    pub classes: Vec<ClassSummary>,
}

impl LedgerSummary {
    pub fn class(&self, asset_class: AssetClass) -> Option<&ClassSummary> {
        self.classes.iter().find(|c| c.asset_class == asset_class)
    }
}
