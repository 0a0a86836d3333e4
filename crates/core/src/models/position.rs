use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::{Asset, AssetClass};

/// A single recorded purchase of one asset at one price, plus its current valuation.
///
/// Only the purchase terms and the latest unit price are stored. Total value,
/// profit and profit percentage are derived on every read, so they can never
/// drift from `current_unit_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Unique identifier, assigned at creation
    pub id: Uuid,

    /// The asset bought
    pub asset: Asset,

    /// Purchase date (no time component)
    pub purchase_date: NaiveDate,

    /// Quantity bought (currency units, grams, or coins). Always > 0.
    pub quantity: f64,

    /// Price per unit at acquisition, in the home currency. Always > 0.
    pub purchase_unit_price: f64,

    /// Latest known price per unit, in the home currency
    pub current_unit_price: f64,
}

impl Position {
    /// Build a position with a fresh id. Callers are expected to have validated
    /// that `quantity` and `purchase_unit_price` are positive.
    pub fn new(
        asset: Asset,
        purchase_date: NaiveDate,
        quantity: f64,
        purchase_unit_price: f64,
        current_unit_price: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset,
            purchase_date,
            quantity,
            purchase_unit_price,
            current_unit_price,
        }
    }

    pub fn asset_class(&self) -> AssetClass {
        self.asset.asset_class
    }

    /// quantity × purchase price
    pub fn invested(&self) -> f64 {
        self.quantity * self.purchase_unit_price
    }

    /// quantity × current price
    pub fn total_value(&self) -> f64 {
        self.quantity * self.current_unit_price
    }

    /// (current − purchase) × quantity
    pub fn profit(&self) -> f64 {
        (self.current_unit_price - self.purchase_unit_price) * self.quantity
    }

    /// (current − purchase) / purchase × 100
    pub fn profit_percent(&self) -> f64 {
        (self.current_unit_price - self.purchase_unit_price) / self.purchase_unit_price * 100.0
    }

    /// Replace the current unit price. Derived figures follow automatically.
    pub fn reprice(&mut self, current_unit_price: f64) {
        self.current_unit_price = current_unit_price;
    }

    /// Materialize the position together with its derived figures.
    pub fn view(&self) -> PositionView {
        PositionView {
            id: self.id,
            asset: self.asset.clone(),
            purchase_date: self.purchase_date,
            quantity: self.quantity,
            purchase_unit_price: self.purchase_unit_price,
            current_unit_price: self.current_unit_price,
            total_value: self.total_value(),
            profit: self.profit(),
            profit_percent: self.profit_percent(),
        }
    }
}

/// Read-only snapshot of a [`Position`] with derived figures filled in,
/// for display and JSON export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionView {
    pub id: Uuid,
    pub asset: Asset,
    pub purchase_date: NaiveDate,
    pub quantity: f64,
    pub purchase_unit_price: f64,
    pub current_unit_price: f64,
    pub total_value: f64,
    pub profit: f64,
    pub profit_percent: f64,
}
