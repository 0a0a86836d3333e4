use log::debug;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::asset::{Asset, AssetClass};
use crate::models::ledger::Ledger;
use crate::models::position::Position;
use crate::models::rate::RateTable;
use crate::models::request::{parse_date, required_text, NewPositionRequest, QuickInvestRequest};
use super::pricing_service::PricingPolicy;

/// Creates, re-prices and removes positions.
///
/// Pure business logic with no I/O. Every operation either
/// applies completely or leaves the ledger untouched.
pub struct LedgerService;

impl LedgerService {
    pub fn new() -> Self {
        Self
    }

    /// Validate a request, build the position and prepend it to its class.
    ///
    /// The current price comes from the class's price source; when that source
    /// has nothing, the purchase price is used so profit starts at zero.
    pub fn add_position(
        &self,
        ledger: &mut Ledger,
        request: &NewPositionRequest,
        policy: &PricingPolicy,
        rates: Option<&RateTable>,
    ) -> Result<Uuid, CoreError> {
        let name = required_text(&request.asset_name, "Asset name")?;
        let code = required_text(&request.asset_code, "Asset code")?;
        let purchase_date = parse_date(&request.purchase_date, "Purchase date")?;
        let quantity = request.quantity.parse_positive("Quantity")?;
        let unit_price = request.unit_price.parse_positive("Unit price")?;

        let source = policy.source_for(request.asset_class);
        let current_price = source
            .current_price(code, unit_price, rates)
            .unwrap_or(unit_price);

        let asset = Asset::new(code, name, request.asset_class);
        let position = Position::new(asset, purchase_date, quantity, unit_price, current_price);
        let id = position.id;

        debug!(
            "Adding {} position {} {}: {} @ {} (current {})",
            request.asset_class, id, position.asset.code, quantity, unit_price, current_price
        );
        ledger.positions_mut(request.asset_class).insert(0, position);
        Ok(id)
    }

    /// Buy a currency at its current sell rate. The position starts with a
    /// current price equal to the purchase price, i.e. zero profit.
    pub fn quick_invest(
        &self,
        ledger: &mut Ledger,
        request: &QuickInvestRequest,
        rates: Option<&RateTable>,
    ) -> Result<Uuid, CoreError> {
        let code = required_text(&request.asset_code, "Currency")?;
        let purchase_date = parse_date(&request.purchase_date, "Purchase date")?;
        let quantity = request.quantity.parse_positive("Quantity")?;

        let quote = rates
            .and_then(|t| t.quote(code))
            .ok_or_else(|| CoreError::ValidationError(format!("No quote available for {code}")))?;
        let rate = quote.usable_sell_rate().ok_or_else(|| {
            CoreError::ValidationError(format!("Quote for {} has no usable sell rate", quote.code))
        })?;

        let asset = Asset::currency(quote.code.as_str(), quote.name.as_str());
        let position = Position::new(asset, purchase_date, quantity, rate, rate);
        let id = position.id;

        debug!("Quick invest {id}: {quantity} {} @ {rate}", quote.code);
        ledger.positions_mut(AssetClass::Currency).insert(0, position);
        Ok(id)
    }

    /// Set a new current price on every position of `asset_class` with `asset_code`.
    /// Returns how many positions were updated; zero matches is not an error.
    pub fn reprice(
        &self,
        ledger: &mut Ledger,
        asset_class: AssetClass,
        asset_code: &str,
        current_unit_price: f64,
    ) -> Result<usize, CoreError> {
        if !current_unit_price.is_finite() || current_unit_price <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "Current price must be positive, got {current_unit_price}"
            )));
        }

        let code = asset_code.trim().to_uppercase();
        let mut updated = 0;
        for position in ledger
            .positions_mut(asset_class)
            .iter_mut()
            .filter(|p| p.asset.code == code)
        {
            position.reprice(current_unit_price);
            updated += 1;
        }

        debug!("Repriced {updated} {asset_class} position(s) for {code} at {current_unit_price}");
        Ok(updated)
    }

    /// Re-price every currency position that has a usable quote in `table`.
    /// Returns how many positions were updated.
    pub fn reprice_from_rates(&self, ledger: &mut Ledger, table: &RateTable) -> usize {
        let mut updated = 0;
        for position in ledger.positions_mut(AssetClass::Currency).iter_mut() {
            if let Some(rate) = table.sell_rate(&position.asset.code) {
                position.reprice(rate);
                updated += 1;
            }
        }
        debug!("Repriced {updated} currency position(s) from {} rates", table.source);
        updated
    }

    /// Remove a position by class and id. Unknown ids are a no-op (`None`).
    pub fn remove_position(
        &self,
        ledger: &mut Ledger,
        asset_class: AssetClass,
        id: Uuid,
    ) -> Option<Position> {
        let positions = ledger.positions_mut(asset_class);
        let idx = positions.iter().position(|p| p.id == id)?;
        debug!("Removing {asset_class} position {id}");
        Some(positions.remove(idx))
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new()
    }
}
