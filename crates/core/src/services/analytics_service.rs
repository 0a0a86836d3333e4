use crate::models::analytics::{ClassSummary, LedgerSummary};
use crate::models::asset::AssetClass;
use crate::models::ledger::Ledger;
use crate::models::position::Position;

/// Folds positions into invested / value / profit totals.
///
/// Nothing is cached: every summary is recomputed from the ledger.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Totals for one asset class.
    pub fn class_summary(&self, ledger: &Ledger, asset_class: AssetClass) -> ClassSummary {
        let positions = ledger.positions(asset_class);
        let (total_invested, total_value, profit) = Self::fold(positions);

        ClassSummary {
            asset_class,
            position_count: positions.len(),
            total_invested,
            total_value,
            profit,
            profit_percent: Self::percent(profit, total_invested),
        }
    }

    /// Totals per class and overall.
    pub fn ledger_summary(&self, ledger: &Ledger, home_currency: &str) -> LedgerSummary {
        let classes: Vec<ClassSummary> = AssetClass::ALL
            .iter()
            .map(|class| self.class_summary(ledger, *class))
            .collect();

        let total_invested: f64 = classes.iter().map(|c| c.total_invested).sum();
        let total_value: f64 = classes.iter().map(|c| c.total_value).sum();
        let profit: f64 = classes.iter().map(|c| c.profit).sum();

        LedgerSummary {
            home_currency: home_currency.to_string(),
            position_count: classes.iter().map(|c| c.position_count).sum(),
            total_invested,
            total_value,
            profit,
            profit_percent: Self::percent(profit, total_invested),
            classes,
        }
    }

    fn fold(positions: &[Position]) -> (f64, f64, f64) {
        positions.iter().fold((0.0, 0.0, 0.0), |(invested, value, profit), p| {
            (invested + p.invested(), value + p.total_value(), profit + p.profit())
        })
    }

    fn percent(profit: f64, invested: f64) -> f64 {
        if invested > 0.0 {
            profit / invested * 100.0
        } else {
            0.0
        }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
