use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::AssetClass;
use super::position::Position;
use super::settings::Settings;

/// In-memory holdings of one user session, one ordered collection per asset class.
///
/// Each collection is kept most-recently-added first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub currency: Vec<Position>,
    pub metal: Vec<Position>,
    pub crypto: Vec<Position>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Positions of one class, newest first.
    pub fn positions(&self, asset_class: AssetClass) -> &[Position] {
        match asset_class {
            AssetClass::Currency => &self.currency,
            AssetClass::Metal => &self.metal,
            AssetClass::Crypto => &self.crypto,
        }
    }

    pub(crate) fn positions_mut(&mut self, asset_class: AssetClass) -> &mut Vec<Position> {
        match asset_class {
            AssetClass::Currency => &mut self.currency,
            AssetClass::Metal => &mut self.metal,
            AssetClass::Crypto => &mut self.crypto,
        }
    }

    /// Find a position by id across all classes.
    pub fn find(&self, id: Uuid) -> Option<&Position> {
        AssetClass::ALL
            .iter()
            .flat_map(|class| self.positions(*class).iter())
            .find(|p| p.id == id)
    }

    /// Total number of positions across all classes.
    pub fn len(&self) -> usize {
        self.currency.len() + self.metal.len() + self.crypto.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every position.
    pub fn clear(&mut self) {
        self.currency.clear();
        self.metal.clear();
        self.crypto.clear();
    }
}

/// Everything persisted for one user: the ledger and their settings.
/// This is what gets serialized, encrypted, and written to a `.pldg` file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerFile {
    pub ledger: Ledger,
    pub settings: Settings,
}
