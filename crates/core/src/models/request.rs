use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

use super::asset::AssetClass;

/// Minimum length of an account password.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A numeric form field, either as typed text or as an already-parsed number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    /// Parse into a strictly positive, finite number.
    /// `field` names the input in the validation message.
    pub fn parse_positive(&self, field: &str) -> Result<f64, CoreError> {
        let value = match self {
            RawAmount::Number(n) => *n,
            RawAmount::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(CoreError::ValidationError(format!("{field} is required")));
                }
                trimmed.parse::<f64>().map_err(|_| {
                    CoreError::ValidationError(format!("{field} '{trimmed}' is not a number"))
                })?
            }
        };

        if !value.is_finite() {
            return Err(CoreError::ValidationError(format!("{field} must be a finite number")));
        }
        if value <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "{field} must be positive, got {value}"
            )));
        }
        Ok(value)
    }
}

impl From<f64> for RawAmount {
    fn from(n: f64) -> Self {
        RawAmount::Number(n)
    }
}

impl From<&str> for RawAmount {
    fn from(s: &str) -> Self {
        RawAmount::Text(s.to_string())
    }
}

impl From<String> for RawAmount {
    fn from(s: String) -> Self {
        RawAmount::Text(s)
    }
}

/// Input of the "add investment" form for any asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPositionRequest {
    pub asset_class: AssetClass,
    pub asset_name: String,
    pub asset_code: String,
    /// `YYYY-MM-DD`
    pub purchase_date: String,
    pub quantity: RawAmount,
    pub unit_price: RawAmount,
}

impl NewPositionRequest {
    pub fn new(
        asset_class: AssetClass,
        asset_name: impl Into<String>,
        asset_code: impl Into<String>,
        purchase_date: impl Into<String>,
        quantity: impl Into<RawAmount>,
        unit_price: impl Into<RawAmount>,
    ) -> Self {
        Self {
            asset_class,
            asset_name: asset_name.into(),
            asset_code: asset_code.into(),
            purchase_date: purchase_date.into(),
            quantity: quantity.into(),
            unit_price: unit_price.into(),
        }
    }
}

/// Input of the "quick invest" dialog: buy a currency at its current sell rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickInvestRequest {
    pub asset_code: String,
    /// `YYYY-MM-DD`
    pub purchase_date: String,
    pub quantity: RawAmount,
}

impl QuickInvestRequest {
    pub fn new(
        asset_code: impl Into<String>,
        purchase_date: impl Into<String>,
        quantity: impl Into<RawAmount>,
    ) -> Self {
        Self {
            asset_code: asset_code.into(),
            purchase_date: purchase_date.into(),
            quantity: quantity.into(),
        }
    }
}

/// Input of the change-password dialog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

impl PasswordChange {
    pub fn new(
        current: impl Into<String>,
        new: impl Into<String>,
        confirm: impl Into<String>,
    ) -> Self {
        Self {
            current: current.into(),
            new: new.into(),
            confirm: confirm.into(),
        }
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.current.is_empty() || self.new.is_empty() || self.confirm.is_empty() {
            return Err(CoreError::ValidationError("All password fields are required".into()));
        }
        if self.new != self.confirm {
            return Err(CoreError::ValidationError("New passwords do not match".into()));
        }
        if self.new.chars().count() < MIN_PASSWORD_LEN {
            return Err(CoreError::ValidationError(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        Ok(())
    }
}

/// Require a non-blank text field and return it trimmed.
pub(crate) fn required_text<'a>(value: &'a str, field: &str) -> Result<&'a str, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::ValidationError(format!("{field} is required")));
    }
    Ok(trimmed)
}

/// Parse a required `YYYY-MM-DD` date field.
pub(crate) fn parse_date(value: &str, field: &str) -> Result<NaiveDate, CoreError> {
    let trimmed = required_text(value, field)?;
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| {
        CoreError::ValidationError(format!("{field} '{trimmed}' is not a YYYY-MM-DD date"))
    })
}
