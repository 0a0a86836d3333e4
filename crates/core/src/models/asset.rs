use serde::{Deserialize, Serialize};

/// The class of a tracked asset.
/// Determines the quantity unit and which price source values it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    /// Foreign currencies (USD, EUR, ...): quantity in currency units, live central-bank quotes
    Currency,
    /// Precious metals (XAU, XAG, ...): quantity in grams
    Metal,
    /// Cryptocurrencies (BTC, ETH, ...): quantity in coin units
    Crypto,
}

impl AssetClass {
    /// Every asset class, in display order.
    pub const ALL: [AssetClass; 3] = [AssetClass::Currency, AssetClass::Metal, AssetClass::Crypto];

    /// Unit label used when displaying a quantity of this class.
    pub fn unit(&self) -> &'static str {
        match self {
            AssetClass::Currency => "units",
            AssetClass::Metal => "g",
            AssetClass::Crypto => "coins",
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetClass::Currency => write!(f, "Currency"),
            AssetClass::Metal => write!(f, "Metal"),
            AssetClass::Crypto => write!(f, "Crypto"),
        }
    }
}

/// A purchasable asset (currency, metal, coin).
///
/// **Equality and hashing** use only `(code, asset_class)`, never `name`,
/// so the same asset entered under two display names is still one asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Short symbol, uppercased (e.g., "USD", "XAU", "BTC")
    pub code: String,

    /// Display name (e.g., "Amerikan Doları", "Altın", "Bitcoin")
    pub name: String,

    /// Class this asset belongs to for its whole lifetime
    pub asset_class: AssetClass,
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.asset_class == other.asset_class
    }
}

impl Eq for Asset {}

impl std::hash::Hash for Asset {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.code.hash(state);
        self.asset_class.hash(state);
    }
}

impl Asset {
    pub fn new(code: impl Into<String>, name: impl Into<String>, asset_class: AssetClass) -> Self {
        Self {
            code: code.into().trim().to_uppercase(),
            name: name.into().trim().to_string(),
            asset_class,
        }
    }

    pub fn currency(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(code, name, AssetClass::Currency)
    }

    pub fn metal(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(code, name, AssetClass::Metal)
    }

    pub fn crypto(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(code, name, AssetClass::Crypto)
    }
}

// ── Catalogs ────────────────────────────────────────────────────────

/// Flag shown for a currency with no catalog entry.
pub const UNKNOWN_FLAG: &str = "🏳️";

/// Currencies published by the central bank that the ledger accepts:
/// (code, display name, flag).
pub const CURRENCY_CATALOG: &[(&str, &str, &str)] = &[
    ("USD", "Amerikan Doları", "🇺🇸"),
    ("EUR", "Euro", "🇪🇺"),
    ("GBP", "İngiliz Sterlini", "🇬🇧"),
    ("CHF", "İsviçre Frangı", "🇨🇭"),
    ("JPY", "Japon Yeni", "🇯🇵"),
    ("SAR", "Suudi Arabistan Riyali", "🇸🇦"),
    ("CAD", "Kanada Doları", "🇨🇦"),
    ("AUD", "Avustralya Doları", "🇦🇺"),
    ("NOK", "Norveç Kronu", "🇳🇴"),
    ("SEK", "İsveç Kronu", "🇸🇪"),
    ("DKK", "Danimarka Kronu", "🇩🇰"),
    ("CNY", "Çin Yuanı", "🇨🇳"),
    ("RUB", "Rus Rublesi", "🇷🇺"),
    ("BGN", "Bulgar Levası", "🇧🇬"),
    ("RON", "Rumen Leyi", "🇷🇴"),
    ("IRR", "İran Riyali", "🇮🇷"),
    ("KWD", "Kuveyt Dinarı", "🇰🇼"),
    ("AZN", "Azerbaycan Manatı", "🇦🇿"),
    ("AED", "BAE Dirhemi", "🇦🇪"),
    ("QAR", "Katar Riyali", "🇶🇦"),
    ("BHD", "Bahreyn Dinarı", "🇧🇭"),
    ("OMR", "Umman Riyali", "🇴🇲"),
    ("JOD", "Ürdün Dinarı", "🇯🇴"),
    ("LBP", "Lübnan Lirası", "🇱🇧"),
    ("EGP", "Mısır Lirası", "🇪🇬"),
    ("IQD", "Irak Dinarı", "🇮🇶"),
    ("LYD", "Libya Dinarı", "🇱🇾"),
    ("SYP", "Suriye Lirası", "🇸🇾"),
    ("YER", "Yemen Riyali", "🇾🇪"),
];

/// Metals offered in the add-investment form: (code, display name).
pub const METAL_CATALOG: &[(&str, &str)] = &[
    ("XAU", "Altın"),
    ("XAG", "Gümüş"),
    ("XPT", "Platin"),
    ("XPD", "Paladyum"),
];

/// Coins offered in the add-investment form: (code, display name).
pub const CRYPTO_CATALOG: &[(&str, &str)] = &[
    ("BTC", "Bitcoin"),
    ("ETH", "Ethereum"),
    ("BNB", "Binance Coin"),
    ("ADA", "Cardano"),
    ("SOL", "Solana"),
    ("XRP", "Ripple"),
    ("DOGE", "Dogecoin"),
    ("DOT", "Polkadot"),
];

/// Look up a catalog asset by class and code (case-insensitive).
pub fn catalog_asset(asset_class: AssetClass, code: &str) -> Option<Asset> {
    let upper = code.trim().to_uppercase();
    match asset_class {
        AssetClass::Currency => CURRENCY_CATALOG
            .iter()
            .find(|(c, _, _)| *c == upper)
            .map(|(c, name, _)| Asset::currency(*c, *name)),
        AssetClass::Metal => METAL_CATALOG
            .iter()
            .find(|(c, _)| *c == upper)
            .map(|(c, name)| Asset::metal(*c, *name)),
        AssetClass::Crypto => CRYPTO_CATALOG
            .iter()
            .find(|(c, _)| *c == upper)
            .map(|(c, name)| Asset::crypto(*c, *name)),
    }
}

/// All catalog assets of one class, in catalog order.
pub fn catalog(asset_class: AssetClass) -> Vec<Asset> {
    match asset_class {
        AssetClass::Currency => CURRENCY_CATALOG
            .iter()
            .map(|(c, name, _)| Asset::currency(*c, *name))
            .collect(),
        AssetClass::Metal => METAL_CATALOG
            .iter()
            .map(|(c, name)| Asset::metal(*c, *name))
            .collect(),
        AssetClass::Crypto => CRYPTO_CATALOG
            .iter()
            .map(|(c, name)| Asset::crypto(*c, *name))
            .collect(),
    }
}

/// Display name of a catalog currency, if the code is known.
pub fn currency_name(code: &str) -> Option<&'static str> {
    let upper = code.trim().to_uppercase();
    CURRENCY_CATALOG
        .iter()
        .find(|(c, _, _)| *c == upper)
        .map(|(_, name, _)| *name)
}

/// Flag glyph for a currency code; unknown codes get [`UNKNOWN_FLAG`].
pub fn currency_flag(code: &str) -> &'static str {
    let upper = code.trim().to_uppercase();
    CURRENCY_CATALOG
        .iter()
        .find(|(c, _, _)| *c == upper)
        .map(|(_, _, flag)| *flag)
        .unwrap_or(UNKNOWN_FLAG)
}
