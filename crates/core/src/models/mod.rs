pub mod analytics;
pub mod asset;
pub mod ledger;
pub mod position;
pub mod rate;
pub mod request;
pub mod settings;
