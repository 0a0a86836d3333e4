pub mod analytics_service;
pub mod ledger_service;
pub mod pricing_service;
pub mod rate_service;
