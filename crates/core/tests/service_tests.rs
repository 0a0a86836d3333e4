// ═══════════════════════════════════════════════════════════════════
// Service Tests — LedgerService, PricingPolicy, RateService,
// AnalyticsService
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use portfolio_ledger_core::errors::CoreError;
use portfolio_ledger_core::models::asset::AssetClass;
use portfolio_ledger_core::models::ledger::Ledger;
use portfolio_ledger_core::models::rate::{ExchangeRate, RateSource, RateTable};
use portfolio_ledger_core::models::request::{NewPositionRequest, QuickInvestRequest};
use portfolio_ledger_core::models::settings::Settings;
use portfolio_ledger_core::providers::fallback::{FallbackProvider, FALLBACK_RATES};
use portfolio_ledger_core::providers::registry::RateProviderRegistry;
use portfolio_ledger_core::providers::traits::RateProvider;
use portfolio_ledger_core::services::analytics_service::AnalyticsService;
use portfolio_ledger_core::services::ledger_service::LedgerService;
use portfolio_ledger_core::services::pricing_service::{validate_markup, PriceSource, PricingPolicy};
use portfolio_ledger_core::services::rate_service::RateService;

// ═══════════════════════════════════════════════════════════════════
// Helpers
// ═══════════════════════════════════════════════════════════════════

fn live_table() -> RateTable {
    RateTable {
        rates: vec![
            ExchangeRate::new("USD", "Amerikan Doları", 32.70, 32.80, "🇺🇸"),
            ExchangeRate::new("EUR", "Euro", 35.20, 35.30, "🇪🇺"),
            ExchangeRate::new("GBP", "İngiliz Sterlini", 0.0, 0.0, "🇬🇧"),
        ],
        source: RateSource::CentralBank,
        fetched_at: chrono::Utc::now(),
        message: None,
    }
}

fn request(class: AssetClass, code: &str, qty: &str, price: &str) -> NewPositionRequest {
    NewPositionRequest::new(class, format!("{code} name"), code, "2024-06-01", qty, price)
}

/// Provider answering with a fixed result and counting calls.
struct StubProvider {
    name: String,
    result: Result<Vec<ExchangeRate>, String>,
    calls: Arc<AtomicUsize>,
}

impl StubProvider {
    fn ok(name: &str, rates: Vec<ExchangeRate>) -> Self {
        Self {
            name: name.into(),
            result: Ok(rates),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn failing(name: &str) -> Self {
        Self {
            name: name.into(),
            result: Err("connection refused".into()),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl RateProvider for StubProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_rates(&self) -> Result<Vec<ExchangeRate>, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone().map_err(CoreError::Network)
    }
}

fn registry(providers: Vec<StubProvider>) -> RateProviderRegistry {
    let mut r = RateProviderRegistry::new();
    for p in providers {
        r.register(Box::new(p));
    }
    r
}

// ═══════════════════════════════════════════════════════════════════
// LedgerService — Position Factory
// ═══════════════════════════════════════════════════════════════════

mod add_position {
    use super::*;

    #[test]
    fn currency_uses_live_sell_rate() {
        let svc = LedgerService::new();
        let mut ledger = Ledger::new();
        let table = live_table();
        let req = request(AssetClass::Currency, "USD", "100", "32.50");

        let id = svc
            .add_position(&mut ledger, &req, &PricingPolicy::default(), Some(&table))
            .unwrap();

        let p = &ledger.currency[0];
        assert_eq!(p.id, id);
        assert_eq!(p.current_unit_price, 32.80);
        assert!((p.total_value() - 3280.0).abs() < 1e-9);
        assert!((p.profit() - 30.0).abs() < 1e-9);
        assert!((p.profit_percent() - 0.923).abs() < 1e-3);
        assert_eq!(p.purchase_date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
    }

    #[test]
    fn currency_without_quote_falls_back_to_purchase_price() {
        let svc = LedgerService::new();
        let mut ledger = Ledger::new();
        let table = live_table();

        svc.add_position(
            &mut ledger,
            &request(AssetClass::Currency, "CHF", "10", "36.8"),
            &PricingPolicy::default(),
            Some(&table),
        )
        .unwrap();
        svc.add_position(
            &mut ledger,
            &request(AssetClass::Currency, "USD", "10", "30"),
            &PricingPolicy::default(),
            None,
        )
        .unwrap();
        // GBP quote exists but is zero.
        svc.add_position(
            &mut ledger,
            &request(AssetClass::Currency, "GBP", "10", "41.5"),
            &PricingPolicy::default(),
            Some(&table),
        )
        .unwrap();

        for p in &ledger.currency {
            assert_eq!(p.current_unit_price, p.purchase_unit_price);
            assert_eq!(p.profit(), 0.0);
            assert_eq!(p.profit_percent(), 0.0);
        }
    }

    #[test]
    fn metal_applies_eight_percent_markup() {
        let svc = LedgerService::new();
        let mut ledger = Ledger::new();
        svc.add_position(
            &mut ledger,
            &request(AssetClass::Metal, "XAU", "10", "2450"),
            &PricingPolicy::default(),
            None,
        )
        .unwrap();

        let p = &ledger.metal[0];
        assert_eq!(p.current_unit_price, 2450.0 * 1.08);
        assert!((p.profit_percent() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn crypto_applies_twelve_percent_markup() {
        let svc = LedgerService::new();
        let mut ledger = Ledger::new();
        svc.add_position(
            &mut ledger,
            &request(AssetClass::Crypto, "BTC", "0.5", "2000000"),
            &PricingPolicy::default(),
            Some(&live_table()),
        )
        .unwrap();

        let p = &ledger.crypto[0];
        assert_eq!(p.current_unit_price, 2_000_000.0 * 1.12);
        assert!((p.profit_percent() - 12.0).abs() < 1e-9);
    }

    #[test]
    fn newest_position_comes_first() {
        let svc = LedgerService::new();
        let mut ledger = Ledger::new();
        let policy = PricingPolicy::default();
        let first = svc
            .add_position(&mut ledger, &request(AssetClass::Metal, "XAU", "1", "1"), &policy, None)
            .unwrap();
        let second = svc
            .add_position(&mut ledger, &request(AssetClass::Metal, "XAG", "1", "1"), &policy, None)
            .unwrap();
        assert_eq!(ledger.metal[0].id, second);
        assert_eq!(ledger.metal[1].id, first);
    }

    #[test]
    fn positions_land_in_their_own_class() {
        let svc = LedgerService::new();
        let mut ledger = Ledger::new();
        let policy = PricingPolicy::default();
        svc.add_position(&mut ledger, &request(AssetClass::Crypto, "ETH", "1", "1"), &policy, None)
            .unwrap();
        assert_eq!(ledger.crypto.len(), 1);
        assert!(ledger.currency.is_empty());
        assert!(ledger.metal.is_empty());
        assert_eq!(ledger.crypto[0].asset.asset_class, AssetClass::Crypto);
    }

    #[test]
    fn rejects_non_positive_amounts_for_every_class() {
        let svc = LedgerService::new();
        let policy = PricingPolicy::default();
        for class in AssetClass::ALL {
            for (qty, price) in [("0", "10"), ("-1", "10"), ("5", "0"), ("5", "-3")] {
                let mut ledger = Ledger::new();
                let err = svc
                    .add_position(&mut ledger, &request(class, "ABC", qty, price), &policy, None)
                    .unwrap_err();
                assert!(matches!(err, CoreError::ValidationError(_)));
                assert!(ledger.is_empty(), "{class} {qty} {price}");
            }
        }
    }

    #[test]
    fn rejects_missing_fields() {
        let svc = LedgerService::new();
        let policy = PricingPolicy::default();
        let base = request(AssetClass::Metal, "XAU", "1", "1");

        let mut no_name = base.clone();
        no_name.asset_name = "  ".into();
        let mut no_code = base.clone();
        no_code.asset_code = String::new();
        let mut no_date = base.clone();
        no_date.purchase_date = String::new();
        let mut bad_date = base.clone();
        bad_date.purchase_date = "01/06/2024".into();
        let mut no_qty = base.clone();
        no_qty.quantity = "".into();

        for req in [no_name, no_code, no_date, bad_date, no_qty] {
            let mut ledger = Ledger::new();
            assert!(svc.add_position(&mut ledger, &req, &policy, None).is_err());
            assert!(ledger.is_empty());
        }
    }
}

// ═══════════════════════════════════════════════════════════════════
// LedgerService — Quick invest
// ═══════════════════════════════════════════════════════════════════

mod quick_invest {
    use super::*;

    #[test]
    fn buys_at_sell_rate_with_zero_profit() {
        let svc = LedgerService::new();
        let mut ledger = Ledger::new();
        let table = live_table();

        let id = svc
            .quick_invest(&mut ledger, &QuickInvestRequest::new("usd", "2024-06-01", "250"), Some(&table))
            .unwrap();

        let p = &ledger.currency[0];
        assert_eq!(p.id, id);
        assert_eq!(p.asset.name, "Amerikan Doları");
        assert_eq!(p.purchase_unit_price, 32.80);
        assert_eq!(p.current_unit_price, 32.80);
        assert_eq!(p.profit(), 0.0);
        assert_eq!(p.profit_percent(), 0.0);
    }

    #[test]
    fn requires_a_rate_table() {
        let svc = LedgerService::new();
        let mut ledger = Ledger::new();
        let err = svc
            .quick_invest(&mut ledger, &QuickInvestRequest::new("USD", "2024-06-01", "1"), None)
            .unwrap_err();
        assert!(matches!(err, CoreError::ValidationError(_)));
        assert!(ledger.is_empty());
    }

    #[test]
    fn rejects_unusable_quote_and_bad_input() {
        let svc = LedgerService::new();
        let mut ledger = Ledger::new();
        let table = live_table();
        for req in [
            QuickInvestRequest::new("GBP", "2024-06-01", "1"),
            QuickInvestRequest::new("JPY", "2024-06-01", "1"),
            QuickInvestRequest::new("USD", "", "1"),
            QuickInvestRequest::new("USD", "2024-06-01", "0"),
        ] {
            assert!(svc.quick_invest(&mut ledger, &req, Some(&table)).is_err());
        }
        assert!(ledger.is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// LedgerService — Re-pricing & deletion
// ═══════════════════════════════════════════════════════════════════

mod reprice_and_delete {
    use super::*;

    fn seeded() -> Ledger {
        let svc = LedgerService::new();
        let mut ledger = Ledger::new();
        let policy = PricingPolicy::default();
        for (class, code) in [
            (AssetClass::Currency, "USD"),
            (AssetClass::Currency, "USD"),
            (AssetClass::Currency, "EUR"),
            (AssetClass::Metal, "USD"),
        ] {
            svc.add_position(&mut ledger, &request(class, code, "10", "30"), &policy, None)
                .unwrap();
        }
        ledger
    }

    #[test]
    fn reprice_updates_only_matching_class_and_code() {
        let svc = LedgerService::new();
        let mut ledger = seeded();

        let updated = svc.reprice(&mut ledger, AssetClass::Currency, "usd", 33.0).unwrap();
        assert_eq!(updated, 2);

        for p in &ledger.currency {
            if p.asset.code == "USD" {
                assert_eq!(p.current_unit_price, 33.0);
                assert!((p.profit() - 30.0).abs() < 1e-9);
            } else {
                assert_eq!(p.current_unit_price, 30.0);
            }
        }
        assert_eq!(ledger.metal[0].current_unit_price, 30.0 * 1.08);
    }

    #[test]
    fn reprice_is_idempotent() {
        let svc = LedgerService::new();
        let mut once = seeded();
        svc.reprice(&mut once, AssetClass::Currency, "USD", 31.5).unwrap();
        let mut twice = once.clone();
        svc.reprice(&mut twice, AssetClass::Currency, "USD", 31.5).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn reprice_without_match_is_noop() {
        let svc = LedgerService::new();
        let mut ledger = seeded();
        let before = ledger.clone();
        assert_eq!(svc.reprice(&mut ledger, AssetClass::Crypto, "BTC", 5.0).unwrap(), 0);
        assert_eq!(ledger, before);
    }

    #[test]
    fn reprice_rejects_invalid_price() {
        let svc = LedgerService::new();
        let mut ledger = seeded();
        let before = ledger.clone();
        for price in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(svc.reprice(&mut ledger, AssetClass::Currency, "USD", price).is_err());
        }
        assert_eq!(ledger, before);
    }

    #[test]
    fn reprice_from_rates_touches_quoted_currencies() {
        let svc = LedgerService::new();
        let mut ledger = seeded();
        let updated = svc.reprice_from_rates(&mut ledger, &live_table());
        assert_eq!(updated, 3);
        assert!(ledger
            .currency
            .iter()
            .all(|p| p.current_unit_price == if p.asset.code == "USD" { 32.80 } else { 35.30 }));
        // Metal "USD" is not a currency position.
        assert_eq!(ledger.metal[0].current_unit_price, 30.0 * 1.08);
    }

    #[test]
    fn delete_removes_by_id() {
        let svc = LedgerService::new();
        let mut ledger = seeded();
        let id = ledger.currency[1].id;
        let removed = svc.remove_position(&mut ledger, AssetClass::Currency, id).unwrap();
        assert_eq!(removed.id, id);
        assert_eq!(ledger.currency.len(), 2);
        assert!(ledger.find(id).is_none());
    }

    #[test]
    fn delete_unknown_id_is_noop() {
        let svc = LedgerService::new();
        let mut ledger = seeded();
        let before = ledger.clone();
        assert!(svc
            .remove_position(&mut ledger, AssetClass::Currency, uuid::Uuid::new_v4())
            .is_none());
        assert_eq!(ledger, before);
    }

    #[test]
    fn delete_with_wrong_class_is_noop() {
        let svc = LedgerService::new();
        let mut ledger = seeded();
        let before = ledger.clone();
        let metal_id = ledger.metal[0].id;
        assert!(svc.remove_position(&mut ledger, AssetClass::Currency, metal_id).is_none());
        assert_eq!(ledger, before);
    }
}

// ═══════════════════════════════════════════════════════════════════
// PricingPolicy
// ═══════════════════════════════════════════════════════════════════

mod pricing {
    use super::*;

    #[test]
    fn default_policy() {
        let p = PricingPolicy::default();
        assert_eq!(p.source_for(AssetClass::Currency), PriceSource::LiveQuote);
        assert_eq!(p.source_for(AssetClass::Metal), PriceSource::FixedMarkup(1.08));
        assert_eq!(p.source_for(AssetClass::Crypto), PriceSource::FixedMarkup(1.12));
        assert!(p.metal.is_simulated());
        assert!(!p.currency.is_simulated());
    }

    #[test]
    fn policy_follows_settings() {
        let settings = Settings {
            metal_markup: 1.5,
            ..Settings::default()
        };
        let p = PricingPolicy::from_settings(&settings);
        assert_eq!(p.metal, PriceSource::FixedMarkup(1.5));
    }

    #[test]
    fn replacing_a_source() {
        let mut p = PricingPolicy::default();
        p.set_source(AssetClass::Metal, PriceSource::LiveQuote);
        assert_eq!(p.source_for(AssetClass::Metal), PriceSource::LiveQuote);
    }

    #[test]
    fn live_quote_needs_table() {
        assert_eq!(PriceSource::LiveQuote.current_price("USD", 30.0, None), None);
        assert_eq!(
            PriceSource::LiveQuote.current_price("EUR", 30.0, Some(&live_table())),
            Some(35.30)
        );
    }

    #[test]
    fn fixed_markup_ignores_table() {
        assert_eq!(
            PriceSource::FixedMarkup(1.12).current_price("USD", 100.0, Some(&live_table())),
            Some(100.0 * 1.12)
        );
    }

    #[test]
    fn markup_validation() {
        assert!(validate_markup(1.0).is_ok());
        assert!(validate_markup(0.0).is_err());
        assert!(validate_markup(-1.0).is_err());
        assert!(validate_markup(f64::NAN).is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// RateService
// ═══════════════════════════════════════════════════════════════════

mod rate_service {
    use super::*;

    #[tokio::test]
    async fn first_live_provider_wins() {
        let primary = StubProvider::ok("Primary", live_table().rates);
        let secondary = StubProvider::ok("Secondary", vec![]);
        let secondary_calls = secondary.counter();
        let mut svc = RateService::new(registry(vec![primary, secondary]));

        let table = svc.refresh().await;
        assert_eq!(table.source, RateSource::CentralBank);
        assert_eq!(table.rates.len(), 3);
        assert!(table.message.is_none());
        assert_eq!(secondary_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failing_provider_falls_through_to_next() {
        let svc_providers = vec![
            StubProvider::failing("Broken"),
            StubProvider::ok("Backup", live_table().rates),
        ];
        let mut svc = RateService::new(registry(svc_providers));
        let table = svc.refresh().await;
        assert_eq!(table.source, RateSource::CentralBank);
        assert_eq!(table.sell_rate("USD"), Some(32.80));
    }

    #[tokio::test]
    async fn fetch_failure_substitutes_fallback_table() {
        let mut svc = RateService::new(registry(vec![StubProvider::failing("TCMB")]));
        let table = svc.refresh().await;

        assert_eq!(table.source, RateSource::Fallback);
        assert!(table.is_fallback());
        assert_eq!(table.rates.len(), FALLBACK_RATES.len());
        assert!(table.quote("USD").is_some());
        assert!(table.quote("EUR").is_some());
        let msg = table.message.as_deref().unwrap();
        assert!(msg.contains("TCMB"));
        assert!(msg.contains("connection refused"));
    }

    #[tokio::test]
    async fn empty_answer_substitutes_fallback_table() {
        let mut svc = RateService::new(registry(vec![StubProvider::ok("TCMB", vec![])]));
        let table = svc.refresh().await;
        assert_eq!(table.source, RateSource::Fallback);
        assert!(!table.rates.is_empty());
    }

    #[tokio::test]
    async fn no_providers_substitutes_fallback_table() {
        let mut svc = RateService::new(RateProviderRegistry::new());
        let table = svc.refresh().await;
        assert_eq!(table.source, RateSource::Fallback);
        assert_eq!(table.sell_rate("USD"), Some(32.25));
    }

    #[tokio::test]
    async fn static_provider_in_chain_is_tagged_as_sample_data() {
        let mut r = RateProviderRegistry::new();
        r.register(Box::new(FallbackProvider::new()));
        let mut svc = RateService::new(r);

        let table = svc.refresh().await;
        assert_eq!(table.source, RateSource::Fallback);
        assert!(table.is_fallback());
        assert_eq!(table.rates.len(), FALLBACK_RATES.len());
        assert!(table.message.as_deref().unwrap().contains("Fallback"));
    }

    #[tokio::test]
    async fn broken_fallback_provider_still_yields_static_table() {
        let mut svc = RateService::with_fallback(
            RateProviderRegistry::new(),
            Box::new(StubProvider::failing("CustomFallback")),
        );
        let table = svc.refresh().await;
        assert_eq!(table.rates.len(), FALLBACK_RATES.len());
    }

    #[tokio::test]
    async fn latest_is_kept_between_refreshes() {
        let mut svc = RateService::new(registry(vec![StubProvider::ok("P", live_table().rates)]));
        assert!(svc.latest().is_none());
        assert_eq!(svc.sell_rate("USD"), None);

        svc.refresh().await;
        assert_eq!(svc.sell_rate("usd"), Some(32.80));
        assert_eq!(svc.quote("EUR").unwrap().name, "Euro");
        assert_eq!(svc.provider_names(), vec!["P".to_string()]);
    }

    #[tokio::test]
    async fn every_refresh_asks_again() {
        let provider = StubProvider::ok("P", live_table().rates);
        let calls = provider.counter();
        let mut svc = RateService::new(registry(vec![provider]));
        svc.refresh().await;
        svc.refresh().await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}

// ═══════════════════════════════════════════════════════════════════
// AnalyticsService
// ═══════════════════════════════════════════════════════════════════

mod analytics {
    use super::*;

    #[test]
    fn empty_ledger_summary_is_zero() {
        let s = AnalyticsService::new().ledger_summary(&Ledger::new(), "TRY");
        assert_eq!(s.position_count, 0);
        assert_eq!(s.total_invested, 0.0);
        assert_eq!(s.total_value, 0.0);
        assert_eq!(s.profit, 0.0);
        assert_eq!(s.profit_percent, 0.0);
        assert_eq!(s.classes.len(), 3);
    }

    #[test]
    fn folds_per_class_and_overall() {
        let svc = LedgerService::new();
        let mut ledger = Ledger::new();
        let policy = PricingPolicy::default();
        let table = live_table();
        svc.add_position(&mut ledger, &request(AssetClass::Currency, "USD", "100", "32.50"), &policy, Some(&table))
            .unwrap();
        svc.add_position(&mut ledger, &request(AssetClass::Metal, "XAU", "10", "100"), &policy, None)
            .unwrap();
        svc.add_position(&mut ledger, &request(AssetClass::Crypto, "BTC", "2", "50"), &policy, None)
            .unwrap();

        let s = AnalyticsService::new().ledger_summary(&ledger, "TRY");
        assert_eq!(s.home_currency, "TRY");
        assert_eq!(s.position_count, 3);

        let currency = s.class(AssetClass::Currency).unwrap();
        assert!((currency.total_invested - 3250.0).abs() < 1e-9);
        assert!((currency.total_value - 3280.0).abs() < 1e-9);
        assert!((currency.profit - 30.0).abs() < 1e-9);

        let metal = s.class(AssetClass::Metal).unwrap();
        assert!((metal.total_invested - 1000.0).abs() < 1e-9);
        assert!((metal.total_value - 1080.0).abs() < 1e-9);
        assert!((metal.profit_percent - 8.0).abs() < 1e-9);

        let crypto = s.class(AssetClass::Crypto).unwrap();
        assert!((crypto.profit - 12.0).abs() < 1e-9);

        assert!((s.total_invested - 4350.0).abs() < 1e-9);
        assert!((s.total_value - 4472.0).abs() < 1e-9);
        assert!((s.profit - 122.0).abs() < 1e-9);
        assert!((s.profit_percent - 122.0 / 4350.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn class_summary_counts_positions() {
        let svc = LedgerService::new();
        let mut ledger = Ledger::new();
        let policy = PricingPolicy::default();
        for _ in 0..3 {
            svc.add_position(&mut ledger, &request(AssetClass::Metal, "XAG", "1", "10"), &policy, None)
                .unwrap();
        }
        let c = AnalyticsService::new().class_summary(&ledger, AssetClass::Metal);
        assert_eq!(c.position_count, 3);
        assert_eq!(c.asset_class, AssetClass::Metal);
    }
}
