use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::Client;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::asset::{currency_flag, currency_name};
use crate::models::rate::ExchangeRate;
use crate::models::settings::DEFAULT_RATE_FEED_URL;
use super::traits::RateProvider;

const PROVIDER_NAME: &str = "TCMB";

/// Central Bank of the Republic of Türkiye daily rate sheet.
///
/// - **Free**: no API key, one XML document per business day.
/// - **Format**: one `<Currency CurrencyCode="USD">` element per currency with
///   `<Unit>`, `<Isim>`, `<ForexBuying>` and `<ForexSelling>` children.
/// - **Coverage**: only currencies in the built-in catalog are kept.
///
/// Quotes are in TRY. Some currencies are quoted per 100 units (`<Unit>100</Unit>`);
/// those are normalised to a per-unit price.
pub struct TcmbProvider {
    client: Client,
    url: String,
}

impl TcmbProvider {
    pub fn new() -> Self {
        Self::with_url(DEFAULT_RATE_FEED_URL)
    }

    pub fn with_url(url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for TcmbProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl RateProvider for TcmbProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn fetch_rates(&self) -> Result<Vec<ExchangeRate>, CoreError> {
        let resp = self.client.get(&self.url).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("Rate sheet request failed with status {status}"),
            });
        }

        let xml = resp.text().await?;
        parse_rate_sheet(&xml, Utc::now())
    }
}

// ── Rate sheet parsing ──────────────────────────────────────────────

/// Extract catalog currencies from a TCMB rate sheet.
///
/// Elements missing a code, name, buying or selling tag are skipped.
/// Empty or unparsable rates become `0.0`; such quotes are kept for display
/// but are never used as a live price.
pub fn parse_rate_sheet(xml: &str, fetched_at: DateTime<Utc>) -> Result<Vec<ExchangeRate>, CoreError> {
    let block_re = Regex::new(r"(?s)<Currency\b[^>]*>.*?</Currency>")?;
    let code_re = Regex::new(r#"CurrencyCode="([^"]+)""#)?;
    let name_re = Regex::new(r"<Isim>([^<]+)</Isim>")?;
    let unit_re = Regex::new(r"<Unit>([^<]*)</Unit>")?;
    let buy_re = Regex::new(r"<ForexBuying>([^<]*)</ForexBuying>")?;
    let sell_re = Regex::new(r"<ForexSelling>([^<]*)</ForexSelling>")?;

    let capture = |re: &Regex, block: &str| -> Option<String> {
        re.captures(block)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim().to_string())
    };

    let mut rates = Vec::new();

    for block in block_re.find_iter(xml).map(|m| m.as_str()) {
        let (Some(code), Some(_isim), Some(buy), Some(sell)) = (
            capture(&code_re, block),
            capture(&name_re, block),
            capture(&buy_re, block),
            capture(&sell_re, block),
        ) else {
            continue;
        };

        let code = code.to_uppercase();
        let Some(name) = currency_name(&code) else {
            continue;
        };

        let unit = capture(&unit_re, block)
            .and_then(|u| u.parse::<f64>().ok())
            .filter(|u| u.is_finite() && *u > 0.0)
            .unwrap_or(1.0);

        let mut rate = ExchangeRate::new(
            code.as_str(),
            name,
            parse_rate(&buy) / unit,
            parse_rate(&sell) / unit,
            currency_flag(&code),
        );
        rate.last_update = Some(fetched_at);
        rates.push(rate);
    }

    Ok(rates)
}

fn parse_rate(text: &str) -> f64 {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
