use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;

use super::default_client;
use crate::market_data::market_data_constants::DATA_SOURCE_BRAPI;
use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{MarketState, Quote};
use crate::market_data::providers::quote_provider::QuoteProvider;
use rust_decimal::Decimal;

const BASE_URL: &str = "https://brapi.dev/api";

#[derive(Debug, Deserialize)]
struct BrapiResponse {
    results: Option<Vec<BrapiQuote>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BrapiQuote {
    #[serde(default)]
    regular_market_price: Option<f64>,
    #[serde(default)]
    regular_market_change: Option<f64>,
    #[serde(default)]
    regular_market_change_percent: Option<f64>,
    #[serde(default)]
    regular_market_previous_close: Option<f64>,
    #[serde(default)]
    pub long_name: Option<String>,
    #[serde(default)]
    pub logourl: Option<String>,
}

/// brapi.dev quote endpoint for B3 listings. The API takes the bare listing
/// code, so the `.SA` suffix is stripped before the call.
pub struct BrapiProvider {
    client: Client,
}

impl BrapiProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        Ok(Self {
            client: default_client()?,
        })
    }

    pub(crate) async fn fetch_raw(&self, symbol: &str) -> Result<BrapiQuote, MarketDataError> {
        let listing = symbol.trim_end_matches(".SA");
        let url = format!("{}/quote/{}", BASE_URL, listing);
        let body: BrapiResponse = self.client.get(&url).send().await?.json().await?;

        body.results
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| MarketDataError::NotFound(symbol.to_string()))
    }
}

fn dec(value: Option<f64>) -> Decimal {
    use num_traits::FromPrimitive;
    value.and_then(Decimal::from_f64).unwrap_or_default()
}

#[async_trait]
impl QuoteProvider for BrapiProvider {
    fn source_id(&self) -> &'static str {
        DATA_SOURCE_BRAPI
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let raw = self.fetch_raw(symbol).await?;

        let price = dec(raw.regular_market_price);
        if price.is_zero() {
            return Err(MarketDataError::InvalidQuote(format!(
                "zero market price for {}",
                symbol
            )));
        }

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            change: dec(raw.regular_market_change),
            change_percent: dec(raw.regular_market_change_percent),
            previous_close: dec(raw.regular_market_previous_close),
            market_state: MarketState::Unknown,
            source: DATA_SOURCE_BRAPI.to_string(),
            fetched_at: Utc::now(),
        })
    }
}
