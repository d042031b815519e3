use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{dec_field, default_client};
use crate::market_data::market_data_constants::DATA_SOURCE_COINGECKO;
use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{MarketState, Quote};
use crate::market_data::providers::quote_provider::QuoteProvider;
use crate::symbols::coingecko_id;

const BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko only reports a 24h percent change, so the absolute change and
/// previous close are back-solved from the percentage.
pub struct CoinGeckoProvider {
    client: Client,
}

impl CoinGeckoProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        Ok(Self {
            client: default_client()?,
        })
    }
}

#[async_trait]
impl QuoteProvider for CoinGeckoProvider {
    fn source_id(&self) -> &'static str {
        DATA_SOURCE_COINGECKO
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let id = coingecko_id(symbol)
            .ok_or_else(|| MarketDataError::Unsupported(symbol.to_string()))?;

        let url = format!(
            "{}/simple/price?ids={}&vs_currencies=usd&include_24hr_change=true",
            BASE_URL, id
        );
        let body: Value = self.client.get(&url).send().await?.json().await?;

        let entry = body
            .get(id)
            .ok_or_else(|| MarketDataError::NotFound(symbol.to_string()))?;

        let price = dec_field(entry, "usd");
        let change_percent = dec_field(entry, "usd_24h_change");
        if price.is_zero() {
            return Err(MarketDataError::InvalidQuote(format!(
                "zero price for {}",
                symbol
            )));
        }

        let denominator = Decimal::ONE + change_percent / Decimal::ONE_HUNDRED;
        let previous_close = if denominator.is_zero() {
            Decimal::ZERO
        } else {
            price / denominator
        };

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            change: price - previous_close,
            change_percent,
            previous_close,
            market_state: MarketState::Regular,
            source: DATA_SOURCE_COINGECKO.to_string(),
            fetched_at: Utc::now(),
        })
    }
}
