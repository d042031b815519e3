use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

use super::{dec_field, default_client};
use crate::market_data::market_data_constants::DATA_SOURCE_CRYPTOCOMPARE;
use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{MarketState, Quote};
use crate::market_data::providers::quote_provider::QuoteProvider;

const BASE_URL: &str = "https://min-api.cryptocompare.com/data";

pub struct CryptoCompareProvider {
    client: Client,
}

impl CryptoCompareProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        Ok(Self {
            client: default_client()?,
        })
    }
}

#[async_trait]
impl QuoteProvider for CryptoCompareProvider {
    fn source_id(&self) -> &'static str {
        DATA_SOURCE_CRYPTOCOMPARE
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let url = format!("{}/pricemultifull?fsyms={}&tsyms=USD", BASE_URL, symbol);
        let body: Value = self.client.get(&url).send().await?.json().await?;

        let raw = body
            .pointer(&format!("/RAW/{}/USD", symbol))
            .ok_or_else(|| MarketDataError::NotFound(symbol.to_string()))?;

        let price = dec_field(raw, "PRICE");
        if price.is_zero() {
            return Err(MarketDataError::InvalidQuote(format!(
                "zero price for {}",
                symbol
            )));
        }

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            change: dec_field(raw, "CHANGE24HOUR"),
            change_percent: dec_field(raw, "CHANGEPCT24HOUR"),
            previous_close: dec_field(raw, "OPEN24HOUR"),
            market_state: MarketState::Regular,
            source: DATA_SOURCE_CRYPTOCOMPARE.to_string(),
            fetched_at: Utc::now(),
        })
    }
}
