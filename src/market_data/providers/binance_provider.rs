use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::Value;

use super::{dec_str_field, default_client};
use crate::market_data::market_data_constants::DATA_SOURCE_BINANCE;
use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{MarketState, Quote};
use crate::market_data::providers::quote_provider::QuoteProvider;

const BASE_URL: &str = "https://api.binance.com/api/v3";

pub struct BinanceProvider {
    client: Client,
}

impl BinanceProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        Ok(Self {
            client: default_client()?,
        })
    }
}

#[async_trait]
impl QuoteProvider for BinanceProvider {
    fn source_id(&self) -> &'static str {
        DATA_SOURCE_BINANCE
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let url = format!("{}/ticker/24hr?symbol={}USDT", BASE_URL, symbol);
        let body: Value = self.client.get(&url).send().await?.json().await?;

        let price = dec_str_field(&body, "lastPrice");
        if price.is_zero() {
            return Err(MarketDataError::InvalidQuote(format!(
                "zero last price for {}",
                symbol
            )));
        }

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            change: dec_str_field(&body, "priceChange"),
            change_percent: dec_str_field(&body, "priceChangePercent"),
            previous_close: price - dec_str_field(&body, "priceChange"),
            market_state: MarketState::Regular,
            source: DATA_SOURCE_BINANCE.to_string(),
            fetched_at: Utc::now(),
        })
    }
}
