use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use super::{dec_str_field, default_client};
use crate::market_data::market_data_constants::DATA_SOURCE_KUCOIN;
use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{MarketState, Quote};
use crate::market_data::providers::quote_provider::QuoteProvider;

const BASE_URL: &str = "https://api.kucoin.com/api/v1";

pub struct KucoinProvider {
    client: Client,
}

impl KucoinProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        Ok(Self {
            client: default_client()?,
        })
    }
}

#[async_trait]
impl QuoteProvider for KucoinProvider {
    fn source_id(&self) -> &'static str {
        DATA_SOURCE_KUCOIN
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let url = format!("{}/market/stats?symbol={}-USDT", BASE_URL, symbol);
        let body: Value = self.client.get(&url).send().await?.json().await?;

        let data = body
            .get("data")
            .ok_or_else(|| MarketDataError::NotFound(symbol.to_string()))?;

        let price = dec_str_field(data, "last");
        let change = dec_str_field(data, "changePrice");
        // changeRate is a fraction, not a percentage
        let change_percent = dec_str_field(data, "changeRate") * Decimal::ONE_HUNDRED;
        if price.is_zero() {
            return Err(MarketDataError::InvalidQuote(format!(
                "zero last price for {}",
                symbol
            )));
        }

        Ok(Quote {
            symbol: symbol.to_string(),
            price,
            change,
            change_percent,
            previous_close: price - change,
            market_state: MarketState::Regular,
            source: DATA_SOURCE_KUCOIN.to_string(),
            fetched_at: Utc::now(),
        })
    }
}
