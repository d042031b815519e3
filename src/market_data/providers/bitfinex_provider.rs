use async_trait::async_trait;
use chrono::Utc;
use num_traits::FromPrimitive;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use super::default_client;
use crate::market_data::market_data_constants::DATA_SOURCE_BITFINEX;
use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{MarketState, Quote};
use crate::market_data::providers::quote_provider::QuoteProvider;

const BASE_URL: &str = "https://api-pub.bitfinex.com/v2";

// Positional ticker array: [BID, BID_SIZE, ASK, ASK_SIZE, DAILY_CHANGE,
// DAILY_CHANGE_RELATIVE, LAST_PRICE, VOLUME, HIGH, LOW]
const IDX_DAILY_CHANGE: usize = 4;
const IDX_DAILY_CHANGE_RELATIVE: usize = 5;
const IDX_LAST_PRICE: usize = 6;

pub struct BitfinexProvider {
    client: Client,
}

impl BitfinexProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        Ok(Self {
            client: default_client()?,
        })
    }
}

fn dec_at(ticker: &Value, index: usize) -> Decimal {
    ticker
        .get(index)
        .and_then(Value::as_f64)
        .and_then(Decimal::from_f64)
        .unwrap_or_default()
}

#[async_trait]
impl QuoteProvider for BitfinexProvider {
    fn source_id(&self) -> &'static str {
        DATA_SOURCE_BITFINEX
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let url = format!("{}/ticker/t{}USD", BASE_URL, symbol);
        let ticker: Value = self.client.get(&url).send().await?.json().await?;

        if !ticker.is_array() {
            return Err(MarketDataError::ParsingError(format!(
                "unexpected ticker shape for {}",
                symbol
            )));
        }

        let price = dec_at(&ticker, IDX_LAST_PRICE);
        let change = dec_at(&ticker, IDX_DAILY_CHANGE);
        // relative change is a fraction, not a percentage
        let change_percent = dec_at(&ticker, IDX_DAILY_CHANGE_RELATIVE) * Decimal::ONE_HUNDRED;
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
            source: DATA_SOURCE_BITFINEX.to_string(),
            fetched_at: Utc::now(),
        })
    }
}
