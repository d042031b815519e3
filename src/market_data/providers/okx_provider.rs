use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{dec_str_field, default_client};
use crate::market_data::market_data_constants::DATA_SOURCE_OKX;
use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{MarketState, Quote};
use crate::market_data::providers::quote_provider::QuoteProvider;

const BASE_URL: &str = "https://www.okx.com/api/v5";

pub struct OkxProvider {
    client: Client,
}

impl OkxProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        Ok(Self {
            client: default_client()?,
        })
    }
}

#[async_trait]
impl QuoteProvider for OkxProvider {
    fn source_id(&self) -> &'static str {
        DATA_SOURCE_OKX
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let url = format!("{}/market/ticker?instId={}-USDT", BASE_URL, symbol);
        let body: Value = self.client.get(&url).send().await?.json().await?;

        let ticker = body
            .get("data")
            .and_then(|d| d.get(0))
            .ok_or_else(|| MarketDataError::NotFound(symbol.to_string()))?;

        let last = dec_str_field(ticker, "last");
        let open = dec_str_field(ticker, "open24h");
        if last.is_zero() {
            return Err(MarketDataError::InvalidQuote(format!(
                "zero last price for {}",
                symbol
            )));
        }

        let mut quote = Quote::new(symbol, DATA_SOURCE_OKX);
        quote.market_state = MarketState::Regular;
        Ok(quote.with_price_and_reference(last, open))
    }
}
