use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{dec_str_field, default_client};
use crate::market_data::market_data_constants::DATA_SOURCE_COINBASE;
use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{MarketState, Quote};
use crate::market_data::providers::quote_provider::QuoteProvider;

const BASE_URL: &str = "https://api.exchange.coinbase.com";

/// Coinbase Exchange 24h product stats. The stats endpoint has no delta
/// fields, so the change is derived from last-vs-open.
pub struct CoinbaseProvider {
    client: Client,
}

impl CoinbaseProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        Ok(Self {
            client: default_client()?,
        })
    }
}

#[async_trait]
impl QuoteProvider for CoinbaseProvider {
    fn source_id(&self) -> &'static str {
        DATA_SOURCE_COINBASE
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let url = format!("{}/products/{}-USD/stats", BASE_URL, symbol);
        let body: Value = self.client.get(&url).send().await?.json().await?;

        let last = dec_str_field(&body, "last");
        let open = dec_str_field(&body, "open");
        if last.is_zero() {
            return Err(MarketDataError::InvalidQuote(format!(
                "zero last price for {}",
                symbol
            )));
        }

        let mut quote = Quote::new(symbol, DATA_SOURCE_COINBASE);
        quote.market_state = MarketState::Regular;
        Ok(quote.with_price_and_reference(last, open))
    }
}
