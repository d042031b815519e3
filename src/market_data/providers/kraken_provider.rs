use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use super::default_client;
use crate::market_data::market_data_constants::DATA_SOURCE_KRAKEN;
use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{MarketState, Quote};
use crate::market_data::providers::quote_provider::QuoteProvider;

const BASE_URL: &str = "https://api.kraken.com/0/public";

/// Kraken public ticker. The result map is keyed by Kraken's own pair
/// aliases (e.g. `XXBTZUSD` for `BTCUSD`), so the first entry is taken
/// rather than looking the pair name back up.
pub struct KrakenProvider {
    client: Client,
}

impl KrakenProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        Ok(Self {
            client: default_client()?,
        })
    }
}

fn first_in_array(pair: &Value, field: &str) -> Decimal {
    pair.get(field)
        .and_then(|v| v.get(0))
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Decimal>().ok())
        .unwrap_or_default()
}

#[async_trait]
impl QuoteProvider for KrakenProvider {
    fn source_id(&self) -> &'static str {
        DATA_SOURCE_KRAKEN
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let url = format!("{}/Ticker?pair={}USD", BASE_URL, symbol);
        let body: Value = self.client.get(&url).send().await?.json().await?;

        if let Some(errors) = body.get("error").and_then(Value::as_array) {
            if !errors.is_empty() {
                return Err(MarketDataError::ProviderError(errors[0].to_string()));
            }
        }

        let pair = body
            .get("result")
            .and_then(Value::as_object)
            .and_then(|result| result.values().next())
            .ok_or_else(|| MarketDataError::ParsingError("empty result map".to_string()))?;

        let last = first_in_array(pair, "c");
        let open = pair
            .get("o")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<Decimal>().ok())
            .unwrap_or_default();
        if last.is_zero() {
            return Err(MarketDataError::InvalidQuote(format!(
                "zero last price for {}",
                symbol
            )));
        }

        let mut quote = Quote::new(symbol, DATA_SOURCE_KRAKEN);
        quote.market_state = MarketState::Regular;
        Ok(quote.with_price_and_reference(last, open))
    }
}
