use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use num_traits::FromPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use yahoo_finance_api as yahoo;

use crate::market_data::market_data_constants::DATA_SOURCE_YAHOO;
use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{HistoricalBar, HistoryInterval, MarketState, Quote};
use crate::market_data::providers::quote_provider::{HistoryProvider, QuoteProvider};
use crate::market_data::relay::RelayPool;

const CHART_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// General global source. Live quotes come from the chart meta endpoint
/// through the relay rotation (the feed rejects direct fetches from some
/// runtimes); history goes through the yahoo_finance_api connector. This
/// provider also serves as the daily-granularity secondary fallback for
/// every asset kind.
pub struct YahooProvider {
    relay: RelayPool,
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    pub fn new() -> Result<Self, MarketDataError> {
        Ok(Self {
            relay: RelayPool::new()?,
            connector: yahoo::YahooConnector::new()?,
        })
    }

    fn parse_chart_meta(symbol: &str, body: &str) -> Result<Quote, MarketDataError> {
        let parsed: Value = serde_json::from_str(body)?;
        let meta = parsed
            .pointer("/chart/result/0/meta")
            .ok_or_else(|| MarketDataError::NotFound(symbol.to_string()))?;

        let price = meta
            .get("regularMarketPrice")
            .and_then(Value::as_f64)
            .and_then(Decimal::from_f64)
            .unwrap_or_default();
        let previous_close = meta
            .get("previousClose")
            .or_else(|| meta.get("chartPreviousClose"))
            .and_then(Value::as_f64)
            .and_then(Decimal::from_f64)
            .unwrap_or_default();

        if price.is_zero() {
            return Err(MarketDataError::InvalidQuote(format!(
                "zero market price for {}",
                symbol
            )));
        }

        let market_state = meta
            .get("marketState")
            .and_then(Value::as_str)
            .map(MarketState::from)
            .unwrap_or_default();

        let mut quote = Quote::new(symbol, DATA_SOURCE_YAHOO);
        quote.market_state = market_state;
        Ok(quote.with_price_and_reference(price, previous_close))
    }
}

#[async_trait]
impl QuoteProvider for YahooProvider {
    fn source_id(&self) -> &'static str {
        DATA_SOURCE_YAHOO
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let url = format!("{}/{}?interval=1d&range=1d", CHART_BASE_URL, symbol);
        let body = self.relay.get_text(&url).await?;
        Self::parse_chart_meta(symbol, &body)
    }
}

#[async_trait]
impl HistoryProvider for YahooProvider {
    async fn fetch_history(
        &self,
        symbol: &str,
        start: SystemTime,
        end: SystemTime,
        interval: HistoryInterval,
    ) -> Result<Vec<HistoricalBar>, MarketDataError> {
        let response = self
            .connector
            .get_quote_history_interval(symbol, start.into(), end.into(), interval.as_str())
            .await?;

        let bars = response
            .quotes()?
            .into_iter()
            .filter_map(|q| {
                let timestamp = DateTime::<Utc>::from_timestamp(q.timestamp as i64, 0)?;
                let close = Decimal::from_f64(q.close)?;
                if close.is_zero() {
                    return None;
                }
                Some(HistoricalBar { timestamp, close })
            })
            .collect();

        Ok(bars)
    }
}
