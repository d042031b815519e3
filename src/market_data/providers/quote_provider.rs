use std::time::SystemTime;

use async_trait::async_trait;

use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::market_data_model::{HistoricalBar, HistoryInterval, Quote};

/// Adapter to one external price feed. Implementations translate the
/// vendor's response shape into the common `Quote`, computing the change
/// fields from whatever that source exposes. Any network or parse fault is
/// a typed error; the aggregator decides what failure means.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn source_id(&self) -> &'static str;

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError>;
}

/// Source of historical close-price series, consumed by the net-worth
/// chart reconstruction.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn fetch_history(
        &self,
        symbol: &str,
        start: SystemTime,
        end: SystemTime,
        interval: HistoryInterval,
    ) -> Result<Vec<HistoricalBar>, MarketDataError>;
}
