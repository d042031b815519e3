use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trading session state as reported by the source, when it reports one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketState {
    Regular,
    Pre,
    Post,
    Closed,
    Unknown,
}

impl Default for MarketState {
    fn default() -> Self {
        MarketState::Unknown
    }
}

impl From<&str> for MarketState {
    fn from(s: &str) -> Self {
        match s.to_uppercase().as_str() {
            "REGULAR" => MarketState::Regular,
            "PRE" | "PREPRE" => MarketState::Pre,
            "POST" | "POSTPOST" => MarketState::Post,
            "CLOSED" => MarketState::Closed,
            _ => MarketState::Unknown,
        }
    }
}

/// Point-in-time market snapshot in the source's native currency.
/// Replaced wholesale on every refresh, never partially updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub previous_close: Decimal,
    pub market_state: MarketState,
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

impl Quote {
    pub fn new(symbol: impl Into<String>, source: &str) -> Self {
        Quote {
            symbol: symbol.into(),
            price: Decimal::ZERO,
            change: Decimal::ZERO,
            change_percent: Decimal::ZERO,
            previous_close: Decimal::ZERO,
            market_state: MarketState::Unknown,
            source: source.to_string(),
            fetched_at: Utc::now(),
        }
    }

    /// Fills `change`/`change_percent` from a last-vs-reference pair, the
    /// shape most exchange tickers expose.
    pub fn with_price_and_reference(mut self, price: Decimal, reference: Decimal) -> Self {
        self.price = price;
        self.previous_close = reference;
        if reference > Decimal::ZERO {
            self.change = price - reference;
            self.change_percent = self.change / reference * Decimal::ONE_HUNDRED;
        }
        self
    }
}

/// One close-price sample of an asset's historical series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalBar {
    pub timestamp: DateTime<Utc>,
    pub close: Decimal,
}

/// Bar granularity accepted by the chart/history endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryInterval {
    FiveMinutes,
    FifteenMinutes,
    OneHour,
    OneDay,
}

impl HistoryInterval {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryInterval::FiveMinutes => "5m",
            HistoryInterval::FifteenMinutes => "15m",
            HistoryInterval::OneHour => "60m",
            HistoryInterval::OneDay => "1d",
        }
    }
}
