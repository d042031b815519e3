pub(crate) mod binance_provider;
pub(crate) mod bitfinex_provider;
pub(crate) mod brapi_provider;
pub(crate) mod coinbase_provider;
pub(crate) mod coingecko_provider;
pub(crate) mod cryptocompare_provider;
pub(crate) mod kraken_provider;
pub(crate) mod kucoin_provider;
pub(crate) mod okx_provider;
pub(crate) mod provider_registry;
pub(crate) mod quote_provider;
pub(crate) mod yahoo_provider;

pub use provider_registry::ProviderRegistry;
pub use quote_provider::{HistoryProvider, QuoteProvider};

use std::time::Duration;

use num_traits::FromPrimitive;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use super::market_data_constants::PROVIDER_TIMEOUT_MS;
use super::market_data_errors::MarketDataError;

/// HTTP client shared by the hand-rolled vendor adapters, with the
/// per-provider timeout baked in.
pub(crate) fn default_client() -> Result<Client, MarketDataError> {
    let client = Client::builder()
        .timeout(Duration::from_millis(PROVIDER_TIMEOUT_MS))
        .build()?;
    Ok(client)
}

/// Decimal from a JSON number field, zero when absent or non-numeric.
pub(crate) fn dec_field(value: &Value, field: &str) -> Decimal {
    value
        .get(field)
        .and_then(Value::as_f64)
        .and_then(Decimal::from_f64)
        .unwrap_or_default()
}

/// Decimal from a JSON string field (several exchanges quote prices as
/// strings), zero when absent or unparsable.
pub(crate) fn dec_str_field(value: &Value, field: &str) -> Decimal {
    value
        .get(field)
        .and_then(Value::as_str)
        .and_then(|s| s.parse::<Decimal>().ok())
        .unwrap_or_default()
}
