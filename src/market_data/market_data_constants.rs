use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Data source identifiers
pub const DATA_SOURCE_BINANCE: &str = "BINANCE";
pub const DATA_SOURCE_COINBASE: &str = "COINBASE";
pub const DATA_SOURCE_KRAKEN: &str = "KRAKEN";
pub const DATA_SOURCE_OKX: &str = "OKX";
pub const DATA_SOURCE_BITFINEX: &str = "BITFINEX";
pub const DATA_SOURCE_KUCOIN: &str = "KUCOIN";
pub const DATA_SOURCE_CRYPTOCOMPARE: &str = "CRYPTOCOMPARE";
pub const DATA_SOURCE_COINGECKO: &str = "COINGECKO";
pub const DATA_SOURCE_BRAPI: &str = "BRAPI";
pub const DATA_SOURCE_YAHOO: &str = "YAHOO";

/// Cached quotes younger than this are served without refetching
pub const QUOTE_CACHE_TTL_SECS: i64 = 10;

/// Per-provider HTTP timeout
pub const PROVIDER_TIMEOUT_MS: u64 = 2500;

/// Timeout for a full relay rotation attempt
pub const RELAY_TIMEOUT_MS: u64 = 4000;

/// A reported change-percent at or below this magnitude is treated as
/// "no change data" by the acceptance and reconciliation rules
pub const CHANGE_EPSILON: Decimal = dec!(0.00001);
