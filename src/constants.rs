use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Reporting currency for all aggregate figures
pub const BASE_CURRENCY: &str = "USD";

/// Hardcoded USD/BRL rate used when the FX source is unreachable
pub const DEFAULT_USD_BRL_RATE: Decimal = dec!(5.25);

/// Free-tier accounts track the first N distinct tickers by purchase order
pub const FREE_TIER_HOLDINGS_LIMIT: usize = 6;

/// Background quote refresh period
pub const REFRESH_INTERVAL_SECS: u64 = 30;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;
