use async_trait::async_trait;
use rust_decimal::Decimal;

use super::fx_errors::FxError;

/// Source of a single currency-pair rate. Implementations just fetch; the
/// service layers caching and the degradation chain on top.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<Decimal, FxError>;
}
