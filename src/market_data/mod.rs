pub(crate) mod market_data_constants;
pub(crate) mod market_data_errors;
pub(crate) mod market_data_model;
pub(crate) mod providers;
pub(crate) mod quote_aggregator;
pub(crate) mod quote_cache;
pub(crate) mod refresher;
pub(crate) mod relay;

// Re-export the public interface
pub use market_data_constants::*;
pub use market_data_errors::MarketDataError;
pub use market_data_model::{HistoricalBar, HistoryInterval, MarketState, Quote};
pub use quote_aggregator::{calculate_robust_metrics, QuoteAggregator};
pub use quote_cache::QuoteCache;
pub use refresher::RefreshScheduler;
pub use relay::RelayPool;

// Re-export provider types
pub use providers::provider_registry::ProviderRegistry;
pub use providers::quote_provider::{HistoryProvider, QuoteProvider};
