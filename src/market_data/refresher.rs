use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::quote_aggregator::QuoteAggregator;
use crate::constants::REFRESH_INTERVAL_SECS;

/// Background driver that periodically re-runs full quote aggregation for a
/// watched ticker set. Overlapping ticks are tolerated: cache writes are
/// idempotent per ticker and the generation guard rejects stale stragglers.
pub struct RefreshScheduler {
    aggregator: Arc<QuoteAggregator>,
    tickers: watch::Receiver<Vec<String>>,
    period: Duration,
}

impl RefreshScheduler {
    pub fn new(aggregator: Arc<QuoteAggregator>, tickers: watch::Receiver<Vec<String>>) -> Self {
        Self {
            aggregator,
            tickers,
            period: Duration::from_secs(REFRESH_INTERVAL_SECS),
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    /// Spawns the refresh loop. Abort the handle to stop it.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            info!("quote refresh loop started ({}s period)", self.period.as_secs());
            loop {
                interval.tick().await;
                let tickers = self.tickers.borrow().clone();
                if tickers.is_empty() {
                    continue;
                }
                let resolved = self.aggregator.get_quotes(&tickers).await;
                debug!(
                    "refresh cycle resolved {}/{} tickers",
                    resolved.len(),
                    tickers.len()
                );
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::providers::ProviderRegistry;
    use crate::market_data::QuoteCache;
    use crate::utils::SystemClock;

    #[tokio::test]
    async fn empty_watchlist_keeps_looping_without_fetching() {
        let registry = Arc::new(ProviderRegistry::with_chains(
            Vec::new(),
            Vec::new(),
            Vec::new(),
            None,
        ));
        let cache = Arc::new(QuoteCache::new(Arc::new(SystemClock)));
        let aggregator = Arc::new(QuoteAggregator::new(registry, cache.clone()));

        let (_tx, rx) = watch::channel(Vec::new());
        let handle = RefreshScheduler::new(aggregator, rx)
            .with_period(Duration::from_millis(10))
            .spawn();

        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.abort();
        assert!(cache.is_empty());
    }
}
