use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Duration;
use futures::future::join_all;
use log::debug;
use rust_decimal::Decimal;

use super::market_data_constants::{CHANGE_EPSILON, QUOTE_CACHE_TTL_SECS};
use super::market_data_model::Quote;
use super::providers::provider_registry::ProviderRegistry;
use super::quote_cache::QuoteCache;
use crate::symbols::{normalize, yahoo_symbol, AssetKind};

/// Reconciles a provider's self-reported delta against its own price fields.
///
/// Several feeds return a present but zero change alongside price and
/// previous-close values that imply a real move; when that happens the delta
/// is recomputed from the prices. A non-zero reported delta is trusted as-is
/// even when it disagrees with the price fields.
pub fn calculate_robust_metrics(mut quote: Quote) -> Quote {
    let reported_flat =
        quote.change.abs() <= CHANGE_EPSILON && quote.change_percent.abs() <= CHANGE_EPSILON;
    if reported_flat && quote.previous_close > Decimal::ZERO && quote.price != quote.previous_close
    {
        quote.change = quote.price - quote.previous_close;
        quote.change_percent = quote.change / quote.previous_close * Decimal::ONE_HUNDRED;
    }
    quote
}

/// Multi-source quote aggregation: short-TTL cache, per-asset-kind provider
/// chains, non-zero-change acceptance, and a daily-chart secondary fallback.
///
/// Failure is always expressed as an absent key in the result map; this type
/// has no error surface toward its callers.
pub struct QuoteAggregator {
    registry: Arc<ProviderRegistry>,
    cache: Arc<QuoteCache>,
    generation: AtomicU64,
}

impl QuoteAggregator {
    pub fn new(registry: Arc<ProviderRegistry>, cache: Arc<QuoteCache>) -> Self {
        Self {
            registry,
            cache,
            generation: AtomicU64::new(0),
        }
    }

    pub async fn get_quotes(&self, tickers: &[String]) -> HashMap<String, Quote> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let ttl = Duration::seconds(QUOTE_CACHE_TTL_SECS);

        let mut resolved = HashMap::new();
        let mut to_fetch = Vec::new();
        for ticker in tickers {
            match self.cache.get_fresh(ticker, ttl) {
                Some(quote) => {
                    resolved.insert(ticker.clone(), quote);
                }
                None => to_fetch.push(ticker.clone()),
            }
        }

        // concurrent across tickers, sequential within each ticker's chain
        let fetches = to_fetch.into_iter().map(|ticker| async move {
            let quote = self.resolve_quote(&ticker).await;
            (ticker, quote)
        });
        for (ticker, quote) in join_all(fetches).await {
            if let Some(quote) = quote {
                self.cache.store(&ticker, quote.clone(), generation);
                resolved.insert(ticker, quote);
            }
        }

        resolved
    }

    /// Walks the ticker's provider chain and applies the acceptance policy:
    /// the first quote showing a non-negligible change wins, because a flat
    /// reading is more often a stale feed than a flat market. A chain that
    /// is flat throughout degrades to its first usable result.
    async fn resolve_quote(&self, raw_ticker: &str) -> Option<Quote> {
        let normalized = normalize(raw_ticker);
        let chain = self.registry.chain_for(normalized.kind);

        let mut first_usable: Option<Quote> = None;
        let mut selected: Option<Quote> = None;

        for provider in chain {
            match provider.fetch_quote(&normalized.symbol).await {
                Ok(quote) => {
                    let quote = calculate_robust_metrics(quote);
                    if quote.price <= Decimal::ZERO {
                        continue;
                    }
                    if quote.change_percent.abs() > CHANGE_EPSILON {
                        selected = Some(quote);
                        break;
                    }
                    if first_usable.is_none() {
                        first_usable = Some(quote);
                    }
                }
                Err(e) => {
                    debug!(
                        "provider {} failed for {}: {}",
                        provider.source_id(),
                        normalized.symbol,
                        e
                    );
                }
            }
        }

        let mut quote = selected.or(first_usable);

        let needs_fallback = match &quote {
            None => true,
            Some(q) => {
                q.price <= Decimal::ZERO
                    || (normalized.kind != AssetKind::Crypto && q.change.is_zero())
            }
        };
        if needs_fallback {
            if let Some(fallback) = self.registry.fallback() {
                match fallback.fetch_quote(&yahoo_symbol(&normalized)).await {
                    Ok(fallback_quote) => {
                        let fallback_quote = calculate_robust_metrics(fallback_quote);
                        if fallback_quote.price > Decimal::ZERO {
                            quote = Some(Quote {
                                symbol: normalized.symbol.clone(),
                                ..fallback_quote
                            });
                        }
                    }
                    Err(e) => debug!(
                        "chart fallback failed for {}: {}",
                        normalized.symbol, e
                    ),
                }
            }
        }

        quote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::market_data_errors::MarketDataError;
    use crate::market_data::providers::quote_provider::QuoteProvider;
    use crate::utils::clock::test_support::ManualClock;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::sync::atomic::AtomicUsize;

    struct StubProvider {
        id: &'static str,
        quote: Option<Quote>,
        calls: AtomicUsize,
    }

    impl StubProvider {
        fn ok(id: &'static str, price: Decimal, previous_close: Decimal) -> Arc<Self> {
            let quote = Quote::new("X", id).with_price_and_reference(price, previous_close);
            Arc::new(Self {
                id,
                quote: Some(quote),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(id: &'static str) -> Arc<Self> {
            Arc::new(Self {
                id,
                quote: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuoteProvider for StubProvider {
        fn source_id(&self) -> &'static str {
            self.id
        }

        async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.quote {
                Some(quote) => Ok(Quote {
                    symbol: symbol.to_string(),
                    ..quote.clone()
                }),
                None => Err(MarketDataError::Timeout(2500)),
            }
        }
    }

    fn aggregator_with(
        crypto: Vec<Arc<dyn QuoteProvider>>,
        global: Vec<Arc<dyn QuoteProvider>>,
        fallback: Option<Arc<dyn QuoteProvider>>,
    ) -> QuoteAggregator {
        let registry = Arc::new(ProviderRegistry::with_chains(
            crypto,
            Vec::new(),
            global,
            fallback,
        ));
        let clock = Arc::new(ManualClock::new(Utc::now()));
        QuoteAggregator::new(registry, Arc::new(QuoteCache::new(clock)))
    }

    #[test]
    fn zero_reported_delta_is_overridden_by_price_math() {
        let quote = Quote {
            price: dec!(110),
            previous_close: dec!(100),
            change: Decimal::ZERO,
            change_percent: Decimal::ZERO,
            ..Quote::new("X", "TEST")
        };
        let reconciled = calculate_robust_metrics(quote);
        assert_eq!(reconciled.change, dec!(10));
        assert_eq!(reconciled.change_percent, dec!(10));
    }

    #[test]
    fn non_zero_reported_delta_is_trusted() {
        let quote = Quote {
            price: dec!(110),
            previous_close: dec!(100),
            change: dec!(12),
            change_percent: dec!(12),
            ..Quote::new("X", "TEST")
        };
        let reconciled = calculate_robust_metrics(quote);
        assert_eq!(reconciled.change, dec!(12));
        assert_eq!(reconciled.change_percent, dec!(12));
    }

    #[tokio::test]
    async fn accepts_first_provider_with_real_change() {
        // a flat reading from the top of the chain loses to a moving one
        let flat = StubProvider::ok("FLAT", dec!(100), dec!(100));
        let moving = StubProvider::ok("MOVING", dec!(64000), dec!(63000));
        let aggregator = aggregator_with(
            vec![flat.clone(), moving.clone()],
            Vec::new(),
            None,
        );

        let quotes = aggregator.get_quotes(&["BTC".to_string()]).await;
        assert_eq!(quotes["BTC"].source, "MOVING");
        assert_eq!(flat.call_count(), 1);
        assert_eq!(moving.call_count(), 1);
    }

    #[tokio::test]
    async fn chain_short_circuits_after_acceptance() {
        let moving = StubProvider::ok("MOVING", dec!(64000), dec!(63000));
        let unreached = StubProvider::ok("UNREACHED", dec!(1), dec!(2));
        let aggregator = aggregator_with(
            vec![moving.clone(), unreached.clone()],
            Vec::new(),
            None,
        );

        aggregator.get_quotes(&["BTC".to_string()]).await;
        assert_eq!(moving.call_count(), 1);
        assert_eq!(unreached.call_count(), 0);
    }

    #[tokio::test]
    async fn all_flat_chain_degrades_to_first_usable_result() {
        let flat_a = StubProvider::ok("FLAT_A", dec!(200), dec!(200));
        let flat_b = StubProvider::ok("FLAT_B", dec!(201), dec!(201));
        let aggregator = aggregator_with(
            vec![flat_a.clone(), flat_b.clone()],
            Vec::new(),
            None,
        );

        let quotes = aggregator.get_quotes(&["BTC".to_string()]).await;
        assert_eq!(quotes["BTC"].source, "FLAT_A");
        assert_eq!(quotes["BTC"].price, dec!(200));
    }

    #[tokio::test]
    async fn garbage_ticker_is_absent_not_an_error() {
        let failing = StubProvider::failing("DOWN");
        let aggregator = aggregator_with(Vec::new(), vec![failing], None);

        let quotes = aggregator.get_quotes(&["??GARBAGE??".to_string()]).await;
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn zero_change_non_crypto_triggers_chart_fallback() {
        let flat = StubProvider::ok("FLAT", dec!(150), dec!(150));
        let chart = StubProvider::ok("CHART", dec!(151), dec!(149));
        let aggregator = aggregator_with(Vec::new(), vec![flat], Some(chart.clone()));

        let quotes = aggregator.get_quotes(&["AAPL".to_string()]).await;
        assert_eq!(quotes["AAPL"].source, "CHART");
        assert_eq!(chart.call_count(), 1);
    }

    #[tokio::test]
    async fn failed_chart_fallback_keeps_the_flat_primary_quote() {
        // best effort: a dead fallback must not drop the quote we have
        let flat = StubProvider::ok("FLAT", dec!(150), dec!(150));
        let dead_chart = StubProvider::failing("CHART");
        let aggregator = aggregator_with(Vec::new(), vec![flat], Some(dead_chart.clone()));

        let quotes = aggregator.get_quotes(&["AAPL".to_string()]).await;
        assert_eq!(quotes["AAPL"].source, "FLAT");
        assert_eq!(quotes["AAPL"].price, dec!(150));
        assert_eq!(dead_chart.call_count(), 1);
    }

    #[tokio::test]
    async fn flat_crypto_does_not_trigger_fallback() {
        let flat = StubProvider::ok("FLAT", dec!(64000), dec!(64000));
        let chart = StubProvider::ok("CHART", dec!(64100), dec!(64000));
        let aggregator = aggregator_with(vec![flat], Vec::new(), Some(chart.clone()));

        let quotes = aggregator.get_quotes(&["BTC".to_string()]).await;
        assert_eq!(quotes["BTC"].source, "FLAT");
        assert_eq!(chart.call_count(), 0);
    }

    #[tokio::test]
    async fn fresh_cache_entries_skip_the_providers() {
        let moving = StubProvider::ok("MOVING", dec!(64000), dec!(63000));
        let aggregator = aggregator_with(vec![moving.clone()], Vec::new(), None);

        let tickers = vec!["BTC".to_string()];
        aggregator.get_quotes(&tickers).await;
        aggregator.get_quotes(&tickers).await;
        assert_eq!(moving.call_count(), 1);
    }

    #[tokio::test]
    async fn fallback_result_keeps_the_normalized_symbol() {
        // the fallback is queried with the Yahoo pair symbol but the result
        // must stay keyed and labeled by the canonical ticker
        let chart = StubProvider::ok("CHART", dec!(64100), dec!(64000));
        let aggregator = aggregator_with(Vec::new(), Vec::new(), Some(chart));

        // empty crypto chain forces the fallback path
        let quotes = aggregator.get_quotes(&["BTC".to_string()]).await;
        assert_eq!(quotes["BTC"].symbol, "BTC");
    }
}
