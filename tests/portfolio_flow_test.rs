//! End-to-end flow over the public API: record transactions, aggregate
//! quotes through a stubbed provider chain, and value the portfolio.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use folio_core::assets::{Asset, Currency};
use folio_core::ledger::{InMemoryLedgerStore, LedgerStore, NewTransaction};
use folio_core::market_data::{
    MarketDataError, ProviderRegistry, Quote, QuoteCache, QuoteProvider,
};
use folio_core::portfolio::compute_holdings;
use folio_core::symbols::AssetKind;
use folio_core::utils::SystemClock;
use folio_core::QuoteAggregator;

struct StubProvider {
    prices: HashMap<String, (Decimal, Decimal)>,
}

#[async_trait]
impl QuoteProvider for StubProvider {
    fn source_id(&self) -> &'static str {
        "STUB"
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Quote, MarketDataError> {
        let (price, previous_close) = self
            .prices
            .get(symbol)
            .copied()
            .ok_or_else(|| MarketDataError::NotFound(symbol.to_string()))?;
        Ok(Quote::new(symbol, "STUB").with_price_and_reference(price, previous_close))
    }
}

fn asset(ticker: &str, kind: AssetKind) -> Asset {
    Asset {
        ticker: ticker.to_string(),
        name: ticker.to_string(),
        logo: None,
        country: None,
        kind,
        currency: Currency::from_kind(kind),
    }
}

#[tokio::test]
async fn ledger_to_valuation_round_trip() {
    let store = InMemoryLedgerStore::new();
    for (ticker, days_ago, quantity, total_cost) in [
        ("AAPL", 40, dec!(10), dec!(1500)),
        ("AAPL", 20, dec!(5), dec!(900)),
        ("BTC", 10, dec!(0.5), dec!(25000)),
        ("PETR4", 5, dec!(100), dec!(3500)),
    ] {
        store
            .create(
                "user-1",
                NewTransaction {
                    ticker: ticker.to_string(),
                    date_time: Utc::now() - Duration::days(days_ago),
                    quantity,
                    total_cost,
                },
            )
            .await
            .unwrap();
    }
    let transactions = store.list("user-1").await.unwrap();
    assert_eq!(transactions.len(), 4);

    // chains keyed by the canonical symbol each one will be asked for
    let provider = Arc::new(StubProvider {
        prices: HashMap::from([
            ("AAPL".to_string(), (dec!(170), dec!(165))),
            ("BTC".to_string(), (dec!(60000), dec!(59000))),
            ("PETR4.SA".to_string(), (dec!(38), dec!(37))),
        ]),
    });
    let registry = Arc::new(ProviderRegistry::with_chains(
        vec![provider.clone()],
        vec![provider.clone()],
        vec![provider],
        None,
    ));
    let cache = Arc::new(QuoteCache::new(Arc::new(SystemClock)));
    let aggregator = QuoteAggregator::new(registry, cache);

    let tickers: Vec<String> = vec!["AAPL".into(), "BTC".into(), "PETR4".into(), "BOGUS".into()];
    let quotes = aggregator.get_quotes(&tickers).await;
    assert_eq!(quotes.len(), 3);
    assert!(!quotes.contains_key("BOGUS"));

    let assets = HashMap::from([
        ("AAPL".to_string(), asset("AAPL", AssetKind::Global)),
        ("BTC".to_string(), asset("BTC", AssetKind::Crypto)),
        ("PETR4".to_string(), asset("PETR4", AssetKind::Brazilian)),
    ]);

    let summary = compute_holdings(&transactions, &quotes, &assets, dec!(5), true, Utc::now());

    assert_eq!(summary.holdings.len(), 3);
    // AAPL 15 * 170 + BTC 0.5 * 60000 + PETR4 100 * 38 / 5
    assert_eq!(summary.total_value, dec!(2550) + dec!(30000) + dec!(760));
    // sorted by descending USD value
    assert_eq!(summary.holdings[0].ticker, "BTC");

    // a disposal flows straight through to the next valuation
    let btc_id = transactions
        .iter()
        .find(|t| t.ticker == "BTC")
        .unwrap()
        .id
        .clone();
    store.delete("user-1", &btc_id).await.unwrap();
    let remaining = store.list("user-1").await.unwrap();
    let summary = compute_holdings(&remaining, &quotes, &assets, dec!(5), true, Utc::now());
    assert_eq!(summary.holdings.len(), 2);
    assert_eq!(summary.total_value, dec!(2550) + dec!(760));
}
