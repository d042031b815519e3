use std::collections::HashMap;
use std::sync::Arc;
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::ledger::Transaction;
use crate::market_data::{
    HistoricalBar, HistoryInterval, HistoryProvider, MarketDataError, MarketState, Quote,
};
use crate::portfolio::{ChartRange, HistoryBuilder};
use crate::utils::Clock;

struct FixedClock(DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Serves canned per-symbol series; unknown symbols fail like a dead feed.
struct StubHistoryProvider {
    series: HashMap<String, Vec<HistoricalBar>>,
}

#[async_trait]
impl HistoryProvider for StubHistoryProvider {
    async fn fetch_history(
        &self,
        symbol: &str,
        _start: SystemTime,
        _end: SystemTime,
        _interval: HistoryInterval,
    ) -> Result<Vec<HistoricalBar>, MarketDataError> {
        self.series
            .get(symbol)
            .cloned()
            .ok_or_else(|| MarketDataError::NotFound(symbol.to_string()))
    }
}

fn bar(at: DateTime<Utc>, close: Decimal) -> HistoricalBar {
    HistoricalBar {
        timestamp: at,
        close,
    }
}

fn buy(ticker: &str, when: DateTime<Utc>, quantity: Decimal, total_cost: Decimal) -> Transaction {
    Transaction {
        id: format!("{}-{}", ticker, quantity),
        ticker: ticker.to_string(),
        date_time: when,
        quantity,
        price: total_cost / quantity,
        total_cost,
    }
}

fn live_quote(ticker: &str, price: Decimal) -> (String, Quote) {
    let q = Quote {
        symbol: ticker.to_string(),
        price,
        change: Decimal::ZERO,
        change_percent: Decimal::ZERO,
        previous_close: price,
        market_state: MarketState::Regular,
        source: "TEST".to_string(),
        fetched_at: Utc::now(),
    };
    (ticker.to_string(), q)
}

fn builder_with(
    series: HashMap<String, Vec<HistoricalBar>>,
    now: DateTime<Utc>,
) -> HistoryBuilder {
    HistoryBuilder::new(
        Arc::new(StubHistoryProvider { series }),
        Arc::new(FixedClock(now)),
    )
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 14, 15, 0, 0).unwrap()
}

#[tokio::test]
async fn flat_series_matching_live_quote_has_no_right_edge_jump() {
    let now = now();
    let bars: Vec<HistoricalBar> = (0..5)
        .map(|i| bar(now - Duration::hours(10 - i), dec!(100)))
        .collect();
    let builder = builder_with(HashMap::from([("AAPL".to_string(), bars)]), now);

    let transactions = vec![buy("AAPL", now - Duration::days(30), dec!(3), dec!(270))];
    let live = HashMap::from([live_quote("AAPL", dec!(100))]);

    let series = builder
        .build_series(&transactions, Decimal::ONE, ChartRange::OneDay, Some(&live))
        .await;

    assert!(series.len() >= 2);
    let last = &series[series.len() - 1];
    let second_last = &series[series.len() - 2];
    assert_eq!(last.value, second_last.value);
    assert_eq!(last.date, now);
}

#[tokio::test]
async fn sums_across_assets_with_carry_forward_for_sparse_series() {
    let now = now();
    let t0 = now - Duration::hours(5);
    let t1 = now - Duration::hours(4);
    // B has no bar at t1; its t0 price must carry forward
    let series = HashMap::from([
        (
            "AAA".to_string(),
            vec![bar(t0, dec!(10)), bar(t1, dec!(12))],
        ),
        ("BBB".to_string(), vec![bar(t0, dec!(20))]),
    ]);
    let builder = builder_with(series, now);

    let transactions = vec![
        buy("AAA", now - Duration::days(3), dec!(1), dec!(9)),
        buy("BBB", now - Duration::days(3), dec!(2), dec!(30)),
    ];

    let points = builder
        .build_series(&transactions, Decimal::ONE, ChartRange::OneDay, None)
        .await;

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].value, dec!(50)); // 10 + 2*20
    assert_eq!(points[1].value, dec!(52)); // 12 + carried 2*20
}

#[tokio::test]
async fn brazilian_prices_are_converted_with_the_fx_rate() {
    let now = now();
    let t0 = now - Duration::hours(2);
    let series = HashMap::from([("PETR4.SA".to_string(), vec![bar(t0, dec!(40))])]);
    let builder = builder_with(series, now);

    let transactions = vec![buy("PETR4", now - Duration::days(10), dec!(10), dec!(300))];

    let points = builder
        .build_series(&transactions, dec!(5), ChartRange::OneDay, None)
        .await;

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].value, dec!(80)); // 400 BRL / 5
}

#[tokio::test]
async fn failed_history_fetches_are_tolerated_per_asset() {
    let now = now();
    let t0 = now - Duration::hours(2);
    // only AAA has history; the other feed is dead
    let series = HashMap::from([("AAA".to_string(), vec![bar(t0, dec!(10))])]);
    let builder = builder_with(series, now);

    let transactions = vec![
        buy("AAA", now - Duration::days(3), dec!(2), dec!(18)),
        buy("DEAD", now - Duration::days(3), dec!(5), dec!(50)),
    ];

    let points = builder
        .build_series(&transactions, Decimal::ONE, ChartRange::OneDay, None)
        .await;

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].value, dec!(20));
}

#[tokio::test]
async fn crypto_history_is_requested_as_a_usd_pair() {
    let now = now();
    let t0 = now - Duration::hours(1);
    let series = HashMap::from([("BTC-USD".to_string(), vec![bar(t0, dec!(64000))])]);
    let builder = builder_with(series, now);

    let transactions = vec![buy("BTC", now - Duration::days(100), dec!(0.5), dec!(20000))];

    let points = builder
        .build_series(&transactions, Decimal::ONE, ChartRange::OneDay, None)
        .await;

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].value, dec!(32000));
}

#[tokio::test]
async fn empty_ledger_produces_an_empty_series() {
    let builder = builder_with(HashMap::new(), now());
    let points = builder
        .build_series(&[], Decimal::ONE, ChartRange::All, None)
        .await;
    assert!(points.is_empty());
}

#[tokio::test]
async fn no_history_anywhere_renders_a_flat_line_at_the_live_price() {
    let now = now();
    let builder = builder_with(HashMap::new(), now);

    let transactions = vec![buy("AAA", now - Duration::days(3), dec!(2), dec!(18))];
    let live = HashMap::from([live_quote("AAA", dec!(11))]);

    let points = builder
        .build_series(&transactions, Decimal::ONE, ChartRange::OneMonth, Some(&live))
        .await;

    // the synthesized timeline spans the window, then the live edge point
    assert!(points.len() >= 30, "got {} points", points.len());
    assert!(points.iter().all(|p| p.value == dec!(22)));
    assert_eq!(points.last().unwrap().date, now);
}

#[tokio::test]
async fn dead_feeds_without_live_quotes_fall_back_to_entry_prices() {
    let now = now();
    let builder = builder_with(HashMap::new(), now);

    // old position, every feed dead, no live quotes either
    let transactions = vec![buy("AAA", now - Duration::days(90), dec!(2), dec!(18))];

    let points = builder
        .build_series(&transactions, Decimal::ONE, ChartRange::OneMonth, None)
        .await;

    assert!(points.len() >= 30, "got {} points", points.len());
    assert!(points.iter().all(|p| p.value == dec!(18)));
}

#[test]
fn ranges_map_to_finer_bars_for_shorter_windows() {
    assert_eq!(ChartRange::OneDay.interval(), HistoryInterval::FiveMinutes);
    assert_eq!(
        ChartRange::FiveDays.interval(),
        HistoryInterval::FifteenMinutes
    );
    assert_eq!(ChartRange::OneMonth.interval(), HistoryInterval::OneHour);
    assert_eq!(ChartRange::OneYear.interval(), HistoryInterval::OneDay);
    assert_eq!(ChartRange::All.interval(), HistoryInterval::OneDay);
}
