use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::{Duration as StdDuration, SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use log::debug;
use rust_decimal::Decimal;

use super::portfolio_model::{ChartRange, HistoricalDataPoint};
use crate::constants::DEFAULT_USD_BRL_RATE;
use crate::ledger::Transaction;
use crate::market_data::{HistoricalBar, HistoryProvider, Quote};
use crate::symbols::{normalize, yahoo_symbol, AssetKind};
use crate::utils::Clock;

/// Closest-bar matching window when aligning per-asset series
const MATCH_TOLERANCE_SECS: i64 = 600;

/// Timeline size synthesized when no asset produced any history
const SYNTHETIC_POINTS: i64 = 40;

/// Reconstructs a time-aligned portfolio net-worth series from per-asset
/// close-price histories plus the current holdings snapshot.
///
/// Snapshot-mode on purpose: today's net quantities are applied to past
/// prices, not the quantities actually held at each past moment.
pub struct HistoryBuilder {
    provider: Arc<dyn HistoryProvider>,
    clock: Arc<dyn Clock>,
}

struct AssetSeries {
    quantity: Decimal,
    brazilian: bool,
    bars: Vec<(i64, Decimal)>,
}

impl HistoryBuilder {
    pub fn new(provider: Arc<dyn HistoryProvider>, clock: Arc<dyn Clock>) -> Self {
        Self { provider, clock }
    }

    pub async fn build_series(
        &self,
        transactions: &[Transaction],
        fx_rate: Decimal,
        range: ChartRange,
        live_quotes: Option<&HashMap<String, Quote>>,
    ) -> Vec<HistoricalDataPoint> {
        if transactions.is_empty() {
            return Vec::new();
        }
        let fx_rate = if fx_rate > Decimal::ZERO {
            fx_rate
        } else {
            DEFAULT_USD_BRL_RATE
        };

        let now = self.clock.now();
        let start = range.start_from(now).unwrap_or_else(|| {
            transactions
                .iter()
                .map(|t| t.date_time)
                .min()
                .unwrap_or(now)
        });

        // today's net position per ticker, applied across the whole window
        let mut quantities: HashMap<String, Decimal> = HashMap::new();
        for transaction in transactions {
            *quantities.entry(transaction.ticker.clone()).or_default() += transaction.quantity;
        }

        let mut series = self
            .fetch_all_series(&quantities, start, now, range)
            .await;

        let mut timeline: BTreeSet<i64> = series
            .values()
            .flat_map(|s| s.bars.iter().map(|(ts, _)| *ts))
            .collect();
        if timeline.is_empty() {
            timeline = synthesize_timeline(start.timestamp(), now.timestamp());
            seed_flat_bars(&mut series, transactions, live_quotes, start.timestamp());
        }

        let mut points: Vec<HistoricalDataPoint> = Vec::with_capacity(timeline.len() + 1);
        for ts in timeline {
            let mut total = Decimal::ZERO;
            for asset in series.values() {
                if let Some(price) = price_at(&asset.bars, ts) {
                    let value = price * asset.quantity;
                    total += if asset.brazilian {
                        value / fx_rate
                    } else {
                        value
                    };
                }
            }
            if total > Decimal::ZERO {
                if let Some(date) = DateTime::<Utc>::from_timestamp(ts, 0) {
                    points.push(HistoricalDataPoint { date, value: total });
                }
            }
        }

        // pin the right edge to the live dashboard figure
        if let Some(quotes) = live_quotes {
            let mut total = Decimal::ZERO;
            for (ticker, quantity) in &quantities {
                if let Some(quote) = quotes.get(ticker) {
                    let value = quote.price * *quantity;
                    total += if normalize(ticker).kind == AssetKind::Brazilian {
                        value / fx_rate
                    } else {
                        value
                    };
                }
            }
            if total > Decimal::ZERO {
                points.push(HistoricalDataPoint {
                    date: now,
                    value: total,
                });
            }
        }

        points
    }

    async fn fetch_all_series(
        &self,
        quantities: &HashMap<String, Decimal>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        range: ChartRange,
    ) -> HashMap<String, AssetSeries> {
        let start_time = to_system_time(start);
        let end_time = to_system_time(end);
        let interval = range.interval();

        let fetches = quantities.keys().map(|ticker| {
            let normalized = normalize(ticker);
            let symbol = yahoo_symbol(&normalized);
            let provider = self.provider.clone();
            async move {
                let bars = match provider
                    .fetch_history(&symbol, start_time, end_time, interval)
                    .await
                {
                    Ok(bars) => bars,
                    Err(e) => {
                        // an asset without history just contributes nothing
                        debug!("history fetch failed for {}: {}", symbol, e);
                        Vec::new()
                    }
                };
                (ticker.clone(), normalized.kind, bars)
            }
        });

        let mut series = HashMap::new();
        for (ticker, kind, bars) in join_all(fetches).await {
            let mut bars: Vec<(i64, Decimal)> = bars
                .iter()
                .map(|bar: &HistoricalBar| (bar.timestamp.timestamp(), bar.close))
                .collect();
            bars.sort_by_key(|(ts, _)| *ts);
            series.insert(
                ticker.clone(),
                AssetSeries {
                    quantity: quantities[&ticker],
                    brazilian: kind == AssetKind::Brazilian,
                    bars,
                },
            );
        }
        series
    }
}

fn to_system_time(datetime: DateTime<Utc>) -> SystemTime {
    let secs = datetime.timestamp().max(0) as u64;
    UNIX_EPOCH + StdDuration::from_secs(secs)
}

/// With no history anywhere the synthesized timeline still has to render a
/// line, so each asset gets one flat bar at the window start: the live quote
/// price when available, else its most recent entry price. Carry-forward
/// extends it across the window.
fn seed_flat_bars(
    series: &mut HashMap<String, AssetSeries>,
    transactions: &[Transaction],
    live_quotes: Option<&HashMap<String, Quote>>,
    start_ts: i64,
) {
    for (ticker, asset) in series.iter_mut() {
        let live = live_quotes
            .and_then(|quotes| quotes.get(ticker))
            .map(|q| q.price)
            .filter(|p| *p > Decimal::ZERO);
        let entry = transactions
            .iter()
            .filter(|t| &t.ticker == ticker)
            .max_by_key(|t| t.date_time)
            .map(|t| t.price)
            .filter(|p| *p > Decimal::ZERO);
        if let Some(price) = live.or(entry) {
            asset.bars.push((start_ts, price));
        }
    }
}

fn synthesize_timeline(start: i64, end: i64) -> BTreeSet<i64> {
    if end <= start {
        return BTreeSet::new();
    }
    let step = ((end - start) / SYNTHETIC_POINTS).max(1);
    (0..=SYNTHETIC_POINTS).map(|i| start + i * step).collect()
}

/// Price of an asset at `ts`: the closest bar within the tolerance window,
/// else the last known bar before `ts` (carry-forward, never interpolated).
fn price_at(bars: &[(i64, Decimal)], ts: i64) -> Option<Decimal> {
    if bars.is_empty() {
        return None;
    }
    let idx = bars.partition_point(|(bar_ts, _)| *bar_ts <= ts);

    let before = idx.checked_sub(1).map(|i| bars[i]);
    let after = bars.get(idx).copied();

    let closest = match (before, after) {
        (Some(b), Some(a)) => {
            if (ts - b.0) <= (a.0 - ts) {
                Some(b)
            } else {
                Some(a)
            }
        }
        (Some(b), None) => Some(b),
        (None, Some(a)) => Some(a),
        (None, None) => None,
    };

    if let Some((bar_ts, price)) = closest {
        if (bar_ts - ts).abs() <= MATCH_TOLERANCE_SECS {
            return Some(price);
        }
    }

    // carry forward the last known price; a point before the first bar has
    // no price at all
    before.map(|(_, price)| price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_at_prefers_bar_within_tolerance() {
        let bars = vec![(1000, dec!(10)), (2000, dec!(11))];
        assert_eq!(price_at(&bars, 1100), Some(dec!(10)));
        assert_eq!(price_at(&bars, 1950), Some(dec!(11)));
    }

    #[test]
    fn price_at_carries_last_price_forward() {
        let bars = vec![(1000, dec!(10))];
        assert_eq!(price_at(&bars, 50_000), Some(dec!(10)));
    }

    #[test]
    fn price_at_has_no_price_before_first_bar() {
        let bars = vec![(10_000, dec!(10))];
        assert_eq!(price_at(&bars, 1000), None);
    }

    #[test]
    fn synthesized_timeline_is_evenly_spaced() {
        let timeline = synthesize_timeline(0, 4000);
        assert_eq!(timeline.len(), (SYNTHETIC_POINTS + 1) as usize);
        assert!(timeline.contains(&0));
    }
}
