use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::assets::Asset;
use crate::market_data::HistoryInterval;

/// Aggregated position for one ticker, derived entirely from the ledger,
/// quotes and asset metadata on every change. All monetary figures are in
/// the USD reporting currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub ticker: String,
    pub asset: Asset,
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub total_invested: Decimal,
    pub current_value: Decimal,
    pub total_gain_loss: Decimal,
    pub total_gain_loss_percent: Decimal,
    pub day_change: Decimal,
    pub day_change_percent: Decimal,
    /// True when this ticker falls outside the free tier's quota of
    /// first-purchased assets. Locked holdings stay in the ledger but are
    /// excluded from every aggregate figure.
    pub is_locked: bool,
}

/// Full valuation output: per-ticker holdings plus USD aggregates over the
/// unlocked holdings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub holdings: Vec<Holding>,
    pub total_value: Decimal,
    pub total_invested: Decimal,
    pub total_gain_loss: Decimal,
    pub total_gain_loss_percent: Decimal,
    pub day_change: Decimal,
    pub day_change_percent: Decimal,
}

/// One reconstructed portfolio-valuation sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalDataPoint {
    pub date: DateTime<Utc>,
    pub value: Decimal,
}

/// Chart window, with its bar granularity: finer bars for shorter windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartRange {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "5D")]
    FiveDays,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "YTD")]
    YearToDate,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "ALL")]
    All,
}

impl ChartRange {
    pub fn interval(&self) -> HistoryInterval {
        match self {
            ChartRange::OneDay => HistoryInterval::FiveMinutes,
            ChartRange::FiveDays => HistoryInterval::FifteenMinutes,
            ChartRange::OneMonth => HistoryInterval::OneHour,
            _ => HistoryInterval::OneDay,
        }
    }

    /// Window start for a chart ending at `now`. `All` reaches back to the
    /// earliest transaction, so it is resolved by the builder instead.
    pub fn start_from(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
        use chrono::{Datelike, Duration, TimeZone};
        match self {
            ChartRange::OneDay => Some(now - Duration::days(1)),
            ChartRange::FiveDays => Some(now - Duration::days(5)),
            ChartRange::OneMonth => Some(now - Duration::days(30)),
            ChartRange::SixMonths => Some(now - Duration::days(182)),
            ChartRange::YearToDate => Utc
                .with_ymd_and_hms(now.year(), 1, 1, 0, 0, 0)
                .single(),
            ChartRange::OneYear => Some(now - Duration::days(365)),
            ChartRange::All => None,
        }
    }
}
