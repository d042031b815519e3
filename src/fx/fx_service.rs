use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::warn;
use reqwest::Client;
use rust_decimal::Decimal;
use serde_json::Value;

use super::fx_errors::FxError;
use super::fx_traits::RateSource;
use crate::constants::DEFAULT_USD_BRL_RATE;
use crate::utils::Clock;

const AWESOMEAPI_URL: &str = "https://economia.awesomeapi.com.br/json/last";
const FX_TIMEOUT_MS: u64 = 3000;
const FX_CACHE_TTL_SECS: i64 = 300;

/// AwesomeAPI `json/last` endpoint, the USD-BRL feed.
pub struct AwesomeApiSource {
    client: Client,
}

impl AwesomeApiSource {
    pub fn new() -> Result<Self, FxError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(FX_TIMEOUT_MS))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RateSource for AwesomeApiSource {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<Decimal, FxError> {
        let pair = format!("{}-{}", from.to_uppercase(), to.to_uppercase());
        let url = format!("{}/{}", AWESOMEAPI_URL, pair);
        let body: Value = self.client.get(&url).send().await?.json().await?;

        let key = pair.replace('-', "");
        let rate = body
            .get(&key)
            .and_then(|entry| entry.get("bid"))
            .and_then(Value::as_str)
            .and_then(|bid| bid.parse::<Decimal>().ok())
            .ok_or_else(|| FxError::RateNotFound(pair))?;

        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate(rate.to_string()));
        }
        Ok(rate)
    }
}

/// USD/BRL rate service. The engine must keep valuing with a stale or
/// hardcoded rate rather than block on FX, so `get_rate` never fails: a dead
/// source falls back to the last cached rate for that pair, then to the
/// hardcoded default. The cache is keyed per currency pair, so an inverse
/// lookup never sees the forward rate.
pub struct FxService {
    source: Arc<dyn RateSource>,
    cached: RwLock<HashMap<String, (Decimal, DateTime<Utc>)>>,
    clock: Arc<dyn Clock>,
}

impl FxService {
    pub fn new(clock: Arc<dyn Clock>) -> Result<Self, FxError> {
        Ok(Self::with_source(Arc::new(AwesomeApiSource::new()?), clock))
    }

    pub fn with_source(source: Arc<dyn RateSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            cached: RwLock::new(HashMap::new()),
            clock,
        }
    }

    pub async fn get_rate(&self, from: &str, to: &str) -> Decimal {
        if from.eq_ignore_ascii_case(to) {
            return Decimal::ONE;
        }
        let pair = format!("{}-{}", from.to_uppercase(), to.to_uppercase());

        if let Some(rate) = self.cached_rate(&pair, FX_CACHE_TTL_SECS) {
            return rate;
        }

        match self.source.fetch_rate(from, to).await {
            Ok(rate) => {
                let mut cached = self.cached.write().unwrap();
                cached.insert(pair, (rate, self.clock.now()));
                rate
            }
            Err(e) => {
                warn!("FX fetch failed for {}: {}", pair, e);
                // stale beats hardcoded, hardcoded beats nothing
                self.cached_rate(&pair, i64::MAX)
                    .unwrap_or(DEFAULT_USD_BRL_RATE)
            }
        }
    }

    fn cached_rate(&self, pair: &str, max_age_secs: i64) -> Option<Decimal> {
        let cached = self.cached.read().unwrap();
        cached.get(pair).and_then(|(rate, fetched_at)| {
            let age = self.clock.now().signed_duration_since(*fetched_at);
            if age.num_seconds() <= max_age_secs {
                Some(*rate)
            } else {
                None
            }
        })
    }
}
