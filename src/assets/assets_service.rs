use dashmap::DashMap;
use log::debug;
use yahoo_finance_api as yahoo;

use super::assets_errors::AssetError;
use super::assets_model::{Asset, Currency};
use crate::market_data::providers::brapi_provider::BrapiProvider;
use crate::symbols::{crypto_name, normalize, AssetKind};

/// Resolves and caches descriptive metadata per ticker: the curated list for
/// crypto, brapi for B3 listings, Yahoo search for everything else.
///
/// `resolve` is infallible toward callers: any lookup fault degrades to the
/// USD placeholder (uncached, so a later refresh can still fill it in).
pub struct AssetService {
    cache: DashMap<String, Asset>,
    brapi: BrapiProvider,
    connector: yahoo::YahooConnector,
}

impl AssetService {
    pub fn new() -> Result<Self, AssetError> {
        Ok(Self {
            cache: DashMap::new(),
            brapi: BrapiProvider::new()?,
            connector: yahoo::YahooConnector::new()
                .map_err(|e| AssetError::ResolutionFailed(e.to_string()))?,
        })
    }

    pub async fn resolve(&self, ticker: &str) -> Asset {
        if let Some(cached) = self.cache.get(ticker) {
            return cached.clone();
        }

        match self.lookup(ticker).await {
            Ok(asset) => {
                self.cache.insert(ticker.to_string(), asset.clone());
                asset
            }
            Err(e) => {
                debug!("asset resolution failed for {}: {}", ticker, e);
                Asset::placeholder(ticker)
            }
        }
    }

    async fn lookup(&self, ticker: &str) -> Result<Asset, AssetError> {
        let normalized = normalize(ticker);
        let currency = Currency::from_kind(normalized.kind);

        match normalized.kind {
            AssetKind::Crypto => {
                let name = crypto_name(&normalized.symbol)
                    .ok_or_else(|| AssetError::NotFound(normalized.symbol.clone()))?;
                Ok(Asset {
                    ticker: ticker.to_string(),
                    name: name.to_string(),
                    logo: Some(format!(
                        "https://assets.coincap.io/assets/icons/{}@2x.png",
                        normalized.symbol.to_lowercase()
                    )),
                    country: None,
                    kind: normalized.kind,
                    currency,
                })
            }
            AssetKind::Brazilian => {
                let profile = self.brapi.fetch_raw(&normalized.symbol).await?;
                Ok(Asset {
                    ticker: ticker.to_string(),
                    name: profile
                        .long_name
                        .unwrap_or_else(|| normalized.symbol.clone()),
                    logo: profile.logourl,
                    country: Some("Brazil".to_string()),
                    kind: normalized.kind,
                    currency,
                })
            }
            AssetKind::Global => {
                let results = self
                    .connector
                    .search_ticker(&normalized.symbol)
                    .await
                    .map_err(|e| AssetError::ResolutionFailed(e.to_string()))?;

                let item = results
                    .quotes
                    .iter()
                    .find(|q| q.symbol == normalized.symbol)
                    .or_else(|| results.quotes.first())
                    .ok_or_else(|| AssetError::NotFound(normalized.symbol.clone()))?;

                let name = if !item.long_name.is_empty() {
                    item.long_name.clone()
                } else if !item.short_name.is_empty() {
                    item.short_name.clone()
                } else {
                    normalized.symbol.clone()
                };

                Ok(Asset {
                    ticker: ticker.to_string(),
                    name,
                    logo: None,
                    country: Some("United States".to_string()),
                    kind: normalized.kind,
                    currency,
                })
            }
        }
    }
}
