use std::sync::Arc;

use crate::market_data::market_data_errors::MarketDataError;
use crate::market_data::providers::binance_provider::BinanceProvider;
use crate::market_data::providers::bitfinex_provider::BitfinexProvider;
use crate::market_data::providers::brapi_provider::BrapiProvider;
use crate::market_data::providers::coinbase_provider::CoinbaseProvider;
use crate::market_data::providers::coingecko_provider::CoinGeckoProvider;
use crate::market_data::providers::cryptocompare_provider::CryptoCompareProvider;
use crate::market_data::providers::kraken_provider::KrakenProvider;
use crate::market_data::providers::kucoin_provider::KucoinProvider;
use crate::market_data::providers::okx_provider::OkxProvider;
use crate::market_data::providers::quote_provider::{HistoryProvider, QuoteProvider};
use crate::market_data::providers::yahoo_provider::YahooProvider;
use crate::symbols::AssetKind;

/// Priority-ordered provider chains, one per asset kind, plus the shared
/// daily-chart fallback. Order within a chain is the fallback priority.
pub struct ProviderRegistry {
    crypto_chain: Vec<Arc<dyn QuoteProvider>>,
    brazilian_chain: Vec<Arc<dyn QuoteProvider>>,
    global_chain: Vec<Arc<dyn QuoteProvider>>,
    fallback: Option<Arc<dyn QuoteProvider>>,
    history: Option<Arc<dyn HistoryProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Result<Self, MarketDataError> {
        let yahoo = Arc::new(YahooProvider::new()?);
        let brapi = Arc::new(BrapiProvider::new()?);

        let crypto_chain: Vec<Arc<dyn QuoteProvider>> = vec![
            Arc::new(BinanceProvider::new()?),
            Arc::new(CoinbaseProvider::new()?),
            Arc::new(KrakenProvider::new()?),
            Arc::new(OkxProvider::new()?),
            Arc::new(KucoinProvider::new()?),
            Arc::new(BitfinexProvider::new()?),
            Arc::new(CryptoCompareProvider::new()?),
            Arc::new(CoinGeckoProvider::new()?),
        ];
        let brazilian_chain: Vec<Arc<dyn QuoteProvider>> =
            vec![brapi, yahoo.clone() as Arc<dyn QuoteProvider>];
        let global_chain: Vec<Arc<dyn QuoteProvider>> =
            vec![yahoo.clone() as Arc<dyn QuoteProvider>];

        Ok(Self {
            crypto_chain,
            brazilian_chain,
            global_chain,
            fallback: Some(yahoo.clone() as Arc<dyn QuoteProvider>),
            history: Some(yahoo as Arc<dyn HistoryProvider>),
        })
    }

    /// Test seam: build a registry from arbitrary chains.
    pub fn with_chains(
        crypto_chain: Vec<Arc<dyn QuoteProvider>>,
        brazilian_chain: Vec<Arc<dyn QuoteProvider>>,
        global_chain: Vec<Arc<dyn QuoteProvider>>,
        fallback: Option<Arc<dyn QuoteProvider>>,
    ) -> Self {
        Self {
            crypto_chain,
            brazilian_chain,
            global_chain,
            fallback,
            history: None,
        }
    }

    pub fn chain_for(&self, kind: AssetKind) -> &[Arc<dyn QuoteProvider>] {
        match kind {
            AssetKind::Crypto => &self.crypto_chain,
            AssetKind::Brazilian => &self.brazilian_chain,
            AssetKind::Global => &self.global_chain,
        }
    }

    pub fn fallback(&self) -> Option<&Arc<dyn QuoteProvider>> {
        self.fallback.as_ref()
    }

    pub fn history_provider(&self) -> Option<Arc<dyn HistoryProvider>> {
        self.history.clone()
    }
}
