use std::time::Duration;

use log::debug;
use reqwest::Client;

use super::market_data_constants::RELAY_TIMEOUT_MS;
use super::market_data_errors::MarketDataError;

type RelayTransform = fn(&str) -> String;

/// CORS-relay rotation used by sources that block direct fetches from some
/// runtimes. The direct URL is tried first, then each relay transform in
/// order; the first 2xx body wins. Failing through the whole rotation is a
/// single `Timeout`-class error to the caller.
const RELAY_TRANSFORMS: &[RelayTransform] = &[
    |url| format!("https://api.allorigins.win/raw?url={}", urlencoding::encode(url)),
    |url| format!("https://corsproxy.io/?url={}", urlencoding::encode(url)),
    |url| format!("https://api.codetabs.com/v1/proxy?quest={}", urlencoding::encode(url)),
];

pub struct RelayPool {
    client: Client,
}

impl RelayPool {
    pub fn new() -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(RELAY_TIMEOUT_MS))
            .build()?;
        Ok(Self { client })
    }

    /// Fetches `url` directly, then through each relay, returning the first
    /// successful response body.
    pub async fn get_text(&self, url: &str) -> Result<String, MarketDataError> {
        match self.try_one(url).await {
            Ok(body) => return Ok(body),
            Err(e) => debug!("direct fetch failed for {}: {}", url, e),
        }

        for transform in RELAY_TRANSFORMS {
            let relayed = transform(url);
            match self.try_one(&relayed).await {
                Ok(body) => return Ok(body),
                Err(e) => debug!("relay fetch failed for {}: {}", relayed, e),
            }
        }

        Err(MarketDataError::Timeout(RELAY_TIMEOUT_MS))
    }

    async fn try_one(&self, url: &str) -> Result<String, MarketDataError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(MarketDataError::ProviderError(format!(
                "status {} from {}",
                response.status(),
                url
            )));
        }
        Ok(response.text().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_transforms_encode_the_target_url() {
        let url = "https://query1.finance.yahoo.com/v8/finance/chart/AAPL?interval=1d&range=1d";
        for transform in RELAY_TRANSFORMS {
            let relayed = transform(url);
            assert!(!relayed.contains("chart/AAPL?interval"), "{}", relayed);
            assert!(relayed.contains(&*urlencoding::encode(url)), "{}", relayed);
        }
    }
}
