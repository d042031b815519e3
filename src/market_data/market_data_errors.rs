use thiserror::Error;

/// Provider-internal failure taxonomy. These never cross the aggregator
/// boundary: chains collapse them to `Option<Quote>` and log at debug level,
/// so tests can still distinguish a timeout from a parse fault.
#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out after {0}ms")]
    Timeout(u64),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Parsing error: {0}")]
    ParsingError(String),

    #[error("Quote rejected as invalid: {0}")]
    InvalidQuote(String),

    #[error("Symbol not supported by this source: {0}")]
    Unsupported(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("All providers in the chain failed for {0}")]
    ChainExhausted(String),
}

impl From<serde_json::Error> for MarketDataError {
    fn from(err: serde_json::Error) -> Self {
        MarketDataError::ParsingError(err.to_string())
    }
}

impl From<yahoo_finance_api::YahooError> for MarketDataError {
    fn from(err: yahoo_finance_api::YahooError) -> Self {
        MarketDataError::ProviderError(err.to_string())
    }
}
