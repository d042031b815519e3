use thiserror::Error;

use crate::market_data::MarketDataError;

#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Failed to resolve asset metadata: {0}")]
    ResolutionFailed(String),

    #[error("Asset not found: {0}")]
    NotFound(String),
}

impl From<MarketDataError> for AssetError {
    fn from(err: MarketDataError) -> Self {
        AssetError::ResolutionFailed(err.to_string())
    }
}
