use thiserror::Error;

#[derive(Error, Debug)]
pub enum FxError {
    #[error("Failed to fetch exchange rate: {0}")]
    FetchError(String),

    #[error("Exchange rate not found for {0}")]
    RateNotFound(String),

    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),
}

impl From<reqwest::Error> for FxError {
    fn from(err: reqwest::Error) -> Self {
        FxError::FetchError(err.to_string())
    }
}
