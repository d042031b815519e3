pub mod assets;
pub mod constants;
pub mod errors;
pub mod fx;
pub mod ledger;
pub mod market_data;
pub mod portfolio;
pub mod symbols;
pub mod utils;

pub use errors::{Error, Result};
pub use market_data::{Quote, QuoteAggregator};
pub use portfolio::{compute_holdings, HistoryBuilder, PortfolioSummary};
