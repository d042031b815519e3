pub(crate) mod history_builder;
pub(crate) mod holdings_calculator;
pub(crate) mod portfolio_model;

#[cfg(test)]
mod tests;

pub use history_builder::HistoryBuilder;
pub use holdings_calculator::compute_holdings;
pub use portfolio_model::{ChartRange, HistoricalDataPoint, Holding, PortfolioSummary};
