use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::portfolio_model::{Holding, PortfolioSummary};
use crate::assets::{Asset, Currency};
use crate::constants::{DEFAULT_USD_BRL_RATE, FREE_TIER_HOLDINGS_LIMIT};
use crate::ledger::Transaction;
use crate::market_data::Quote;

fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    numerator.checked_div(denominator).unwrap_or_default()
}

/// Folds the full transaction ledger, live quotes and the FX rate into
/// per-holding and aggregate metrics.
///
/// Pure and total: every division is guarded and malformed inputs degrade to
/// zeros, because the caller is a live view that must never crash. The
/// holding set is exactly the distinct tickers in the ledger; zero-quantity
/// positions are kept, not specially deleted.
pub fn compute_holdings(
    transactions: &[Transaction],
    quotes: &HashMap<String, Quote>,
    assets: &HashMap<String, Asset>,
    fx_rate: Decimal,
    premium: bool,
    as_of: DateTime<Utc>,
) -> PortfolioSummary {
    let fx_rate = if fx_rate > Decimal::ZERO {
        fx_rate
    } else {
        DEFAULT_USD_BRL_RATE
    };

    // purchase order determines free-tier eligibility
    let mut ordered: Vec<Transaction> = transactions.to_vec();
    ordered.sort_by_key(|t| t.date_time);

    let mut ticker_order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<&Transaction>> = HashMap::new();
    for transaction in &ordered {
        if !groups.contains_key(&transaction.ticker) {
            ticker_order.push(transaction.ticker.clone());
        }
        groups
            .entry(transaction.ticker.clone())
            .or_default()
            .push(transaction);
    }

    let unlocked_limit = if premium {
        usize::MAX
    } else {
        FREE_TIER_HOLDINGS_LIMIT
    };

    let mut holdings: Vec<Holding> = Vec::with_capacity(ticker_order.len());
    let mut total_value = Decimal::ZERO;
    let mut total_invested = Decimal::ZERO;
    let mut total_day_change = Decimal::ZERO;

    for (index, ticker) in ticker_order.iter().enumerate() {
        let group = &groups[ticker];
        let quantity: Decimal = group.iter().map(|t| t.quantity).sum();
        let invested_native: Decimal = group.iter().map(|t| t.total_cost).sum();

        let asset = assets
            .get(ticker)
            .cloned()
            .unwrap_or_else(|| Asset::placeholder(ticker));
        let to_usd = |value: Decimal| match asset.currency {
            Currency::Brl => safe_div(value, fx_rate),
            Currency::Usd => value,
        };

        let average_price_native = if quantity > Decimal::ZERO {
            safe_div(invested_native, quantity)
        } else {
            Decimal::ZERO
        };

        let quote = quotes.get(ticker);
        let value_native = quote
            .map(|q| q.price * quantity)
            .unwrap_or(Decimal::ZERO);

        // Same-day buys have no previous-close baseline of their own, so
        // their day move is measured against their entry price.
        let mut day_change_native = Decimal::ZERO;
        if let Some(quote) = quote {
            if quote.price > Decimal::ZERO {
                for transaction in group.iter() {
                    let baseline = if transaction.date_time.date_naive() == as_of.date_naive() {
                        transaction.price
                    } else {
                        quote.previous_close
                    };
                    if baseline > Decimal::ZERO {
                        day_change_native += (quote.price - baseline) * transaction.quantity;
                    }
                }
            }
        }

        let average_price_usd = to_usd(average_price_native);
        let total_invested_usd = to_usd(invested_native);
        let current_value_usd = to_usd(value_native);
        let day_change_usd = to_usd(day_change_native);

        let total_gain_loss = current_value_usd - total_invested_usd;
        let total_gain_loss_percent =
            safe_div(total_gain_loss, total_invested_usd) * Decimal::ONE_HUNDRED;
        let day_change_percent = safe_div(
            day_change_usd,
            current_value_usd - day_change_usd,
        ) * Decimal::ONE_HUNDRED;

        let is_locked = index >= unlocked_limit;
        if !is_locked {
            total_value += current_value_usd;
            total_invested += total_invested_usd;
            total_day_change += day_change_usd;
        }

        holdings.push(Holding {
            ticker: ticker.clone(),
            asset,
            quantity,
            average_price: average_price_usd,
            total_invested: total_invested_usd,
            current_value: current_value_usd,
            total_gain_loss,
            total_gain_loss_percent,
            day_change: day_change_usd,
            day_change_percent,
            is_locked,
        });
    }

    holdings.sort_by(|a, b| b.current_value.cmp(&a.current_value));

    let total_gain_loss = total_value - total_invested;
    PortfolioSummary {
        holdings,
        total_value,
        total_invested,
        total_gain_loss,
        total_gain_loss_percent: safe_div(total_gain_loss, total_invested)
            * Decimal::ONE_HUNDRED,
        day_change: total_day_change,
        day_change_percent: safe_div(total_day_change, total_value - total_day_change)
            * Decimal::ONE_HUNDRED,
    }
}
