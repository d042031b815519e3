use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ledger_errors::LedgerError;

/// Immutable ledger record. `total_cost` is the authoritative amount paid;
/// `price` is derivable but stored for display. Negative quantity (with a
/// matching negative cost) records a disposal. Never mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub ticker: String,
    pub date_time: DateTime<Utc>,
    pub quantity: Decimal,
    pub price: Decimal,
    pub total_cost: Decimal,
}

/// Input model for recording a transaction. Validation happens here, ahead
/// of the valuation core, which only tolerates bad values defensively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub ticker: String,
    pub date_time: DateTime<Utc>,
    pub quantity: Decimal,
    pub total_cost: Decimal,
}

impl NewTransaction {
    pub fn into_transaction(self) -> Result<Transaction, LedgerError> {
        if self.ticker.trim().is_empty() {
            return Err(LedgerError::InvalidTransaction(
                "ticker must not be empty".to_string(),
            ));
        }
        if self.quantity.is_zero() {
            return Err(LedgerError::InvalidTransaction(
                "quantity must be non-zero".to_string(),
            ));
        }
        // quantity and cost must carry the same sign: positive for buys,
        // negative for disposals
        if (self.quantity * self.total_cost) <= Decimal::ZERO {
            return Err(LedgerError::InvalidTransaction(
                "quantity and total cost must have the same sign".to_string(),
            ));
        }

        let price = self.total_cost / self.quantity;
        Ok(Transaction {
            id: Uuid::new_v4().to_string(),
            ticker: self.ticker.trim().to_string(),
            date_time: self.date_time,
            quantity: self.quantity,
            price,
            total_cost: self.total_cost,
        })
    }
}
