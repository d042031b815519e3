use async_trait::async_trait;
use dashmap::DashMap;

use super::ledger_errors::LedgerError;
use super::ledger_model::{NewTransaction, Transaction};

/// Persistence boundary for the transaction ledger and watchlist. The engine
/// only ever sees the loaded arrays; storage mechanics live behind this
/// trait.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn create(
        &self,
        user_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, LedgerError>;
    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<(), LedgerError>;
    async fn list(&self, user_id: &str) -> Result<Vec<Transaction>, LedgerError>;

    async fn add_watch(&self, user_id: &str, ticker: &str) -> Result<(), LedgerError>;
    async fn remove_watch(&self, user_id: &str, ticker: &str) -> Result<(), LedgerError>;
    async fn watchlist(&self, user_id: &str) -> Result<Vec<String>, LedgerError>;
}

/// In-memory store the engine runs against once a user's data is loaded.
#[derive(Default)]
pub struct InMemoryLedgerStore {
    transactions: DashMap<String, Vec<Transaction>>,
    watchlists: DashMap<String, Vec<String>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn create(
        &self,
        user_id: &str,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, LedgerError> {
        let transaction = new_transaction.into_transaction()?;
        self.transactions
            .entry(user_id.to_string())
            .or_default()
            .push(transaction.clone());
        Ok(transaction)
    }

    async fn delete(&self, user_id: &str, transaction_id: &str) -> Result<(), LedgerError> {
        let mut entries = self
            .transactions
            .get_mut(user_id)
            .ok_or_else(|| LedgerError::NotFound(transaction_id.to_string()))?;
        let before = entries.len();
        entries.retain(|t| t.id != transaction_id);
        if entries.len() == before {
            return Err(LedgerError::NotFound(transaction_id.to_string()));
        }
        Ok(())
    }

    async fn list(&self, user_id: &str) -> Result<Vec<Transaction>, LedgerError> {
        Ok(self
            .transactions
            .get(user_id)
            .map(|entries| entries.clone())
            .unwrap_or_default())
    }

    async fn add_watch(&self, user_id: &str, ticker: &str) -> Result<(), LedgerError> {
        let mut watchlist = self.watchlists.entry(user_id.to_string()).or_default();
        if !watchlist.iter().any(|t| t == ticker) {
            watchlist.push(ticker.to_string());
        }
        Ok(())
    }

    async fn remove_watch(&self, user_id: &str, ticker: &str) -> Result<(), LedgerError> {
        if let Some(mut watchlist) = self.watchlists.get_mut(user_id) {
            watchlist.retain(|t| t != ticker);
        }
        Ok(())
    }

    async fn watchlist(&self, user_id: &str) -> Result<Vec<String>, LedgerError> {
        Ok(self
            .watchlists
            .get(user_id)
            .map(|entries| entries.clone())
            .unwrap_or_default())
    }
}
