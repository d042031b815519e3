pub(crate) mod ledger_errors;
pub(crate) mod ledger_model;
pub(crate) mod ledger_store;

pub use ledger_errors::LedgerError;
pub use ledger_model::{NewTransaction, Transaction};
pub use ledger_store::{InMemoryLedgerStore, LedgerStore};
