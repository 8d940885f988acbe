//! Vault errors

use bestbid_ledger::{StateRef, TxId};
use thiserror::Error;

/// Failure of the query port
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Ledger query unavailable: {0}")]
    Unavailable(String),

    #[error("Inconsistent ledger snapshot: {0}")]
    Inconsistent(String),
}

/// Errors recording a transaction into the arena
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Unknown state {0}")]
    UnknownState(StateRef),

    #[error("State {state} already consumed by {consumed_by}")]
    AlreadyConsumed { state: StateRef, consumed_by: TxId },

    #[error("Transaction {0} already recorded")]
    DuplicateTransaction(TxId),
}
