//! Settlement results

use bestbid_core::Party;
use bestbid_ledger::{StateRef, TxId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why the orchestrator refused to commit a transaction
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectionReason {
    /// An input is no longer current; another transaction won the race
    #[error("State {state} is no longer current{}", consumed_suffix(.consumed_by))]
    Conflict {
        state: StateRef,
        consumed_by: Option<TxId>,
    },

    #[error("Signature refused by {party}")]
    SignatureRefused { party: Party },

    /// Contract verification failed on re-check
    #[error("{0}")]
    Invalid(String),

    #[error("Storage failure: {0}")]
    Storage(String),
}

impl RejectionReason {
    /// Only a lost race is worth rebuilding and retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, RejectionReason::Conflict { .. })
    }
}

fn consumed_suffix(consumed_by: &Option<TxId>) -> String {
    consumed_by
        .as_ref()
        .map(|tx_id| format!(" (consumed by {})", tx_id))
        .unwrap_or_default()
}

/// Result of `SettlementOrchestrator::propose`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementOutcome {
    Committed(TxId),
    Rejected(RejectionReason),
}

impl SettlementOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, SettlementOutcome::Committed(_))
    }

    pub fn into_result(self) -> Result<TxId, RejectionReason> {
        match self {
            SettlementOutcome::Committed(tx_id) => Ok(tx_id),
            SettlementOutcome::Rejected(reason) => Err(reason),
        }
    }
}
