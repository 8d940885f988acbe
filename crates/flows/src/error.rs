//! Flow errors

use bestbid_ledger::{ContractError, LedgerError};
use bestbid_settlement::RejectionReason;
use bestbid_vault::QueryError;
use thiserror::Error;

/// Failure of one builder invocation. Never retried automatically.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// A contract rule failed locally; nothing was proposed
    #[error("{0}")]
    MalformedProposal(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AlreadyExists(String),

    /// The orchestrator refused a locally valid transaction
    #[error("Settlement rejected: {0}")]
    SettlementRejected(RejectionReason),

    #[error("{0}")]
    UnknownCommand(String),

    #[error("Ledger query failed: {0}")]
    Query(#[from] QueryError),
}

impl FlowError {
    /// Human readable rule text, verbatim
    pub fn rule(&self) -> String {
        match self {
            FlowError::MalformedProposal(rule)
            | FlowError::NotFound(rule)
            | FlowError::AlreadyExists(rule)
            | FlowError::UnknownCommand(rule) => rule.clone(),
            FlowError::SettlementRejected(RejectionReason::Invalid(rule)) => rule.clone(),
            other => other.to_string(),
        }
    }

    /// A lost race: rebuilding from fresh state may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, FlowError::SettlementRejected(reason) if reason.is_retryable())
    }
}

impl From<ContractError> for FlowError {
    fn from(err: ContractError) -> Self {
        match err {
            ContractError::Rule(rule) => FlowError::MalformedProposal(rule.to_string()),
            unknown @ ContractError::UnknownCommand { .. } => {
                FlowError::UnknownCommand(unknown.to_string())
            }
        }
    }
}

impl From<LedgerError> for FlowError {
    fn from(err: LedgerError) -> Self {
        FlowError::MalformedProposal(err.to_string())
    }
}
