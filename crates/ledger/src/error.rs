//! Ledger errors

use bestbid_core::Party;
use thiserror::Error;

/// Contract verification failures.
///
/// The rule text carried by `Rule` is part of the public contract: callers
/// surface it verbatim and tests assert on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("{0}")]
    Rule(&'static str),

    #[error("Command not found: the {contract} contract does not handle {command}")]
    UnknownCommand {
        contract: &'static str,
        command: String,
    },
}

impl ContractError {
    /// Rule text for a rule violation, or the full message otherwise
    pub fn rule(&self) -> String {
        match self {
            ContractError::Rule(rule) => (*rule).to_string(),
            other => other.to_string(),
        }
    }
}

/// Errors in transaction assembly and signature handling
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("Transaction requires a command")]
    MissingCommand,

    #[error("correlation_id cannot be empty")]
    EmptyCorrelationId,

    #[error("Transaction requires at least one signer")]
    NoSigners,

    #[error("Transaction id mismatch: expected {expected}, got {actual}")]
    TxIdMismatch { expected: String, actual: String },

    #[error("Missing signature from required signer {0}")]
    MissingSignature(Party),

    #[error("Invalid signature from {signer}: {reason}")]
    InvalidSignature { signer: String, reason: String },

    #[error("Signature verification failed: {0}")]
    SignatureVerificationFailed(String),
}
