//! BestBid Ledger - Transaction model and contract verification
//!
//! This is the HEART of BestBid. Every state transition is expressed as a
//! `Transaction` and must pass `validate` before anyone signs it.
//!
//! # Key Types
//! - `Transaction`: consumed states + produced states + one `Command`
//! - `Command`: Issue, AddFunds, PlaceBid or EndAuction
//! - `StateRef` / `StateAndRef`: pointer to a produced state
//! - `SignedTransaction`: a transaction plus one signature per required signer
//! - `JournalRecord`: a committed, hash-chained transaction

pub mod error;
pub mod hash;
pub mod signature;
pub mod transaction;
pub mod validation;

pub use error::{ContractError, LedgerError};
pub use hash::{calculate_record_hash, calculate_tx_id, verify_chain, ChainError, JournalRecord};
pub use signature::{PartySigner, SignatureAlgorithm, Signer, SignedTransaction, TransactionSignature};
pub use transaction::{Command, StateAndRef, StateRef, Transaction, TransactionBuilder, TxId};
pub use validation::validate;
