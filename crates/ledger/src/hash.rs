//! Transaction ids and journal hash chain

use crate::signature::SignedTransaction;
use crate::transaction::{Transaction, TxId};
use bestbid_core::LedgerState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// `prev_hash` of the first journal record
pub const GENESIS_HASH: &str = "GENESIS";

/// Calculate the transaction id: SHA256 over the full transaction content.
///
/// Every variable-length field is length-prefixed and every list is
/// count-prefixed, so no two distinct transactions share an encoding.
pub fn calculate_tx_id(tx: &Transaction) -> TxId {
    let mut hasher = Sha256::new();

    update_field(&mut hasher, tx.correlation_id.as_bytes());
    update_field(&mut hasher, tx.command.to_string().as_bytes());
    match tx.command.amount() {
        Some(amount) => update_field(&mut hasher, amount.normalize().to_string().as_bytes()),
        None => update_field(&mut hasher, b""),
    }

    update_count(&mut hasher, tx.inputs.len());
    for input in &tx.inputs {
        update_field(&mut hasher, input.state_ref.tx_id.as_str().as_bytes());
        hasher.update(input.state_ref.index.to_le_bytes());
        hash_state(&mut hasher, &input.state);
    }

    update_count(&mut hasher, tx.outputs.len());
    for output in &tx.outputs {
        hash_state(&mut hasher, output);
    }

    update_count(&mut hasher, tx.signers.len());
    for signer in &tx.signers {
        update_field(&mut hasher, signer.name().as_bytes());
    }

    TxId::new(hex::encode(hasher.finalize()))
}

fn update_field(hasher: &mut Sha256, bytes: &[u8]) {
    hasher.update((bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}

fn update_count(hasher: &mut Sha256, count: usize) {
    hasher.update((count as u64).to_le_bytes());
}

fn hash_state(hasher: &mut Sha256, state: &LedgerState) {
    match state {
        LedgerState::Funds(funds) => {
            hasher.update([0u8]);
            update_field(hasher, funds.tx_type.to_string().as_bytes());
            update_field(hasher, funds.balance.normalize().to_string().as_bytes());
            update_field(hasher, funds.address.as_bytes());
        }
        LedgerState::Item(item) => {
            hasher.update([1u8]);
            hasher.update(item.bid_count.to_le_bytes());
            hasher.update([item.auction_closed as u8]);
            update_field(hasher, item.minimum_bid.normalize().to_string().as_bytes());
            update_field(hasher, item.current_bid.normalize().to_string().as_bytes());
            update_field(hasher, item.current_bidder.as_bytes());
            update_field(hasher, item.item_id.as_bytes());
        }
    }
    for party in state.participants() {
        update_field(hasher, party.name().as_bytes());
    }
}

/// A committed transaction as written to the journal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalRecord {
    pub sequence: u64,
    pub prev_hash: String,
    pub hash: String,
    pub committed_at: DateTime<Utc>,
    pub transaction: SignedTransaction,
}

/// Calculate SHA256 hash of a journal record (excluding the hash field itself)
pub fn calculate_record_hash(record: &JournalRecord) -> String {
    let mut hasher = Sha256::new();

    hasher.update(record.sequence.to_le_bytes());
    update_field(&mut hasher, record.prev_hash.as_bytes());
    update_field(&mut hasher, record.committed_at.to_rfc3339().as_bytes());
    update_field(&mut hasher, record.transaction.tx_id.as_str().as_bytes());

    hex::encode(hasher.finalize())
}

/// Verify hash chain integrity and that each record's tx id matches its content
pub fn verify_chain(records: &[JournalRecord]) -> Result<(), ChainError> {
    let mut prev_hash = GENESIS_HASH.to_string();

    for (i, record) in records.iter().enumerate() {
        if record.prev_hash != prev_hash {
            return Err(ChainError::BrokenLink {
                sequence: record.sequence,
                expected: prev_hash,
                actual: record.prev_hash.clone(),
            });
        }

        let calculated = calculate_record_hash(record);
        if record.hash != calculated {
            return Err(ChainError::InvalidHash {
                sequence: record.sequence,
                expected: calculated,
                actual: record.hash.clone(),
            });
        }

        let tx_id = calculate_tx_id(&record.transaction.transaction);
        if record.transaction.tx_id != tx_id {
            return Err(ChainError::TxIdMismatch {
                sequence: record.sequence,
                expected: tx_id.to_string(),
                actual: record.transaction.tx_id.to_string(),
            });
        }

        if i > 0 && record.sequence != records[i - 1].sequence + 1 {
            return Err(ChainError::InvalidSequence {
                expected: records[i - 1].sequence + 1,
                actual: record.sequence,
            });
        }

        prev_hash = record.hash.clone();
    }

    Ok(())
}

/// Errors in hash chain verification
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("Broken link at seq {sequence}: expected prev_hash '{expected}', got '{actual}'")]
    BrokenLink {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid hash at seq {sequence}: expected '{expected}', got '{actual}'")]
    InvalidHash {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Transaction id mismatch at seq {sequence}: expected '{expected}', got '{actual}'")]
    TxIdMismatch {
        sequence: u64,
        expected: String,
        actual: String,
    },

    #[error("Invalid sequence: expected {expected}, got {actual}")]
    InvalidSequence { expected: u64, actual: u64 },
}
