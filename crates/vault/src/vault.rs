//! State arena
//!
//! This state is rebuilt from journal replay on startup.

use crate::error::VaultError;
use crate::query::StateQuery;
use bestbid_ledger::{JournalRecord, StateAndRef, StateRef, Transaction, TxId};
use std::collections::HashMap;
use tracing::debug;

/// One produced state and, once spent, the transaction that consumed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateRecord {
    pub state: StateAndRef,
    pub consumed_by: Option<TxId>,
}

impl StateRecord {
    pub fn is_consumed(&self) -> bool {
        self.consumed_by.is_some()
    }
}

/// Append-only arena of every state the ledger has produced
#[derive(Debug, Default)]
pub struct Vault {
    records: Vec<StateRecord>,
    index: HashMap<StateRef, usize>,
}

impl Vault {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, state_ref: &StateRef) -> Option<&StateRecord> {
        self.index.get(state_ref).map(|&slot| &self.records[slot])
    }

    /// Whether a transaction with this id has already been recorded
    pub fn contains_transaction(&self, tx_id: &TxId) -> bool {
        self.index.contains_key(&StateRef::new(tx_id.clone(), 0))
    }

    /// Check every input of `tx` is known and still unconsumed
    pub fn check_current(&self, tx: &Transaction) -> Result<(), VaultError> {
        for state_ref in tx.input_refs() {
            let record = self
                .get(state_ref)
                .ok_or_else(|| VaultError::UnknownState(state_ref.clone()))?;
            if let Some(consumed_by) = &record.consumed_by {
                return Err(VaultError::AlreadyConsumed {
                    state: state_ref.clone(),
                    consumed_by: consumed_by.clone(),
                });
            }
        }
        Ok(())
    }

    /// Mark the inputs of `tx` consumed and add its outputs.
    ///
    /// Nothing is changed if any input is unknown or already consumed.
    pub fn record(&mut self, tx_id: &TxId, tx: &Transaction) -> Result<(), VaultError> {
        if self.contains_transaction(tx_id) {
            return Err(VaultError::DuplicateTransaction(tx_id.clone()));
        }
        self.check_current(tx)?;

        for state_ref in tx.input_refs() {
            if let Some(&slot) = self.index.get(state_ref) {
                self.records[slot].consumed_by = Some(tx_id.clone());
            }
        }

        for output in tx.output_refs(tx_id) {
            self.index.insert(output.state_ref.clone(), self.records.len());
            self.records.push(StateRecord {
                state: output,
                consumed_by: None,
            });
        }

        debug!(
            tx_id = %tx_id.short(),
            consumed = tx.inputs.len(),
            produced = tx.outputs.len(),
            "Transaction recorded in vault"
        );
        Ok(())
    }

    /// Rebuild from journal records, in sequence order
    pub fn replay<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a JournalRecord>,
    ) -> Result<usize, VaultError> {
        let mut count = 0;
        for record in records {
            self.record(&record.transaction.tx_id, &record.transaction.transaction)?;
            count += 1;
        }
        Ok(count)
    }

    /// Current states matching the query, in production order
    pub fn unconsumed(&self, query: &StateQuery) -> Vec<StateAndRef> {
        self.records
            .iter()
            .filter(|record| !record.is_consumed() && query.matches(&record.state.state))
            .map(|record| record.state.clone())
            .collect()
    }

    /// Every version matching the query, consumed ones included
    pub fn history(&self, query: &StateQuery) -> Vec<&StateRecord> {
        self.records
            .iter()
            .filter(|record| query.matches(&record.state.state))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
