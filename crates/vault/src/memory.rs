//! In-memory vault shared between builders and the settlement layer

use crate::error::{QueryError, VaultError};
use crate::query::{LedgerQuery, StateQuery};
use crate::vault::{StateRecord, Vault};
use async_trait::async_trait;
use bestbid_ledger::{JournalRecord, StateAndRef, Transaction, TxId};
use tokio::sync::{RwLock, RwLockWriteGuard};

/// `Vault` behind an async read/write lock.
///
/// Readers see either all or none of a recorded transaction.
#[derive(Debug, Default)]
pub struct MemoryVault {
    inner: RwLock<Vault>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive access, for check-then-record sequences
    pub async fn write(&self) -> RwLockWriteGuard<'_, Vault> {
        self.inner.write().await
    }

    pub async fn record(&self, tx_id: &TxId, tx: &Transaction) -> Result<(), VaultError> {
        self.inner.write().await.record(tx_id, tx)
    }

    /// Every version matching the query, consumed ones included
    pub async fn history(&self, query: &StateQuery) -> Vec<StateRecord> {
        self.inner
            .read()
            .await
            .history(query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn replay(&self, records: &[JournalRecord]) -> Result<usize, VaultError> {
        self.inner.write().await.replay(records)
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[async_trait]
impl LedgerQuery for MemoryVault {
    async fn find_unconsumed(&self, query: &StateQuery) -> Result<Vec<StateAndRef>, QueryError> {
        Ok(self.inner.read().await.unconsumed(query))
    }
}
