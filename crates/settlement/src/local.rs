//! Single-process orchestrator
//!
//! Flow: Verify → Sign → Notarise → Journal → Record

use crate::outcome::{RejectionReason, SettlementOutcome};
use crate::traits::SettlementOrchestrator;
use async_trait::async_trait;
use bestbid_core::Party;
use bestbid_events::EventStore;
use bestbid_ledger::{validate, LedgerError, SignedTransaction, Signer, Transaction, TxId};
use bestbid_vault::{MemoryVault, VaultError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Local notary: holds every party's signer and is the single writer of the
/// vault and journal.
pub struct LocalSettlement {
    vault: Arc<MemoryVault>,
    /// Also serialises commits
    journal: Mutex<Option<EventStore>>,
    signers: HashMap<Party, Arc<dyn Signer>>,
}

impl LocalSettlement {
    /// Settlement without a journal; commits live only in the vault
    pub fn new(vault: Arc<MemoryVault>) -> Self {
        Self {
            vault,
            journal: Mutex::new(None),
            signers: HashMap::new(),
        }
    }

    pub fn with_journal(mut self, store: EventStore) -> Self {
        self.journal = Mutex::new(Some(store));
        self
    }

    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.register_signer(signer);
        self
    }

    pub fn register_signer(&mut self, signer: Arc<dyn Signer>) {
        self.signers.insert(signer.party().clone(), signer);
    }

    /// Re-run contract verification and the participant check
    fn verify(&self, tx: &Transaction) -> Result<(), RejectionReason> {
        validate(tx).map_err(|e| RejectionReason::Invalid(e.rule()))?;

        for state in tx.states() {
            for party in state.participants() {
                if !tx.signers.contains(party) {
                    return Err(RejectionReason::Invalid(format!(
                        "Participant {} of a consumed or produced state must be a required signer",
                        party
                    )));
                }
            }
        }
        Ok(())
    }

    /// One signature per party in `tx.signers` and `required_signers`
    fn collect_signatures(
        &self,
        tx: Transaction,
        required_signers: &[Party],
    ) -> Result<SignedTransaction, RejectionReason> {
        let mut parties: Vec<Party> = tx.signers.clone();
        for party in required_signers {
            if !parties.contains(party) {
                parties.push(party.clone());
            }
        }

        let mut signed = SignedTransaction::new(tx);
        for party in &parties {
            let signer = self.signers.get(party).ok_or_else(|| {
                warn!(party = %party, "No signer registered for party");
                RejectionReason::SignatureRefused {
                    party: party.clone(),
                }
            })?;
            let signature = signer.sign(&signed.tx_id);
            signed.add_signature(signature);
            debug!(party = %party, tx_id = %signed.tx_id.short(), "Signature collected");
        }

        signed.verify_signatures().map_err(|e| match e {
            LedgerError::MissingSignature(party) => RejectionReason::SignatureRefused { party },
            other => RejectionReason::Invalid(other.to_string()),
        })?;

        Ok(signed)
    }

    /// Notarise, journal and record under the commit lock
    async fn commit(&self, signed: SignedTransaction) -> Result<TxId, RejectionReason> {
        let mut journal = self.journal.lock().await;
        let mut vault = self.vault.write().await;

        if vault.contains_transaction(&signed.tx_id) {
            return Err(RejectionReason::Invalid(format!(
                "Transaction {} already committed",
                signed.tx_id
            )));
        }
        vault.check_current(&signed.transaction).map_err(conflict)?;

        if let Some(store) = journal.as_mut() {
            let record = store
                .commit(signed.clone())
                .map_err(|e| RejectionReason::Storage(e.to_string()))?;
            debug!(sequence = record.sequence, "Journal record written");
        }

        vault
            .record(&signed.tx_id, &signed.transaction)
            .map_err(|e| RejectionReason::Storage(e.to_string()))?;

        Ok(signed.tx_id)
    }
}

fn conflict(err: VaultError) -> RejectionReason {
    match err {
        VaultError::AlreadyConsumed { state, consumed_by } => RejectionReason::Conflict {
            state,
            consumed_by: Some(consumed_by),
        },
        VaultError::UnknownState(state) => RejectionReason::Conflict {
            state,
            consumed_by: None,
        },
        other => RejectionReason::Storage(other.to_string()),
    }
}

#[async_trait]
impl SettlementOrchestrator for LocalSettlement {
    fn name(&self) -> &str {
        "local"
    }

    async fn propose(&self, transaction: Transaction, required_signers: &[Party]) -> SettlementOutcome {
        let correlation_id = transaction.correlation_id.clone();
        let command = transaction.command.to_string();
        info!(%correlation_id, %command, "Settlement proposal received");

        let result = match self.verify(&transaction) {
            Ok(()) => match self.collect_signatures(transaction, required_signers) {
                Ok(signed) => self.commit(signed).await,
                Err(reason) => Err(reason),
            },
            Err(reason) => Err(reason),
        };

        match result {
            Ok(tx_id) => {
                info!(%correlation_id, tx_id = %tx_id.short(), "Transaction committed");
                SettlementOutcome::Committed(tx_id)
            }
            Err(reason) => {
                warn!(%correlation_id, %reason, "Transaction rejected");
                SettlementOutcome::Rejected(reason)
            }
        }
    }
}
