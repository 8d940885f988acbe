//! Builder context

use crate::error::FlowError;
use bestbid_core::Party;
use bestbid_ledger::{validate, StateAndRef, Transaction, TransactionBuilder, TxId};
use bestbid_settlement::SettlementOrchestrator;
use bestbid_vault::{LedgerQuery, StateQuery};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// A transaction the orchestrator confirmed as committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedTransaction {
    pub tx_id: TxId,
    pub transaction: Transaction,
}

/// What a builder runs against: who we are, where to read, where to propose
#[derive(Clone)]
pub struct FlowContext {
    pub me: Party,
    pub query: Arc<dyn LedgerQuery>,
    pub settlement: Arc<dyn SettlementOrchestrator>,
}

impl FlowContext {
    pub fn new(
        me: Party,
        query: Arc<dyn LedgerQuery>,
        settlement: Arc<dyn SettlementOrchestrator>,
    ) -> Self {
        Self {
            me,
            query,
            settlement,
        }
    }

    /// Transaction builder with a fresh correlation id, signed by us and the counterparty
    pub(crate) fn transaction(&self, counterparty: &Party) -> TransactionBuilder {
        TransactionBuilder::new()
            .correlation_id(Uuid::new_v4().to_string())
            .signer(self.me.clone())
            .signer(counterparty.clone())
    }

    pub(crate) async fn find_one(&self, query: StateQuery) -> Result<Option<StateAndRef>, FlowError> {
        Ok(self.query.find_one(&query).await?)
    }

    /// Verify locally, then propose to the orchestrator
    pub(crate) async fn finalize(&self, tx: Transaction) -> Result<FinalizedTransaction, FlowError> {
        if let Err(err) = validate(&tx) {
            warn!(correlation_id = %tx.correlation_id, rule = %err, "Proposal failed local verification");
            return Err(err.into());
        }

        let signers = tx.signers.clone();
        debug!(
            correlation_id = %tx.correlation_id,
            settlement = self.settlement.name(),
            "Proposing transaction"
        );

        let tx_id = self
            .settlement
            .propose(tx.clone(), &signers)
            .await
            .into_result()
            .map_err(FlowError::SettlementRejected)?;

        Ok(FinalizedTransaction {
            tx_id,
            transaction: tx,
        })
    }
}
