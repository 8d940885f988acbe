//! Orchestrator port

use crate::outcome::SettlementOutcome;
use async_trait::async_trait;
use bestbid_core::Party;
use bestbid_ledger::Transaction;

/// Drives signature collection and the final, race-free commit.
///
/// Treated as atomic and authoritative: callers never assume success before
/// `propose` returns, and a `Rejected` outcome leaves the ledger untouched.
#[async_trait]
pub trait SettlementOrchestrator: Send + Sync {
    /// Name for logging
    fn name(&self) -> &str;

    async fn propose(&self, transaction: Transaction, required_signers: &[Party]) -> SettlementOutcome;
}
