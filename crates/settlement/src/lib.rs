//! BestBid Settlement - final commit of validated transactions
//!
//! Builders hand a locally validated `Transaction` to a
//! `SettlementOrchestrator` and get back `Committed(tx_id)` or
//! `Rejected(reason)`. The orchestrator owns the only path that changes
//! ledger state.
//!
//! `LocalSettlement` is the single-process orchestrator:
//! Verify → Sign → Notarise → Journal → Record

pub mod local;
pub mod outcome;
pub mod traits;

pub use local::LocalSettlement;
pub use outcome::{RejectionReason, SettlementOutcome};
pub use traits::SettlementOrchestrator;
