//! BestBid Flows - transaction builders
//!
//! One async builder per business action. Each builder:
//! 1. Reads current states through the `LedgerQuery` port
//! 2. Assembles the consumed and produced states plus the command
//! 3. Runs contract verification locally (fail fast, nothing proposed)
//! 4. Proposes the transaction to the `SettlementOrchestrator`
//!
//! Builders never change ledger state themselves. Dropping a builder future
//! before `propose` returns leaves the ledger untouched.

pub mod auction;
pub mod context;
pub mod error;
pub mod funds;

pub use auction::{end_auction, issue_item, place_bid};
pub use context::{FinalizedTransaction, FlowContext};
pub use error::FlowError;
pub use funds::add_funds;
