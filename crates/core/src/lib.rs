//! BestBid Core - Ledger state types
//!
//! Immutable value records that live on the settlement ledger:
//! - `FundsAccount`: a wallet balance version, keyed by external address
//! - `AuctionItem`: an NFT auction record, keyed by item id
//! - `Party`: an identity that must co-sign transactions touching a state
//!
//! States are never mutated in place. A change is always expressed as a new
//! version produced by a transaction that consumes the old one.

pub mod party;
pub mod state;

pub use party::Party;
pub use state::{AuctionItem, FundsAccount, FundsTxType, LedgerState, StateKind};
