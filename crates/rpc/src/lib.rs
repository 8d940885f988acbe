//! BestBid RPC - CLI orchestrator
//!
//! Loads `NodeConfig`, replays the journal into a fresh vault and wires the
//! builders to the local notary.

pub mod commands;
pub mod config;
pub mod context;

pub use config::{ConfigError, NodeConfig};
pub use context::AppContext;
