//! BestBid Vault - where current ledger states are looked up
//!
//! - `LedgerQuery`: the port transaction builders read through
//! - `StateQuery`: typed lookup predicates (no field lookup by name)
//! - `Vault`: arena of every state ever produced, indexed by `StateRef`
//! - `MemoryVault`: async, lock-protected `Vault` implementing `LedgerQuery`
//!
//! Consuming a state marks its record with the consuming transaction id.
//! Records are never removed, so the full history stays available for audit.

pub mod error;
pub mod memory;
pub mod query;
pub mod vault;

pub use error::{QueryError, VaultError};
pub use memory::MemoryVault;
pub use query::{LedgerQuery, StateQuery};
pub use vault::{StateRecord, Vault};
