//! BestBid Events - JSONL journal
//!
//! Every committed transaction is appended here as one `JournalRecord` per
//! line. The journal is the source of truth; the vault is rebuilt from it on
//! startup.

pub mod error;
pub mod reader;
pub mod store;

pub use error::EventError;
pub use reader::EventReader;
pub use store::EventStore;
