//! Application context - wires everything together

use crate::config::NodeConfig;
use bestbid_core::Party;
use bestbid_events::{EventReader, EventStore};
use bestbid_flows::FlowContext;
use bestbid_settlement::LocalSettlement;
use bestbid_vault::MemoryVault;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Application context - wires together all components
pub struct AppContext {
    pub config: NodeConfig,
    pub vault: Arc<MemoryVault>,
    pub flows: FlowContext,
    journal_path: PathBuf,
    replayed: usize,
}

impl AppContext {
    /// Create a new application context
    ///
    /// Flow: Replay journal → Open journal → Load signers → Wire builders
    pub async fn new(config: NodeConfig) -> Result<Self, anyhow::Error> {
        let journal_path = config.journal_path();
        std::fs::create_dir_all(&journal_path)?;

        // Rebuild current states from the journal
        let records = EventReader::from_directory(&journal_path)?.read_all()?;
        let vault = Arc::new(MemoryVault::new());
        let replayed = vault.replay(&records).await?;
        let event_store = EventStore::new(&journal_path)?;
        info!(
            replayed,
            sequence = event_store.last_sequence(),
            journal = %journal_path.display(),
            "Journal replayed"
        );

        let me = config.initiator_party();
        let counterparty = config.counterparty_party();
        let settlement = LocalSettlement::new(vault.clone())
            .with_journal(event_store)
            .with_signer(Arc::new(config.signer(&me)?))
            .with_signer(Arc::new(config.signer(&counterparty)?));

        let flows = FlowContext::new(me, vault.clone(), Arc::new(settlement));

        Ok(Self {
            config,
            vault,
            flows,
            journal_path,
            replayed,
        })
    }

    /// Party that co-signs every transaction this node builds
    pub fn counterparty(&self) -> Party {
        self.config.counterparty_party()
    }

    /// Get journal path
    pub fn journal_path(&self) -> &Path {
        &self.journal_path
    }

    /// Number of transactions replayed on startup
    pub fn replayed(&self) -> usize {
        self.replayed
    }
}
