//! Node configuration
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Environment variables override the file:
//! - `BESTBID_DATA_DIR`
//! - `BESTBID_<PARTY>_KEY` (party name uppercased, e.g. `BESTBID_PARTYA_KEY`)

use bestbid_core::Party;
use bestbid_ledger::PartySigner;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Root of the journal
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Party this node acts as
    #[serde(default = "default_initiator")]
    pub initiator: String,

    /// Party that co-signs every transaction
    #[serde(default = "default_counterparty")]
    pub counterparty: String,

    /// Party name -> hex ed25519 seed
    #[serde(default)]
    pub signer_keys: BTreeMap<String, String>,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_initiator() -> String {
    "PartyA".to_string()
}

fn default_counterparty() -> String {
    "PartyB".to_string()
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            initiator: default_initiator(),
            counterparty: default_counterparty(),
            signer_keys: BTreeMap::new(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from file
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        Self::load_str(&content)
    }

    /// Load configuration from string
    pub fn load_str(content: &str) -> Result<Self, ConfigError> {
        let config: NodeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// File (if any), then environment overrides, then validation
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::load_file(path)?,
            None => Self::default(),
        };
        config.apply_env_from(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("BESTBID_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }

        for party in [self.initiator.clone(), self.counterparty.clone()] {
            if let Some(key) = lookup(&key_env_var(&party)) {
                self.signer_keys.insert(party, key);
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initiator.trim().is_empty() || self.counterparty.trim().is_empty() {
            return Err(ConfigError::Validation(
                "initiator and counterparty must be named".to_string(),
            ));
        }
        if self.initiator == self.counterparty {
            return Err(ConfigError::Validation(format!(
                "initiator and counterparty must differ (both are {})",
                self.initiator
            )));
        }
        for (party, key) in &self.signer_keys {
            PartySigner::from_hex(Party::new(party.as_str()), key)
                .map_err(|e| ConfigError::Validation(format!("signer key for {}: {}", party, e)))?;
        }
        Ok(())
    }

    pub fn initiator_party(&self) -> Party {
        Party::new(self.initiator.as_str())
    }

    pub fn counterparty_party(&self) -> Party {
        Party::new(self.counterparty.as_str())
    }

    pub fn journal_path(&self) -> PathBuf {
        self.data_dir.join("journal")
    }

    /// Configured signer for `party`, or a fresh key for this process only
    pub fn signer(&self, party: &Party) -> Result<PartySigner, ConfigError> {
        match self.signer_keys.get(party.name()) {
            Some(key) => PartySigner::from_hex(party.clone(), key)
                .map_err(|e| ConfigError::Validation(format!("signer key for {}: {}", party, e))),
            None => {
                warn!(
                    %party,
                    env = %key_env_var(party.name()),
                    "No signer key configured, generating an ephemeral key"
                );
                Ok(PartySigner::generate(party.clone()))
            }
        }
    }
}

/// Environment variable holding the signer key for `party`
pub fn key_env_var(party: &str) -> String {
    let name: String = party
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect();
    format!("BESTBID_{}_KEY", name)
}
