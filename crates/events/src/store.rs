//! JSONL journal store - append-only writer

use crate::error::EventError;
use crate::reader::EventReader;
use bestbid_ledger::hash::GENESIS_HASH;
use bestbid_ledger::{calculate_record_hash, JournalRecord, SignedTransaction};
use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Append-only JSONL journal, rotated daily
pub struct EventStore {
    base_path: PathBuf,
    current_file: Option<BufWriter<File>>,
    current_date: Option<String>,
    last_sequence: u64,
    last_hash: String,
}

impl EventStore {
    /// Open the journal at the given path, resuming after its last record
    pub fn new(base_path: impl AsRef<Path>) -> Result<Self, EventError> {
        let base_path = base_path.as_ref().to_path_buf();
        fs::create_dir_all(&base_path)?;

        let (last_sequence, last_hash) = match EventReader::from_directory(&base_path)?.last_record()? {
            Some(record) => (record.sequence, record.hash),
            None => (0, GENESIS_HASH.to_string()),
        };

        Ok(Self {
            base_path,
            current_file: None,
            current_date: None,
            last_sequence,
            last_hash,
        })
    }

    /// Chain a signed transaction onto the journal and persist it
    pub fn commit(&mut self, transaction: SignedTransaction) -> Result<JournalRecord, EventError> {
        let mut record = JournalRecord {
            sequence: self.last_sequence + 1,
            prev_hash: self.last_hash.clone(),
            hash: String::new(),
            committed_at: Utc::now(),
            transaction,
        };
        record.hash = calculate_record_hash(&record);

        self.append(&record)?;
        Ok(record)
    }

    /// Append an already chained record to the store
    pub fn append(&mut self, record: &JournalRecord) -> Result<(), EventError> {
        let date = record.committed_at.format("%Y-%m-%d").to_string();

        if self.current_date.as_ref() != Some(&date) {
            self.rotate_file(&date)?;
        }

        if let Some(ref mut writer) = self.current_file {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }

        self.last_sequence = record.sequence;
        self.last_hash = record.hash.clone();
        debug!(sequence = record.sequence, tx_id = %record.transaction.tx_id.short(), "Journal record appended");

        Ok(())
    }

    /// Rotate to a new file for the given date
    fn rotate_file(&mut self, date: &str) -> Result<(), EventError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }

        let file_path = self.base_path.join(format!("{}.jsonl", date));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&file_path)?;

        self.current_file = Some(BufWriter::new(file));
        self.current_date = Some(date.to_string());

        Ok(())
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Flush and close the current file
    pub fn close(&mut self) -> Result<(), EventError> {
        if let Some(ref mut writer) = self.current_file {
            writer.flush()?;
        }
        self.current_file = None;
        self.current_date = None;
        Ok(())
    }
}

impl Drop for EventStore {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
