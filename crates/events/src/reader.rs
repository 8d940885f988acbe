//! JSONL journal reader - sequential reader for replay and audit

use crate::error::EventError;
use bestbid_ledger::JournalRecord;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Sequential journal reader
pub struct EventReader {
    files: Vec<PathBuf>,
}

impl EventReader {
    /// Create a new reader from a directory
    pub fn from_directory(path: impl AsRef<Path>) -> Result<Self, EventError> {
        let path = path.as_ref();
        let mut files = Vec::new();

        if path.exists() {
            for entry in std::fs::read_dir(path)? {
                let file_path = entry?.path();
                if file_path.extension().map_or(false, |ext| ext == "jsonl") {
                    files.push(file_path);
                }
            }
        }

        files.sort();

        Ok(Self { files })
    }

    /// Read all records from all files in order
    pub fn read_all(&self) -> Result<Vec<JournalRecord>, EventError> {
        let mut records = Vec::new();
        for file_path in &self.files {
            read_file(file_path, &mut records)?;
        }
        Ok(records)
    }

    /// Last record of the journal (for the next prev_hash)
    pub fn last_record(&self) -> Result<Option<JournalRecord>, EventError> {
        let Some(last_file) = self.files.last() else {
            return Ok(None);
        };

        let mut records = Vec::new();
        read_file(last_file, &mut records)?;
        Ok(records.pop())
    }
}

fn read_file(file_path: &Path, records: &mut Vec<JournalRecord>) -> Result<(), EventError> {
    let reader = BufReader::new(File::open(file_path)?);

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record: JournalRecord =
            serde_json::from_str(&line).map_err(|e| EventError::InvalidLine {
                file: file_path.display().to_string(),
                line: index + 1,
                reason: e.to_string(),
            })?;
        records.push(record);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let reader = EventReader::from_directory(dir.path().join("nope")).unwrap();

        assert!(reader.read_all().unwrap().is_empty());
        assert!(reader.last_record().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_line_reports_position() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("2024-01-01.jsonl"), "\n{not json}\n").unwrap();

        let reader = EventReader::from_directory(dir.path()).unwrap();
        match reader.read_all() {
            Err(EventError::InvalidLine { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected InvalidLine, got {:?}", other.map(|r| r.len())),
        }
    }
}
