//! Mapping store: per-file metadata records plus the on-disk app-data layout
//! (mapping JSON + project summary markdown) under `<src>/.codeq/`.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

pub const APP_DATA_DIR: &str = ".codeq";
const MAPPING_FILE: &str = "code_mapping.json";
const SUMMARY_FILE: &str = "summary.md";
const SUMMARY_SEED: &str = "This document contains summaries of the codebase files.";

// ── Records ────────────────────────────────────────────────────────────────────

/// One indexed source file. `path` is relative to the source root and is the
/// unique key; `functions` is a comma-delimited name list as produced by the
/// mapping phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(rename = "file_name")]
    pub path: String,
    pub description: String,
    pub functions: String,
}

impl FileRecord {
    /// Structured-text form sent to the classification capability. The token
    /// cost of a record is measured over exactly this rendering.
    pub fn render(&self) -> String {
        format!(
            "file_name: {}\nDescription: {}\nFunctions: {}",
            self.path, self.description, self.functions
        )
    }
}

// ── Store ──────────────────────────────────────────────────────────────────────

/// Ordered collection of file records. Read-only during query processing;
/// the mapping phase is the only writer.
#[derive(Debug, Default, Clone)]
pub struct MappingStore {
    records: Vec<FileRecord>,
}

impl MappingStore {
    pub fn new(records: Vec<FileRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.records.iter().any(|r| r.path == path)
    }

    /// Replace-by-key if the path is already mapped, else append. Keeps the
    /// at-most-one-record-per-path invariant.
    pub fn upsert(&mut self, record: FileRecord) {
        match self.records.iter_mut().find(|r| r.path == record.path) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
    }
}

// ── App data ───────────────────────────────────────────────────────────────────

/// On-disk home of the mapping JSON and the project summary for one source
/// tree. Created lazily on first write.
#[derive(Debug, Clone)]
pub struct AppData {
    dir: PathBuf,
}

impl AppData {
    pub fn for_source(src_root: &Path) -> Self {
        Self {
            dir: src_root.join(APP_DATA_DIR),
        }
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.dir.join(MAPPING_FILE)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(SUMMARY_FILE)
    }

    /// Load the mapping store; an absent file is an empty store.
    pub fn load_store(&self) -> Result<MappingStore> {
        let path = self.mapping_path();
        if !path.exists() {
            return Ok(MappingStore::default());
        }
        let content = fs::read_to_string(&path)?;
        let records: Vec<FileRecord> = serde_json::from_str(&content)?;
        Ok(MappingStore::new(records))
    }

    pub fn save_store(&self, store: &MappingStore) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let content = serde_json::to_string_pretty(store.records())?;
        fs::write(self.mapping_path(), content)?;
        Ok(())
    }

    /// Read the project summary, seeding it with a fixed bootstrap line the
    /// first time so the summary-update prompt always has prior text to build on.
    pub fn read_summary(&self) -> Result<String> {
        let path = self.summary_path();
        if !path.exists() {
            fs::create_dir_all(&self.dir)?;
            fs::write(&path, SUMMARY_SEED)?;
            return Ok(SUMMARY_SEED.to_string());
        }
        Ok(fs::read_to_string(&path)?)
    }

    /// Overwrite the summary in full. No versioning, no diffing.
    pub fn save_summary(&self, summary: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.summary_path(), summary)?;
        Ok(())
    }
}

/// Read an extra-context document (plain text/markdown).
pub fn read_context_doc(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read context doc: {}", path.display()))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
