//! Mapping phase: turns a source tree into the per-file metadata records the
//! query pipeline selects from, and keeps the whole-project summary current.
//! Per-file failures are collected, never fatal.

use colored::Colorize;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ScanConfig;
use crate::error::Result;
use crate::prompt;
use crate::provider::{extract_json, LanguageModel};
use crate::scan;
use crate::store::{AppData, FileRecord};

#[derive(Debug, Deserialize)]
struct FileAnalysis {
    description: String,
    functions: String,
}

#[derive(Debug, Default)]
pub struct MapReport {
    pub mapped: usize,
    pub skipped: usize,
    pub failed: Vec<(PathBuf, String)>,
}

pub struct MapOptions {
    /// Re-map files that already have a record.
    pub remap_existing: bool,
    /// Fold each mapped file into the project summary (one extra capability
    /// call per file).
    pub update_summary: bool,
}

/// Scan `src_root` and map every eligible file: one capability call produces
/// `{description, functions}`, the record is upserted by relative path, and
/// the store is persisted after each file so an interrupted run keeps its
/// progress.
pub fn run_mapping<M: LanguageModel>(
    model: &M,
    src_root: &Path,
    scan_cfg: &ScanConfig,
    opts: &MapOptions,
    verbose: u8,
) -> Result<MapReport> {
    let app_data = AppData::for_source(src_root);
    let mut store = app_data.load_store()?;
    let files = scan::scan_source(src_root, scan_cfg)?;

    let mut report = MapReport::default();
    let total = files.len();

    for (index, path) in files.iter().enumerate() {
        let rel = relative_key(src_root, path);

        if !opts.remap_existing && store.contains(&rel) {
            report.skipped += 1;
            continue;
        }

        eprintln!(
            "{} {}/{}: {}",
            "mapping".cyan(),
            index + 1,
            total,
            rel
        );

        match map_single_file(model, &app_data, path, &rel, opts.update_summary) {
            Ok(record) => {
                store.upsert(record);
                app_data.save_store(&store)?;
                report.mapped += 1;
            }
            Err(err) => {
                if verbose > 0 {
                    eprintln!("{} {rel}: {err}", "warn:".yellow());
                }
                report.failed.push((path.clone(), err.to_string()));
            }
        }
    }

    eprintln!(
        "{} {} mapped, {} skipped, {} failed",
        "done:".green(),
        report.mapped,
        report.skipped,
        report.failed.len()
    );
    Ok(report)
}

fn map_single_file<M: LanguageModel>(
    model: &M,
    app_data: &AppData,
    path: &Path,
    rel: &str,
    update_summary: bool,
) -> Result<FileRecord> {
    let content = fs::read_to_string(path)?;

    let raw = model.complete(&prompt::file_mapping(rel, &content))?;
    let analysis: FileAnalysis = serde_json::from_value(extract_json(&raw)?)?;

    if update_summary {
        let existing = app_data.read_summary()?;
        let updated = model.complete(&prompt::summary_update(&existing, rel, &content))?;
        app_data.save_summary(&updated)?;
    }

    Ok(FileRecord {
        path: rel.to_string(),
        description: analysis.description,
        functions: analysis.functions,
    })
}

/// Store key: path relative to the source root, forward slashes.
fn relative_key(src_root: &Path, path: &Path) -> String {
    path.strip_prefix(src_root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use std::cell::RefCell;

    struct ScriptedModel {
        responses: RefCell<Vec<String>>,
        calls: RefCell<usize>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<&str>) -> Self {
            let mut rs: Vec<String> = responses.into_iter().map(String::from).collect();
            rs.reverse();
            Self {
                responses: RefCell::new(rs),
                calls: RefCell::new(0),
            }
        }
    }

    impl LanguageModel for ScriptedModel {
        fn complete(&self, _prompt: &str) -> Result<String> {
            *self.calls.borrow_mut() += 1;
            self.responses
                .borrow_mut()
                .pop()
                .ok_or_else(|| CoreError::Provider("script exhausted".into()))
        }
    }

    const ANALYSIS: &str = r#"{"description": "entry point", "functions": "main"}"#;

    fn opts(remap: bool) -> MapOptions {
        MapOptions {
            remap_existing: remap,
            update_summary: false,
        }
    }

    #[test]
    fn test_mapping_creates_records_with_relative_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/main.py"), "def main(): pass").unwrap();

        let model = ScriptedModel::new(vec![ANALYSIS]);
        let report =
            run_mapping(&model, dir.path(), &ScanConfig::default(), &opts(false), 0).unwrap();
        assert_eq!(report.mapped, 1);
        assert!(report.failed.is_empty());

        let store = AppData::for_source(dir.path()).load_store().unwrap();
        assert_eq!(store.records()[0].path, "src/main.py");
        assert_eq!(store.records()[0].description, "entry point");
        assert_eq!(store.records()[0].functions, "main");
    }

    #[test]
    fn test_already_mapped_files_skipped_unless_remap() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "x = 1").unwrap();

        let first = ScriptedModel::new(vec![ANALYSIS]);
        run_mapping(&first, dir.path(), &ScanConfig::default(), &opts(false), 0).unwrap();

        let second = ScriptedModel::new(vec![]);
        let report =
            run_mapping(&second, dir.path(), &ScanConfig::default(), &opts(false), 0).unwrap();
        assert_eq!(report.skipped, 1);
        assert_eq!(*second.calls.borrow(), 0, "no capability call for mapped files");

        let third = ScriptedModel::new(vec![r#"{"description": "new", "functions": "f"}"#]);
        let report =
            run_mapping(&third, dir.path(), &ScanConfig::default(), &opts(true), 0).unwrap();
        assert_eq!(report.mapped, 1);

        let store = AppData::for_source(dir.path()).load_store().unwrap();
        assert_eq!(store.len(), 1, "remap replaces, never duplicates");
        assert_eq!(store.records()[0].description, "new");
    }

    #[test]
    fn test_malformed_analysis_is_collected_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "x = 1").unwrap();
        fs::write(dir.path().join("b.py"), "y = 2").unwrap();

        let model = ScriptedModel::new(vec!["not json at all", ANALYSIS]);
        let report =
            run_mapping(&model, dir.path(), &ScanConfig::default(), &opts(false), 0).unwrap();
        assert_eq!(report.mapped, 1);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("a.py"));
    }

    #[test]
    fn test_summary_updated_per_file_when_enabled() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "x = 1").unwrap();

        let model = ScriptedModel::new(vec![ANALYSIS, "project maps one file"]);
        let options = MapOptions {
            remap_existing: false,
            update_summary: true,
        };
        run_mapping(&model, dir.path(), &ScanConfig::default(), &options, 0).unwrap();

        let summary = AppData::for_source(dir.path()).read_summary().unwrap();
        assert_eq!(summary, "project maps one file");
    }
}
