//! Source tree scanner: yields the code files eligible for mapping, filtered
//! by extension allow-list and excluded directory names.

use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

use crate::config::ScanConfig;
use crate::error::{CoreError, Result};

/// Recursively collect eligible code files under `src_root`, sorted for a
/// deterministic mapping order.
pub fn scan_source(src_root: &Path, cfg: &ScanConfig) -> Result<Vec<PathBuf>> {
    if !src_root.exists() {
        return Err(CoreError::SourceNotFound(src_root.to_path_buf()));
    }

    let excluded = cfg.exclude_dirs.clone();
    let mut builder = WalkBuilder::new(src_root);
    builder
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .filter_entry(move |entry| {
            let name = entry.file_name().to_string_lossy();
            !excluded.iter().any(|dir| dir == name.as_ref())
        });

    let mut files = Vec::new();
    for entry in builder.build() {
        let entry = match entry {
            Ok(value) => value,
            Err(_) => continue,
        };
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        let path = entry.path();
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_string())
            .unwrap_or_default();
        if cfg.extensions.iter().any(|allowed| *allowed == ext) {
            files.push(path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_filters_extensions_and_excluded_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::create_dir_all(root.join("node_modules")).unwrap();
        fs::write(root.join("src/main.py"), "print('hi')").unwrap();
        fs::write(root.join("src/lib.rs"), "fn x() {}").unwrap();
        fs::write(root.join("src/notes.txt"), "not code").unwrap();
        fs::write(root.join("node_modules/dep.py"), "skipped").unwrap();

        let files = scan_source(root, &ScanConfig::default()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();

        assert!(names.contains(&"main.py".to_string()));
        assert!(names.contains(&"lib.rs".to_string()));
        assert!(!names.contains(&"notes.txt".to_string()));
        assert!(!names.contains(&"dep.py".to_string()), "excluded dir leaked");
    }

    #[test]
    fn test_scan_missing_root_errors() {
        let err = scan_source(Path::new("/nonexistent/codeq-test"), &ScanConfig::default());
        assert!(matches!(err, Err(CoreError::SourceNotFound(_))));
    }
}
