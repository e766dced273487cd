//! Path verifier: reconciles capability-returned candidate paths against the
//! real source tree. Providers routinely return stale or re-rooted paths; the
//! fallback is an exact-filename search of the whole tree.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Verify candidates against `src_root`. Existing paths are accepted as-is
/// (resolved relative to the root); otherwise the tree is searched for the
/// candidate's base filename and the first match in traversal order wins
/// (traversal order is filesystem-dependent). Unresolvable candidates are
/// dropped. The result is deduplicated, first-seen order preserved.
pub fn verify_paths(src_root: &Path, candidates: &[String]) -> Vec<PathBuf> {
    let mut verified: Vec<PathBuf> = Vec::new();
    let mut seen: HashSet<PathBuf> = HashSet::new();

    for candidate in candidates {
        let resolved = src_root.join(candidate);
        let accepted = if resolved.exists() {
            Some(resolved)
        } else {
            resolved
                .file_name()
                .map(|n| n.to_os_string())
                .and_then(|name| find_by_name(src_root, &name))
        };

        if let Some(path) = accepted {
            if seen.insert(path.clone()) {
                verified.push(path);
            }
        }
    }

    verified
}

fn find_by_name(src_root: &Path, name: &std::ffi::OsStr) -> Option<PathBuf> {
    WalkDir::new(src_root)
        .into_iter()
        .filter_map(|e| e.ok())
        .find(|e| e.file_type().is_file() && e.file_name() == name)
        .map(|e| e.into_path())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_existing_relative_path_accepted_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/app.py"), "x").unwrap();

        let out = verify_paths(dir.path(), &["src/app.py".into()]);
        assert_eq!(out, vec![dir.path().join("src/app.py")]);
    }

    #[test]
    fn test_stale_prefix_recovered_by_filename_search() {
        // Candidate claims utils/helper.py; the real file lives in src/lib/.
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/lib")).unwrap();
        fs::write(dir.path().join("src/lib/helper.py"), "x").unwrap();

        let out = verify_paths(dir.path(), &["utils/helper.py".into()]);
        assert_eq!(out, vec![dir.path().join("src/lib/helper.py")]);
    }

    #[test]
    fn test_unresolvable_candidate_dropped_silently() {
        let dir = tempfile::tempdir().unwrap();
        let out = verify_paths(dir.path(), &["ghost.py".into()]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_dedup_preserves_first_seen_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.py"), "x").unwrap();
        fs::write(dir.path().join("b.py"), "x").unwrap();

        let out = verify_paths(
            dir.path(),
            &["b.py".into(), "a.py".into(), "b.py".into(), "missing/b.py".into()],
        );
        assert_eq!(out, vec![dir.path().join("b.py"), dir.path().join("a.py")]);
    }
}
