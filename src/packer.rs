//! Content packer: builds one generation-sized chunk of labeled file contents
//! per round. Same greedy prefix discipline as the budgeter, measured over the
//! exact wrapped text that will be sent, with per-file read failures recorded
//! and skipped instead of aborting the round.

use std::fs;
use std::path::{Path, PathBuf};

use crate::budget::{estimate_tokens, TokenBudget};
use crate::error::{CoreError, Result};

/// One packed round of file contents.
#[derive(Debug)]
pub struct ContentChunk {
    /// Concatenated labeled blocks, ready to embed in the synthesis prompt.
    pub text: String,
    /// Files consumed this round because they could not be read. Explicit so
    /// callers and tests can assert on what was skipped.
    pub dropped: Vec<DroppedFile>,
}

#[derive(Debug)]
pub struct DroppedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Labeled block around one file's raw content. Costing and sending use the
/// same bytes, so the estimate can never undercount the wrapper.
fn wrap(path: &Path, content: &str) -> String {
    format!("File: {}\n{}\n---\n", path.display(), content)
}

/// Pack the longest readable prefix of `files` that fits beside the query and
/// the extra-context document. Returns the chunk and the untouched suffix.
///
/// Fails eagerly with `BudgetExceeded` when the fixed overhead leaves no room
/// at all, and with `NoFilesSelected` when not a single file fits — an empty
/// chunk is never returned as success, so every `Ok` strictly shrinks the
/// caller's remaining list.
pub fn next_chunk(
    query: &str,
    extra_context: &str,
    files: &[PathBuf],
    budget: &TokenBudget,
) -> Result<(ContentChunk, Vec<PathBuf>)> {
    let overhead = estimate_tokens(query) + estimate_tokens(extra_context);
    let room = budget.room_after(overhead).ok_or(CoreError::BudgetExceeded {
        overhead,
        capacity: budget.capacity(),
    })?;

    let mut blocks: Vec<String> = Vec::new();
    let mut dropped: Vec<DroppedFile> = Vec::new();
    let mut used = 0usize;
    let mut cursor = 0usize;

    while cursor < files.len() {
        let path = &files[cursor];
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                // Unreadable file: consumed, reported, round continues.
                dropped.push(DroppedFile {
                    path: path.clone(),
                    reason: err.to_string(),
                });
                cursor += 1;
                continue;
            }
        };

        let block = wrap(path, &content);
        let cost = estimate_tokens(&block);
        if used + cost > room {
            break;
        }
        used += cost;
        blocks.push(block);
        cursor += 1;
    }

    if blocks.is_empty() {
        return Err(CoreError::NoFilesSelected);
    }

    let remaining = files[cursor..].to_vec();
    Ok((
        ContentChunk {
            text: blocks.join("\n"),
            dropped,
        },
        remaining,
    ))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
