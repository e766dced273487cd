//! Query synthesizer: drives generation rounds over packed content chunks.
//! Each round's output replaces the previous one and is re-supplied to the
//! capability as context — cumulative building is the model's job, the
//! pipeline never merges text structurally.

use colored::Colorize;
use std::path::PathBuf;

use crate::budget::TokenBudget;
use crate::error::{CoreError, Result};
use crate::packer;
use crate::prompt;
use crate::provider::LanguageModel;

/// Answer `query` over the verified `files`, chunk by chunk. The returned text
/// is the last round's output.
///
/// Termination: every successful packing round consumes at least one file, so
/// the loop runs at most `files.len()` rounds. A round where nothing fits
/// stops the loop and returns the best accumulated output; `BudgetExceeded`
/// (overhead alone too large) is fatal and propagates.
pub fn run<M: LanguageModel>(
    model: &M,
    query: &str,
    extra_context: &str,
    files: &[PathBuf],
    budget: &TokenBudget,
    verbose: u8,
) -> Result<String> {
    if files.is_empty() {
        // Bypass the loop entirely: bare query behind an explanatory prefix.
        let answer = model.complete(&prompt::no_files_query(query))?;
        return Ok(format!("{}\n\n{answer}", prompt::NO_FILES_FALLBACK_PREFIX));
    }

    let mut remaining: Vec<PathBuf> = files.to_vec();
    let mut previous = String::new();
    let mut rounds = 0usize;

    while !remaining.is_empty() {
        let (chunk, rest) = match packer::next_chunk(query, extra_context, &remaining, budget) {
            Ok(packed) => packed,
            // Nothing fits anymore: return what earlier rounds built.
            Err(CoreError::NoFilesSelected) => break,
            Err(err) => return Err(err),
        };

        if verbose > 0 {
            for dropped in &chunk.dropped {
                eprintln!(
                    "{} skipping {}: {}",
                    "warn:".yellow(),
                    dropped.path.display(),
                    dropped.reason
                );
            }
            eprintln!(
                "{} synthesis round {} ({} files remaining after this)",
                "info:".blue(),
                rounds + 1,
                rest.len()
            );
        }

        let has_more = !rest.is_empty();
        let round_prompt = prompt::code_query(extra_context, &previous, &chunk.text, query, has_more);

        // Replace, don't merge: this round's output becomes the whole answer.
        previous = model.complete(&round_prompt)?;
        rounds += 1;
        remaining = rest;
    }

    if rounds == 0 {
        return Ok(prompt::COULD_NOT_PROCESS.to_string());
    }
    Ok(previous)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
