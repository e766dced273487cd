//! Relevance selector: rounds of budget-packed mapping batches against the
//! classification capability, accumulating candidate paths until the store is
//! exhausted.

use serde::Deserialize;

use crate::budget::{estimate_tokens, pack_prefix, TokenBudget};
use crate::error::{CoreError, Result};
use crate::prompt;
use crate::provider::{extract_json, LanguageModel};
use crate::store::FileRecord;

#[derive(Debug, Deserialize)]
struct RelevantFiles {
    files: Vec<String>,
}

/// Run classification rounds over `records` and return every candidate path
/// the capability produced, in order, duplicates and invalid paths included —
/// reconciliation belongs to the path verifier.
///
/// Each round packs the longest prefix of the unprocessed records that fits
/// beside the query, so a store of N records needs at most N rounds. A round
/// that packs nothing while records remain raises `NoProgress` instead of
/// spinning.
pub fn find_candidates<M: LanguageModel>(
    model: &M,
    query: &str,
    records: &[FileRecord],
    budget: &TokenBudget,
) -> Result<Vec<String>> {
    let overhead = estimate_tokens(query);
    let room = budget.room_after(overhead).ok_or(CoreError::BudgetExceeded {
        overhead,
        capacity: budget.capacity(),
    })?;

    let mut candidates: Vec<String> = Vec::new();
    let mut rest = records;

    while !rest.is_empty() {
        let (batch, remaining) = pack_prefix(rest, |r| estimate_tokens(&r.render()), room);
        if batch.is_empty() {
            return Err(CoreError::NoProgress(format!(
                "mapping record '{}' alone exceeds the {room}-token classification budget",
                rest[0].path
            )));
        }

        let batch_text = batch.iter().map(FileRecord::render).collect::<Vec<_>>().join("\n\n");
        let raw = model.complete(&prompt::relevance_search(query, &batch_text))?;
        let parsed: RelevantFiles = serde_json::from_value(extract_json(&raw)?)
            .map_err(|e| CoreError::Provider(format!("classification output missing 'files': {e}")))?;

        // Empty per round is legal: conversational queries match nothing.
        candidates.extend(parsed.files);
        rest = remaining;
    }

    Ok(candidates)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
