//! Query pipeline: selector -> verifier -> synthesizer over one source tree.
//! One instance serves one query at a time; the mapping store is read-only
//! while a query runs.

use std::path::{Path, PathBuf};

use crate::budget::TokenBudget;
use crate::error::{CoreError, Result};
use crate::prompt;
use crate::provider::LanguageModel;
use crate::selector;
use crate::store::{AppData, MappingStore};
use crate::synth;
use crate::verify;

pub struct QueryPipeline<M> {
    model: M,
    src_root: PathBuf,
    store: MappingStore,
    summary: String,
    extra_context: String,
    budget: TokenBudget,
    verbose: u8,
}

impl<M: LanguageModel> QueryPipeline<M> {
    /// Load the mapping store and project summary for `src_root`. The summary
    /// doubles as the default extra-context document.
    pub fn new(model: M, src_root: &Path, budget: TokenBudget, verbose: u8) -> Result<Self> {
        if !src_root.exists() {
            return Err(CoreError::SourceNotFound(src_root.to_path_buf()));
        }
        let app_data = AppData::for_source(src_root);
        let store = app_data.load_store()?;
        let summary = app_data.read_summary()?;
        Ok(Self {
            model,
            src_root: src_root.to_path_buf(),
            extra_context: summary.clone(),
            store,
            summary,
            budget,
            verbose,
        })
    }

    pub fn store(&self) -> &MappingStore {
        &self.store
    }

    /// Append (or replace) the extra-context document fed to every synthesis
    /// round, e.g. external design docs or a prior dependencies analysis.
    pub fn add_extra_context(&mut self, doc: &str, replace: bool) {
        if replace {
            self.extra_context = doc.to_string();
        } else {
            self.extra_context = format!("{}\n{doc}", self.extra_context);
        }
    }

    /// Answer a free-text question about the codebase.
    pub fn answer(&self, query: &str) -> Result<String> {
        let candidates =
            selector::find_candidates(&self.model, query, self.store.records(), &self.budget)?;
        let verified = verify::verify_paths(&self.src_root, &candidates);

        if self.verbose > 0 {
            eprintln!(
                "info: {} candidate path(s), {} verified",
                candidates.len(),
                verified.len()
            );
        }

        if verified.is_empty() {
            return Ok(prompt::NO_RELEVANT_FILES.to_string());
        }
        synth::run(
            &self.model,
            query,
            &self.extra_context,
            &verified,
            &self.budget,
            self.verbose,
        )
    }

    /// Restructure a raw user query into a sharper prompt using the project
    /// summary and extra context as documentation.
    pub fn improve_prompt(&self, query: &str) -> Result<String> {
        let documentation = format!(
            "Project Summary:\n{}\n\nAdditional Context:\n{}",
            self.summary, self.extra_context
        );
        self.model.complete(&prompt::prompt_improver(&documentation, query))
    }
}
