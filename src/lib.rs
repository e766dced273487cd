//! codeq - token-budget-aware codebase Q&A.
//!
//! Maps source files into lightweight metadata records, selects the records
//! relevant to a free-text query, and feeds the underlying file contents
//! through an LLM provider in as many budget-sized rounds as it takes,
//! stitching the partial answers through the provider itself.

pub mod budget;
pub mod config;
pub mod error;
pub mod mapper;
pub mod packer;
pub mod pipeline;
pub mod prompt;
pub mod provider;
pub mod scan;
pub mod selector;
pub mod store;
pub mod synth;
pub mod verify;

pub use budget::TokenBudget;
pub use error::{CoreError, Result};
pub use pipeline::QueryPipeline;
pub use provider::{LanguageModel, LlmClient, ProviderKind};
pub use store::{FileRecord, MappingStore};
