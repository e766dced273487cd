//! Error taxonomy for the query pipeline.
//! Recoverable conditions (unreadable file, unverifiable path) never surface
//! here — they are reported per-item by the module that hits them.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Error)]
pub enum CoreError {
    /// Missing credentials or required parameters. Fatal at construction.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Fixed overhead alone exceeds the token capacity. Fatal for the query.
    #[error("token budget exceeded: overhead {overhead} tokens >= capacity {capacity}")]
    BudgetExceeded { overhead: usize, capacity: usize },

    /// A packing round selected nothing while items remain. Raised explicitly
    /// so a loop over a shrinking sequence can never spin forever.
    #[error("no progress: {0}")]
    NoProgress(String),

    /// Content packing found room for zero files in a round.
    #[error("no files selected: the next file alone exceeds the remaining token budget")]
    NoFilesSelected,

    /// Classification/generation capability failure. Propagates to the caller.
    #[error("provider error: {0}")]
    Provider(String),

    #[error("source path not found: {0}")]
    SourceNotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
