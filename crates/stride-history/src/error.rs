use stride_core::RecordError;
use stride_store::StoreError;
use thiserror::Error;

/// Failures surfaced by history operations.
///
/// None of these should stop a grading run; callers log them and move on.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("history storage failed for '{key}': {source}")]
    Storage {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("stored history for '{key}' is unreadable: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode history for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid assignment record: {0}")]
    InvalidRecord(#[from] RecordError),
}

impl HistoryError {
    /// True when the failure came from the persistence collaborator
    pub fn is_persistence(&self) -> bool {
        matches!(self, HistoryError::Storage { .. })
    }
}
