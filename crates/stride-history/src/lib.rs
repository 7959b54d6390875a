//! Per-student assignment history, baselines and deviation checks

mod context;
mod document;
mod error;
mod store;
mod student;
mod tracker;

pub use context::render_context;
pub use document::StudentDocument;
pub use error::HistoryError;
pub use store::{AppendOutcome, HistoryStore};
pub use student::{StudentId, UNKNOWN_STUDENT};
pub use tracker::{BaselineSummary, BaselineView, HistoryStats, PerformanceTracker};
