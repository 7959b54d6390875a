//! Capped per-student history over a key-value persistence collaborator

use crate::document::StudentDocument;
use crate::error::HistoryError;
use crate::student::StudentId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use stride_core::{AssignmentRecord, RubricConfig, TrackerConfig};
use stride_store::KeyValueStore;

/// Result of a successful append call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// Sentinel identity; nothing was read or written
    Skipped,
    Recorded {
        assignment_count: usize,
        evicted: usize,
    },
}

pub struct HistoryStore<S: KeyValueStore> {
    store: S,
    rubric: RubricConfig,
    config: TrackerConfig,
    // One lock per student so concurrent appends for the same student
    // cannot interleave their read-modify-write.
    student_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: KeyValueStore> HistoryStore<S> {
    pub fn new(store: S, rubric: RubricConfig, config: TrackerConfig) -> Self {
        Self {
            store,
            rubric,
            config,
            student_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_defaults(store: S) -> Self {
        Self::new(store, RubricConfig::default(), TrackerConfig::default())
    }

    pub fn rubric(&self) -> &RubricConfig {
        &self.rubric
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn backend(&self) -> &S {
        &self.store
    }

    /// Load a student's document. Sentinel ids and students with no stored
    /// history both yield an empty document; the sentinel never touches storage.
    pub fn get(&self, student: &str) -> Result<StudentDocument, HistoryError> {
        match StudentId::parse(student) {
            Some(id) => self.load(&id),
            None => Ok(StudentDocument::default()),
        }
    }

    /// Append a graded record, trim to the window cap, recompute aggregates,
    /// and persist. One read and one write per call.
    pub fn append(
        &self,
        student: &str,
        record: AssignmentRecord,
    ) -> Result<AppendOutcome, HistoryError> {
        let Some(id) = StudentId::parse(student) else {
            tracing::debug!("untracked student, skipping history append");
            return Ok(AppendOutcome::Skipped);
        };
        record.validate()?;

        let lock = self.lock_for(&id);
        let outcome = {
            let _guard = lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            self.append_locked(&id, record)
        };
        self.release_lock(&id, lock);
        outcome
    }

    fn append_locked(
        &self,
        id: &StudentId,
        record: AssignmentRecord,
    ) -> Result<AppendOutcome, HistoryError> {
        let mut doc = self.load(id)?;
        let evicted = doc.push_record(record.bounded(), self.config.window_cap);
        doc.recompute(&self.rubric, &self.config);
        doc.last_updated = Some(chrono::Utc::now());
        self.save(id, &doc)?;

        if evicted > 0 {
            tracing::debug!(student = %id, evicted, "evicted oldest assignments");
        }
        tracing::info!(
            student = %id,
            assignments = doc.assignment_count(),
            "recorded assignment"
        );

        Ok(AppendOutcome::Recorded {
            assignment_count: doc.assignment_count(),
            evicted,
        })
    }

    pub(crate) fn load(&self, id: &StudentId) -> Result<StudentDocument, HistoryError> {
        let key = id.storage_key();
        let bytes = self
            .store
            .get(&key)
            .map_err(|source| HistoryError::Storage {
                key: key.clone(),
                source,
            })?;

        match bytes {
            Some(bytes) => {
                serde_json::from_slice(&bytes).map_err(|source| HistoryError::Corrupt { key, source })
            }
            None => Ok(StudentDocument::default()),
        }
    }

    fn save(&self, id: &StudentId, doc: &StudentDocument) -> Result<(), HistoryError> {
        let key = id.storage_key();
        let bytes = serde_json::to_vec_pretty(doc).map_err(|source| HistoryError::Encode {
            key: key.clone(),
            source,
        })?;
        self.store
            .put(&key, &bytes)
            .map_err(|source| HistoryError::Storage { key, source })
    }

    fn lock_for(&self, id: &StudentId) -> Arc<Mutex<()>> {
        let mut locks = self
            .student_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        locks.entry(id.storage_key()).or_default().clone()
    }

    /// Drop the student's lock entry once no other append holds or awaits it
    fn release_lock(&self, id: &StudentId, lock: Arc<Mutex<()>>) {
        let mut locks = self
            .student_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        // One reference in the map, one held here
        if Arc::strong_count(&lock) == 2 {
            locks.remove(&id.storage_key());
        }
    }

    #[cfg(test)]
    pub(crate) fn tracked_locks(&self) -> usize {
        self.student_locks
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}
