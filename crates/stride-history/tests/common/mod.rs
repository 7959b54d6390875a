#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use stride_core::AssignmentRecord;
use stride_store::{KeyValueStore, MemoryStore, StoreError};

pub fn graded(name: &str, score: u32) -> AssignmentRecord {
    let grade = match score {
        90..=100 => "A",
        80..=89 => "B",
        70..=79 => "C",
        60..=69 => "D",
        _ => "F",
    };
    AssignmentRecord::new(name, score, grade)
}

/// Record with every default rubric category assessed
pub fn full_record(name: &str, score: u32, categories: [u32; 4]) -> AssignmentRecord {
    let [accuracy, completeness, thinking, clarity] = categories;
    graded(name, score)
        .with_category("content_accuracy", accuracy)
        .with_category("completeness", completeness)
        .with_category("critical_thinking", thinking)
        .with_category("clarity", clarity)
}

/// Reads succeed from an inner store; writes always fail
#[derive(Default)]
pub struct ReadOnlyStore {
    pub inner: MemoryStore,
    pub failed_writes: AtomicUsize,
}

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.inner.get(key)
    }

    fn put(&self, _key: &str, _bytes: &[u8]) -> Result<(), StoreError> {
        self.failed_writes.fetch_add(1, Ordering::SeqCst);
        Err(StoreError::Unavailable("disk full".to_string()))
    }
}

/// Every operation fails
pub struct OfflineStore;

impl KeyValueStore for OfflineStore {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    fn put(&self, _key: &str, _bytes: &[u8]) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}
