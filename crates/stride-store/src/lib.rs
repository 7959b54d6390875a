//! Persistence collaborators for per-student history documents

mod error;
mod file;
mod io;
mod memory;
mod paths;
mod sqlite;

pub use error::StoreError;
pub use file::FileStore;
pub use io::{atomic_write, read_jsonl};
pub use memory::MemoryStore;
pub use paths::Paths;
pub use sqlite::SqliteStore;

/// Minimal get/put contract over opaque document bytes
pub trait KeyValueStore: Send + Sync {
    /// Fetch the document stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Create or overwrite the document under `key`
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, bytes)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        (**self).put(key, bytes)
    }
}
