pub mod baseline;
pub mod check;
pub mod context;
pub mod history;
pub mod init;
pub mod record;
pub mod version;

use crate::cli::Backend;
use std::path::{Path, PathBuf};
use stride_core::{AssignmentRecord, RubricConfig, TrackerConfig};
use stride_history::{HistoryStore, PerformanceTracker};
use stride_store::{FileStore, KeyValueStore, Paths, SqliteStore};

pub type Tracker = PerformanceTracker<Box<dyn KeyValueStore>>;

/// Global storage flags shared by every command
pub struct StoreOptions {
    pub data_dir: Option<PathBuf>,
    pub backend: Backend,
}

impl StoreOptions {
    pub fn paths(&self) -> anyhow::Result<Paths> {
        match &self.data_dir {
            Some(dir) => Ok(Paths::with_root(dir)),
            None => Ok(Paths::new()?),
        }
    }

    pub fn open_tracker(&self) -> anyhow::Result<Tracker> {
        let paths = self.paths()?;
        let rubric = RubricConfig::load_or_default(&paths.rubric_file())?;
        let config_path = paths.tracker_config_file();
        let config = if config_path.exists() {
            TrackerConfig::load(&config_path)?
        } else {
            TrackerConfig::default()
        };

        let store: Box<dyn KeyValueStore> = match self.backend {
            Backend::Files => Box::new(FileStore::new(paths.students_dir())),
            Backend::Sqlite => Box::new(SqliteStore::new(&paths.history_db())?),
        };
        tracing::debug!(root = %paths.root.display(), backend = ?self.backend, "opened history store");

        Ok(PerformanceTracker::new(HistoryStore::new(store, rubric, config)))
    }
}

/// Parse a JSON object, a JSON array, or JSONL (by `.jsonl` extension)
pub fn read_records(path: &Path) -> anyhow::Result<Vec<AssignmentRecord>> {
    if !path.exists() {
        anyhow::bail!("record file not found: {}", path.display());
    }
    if path.extension().is_some_and(|ext| ext == "jsonl") {
        return Ok(stride_store::read_jsonl(path)?);
    }

    let contents = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    let records = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<AssignmentRecord>, _>>()?,
        other => vec![serde_json::from_value(other)?],
    };
    Ok(records)
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_read_single_and_array() {
        let temp = tempfile::TempDir::new().unwrap();
        let single = temp.path().join("one.json");
        std::fs::write(&single, record_json("Essay", 80).to_string()).unwrap();
        assert_eq!(read_records(&single).unwrap().len(), 1);

        let array = temp.path().join("many.json");
        let body = serde_json::json!([record_json("A", 70), record_json("B", 75)]);
        std::fs::write(&array, body.to_string()).unwrap();
        let records = read_records(&array).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].assignment_name, "B");
    }

    #[test]
    fn test_read_jsonl() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("batch.jsonl");
        let body = format!("{}\n{}\n", record_json("A", 70), record_json("B", 75));
        std::fs::write(&path, body).unwrap();
        assert_eq!(read_records(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_read_jsonl_rejects_bad_row() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("batch.jsonl");
        let body = format!("{}\n{{\"score\": 80}}\n{}\n", record_json("A", 70), record_json("B", 75));
        std::fs::write(&path, body).unwrap();

        let err = read_records(&path).unwrap_err();
        assert!(err.to_string().contains(":2:"), "{}", err);
    }

    #[test]
    fn test_read_missing_file() {
        assert!(read_records(Path::new("/nonexistent/record.json")).is_err());
    }

    #[test]
    #[serial]
    fn test_paths_fall_back_to_env() {
        let temp = tempfile::TempDir::new().unwrap();
        std::env::set_var("STRIDE_HOME", temp.path());
        let opts = StoreOptions {
            data_dir: None,
            backend: Backend::Sqlite,
        };
        let paths = opts.paths().unwrap();
        std::env::remove_var("STRIDE_HOME");
        assert_eq!(paths.root, temp.path());
    }
}
