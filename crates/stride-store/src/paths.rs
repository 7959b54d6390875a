//! Path resolution for tracker data files

use std::path::PathBuf;

/// Environment variable that overrides the data root
pub const HOME_ENV: &str = "STRIDE_HOME";

/// Resolves standard paths for stored history
#[derive(Debug, Clone)]
pub struct Paths {
    pub root: PathBuf,
}

impl Paths {
    /// `$STRIDE_HOME` when set, otherwise `~/.stride`
    pub fn new() -> std::io::Result<Self> {
        if let Some(root) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self {
                root: PathBuf::from(root),
            });
        }

        let home = dirs::home_dir().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "home directory not found")
        })?;

        Ok(Self {
            root: home.join(".stride"),
        })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// One JSON document per student
    pub fn students_dir(&self) -> PathBuf {
        self.root.join("students")
    }

    pub fn history_db(&self) -> PathBuf {
        self.root.join("history.db")
    }

    pub fn rubric_file(&self) -> PathBuf {
        self.root.join("rubric.json")
    }

    pub fn tracker_config_file(&self) -> PathBuf {
        self.root.join("tracker.json")
    }
}
