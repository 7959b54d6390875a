//! Rubric table and tracker thresholds

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Shared rubric table: category id -> max points.
///
/// Must match the table that produced the stored breakdowns. Changing a max
/// retroactively changes every normalized percentage computed from history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricConfig {
    pub categories: BTreeMap<String, u32>,
}

impl RubricConfig {
    pub fn new() -> Self {
        let mut categories = BTreeMap::new();
        categories.insert("content_accuracy".to_string(), 40);
        categories.insert("completeness".to_string(), 25);
        categories.insert("critical_thinking".to_string(), 20);
        categories.insert("clarity".to_string(), 15);
        Self { categories }
    }

    pub fn from_categories<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self {
            categories: categories
                .into_iter()
                .map(|(name, max)| (name.into(), max))
                .collect(),
        }
    }

    /// Load a rubric from a JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let rubric: RubricConfig = serde_json::from_str(&contents)?;
        if let Some((name, _)) = rubric.categories.iter().find(|(_, &max)| max == 0) {
            anyhow::bail!("rubric category '{}' has a max of 0 points", name);
        }
        Ok(rubric)
    }

    /// Load from `path` when it exists, otherwise the built-in table
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn max_points(&self, category: &str) -> Option<u32> {
        self.categories.get(category).copied()
    }

    pub fn category_ids(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }
}

impl Default for RubricConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Window sizes and classification thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Max records retained per student
    pub window_cap: usize,
    /// Records considered "recent" by averages, streaks and patterns
    pub recent_window: usize,
    /// Records required before a baseline exists
    pub min_baseline_records: usize,
    /// Half-mean difference that counts as a trend
    pub trend_delta: f64,
    /// Normalized category percentage at or above which a strength is reported
    pub strength_pct: f64,
    /// Normalized category percentage at or below which a weakness is reported
    pub weakness_pct: f64,
    /// Exemplary snippets across the recent window for "detailed_responses"
    pub detailed_response_min: usize,
    /// Share of all records a strength tag needs to count as typical
    pub typical_skill_ratio: f64,
    pub z_threshold: f64,
    /// A lone reason escalates to significant above this z-score
    pub strict_z_threshold: f64,
    /// Points above the highest seen category score that trigger a flag
    pub category_margin: f64,
    pub novel_skill_min: usize,
    /// Points above the last-3 mean that count as a short-term jump
    pub jump_threshold: f64,
    pub overall_std_fallback: f64,
    pub category_std_fallback: f64,
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self {
            window_cap: 20,
            recent_window: 5,
            min_baseline_records: 3,
            trend_delta: 5.0,
            strength_pct: 85.0,
            weakness_pct: 60.0,
            detailed_response_min: 3,
            typical_skill_ratio: 0.3,
            z_threshold: 2.5,
            strict_z_threshold: 3.0,
            category_margin: 5.0,
            novel_skill_min: 3,
            jump_threshold: 20.0,
            overall_std_fallback: 10.0,
            category_std_fallback: 5.0,
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rubric_defaults() {
        let rubric = RubricConfig::new();
        assert_eq!(rubric.max_points("content_accuracy"), Some(40));
        assert_eq!(rubric.max_points("unknown"), None);
        assert_eq!(rubric.categories.values().sum::<u32>(), 100);
    }

    #[test]
    fn test_rubric_load_rejects_zero_max() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), r#"{"categories":{"style":0}}"#).unwrap();
        assert!(RubricConfig::load(temp.path()).is_err());
    }

    #[test]
    fn test_rubric_load_or_default_missing_file() {
        let rubric = RubricConfig::load_or_default(Path::new("/nonexistent/rubric.json")).unwrap();
        assert_eq!(rubric, RubricConfig::default());
    }

    #[test]
    fn test_tracker_config_partial_override() {
        let config: TrackerConfig =
            serde_json::from_str(r#"{"window_cap": 10, "z_threshold": 2.0}"#).unwrap();
        assert_eq!(config.window_cap, 10);
        assert_eq!(config.z_threshold, 2.0);
        assert_eq!(config.recent_window, 5);
        assert_eq!(config.jump_threshold, 20.0);
    }
}
