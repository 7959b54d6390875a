//! Per-student history document and derived aggregates

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stride_core::{
    AssignmentRecord, PatternDetector, PatternEntry, RubricConfig, SkillAverager,
    SkillPatternAnalyzer, SkillPatternSummary, SkillScoreSummary, StreakDetector, StreakRecord,
    TrackerConfig,
};

/// Everything persisted for one student. Derived fields are rebuilt from
/// `assignments` on every append and are never updated incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentDocument {
    #[serde(default)]
    pub assignments: Vec<AssignmentRecord>,
    #[serde(default)]
    pub skill_scores: SkillScoreSummary,
    #[serde(default)]
    pub streaks: StreakRecord,
    #[serde(default)]
    pub patterns: Vec<PatternEntry>,
    #[serde(default)]
    pub skill_patterns: SkillPatternSummary,
    #[serde(default)]
    pub last_updated: Option<DateTime<Utc>>,
}

impl StudentDocument {
    pub fn assignment_count(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Push a record and evict from the front past `window_cap`.
    /// Returns how many records were evicted.
    pub fn push_record(&mut self, record: AssignmentRecord, window_cap: usize) -> usize {
        self.assignments.push(record);
        let overflow = self.assignments.len().saturating_sub(window_cap.max(1));
        if overflow > 0 {
            self.assignments.drain(..overflow);
        }
        overflow
    }

    /// Rebuild every derived aggregate from the current window
    pub fn recompute(&mut self, rubric: &RubricConfig, config: &TrackerConfig) {
        let history = &self.assignments;
        self.skill_scores = SkillAverager::new(config).summarize(history);
        self.streaks = StreakDetector::new(rubric, config).detect(history);
        self.patterns = PatternDetector::new(rubric, config).detect(history);
        self.skill_patterns = SkillPatternAnalyzer::new(config).summarize(history);
    }
}
