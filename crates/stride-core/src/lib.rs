//! Performance analytics over a student's graded assignment history

mod averager;
mod baseline;
mod config;
mod deviation;
mod patterns;
mod skills;
mod streaks;
mod types;

pub use averager::{CategoryAverage, SkillAverager, SkillScoreSummary};
pub use baseline::{Baseline, CategoryBaseline};
pub use config::{RubricConfig, TrackerConfig};
pub use deviation::{z_score, DeviationClassifier, DeviationFlag, DeviationVerdict};
pub use patterns::{title_case, PatternDetector, PatternEntry, PatternKind, DETAILED_RESPONSES};
pub use skills::{SkillPatternAnalyzer, SkillPatternSummary};
pub use streaks::{GradeStreak, Streak, StreakDetector, StreakRecord};
pub use types::{round1, AssignmentRecord, RecordError, SkillTag, Trend, MAX_SCORE, MAX_SNIPPETS};
