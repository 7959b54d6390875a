//! Three-record streak detection per rubric category and grade band

use crate::config::{RubricConfig, TrackerConfig};
use crate::types::{tail, AssignmentRecord, Trend};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const STREAK_LENGTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Streak {
    pub direction: Trend,
    pub length: usize,
    pub latest_score: u32,
}

/// Classification of the last three overall scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GradeStreak {
    /// All three at or above 90
    #[serde(rename = "A_streak")]
    AStreak,
    /// All three at or above 80
    #[serde(rename = "B_or_better")]
    BOrBetter,
    /// Strictly increasing
    #[serde(rename = "improving")]
    Improving,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakRecord {
    #[serde(default)]
    pub categories: BTreeMap<String, Streak>,
    #[serde(
        rename = "_grade_streak",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub grade_streak: Option<GradeStreak>,
}

pub struct StreakDetector<'a> {
    rubric: &'a RubricConfig,
    config: &'a TrackerConfig,
}

impl<'a> StreakDetector<'a> {
    pub fn new(rubric: &'a RubricConfig, config: &'a TrackerConfig) -> Self {
        Self { rubric, config }
    }

    pub fn detect(&self, history: &[AssignmentRecord]) -> StreakRecord {
        let recent = tail(history, self.config.recent_window);
        let mut categories = BTreeMap::new();

        for category in self.rubric.category_ids() {
            let values: Vec<u32> = recent.iter().filter_map(|r| r.category(category)).collect();
            if values.len() < STREAK_LENGTH {
                continue;
            }
            let last = &values[values.len() - STREAK_LENGTH..];
            if let Some(direction) = streak_direction(last) {
                categories.insert(
                    category.to_string(),
                    Streak {
                        direction,
                        length: STREAK_LENGTH,
                        latest_score: last[STREAK_LENGTH - 1],
                    },
                );
            }
        }

        let scores: Vec<u32> = recent.iter().map(|r| r.score).collect();
        StreakRecord {
            categories,
            grade_streak: classify_grade_streak(&scores),
        }
    }
}

/// Direction of a run of values, evaluated in a fixed order:
///
/// 1. Improving: non-decreasing with a strict rise from first to last.
/// 2. Declining: non-increasing with a strict fall from first to last.
///
/// The two tests are mutually exclusive (`first < last` and `first > last`
/// cannot both hold), so the order only matters if either rule is loosened.
/// Improving stays first so a loosened rule keeps a deterministic winner.
pub fn streak_direction(values: &[u32]) -> Option<Trend> {
    let (first, last) = (values.first()?, values.last()?);
    let improving = values.windows(2).all(|w| w[0] <= w[1]) && first < last;
    if improving {
        return Some(Trend::Improving);
    }

    let declining = values.windows(2).all(|w| w[0] >= w[1]) && first > last;
    if declining {
        return Some(Trend::Declining);
    }
    None
}

pub fn classify_grade_streak(scores: &[u32]) -> Option<GradeStreak> {
    if scores.len() < STREAK_LENGTH {
        return None;
    }
    let last = &scores[scores.len() - STREAK_LENGTH..];

    if last.iter().all(|&s| s >= 90) {
        Some(GradeStreak::AStreak)
    } else if last.iter().all(|&s| s >= 80) {
        Some(GradeStreak::BOrBetter)
    } else if last.windows(2).all(|w| w[0] < w[1]) {
        Some(GradeStreak::Improving)
    } else {
        None
    }
}
