//! Classify a new submission against a student's baseline

use crate::baseline::Baseline;
use crate::config::TrackerConfig;
use crate::types::{mean, round1, tail, AssignmentRecord, SkillTag};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

/// Divisor used only when a history has zero spread
const ZERO_STD_DIVISOR: f64 = 1.0;
const RECENT_SCORES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviationFlag {
    Normal,
    Review,
    SignificantDeviation,
}

impl DeviationFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviationFlag::Normal => "normal",
            DeviationFlag::Review => "review",
            DeviationFlag::SignificantDeviation => "significant_deviation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviationVerdict {
    pub flag: DeviationFlag,
    pub reasons: Vec<String>,
    pub details: BTreeMap<String, Value>,
}

impl DeviationVerdict {
    /// Normal verdict carrying a single explanatory reason
    pub fn normal_because(reason: impl Into<String>, details: BTreeMap<String, Value>) -> Self {
        Self {
            flag: DeviationFlag::Normal,
            reasons: vec![reason.into()],
            details,
        }
    }

    /// No reasons, no details; used when the student is not tracked
    pub fn untracked() -> Self {
        Self {
            flag: DeviationFlag::Normal,
            reasons: Vec::new(),
            details: BTreeMap::new(),
        }
    }

    pub fn needs_review(&self) -> bool {
        self.flag != DeviationFlag::Normal
    }
}

/// Standard score of `value`. A zero (or non-finite) spread falls back to a
/// divisor of 1 point; any positive spread is used as-is.
pub fn z_score(value: f64, avg: f64, std: f64) -> f64 {
    if std > 0.0 && std.is_finite() {
        (value - avg) / std
    } else {
        (value - avg) / ZERO_STD_DIVISOR
    }
}

pub struct DeviationClassifier<'a> {
    config: &'a TrackerConfig,
}

impl<'a> DeviationClassifier<'a> {
    pub fn new(config: &'a TrackerConfig) -> Self {
        Self { config }
    }

    /// Compare `current` to the stored history.
    ///
    /// `history` holds the records already on file, not including `current`.
    pub fn classify(
        &self,
        current: &AssignmentRecord,
        baseline: Option<&Baseline>,
        history: &[AssignmentRecord],
    ) -> DeviationVerdict {
        let Some(baseline) = baseline else {
            let mut details = BTreeMap::new();
            details.insert("current_score".to_string(), json!(current.score));
            details.insert("student_avg".to_string(), Value::Null);
            details.insert("student_std".to_string(), Value::Null);
            details.insert("overall_z_score".to_string(), Value::Null);
            details.insert("recent_avg".to_string(), Value::Null);
            details.insert("flagged_categories".to_string(), json!([]));
            details.insert("novel_skills".to_string(), json!([]));
            details.insert("assignment_count".to_string(), json!(history.len()));
            return DeviationVerdict::normal_because(
                format!(
                    "Insufficient history for comparison ({} of {} required assignments on file)",
                    history.len(),
                    self.config.min_baseline_records
                ),
                details,
            );
        };

        let mut reasons = Vec::new();
        let score = current.score as f64;

        // 1. Overall z-score
        let overall_z = z_score(score, baseline.overall_avg, baseline.overall_std);
        if overall_z > self.config.z_threshold {
            reasons.push(format!(
                "Overall score {} is {:.1} standard deviations above the student's average of {:.1}",
                current.score, overall_z, baseline.overall_avg
            ));
        }

        // 2. Per-category range and z-score
        let mut flagged = Vec::new();
        for (category, &points) in &current.rubric_breakdown {
            let Some(cat) = baseline.category_baselines.get(category) else {
                continue;
            };
            let value = points as f64;
            let above_range = value > cat.max_seen as f64 + self.config.category_margin;
            let cat_z = z_score(value, cat.avg, cat.std);
            if above_range || cat_z > self.config.z_threshold {
                flagged.push(json!({
                    "category": category,
                    "current": points,
                    "max_seen": cat.max_seen,
                    "z_score": round1(cat_z),
                }));
            }
        }
        if !flagged.is_empty() {
            let listed: Vec<String> = flagged
                .iter()
                .map(|f| {
                    format!(
                        "{} ({} vs previous best {})",
                        f["category"].as_str().unwrap_or_default(),
                        f["current"],
                        f["max_seen"]
                    )
                })
                .collect();
            reasons.push(format!(
                "Category scores well above historical range: {}",
                listed.join(", ")
            ));
        }

        // 3. Burst of strengths never typical for this student
        let novel: Vec<SkillTag> = current
            .strength_tags()
            .into_iter()
            .filter(|tag| !baseline.is_typical(tag))
            .collect();
        if novel.len() >= self.config.novel_skill_min {
            reasons.push(format!(
                "Demonstrates {} strengths not typical for this student: {}",
                novel.len(),
                novel
                    .iter()
                    .map(SkillTag::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        // 4. Jump over the most recent scores
        let recent: Vec<f64> = tail(history, RECENT_SCORES)
            .iter()
            .map(|r| r.score as f64)
            .collect();
        let recent_avg = mean(&recent);
        if let Some(recent_avg) = recent_avg {
            if score - recent_avg >= self.config.jump_threshold {
                reasons.push(format!(
                    "Score jumped {:.1} points above the average of the last {} assignments ({:.1})",
                    score - recent_avg,
                    recent.len(),
                    recent_avg
                ));
            }
        }

        let flag = match reasons.len() {
            0 => DeviationFlag::Normal,
            1 if overall_z > self.config.strict_z_threshold => DeviationFlag::SignificantDeviation,
            1 => DeviationFlag::Review,
            _ => DeviationFlag::SignificantDeviation,
        };

        let mut details = BTreeMap::new();
        details.insert("current_score".to_string(), json!(current.score));
        details.insert("student_avg".to_string(), json!(round1(baseline.overall_avg)));
        details.insert("student_std".to_string(), json!(round1(baseline.overall_std)));
        details.insert("overall_z_score".to_string(), json!(round1(overall_z)));
        details.insert("recent_avg".to_string(), json!(recent_avg.map(round1)));
        details.insert("flagged_categories".to_string(), Value::Array(flagged));
        details.insert(
            "novel_skills".to_string(),
            json!(novel.iter().map(SkillTag::as_str).collect::<Vec<_>>()),
        );
        details.insert(
            "assignment_count".to_string(),
            json!(baseline.assignment_count),
        );

        tracing::debug!(
            flag = flag.as_str(),
            reasons = reasons.len(),
            z = overall_z,
            "deviation check complete"
        );

        DeviationVerdict {
            flag,
            reasons,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_record(score: u32, accuracy: u32, clarity: u32) -> AssignmentRecord {
        AssignmentRecord::new("Essay", score, "C")
            .with_category("content_accuracy", accuracy)
            .with_category("clarity", clarity)
    }

    fn steady_history() -> Vec<AssignmentRecord> {
        vec![
            full_record(70, 28, 10),
            full_record(72, 29, 11),
            full_record(71, 28, 10),
        ]
    }

    #[test]
    fn test_no_baseline_is_normal_with_reason() {
        let config = TrackerConfig::default();
        let current = full_record(85, 30, 12);
        let verdict = DeviationClassifier::new(&config).classify(&current, None, &[]);
        assert_eq!(verdict.flag, DeviationFlag::Normal);
        assert_eq!(verdict.reasons.len(), 1);
        assert!(verdict.reasons[0].contains("Insufficient history"));
    }

    #[test]
    fn test_consistent_submission_is_normal() {
        let config = TrackerConfig::default();
        let history = steady_history();
        let baseline = Baseline::compute(&history, &config).unwrap();
        let verdict = DeviationClassifier::new(&config).classify(
            &full_record(72, 29, 11),
            Some(&baseline),
            &history,
        );
        assert_eq!(verdict.flag, DeviationFlag::Normal);
        assert!(verdict.reasons.is_empty());
        assert!(verdict.details.contains_key("overall_z_score"));
        assert!(verdict.details.contains_key("flagged_categories"));
    }

    #[test]
    fn test_large_jump_is_significant() {
        let config = TrackerConfig::default();
        let history = steady_history();
        let baseline = Baseline::compute(&history, &config).unwrap();
        let verdict = DeviationClassifier::new(&config).classify(
            &full_record(95, 38, 15),
            Some(&baseline),
            &history,
        );
        assert_eq!(verdict.flag, DeviationFlag::SignificantDeviation);
        assert!(verdict.reasons.len() >= 2);
        assert!(verdict.reasons.iter().any(|r| r.contains("content_accuracy")));
    }

    #[test]
    fn test_zero_std_does_not_divide_by_zero() {
        let config = TrackerConfig::default();
        let history = vec![
            full_record(80, 30, 10),
            full_record(80, 30, 10),
            full_record(80, 30, 10),
        ];
        let baseline = Baseline::compute(&history, &config).unwrap();
        assert_eq!(baseline.overall_std, 0.0);

        let verdict = DeviationClassifier::new(&config).classify(
            &full_record(80, 30, 10),
            Some(&baseline),
            &history,
        );
        let z = verdict.details["overall_z_score"].as_f64().unwrap();
        assert!(z.is_finite());
        assert_eq!(verdict.flag, DeviationFlag::Normal);
    }

    #[test]
    fn test_single_reason_is_review() {
        let config = TrackerConfig::default();
        let history = vec![
            AssignmentRecord::new("A", 60, "D"),
            AssignmentRecord::new("B", 90, "A"),
            AssignmentRecord::new("C", 75, "C"),
        ];
        let baseline = Baseline::compute(&history, &config).unwrap();
        // Three unfamiliar strengths, score within the envelope
        let current = AssignmentRecord::new("D", 76, "C")
            .with_strengths(["irony", "foreshadowing", "symbolism"]);
        let verdict = DeviationClassifier::new(&config).classify(&current, Some(&baseline), &history);
        assert_eq!(verdict.reasons.len(), 1);
        assert_eq!(verdict.flag, DeviationFlag::Review);
        assert_eq!(verdict.details["novel_skills"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_single_reason_with_extreme_z_is_significant() {
        let config = TrackerConfig {
            jump_threshold: 100.0,
            ..TrackerConfig::default()
        };
        let history = vec![
            AssignmentRecord::new("A", 70, "C"),
            AssignmentRecord::new("B", 72, "C"),
            AssignmentRecord::new("C", 71, "C"),
        ];
        let baseline = Baseline::compute(&history, &config).unwrap();
        let verdict = DeviationClassifier::new(&config).classify(
            &AssignmentRecord::new("D", 80, "B"),
            Some(&baseline),
            &history,
        );
        assert_eq!(verdict.reasons.len(), 1);
        assert_eq!(verdict.flag, DeviationFlag::SignificantDeviation);
    }

    #[test]
    fn test_insufficient_history_has_full_detail_keys() {
        let config = TrackerConfig::default();
        let history = steady_history();
        let baseline = Baseline::compute(&history, &config).unwrap();
        let full = DeviationClassifier::new(&config).classify(
            &full_record(72, 29, 11),
            Some(&baseline),
            &history,
        );
        let sparse =
            DeviationClassifier::new(&config).classify(&full_record(72, 29, 11), None, &history[..1]);

        let full_keys: Vec<&String> = full.details.keys().collect();
        let sparse_keys: Vec<&String> = sparse.details.keys().collect();
        assert_eq!(full_keys, sparse_keys);
        assert!(sparse.details["overall_z_score"].is_null());
        assert_eq!(sparse.details["assignment_count"], 1);
    }

    #[test]
    fn test_sub_point_std_is_not_floored() {
        let config = TrackerConfig::default();
        let history = vec![
            AssignmentRecord::new("A", 80, "B"),
            AssignmentRecord::new("B", 80, "B"),
            AssignmentRecord::new("C", 81, "B"),
        ];
        let baseline = Baseline::compute(&history, &config).unwrap();
        assert!(baseline.overall_std > 0.0 && baseline.overall_std < 1.0);

        // (82 - 80.33) / 0.577 is about 2.9: above 2.5, below the strict 3.0
        let verdict = DeviationClassifier::new(&config).classify(
            &AssignmentRecord::new("D", 82, "B"),
            Some(&baseline),
            &history,
        );
        assert_eq!(verdict.reasons.len(), 1);
        assert_eq!(verdict.flag, DeviationFlag::Review);
        assert_eq!(verdict.details["overall_z_score"].as_f64().unwrap(), 2.9);
    }

    #[test]
    fn test_small_category_spread_flags_category() {
        let config = TrackerConfig::default();
        let history = vec![
            full_record(70, 28, 10),
            full_record(72, 28, 10),
            full_record(71, 28, 11),
        ];
        let baseline = Baseline::compute(&history, &config).unwrap();
        let verdict = DeviationClassifier::new(&config).classify(
            &full_record(71, 28, 12),
            Some(&baseline),
            &history,
        );
        let flagged = verdict.details["flagged_categories"].as_array().unwrap();
        assert_eq!(flagged.len(), 1);
        assert_eq!(flagged[0]["category"], "clarity");
        assert_eq!(verdict.flag, DeviationFlag::Review);
    }

    #[test]
    fn test_z_score_zero_spread_uses_one_point() {
        assert_eq!(z_score(83.0, 80.0, 0.0), 3.0);
        assert_eq!(z_score(80.0, 80.0, 0.0), 0.0);
        assert!((z_score(82.0, 80.0, 0.5) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_flag_serialization() {
        assert_eq!(
            serde_json::to_value(DeviationFlag::SignificantDeviation).unwrap(),
            "significant_deviation"
        );
    }
}
