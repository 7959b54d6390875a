//! Recurring strength/weakness detection from rubric categories

use crate::config::{RubricConfig, TrackerConfig};
use crate::types::{mean, tail, AssignmentRecord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const MIN_CATEGORY_POINTS: usize = 2;

/// Pseudo-category for the exemplary-answer heuristic
pub const DETAILED_RESPONSES: &str = "detailed_responses";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    Strength,
    Weakness,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternEntry {
    pub kind: PatternKind,
    pub category: String,
    pub description: String,
}

pub struct PatternDetector<'a> {
    rubric: &'a RubricConfig,
    config: &'a TrackerConfig,
}

impl<'a> PatternDetector<'a> {
    pub fn new(rubric: &'a RubricConfig, config: &'a TrackerConfig) -> Self {
        Self { rubric, config }
    }

    pub fn detect(&self, history: &[AssignmentRecord]) -> Vec<PatternEntry> {
        let recent = tail(history, self.config.recent_window);
        let mut patterns = self.category_patterns(recent);

        let exemplary: usize = recent.iter().map(|r| r.exemplary_answers.len()).sum();
        if exemplary >= self.config.detailed_response_min {
            patterns.push(PatternEntry {
                kind: PatternKind::Strength,
                category: DETAILED_RESPONSES.to_string(),
                description: "Frequently gives detailed, well-supported answers".to_string(),
            });
        }

        patterns
    }

    fn category_patterns(&self, recent: &[AssignmentRecord]) -> Vec<PatternEntry> {
        let mut percentages: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
        for record in recent {
            for (category, &points) in &record.rubric_breakdown {
                let Some(max) = self.rubric.max_points(category).filter(|&m| m > 0) else {
                    tracing::debug!(category = %category, "category missing from rubric, skipped");
                    continue;
                };
                percentages
                    .entry(category.as_str())
                    .or_default()
                    .push(points as f64 / max as f64 * 100.0);
            }
        }

        let mut patterns = Vec::new();
        for (category, pcts) in percentages {
            if pcts.len() < MIN_CATEGORY_POINTS {
                continue;
            }
            let Some(avg) = mean(&pcts) else { continue };
            let name = title_case(category);

            if avg >= self.config.strength_pct {
                patterns.push(PatternEntry {
                    kind: PatternKind::Strength,
                    category: category.to_string(),
                    description: format!("Consistently strong in {} ({:.1}% average)", name, avg),
                });
            } else if avg <= self.config.weakness_pct {
                patterns.push(PatternEntry {
                    kind: PatternKind::Weakness,
                    category: category.to_string(),
                    description: format!("Recurring difficulty with {} ({:.1}% average)", name, avg),
                });
            }
        }
        patterns
    }
}

/// "content_accuracy" -> "Content Accuracy"
pub fn title_case(category: &str) -> String {
    category
        .split(['_', ' '])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
