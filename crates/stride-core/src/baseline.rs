//! Full-history performance envelope

use crate::config::TrackerConfig;
use crate::skills::{count_strengths, ranked};
use crate::types::{mean, sample_std, AssignmentRecord, SkillTag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBaseline {
    pub avg: f64,
    pub std: f64,
    pub max_seen: u32,
    pub min_seen: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub overall_avg: f64,
    pub overall_std: f64,
    pub category_baselines: BTreeMap<String, CategoryBaseline>,
    /// Strength tags seen in at least the configured share of all records,
    /// most frequent first
    pub typical_skills: Vec<SkillTag>,
    pub assignment_count: usize,
}

impl Baseline {
    /// Build a baseline from the full history.
    ///
    /// Returns None below `min_baseline_records`; a missing baseline is never
    /// represented as zeros.
    pub fn compute(history: &[AssignmentRecord], config: &TrackerConfig) -> Option<Self> {
        if history.is_empty() || history.len() < config.min_baseline_records {
            return None;
        }

        let scores: Vec<f64> = history.iter().map(|r| r.score as f64).collect();
        let overall_avg = mean(&scores)?;
        let overall_std = sample_std(&scores).unwrap_or(config.overall_std_fallback);

        let mut per_category: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
        for record in history {
            for (category, &points) in &record.rubric_breakdown {
                per_category.entry(category.as_str()).or_default().push(points);
            }
        }

        let category_baselines = per_category
            .into_iter()
            .filter_map(|(category, points)| {
                let values: Vec<f64> = points.iter().map(|&p| p as f64).collect();
                Some((
                    category.to_string(),
                    CategoryBaseline {
                        avg: mean(&values)?,
                        std: sample_std(&values).unwrap_or(config.category_std_fallback),
                        max_seen: points.iter().copied().max()?,
                        min_seen: points.iter().copied().min()?,
                    },
                ))
            })
            .collect();

        let strengths = count_strengths(history);
        let threshold = config.typical_skill_ratio * history.len() as f64;
        let typical_skills = ranked(&strengths, 1)
            .into_iter()
            .filter(|tag| strengths.get(tag).is_some_and(|&count| count as f64 >= threshold))
            .collect();

        Some(Self {
            overall_avg,
            overall_std,
            category_baselines,
            typical_skills,
            assignment_count: history.len(),
        })
    }

    pub fn is_typical(&self, tag: &SkillTag) -> bool {
        self.typical_skills.contains(tag)
    }
}
