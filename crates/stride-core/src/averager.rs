//! Rolling rubric-category averages and overall trend

use crate::config::TrackerConfig;
use crate::types::{mean, round1, tail, AssignmentRecord, Trend};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAverage {
    pub current_avg: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillScoreSummary {
    #[serde(default)]
    pub categories: BTreeMap<String, CategoryAverage>,
    /// None until enough records exist to split the history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_trend: Option<Trend>,
}

pub struct SkillAverager<'a> {
    config: &'a TrackerConfig,
}

impl<'a> SkillAverager<'a> {
    pub fn new(config: &'a TrackerConfig) -> Self {
        Self { config }
    }

    pub fn summarize(&self, history: &[AssignmentRecord]) -> SkillScoreSummary {
        SkillScoreSummary {
            categories: self.category_averages(history),
            overall_trend: self.overall_trend(history),
        }
    }

    /// Average each category over the recent window. A record without the
    /// category does not contribute to its average or count.
    pub fn category_averages(
        &self,
        history: &[AssignmentRecord],
    ) -> BTreeMap<String, CategoryAverage> {
        let mut values: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for record in tail(history, self.config.recent_window) {
            for (category, &points) in &record.rubric_breakdown {
                values
                    .entry(category.clone())
                    .or_default()
                    .push(points as f64);
            }
        }

        values
            .into_iter()
            .filter_map(|(category, points)| {
                let avg = mean(&points)?;
                Some((
                    category,
                    CategoryAverage {
                        current_avg: round1(avg),
                        count: points.len(),
                    },
                ))
            })
            .collect()
    }

    /// Compare the mean of the older half of the full history to the newer
    /// half. The older half gets floor(n/2) records.
    pub fn overall_trend(&self, history: &[AssignmentRecord]) -> Option<Trend> {
        if history.len() < self.config.min_baseline_records {
            return None;
        }

        let split = history.len() / 2;
        let scores: Vec<f64> = history.iter().map(|r| r.score as f64).collect();
        let first = mean(&scores[..split])?;
        let second = mean(&scores[split..])?;
        let delta = second - first;

        Some(if delta >= self.config.trend_delta {
            Trend::Improving
        } else if delta <= -self.config.trend_delta {
            Trend::Declining
        } else {
            Trend::Stable
        })
    }
}
