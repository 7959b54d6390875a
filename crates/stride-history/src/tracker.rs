//! Query surface consumed by the grading pipeline

use crate::context::render_context;
use crate::document::StudentDocument;
use crate::error::HistoryError;
use crate::store::{AppendOutcome, HistoryStore};
use crate::student::StudentId;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use stride_core::{
    round1, AssignmentRecord, Baseline, DeviationClassifier, DeviationVerdict, SkillTag, Trend,
};
use stride_store::KeyValueStore;

const SUMMARY_TOP_SKILLS: usize = 5;

/// Compact baseline view
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineView {
    pub overall_avg: f64,
    pub overall_std: f64,
    pub assignment_count: usize,
    pub typical_skills: Vec<SkillTag>,
    pub category_averages: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BaselineSummary {
    /// Sentinel identity; no history is kept
    Untracked,
    InsufficientData { assignment_count: usize },
    Available(BaselineView),
}

impl BaselineSummary {
    pub fn is_available(&self) -> bool {
        matches!(self, BaselineSummary::Available(_))
    }
}

/// Descriptive statistics over the retained window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryStats {
    pub assignment_count: usize,
    pub average_score: f64,
    pub best_score: u32,
    pub worst_score: u32,
    pub grade_distribution: BTreeMap<String, usize>,
    pub overall_trend: Option<Trend>,
}

pub struct PerformanceTracker<S: KeyValueStore> {
    history: HistoryStore<S>,
}

impl<S: KeyValueStore> PerformanceTracker<S> {
    pub fn new(history: HistoryStore<S>) -> Self {
        Self { history }
    }

    pub fn history(&self) -> &HistoryStore<S> {
        &self.history
    }

    pub fn append(
        &self,
        student: &str,
        record: AssignmentRecord,
    ) -> Result<AppendOutcome, HistoryError> {
        self.history.append(student, record)
    }

    /// Append, logging instead of returning failures. For pipelines that must
    /// keep grading regardless of history writes.
    pub fn record_or_warn(&self, student: &str, record: AssignmentRecord) -> Option<AppendOutcome> {
        match self.history.append(student, record) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!(error = %e, persistence = e.is_persistence(), "history append failed");
                None
            }
        }
    }

    pub fn document(&self, student: &str) -> Result<StudentDocument, HistoryError> {
        self.history.get(student)
    }

    /// Full baseline, or None when untracked or below the record minimum
    pub fn baseline(&self, student: &str) -> Result<Option<Baseline>, HistoryError> {
        let doc = self.history.get(student)?;
        Ok(Baseline::compute(&doc.assignments, self.history.config()))
    }

    pub fn get_baseline_summary(&self, student: &str) -> Result<BaselineSummary, HistoryError> {
        let Some(id) = StudentId::parse(student) else {
            return Ok(BaselineSummary::Untracked);
        };
        let doc = self.history.load(&id)?;

        let Some(baseline) = Baseline::compute(&doc.assignments, self.history.config()) else {
            return Ok(BaselineSummary::InsufficientData {
                assignment_count: doc.assignment_count(),
            });
        };

        Ok(BaselineSummary::Available(BaselineView {
            overall_avg: round1(baseline.overall_avg),
            overall_std: round1(baseline.overall_std),
            assignment_count: baseline.assignment_count,
            typical_skills: baseline
                .typical_skills
                .iter()
                .take(SUMMARY_TOP_SKILLS)
                .cloned()
                .collect(),
            category_averages: baseline
                .category_baselines
                .iter()
                .map(|(category, cat)| (category.clone(), round1(cat.avg)))
                .collect(),
        }))
    }

    /// Compare a freshly graded submission to the student's stored history.
    ///
    /// Call before appending the submission. Never fails: an unreadable
    /// history degrades to a normal verdict that says why.
    pub fn detect_deviation(&self, student: &str, current: &AssignmentRecord) -> DeviationVerdict {
        let Some(id) = StudentId::parse(student) else {
            return DeviationVerdict::untracked();
        };

        let doc = match self.history.load(&id) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(student = %id, error = %e, "history unavailable for deviation check");
                let mut details = BTreeMap::new();
                details.insert("error".to_string(), json!(e.to_string()));
                return DeviationVerdict::normal_because(
                    "History unavailable; deviation check skipped",
                    details,
                );
            }
        };

        let config = self.history.config();
        let baseline = Baseline::compute(&doc.assignments, config);
        let verdict =
            DeviationClassifier::new(config).classify(current, baseline.as_ref(), &doc.assignments);

        if verdict.needs_review() {
            tracing::info!(
                student = %id,
                flag = verdict.flag.as_str(),
                reasons = verdict.reasons.len(),
                "submission deviates from baseline"
            );
        }
        verdict
    }

    /// Prose summary for an external prompt. Empty when there is nothing to
    /// say or the history cannot be read.
    pub fn build_context_summary(&self, student: &str) -> String {
        let doc = match self.history.get(student) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(error = %e, "history unavailable for context summary");
                return String::new();
            }
        };
        let baseline = Baseline::compute(&doc.assignments, self.history.config());
        render_context(&doc, baseline.as_ref(), self.history.rubric())
    }

    pub fn history_stats(&self, student: &str) -> Result<Option<HistoryStats>, HistoryError> {
        let doc = self.history.get(student)?;
        Ok(compute_stats(&doc))
    }
}

fn compute_stats(doc: &StudentDocument) -> Option<HistoryStats> {
    let scores: Vec<u32> = doc.assignments.iter().map(|r| r.score).collect();
    let best_score = scores.iter().copied().max()?;
    let worst_score = scores.iter().copied().min()?;
    let average_score = scores.iter().map(|&s| s as f64).sum::<f64>() / scores.len() as f64;

    let mut grade_distribution = BTreeMap::new();
    for record in &doc.assignments {
        *grade_distribution
            .entry(record.grade.trim().to_uppercase())
            .or_insert(0) += 1;
    }

    Some(HistoryStats {
        assignment_count: scores.len(),
        average_score: round1(average_score),
        best_score,
        worst_score,
        grade_distribution,
        overall_trend: doc.skill_scores.overall_trend,
    })
}
