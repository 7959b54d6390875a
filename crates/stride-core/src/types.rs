//! Core record types for per-student performance tracking

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Max entries kept in each snippet list of a record
pub const MAX_SNIPPETS: usize = 5;

/// Highest valid overall score
pub const MAX_SCORE: u32 = 100;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("score {0} is outside 0-100")]
    ScoreOutOfRange(u32),
    #[error("assignment name is empty")]
    MissingAssignmentName,
}

/// A free-text skill label, lowercased and trimmed.
///
/// Matching between tags is exact string equality after normalization. There
/// is no stemming or synonym handling: "thesis" and "thesis statements" are
/// different skills.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillTag(String);

impl SkillTag {
    /// Normalize a raw label. Returns None for blank input.
    pub fn new(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Normalize a list of raw labels, dropping blanks and duplicates while
    /// keeping first-seen order.
    pub fn normalize_all(raw: &[String]) -> Vec<SkillTag> {
        let mut tags: Vec<SkillTag> = Vec::new();
        for tag in raw.iter().filter_map(|r| SkillTag::new(r)) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
        tags
    }
}

impl fmt::Display for SkillTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One stored grading outcome for one student and assignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub date: DateTime<Utc>,
    pub assignment_name: String,
    pub score: u32,
    pub grade: String,
    /// Category id -> points. Categories that were not assessed are absent.
    #[serde(default)]
    pub rubric_breakdown: BTreeMap<String, u32>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub developing_skills: Vec<String>,
    #[serde(default)]
    pub exemplary_answers: Vec<String>,
    #[serde(default)]
    pub weak_answers: Vec<String>,
    #[serde(default)]
    pub raw_responses: Vec<String>,
}

impl AssignmentRecord {
    pub fn new(assignment_name: impl Into<String>, score: u32, grade: impl Into<String>) -> Self {
        Self {
            date: Utc::now(),
            assignment_name: assignment_name.into(),
            score,
            grade: grade.into(),
            rubric_breakdown: BTreeMap::new(),
            strengths: Vec::new(),
            developing_skills: Vec::new(),
            exemplary_answers: Vec::new(),
            weak_answers: Vec::new(),
            raw_responses: Vec::new(),
        }
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn with_category(mut self, category: impl Into<String>, points: u32) -> Self {
        self.rubric_breakdown.insert(category.into(), points);
        self
    }

    pub fn with_strengths<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.strengths = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_developing<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.developing_skills = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exemplary_answers<I, S>(mut self, answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exemplary_answers = answers.into_iter().map(Into::into).collect();
        self
    }

    /// Score for a rubric category, if it was assessed
    pub fn category(&self, category: &str) -> Option<u32> {
        self.rubric_breakdown.get(category).copied()
    }

    pub fn strength_tags(&self) -> Vec<SkillTag> {
        SkillTag::normalize_all(&self.strengths)
    }

    pub fn developing_tags(&self) -> Vec<SkillTag> {
        SkillTag::normalize_all(&self.developing_skills)
    }

    pub fn validate(&self) -> Result<(), RecordError> {
        if self.score > MAX_SCORE {
            return Err(RecordError::ScoreOutOfRange(self.score));
        }
        if self.assignment_name.trim().is_empty() {
            return Err(RecordError::MissingAssignmentName);
        }
        Ok(())
    }

    /// Clamp every snippet list to [`MAX_SNIPPETS`] entries
    pub fn bounded(mut self) -> Self {
        self.exemplary_answers.truncate(MAX_SNIPPETS);
        self.weak_answers.truncate(MAX_SNIPPETS);
        self.raw_responses.truncate(MAX_SNIPPETS);
        self
    }
}

/// Direction of a score trend or streak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
            Trend::Stable => "stable",
        };
        f.write_str(s)
    }
}

/// Last `n` records of a chronological history
pub(crate) fn tail(history: &[AssignmentRecord], n: usize) -> &[AssignmentRecord] {
    &history[history.len().saturating_sub(n)..]
}

pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1). None below two points.
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let avg = mean(values)?;
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_tag_normalization() {
        assert_eq!(SkillTag::new("  Thesis Statement ").unwrap().as_str(), "thesis statement");
        assert!(SkillTag::new("   ").is_none());
        assert_eq!(SkillTag::new("EVIDENCE"), SkillTag::new("evidence"));
        assert_ne!(SkillTag::new("thesis"), SkillTag::new("thesis statements"));
    }

    #[test]
    fn test_normalize_all_dedupes() {
        let raw = vec![
            "Evidence".to_string(),
            "evidence ".to_string(),
            "".to_string(),
            "Structure".to_string(),
        ];
        let tags = SkillTag::normalize_all(&raw);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].as_str(), "evidence");
        assert_eq!(tags[1].as_str(), "structure");
    }

    #[test]
    fn test_record_backwards_compatible() {
        let json = r#"{"date":"2025-03-01T00:00:00Z","assignment_name":"Essay 1","score":82,"grade":"B"}"#;
        let parsed: AssignmentRecord = serde_json::from_str(json).unwrap();
        assert!(parsed.rubric_breakdown.is_empty());
        assert!(parsed.strengths.is_empty());
        assert_eq!(parsed.category("content_accuracy"), None);
    }

    #[test]
    fn test_validate() {
        assert!(AssignmentRecord::new("Quiz", 100, "A").validate().is_ok());
        assert_eq!(
            AssignmentRecord::new("Quiz", 101, "A").validate(),
            Err(RecordError::ScoreOutOfRange(101))
        );
        assert_eq!(
            AssignmentRecord::new(" ", 50, "F").validate(),
            Err(RecordError::MissingAssignmentName)
        );
    }

    #[test]
    fn test_bounded_truncates_snippets() {
        let record = AssignmentRecord::new("Quiz", 90, "A")
            .with_exemplary_answers((0..8).map(|i| format!("answer {}", i)))
            .bounded();
        assert_eq!(record.exemplary_answers.len(), MAX_SNIPPETS);
        assert_eq!(record.exemplary_answers[0], "answer 0");
    }

    #[test]
    fn test_sample_std() {
        assert_eq!(sample_std(&[70.0]), None);
        let std = sample_std(&[70.0, 72.0, 71.0]).unwrap();
        assert!((std - 1.0).abs() < 1e-9);
    }
}
