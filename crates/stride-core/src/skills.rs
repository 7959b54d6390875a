//! Frequency analysis over free-text skill tags.
//!
//! This is a coarse heuristic: tags are compared by exact string match after
//! lowercasing and trimming (see [`SkillTag`]). Two graders describing the
//! same skill in different words produce unrelated tags.

use crate::config::TrackerConfig;
use crate::types::{tail, AssignmentRecord, SkillTag};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

const MIN_OCCURRENCES: usize = 2;
const IMPROVING_WINDOW: usize = 3;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillPatternSummary {
    #[serde(default)]
    pub consistent_strengths: Vec<SkillTag>,
    #[serde(default)]
    pub improving: Vec<SkillTag>,
    #[serde(default)]
    pub needs_focus: Vec<SkillTag>,
}

/// Per-record occurrence counts; a tag counts once per record.
pub(crate) fn count_strengths(records: &[AssignmentRecord]) -> BTreeMap<SkillTag, usize> {
    count_tags(records, AssignmentRecord::strength_tags)
}

pub(crate) fn count_developing(records: &[AssignmentRecord]) -> BTreeMap<SkillTag, usize> {
    count_tags(records, AssignmentRecord::developing_tags)
}

fn count_tags<F>(records: &[AssignmentRecord], tags: F) -> BTreeMap<SkillTag, usize>
where
    F: Fn(&AssignmentRecord) -> Vec<SkillTag>,
{
    let mut counts = BTreeMap::new();
    for record in records {
        for tag in tags(record) {
            *counts.entry(tag).or_insert(0) += 1;
        }
    }
    counts
}

/// Tags meeting `min`, most frequent first, ties alphabetical
pub(crate) fn ranked(counts: &BTreeMap<SkillTag, usize>, min: usize) -> Vec<SkillTag> {
    let mut entries: Vec<(&SkillTag, &usize)> =
        counts.iter().filter(|(_, &count)| count >= min).collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    entries.into_iter().map(|(tag, _)| tag.clone()).collect()
}

pub struct SkillPatternAnalyzer<'a> {
    config: &'a TrackerConfig,
}

impl<'a> SkillPatternAnalyzer<'a> {
    pub fn new(config: &'a TrackerConfig) -> Self {
        Self { config }
    }

    pub fn summarize(&self, history: &[AssignmentRecord]) -> SkillPatternSummary {
        let recent = tail(history, self.config.recent_window);
        let strengths = count_strengths(recent);
        let developing = count_developing(recent);

        let latest = tail(recent, IMPROVING_WINDOW);
        let latest_strengths = count_strengths(latest);
        let latest_developing = count_developing(latest);

        // Moved from "developing" to "strength" within the last few records
        let improving: Vec<SkillTag> = strengths
            .keys()
            .filter(|tag| developing.contains_key(*tag))
            .filter(|tag| {
                latest_strengths.get(*tag).copied().unwrap_or(0)
                    > latest_developing.get(*tag).copied().unwrap_or(0)
            })
            .cloned()
            .collect();
        let improving_set: HashSet<&SkillTag> = improving.iter().collect();

        let needs_focus = ranked(&developing, MIN_OCCURRENCES)
            .into_iter()
            .filter(|tag| !improving_set.contains(tag))
            .collect();

        SkillPatternSummary {
            consistent_strengths: ranked(&strengths, MIN_OCCURRENCES),
            improving,
            needs_focus,
        }
    }
}
