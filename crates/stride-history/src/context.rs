//! Prose rendering of a student's derived summaries for prompt inclusion.
//!
//! Output never contains the student id, assignment names, or answer snippets.

use crate::document::StudentDocument;
use stride_core::{title_case, Baseline, GradeStreak, PatternKind, RubricConfig, SkillTag};

pub fn render_context(
    doc: &StudentDocument,
    baseline: Option<&Baseline>,
    rubric: &RubricConfig,
) -> String {
    if doc.is_empty() {
        return String::new();
    }

    let mut lines = vec![format!(
        "Student performance context ({} prior assignment{}):",
        doc.assignment_count(),
        if doc.assignment_count() == 1 { "" } else { "s" }
    )];

    if let Some(trend) = doc.skill_scores.overall_trend {
        lines.push(format!("- Overall trend: {}", trend));
    }

    if let Some(b) = baseline {
        lines.push(format!(
            "- Typical score: {:.1} (std {:.1})",
            b.overall_avg, b.overall_std
        ));
    }

    let averages: Vec<String> = doc
        .skill_scores
        .categories
        .iter()
        .map(|(category, avg)| match rubric.max_points(category) {
            Some(max) => format!("{} {:.1}/{}", title_case(category), avg.current_avg, max),
            None => format!("{} {:.1}", title_case(category), avg.current_avg),
        })
        .collect();
    if !averages.is_empty() {
        lines.push(format!("- Recent category averages: {}", averages.join(", ")));
    }

    for (kind, label) in [
        (PatternKind::Strength, "Recurring strengths"),
        (PatternKind::Weakness, "Recurring weaknesses"),
    ] {
        let descriptions: Vec<&str> = doc
            .patterns
            .iter()
            .filter(|p| p.kind == kind)
            .map(|p| p.description.as_str())
            .collect();
        if !descriptions.is_empty() {
            lines.push(format!("- {}: {}", label, descriptions.join("; ")));
        }
    }

    let skills = &doc.skill_patterns;
    for (tags, label) in [
        (&skills.consistent_strengths, "Consistent skill strengths"),
        (&skills.improving, "Skills improving"),
        (&skills.needs_focus, "Skills needing focus"),
    ] {
        if !tags.is_empty() {
            lines.push(format!("- {}: {}", label, join_tags(tags)));
        }
    }

    let streaks: Vec<String> = doc
        .streaks
        .categories
        .iter()
        .map(|(category, streak)| {
            format!(
                "{} {} over last {}",
                title_case(category),
                streak.direction,
                streak.length
            )
        })
        .collect();
    if !streaks.is_empty() {
        lines.push(format!("- Active streaks: {}", streaks.join(", ")));
    }
    if let Some(grade_streak) = doc.streaks.grade_streak {
        let text = match grade_streak {
            GradeStreak::AStreak => "three consecutive scores of 90+",
            GradeStreak::BOrBetter => "three consecutive scores of 80+",
            GradeStreak::Improving => "three consecutive rising scores",
        };
        lines.push(format!("- Grade streak: {}", text));
    }

    lines.join("\n")
}

fn join_tags(tags: &[SkillTag]) -> String {
    tags.iter()
        .map(SkillTag::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
