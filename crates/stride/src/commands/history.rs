use super::StoreOptions;
use stride_history::HistoryStats;

fn format_stats(stats: &HistoryStats) -> String {
    let grades: Vec<String> = stats
        .grade_distribution
        .iter()
        .map(|(grade, count)| format!("{}: {}", grade, count))
        .collect();
    let trend = stats
        .overall_trend
        .map(|t| t.to_string())
        .unwrap_or_else(|| "n/a".to_string());

    format!(
        "Assignments: {}\n\
         Average score: {:.1}\n\
         Best / worst: {} / {}\n\
         Grades: {}\n\
         Trend: {}",
        stats.assignment_count,
        stats.average_score,
        stats.best_score,
        stats.worst_score,
        grades.join(", "),
        trend
    )
}

pub fn run(opts: &StoreOptions, student: &str, stats: bool, limit: usize) -> anyhow::Result<()> {
    let tracker = opts.open_tracker()?;

    if stats {
        match tracker.history_stats(student)? {
            Some(stats) => println!("{}", format_stats(&stats)),
            None => println!("No history for {}", student),
        }
        return Ok(());
    }

    let doc = tracker.document(student)?;
    if doc.is_empty() {
        println!("No history for {}", student);
        return Ok(());
    }

    let shown: Vec<_> = doc.assignments.iter().rev().take(limit).collect();
    println!("Recent Assignments (last {})", shown.len());
    println!("{}", "=".repeat(60));
    for record in shown {
        println!(
            "  {} | {:>3} {:<3} | {}",
            record.date.format("%Y-%m-%d"),
            record.score,
            record.grade,
            record.assignment_name
        );
    }
    Ok(())
}
