use super::{read_records, StoreOptions, Tracker};
use std::path::Path;
use stride_history::AppendOutcome;

fn append_all(
    tracker: &Tracker,
    student: &str,
    records: Vec<stride_core::AssignmentRecord>,
) -> anyhow::Result<Option<AppendOutcome>> {
    let mut last = None;
    for record in records {
        let name = record.assignment_name.clone();
        let outcome = tracker
            .append(student, record)
            .map_err(|e| anyhow::anyhow!("failed to record '{}': {}", name, e))?;
        if outcome == AppendOutcome::Skipped {
            return Ok(Some(outcome));
        }
        last = Some(outcome);
    }
    Ok(last)
}

pub fn run(opts: &StoreOptions, student: &str, file: &Path) -> anyhow::Result<()> {
    let records = read_records(file)?;
    if records.is_empty() {
        println!("No records in {}", file.display());
        return Ok(());
    }
    let submitted = records.len();
    let tracker = opts.open_tracker()?;

    match append_all(&tracker, student, records)? {
        Some(AppendOutcome::Skipped) => {
            println!("Student id is untracked; nothing recorded");
        }
        Some(AppendOutcome::Recorded {
            assignment_count, ..
        }) => {
            println!(
                "Recorded {} assignment(s) for {} ({} in window)",
                submitted, student, assignment_count
            );
        }
        None => {}
    }
    Ok(())
}
