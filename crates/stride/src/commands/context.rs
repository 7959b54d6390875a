use super::StoreOptions;

pub fn run(opts: &StoreOptions, student: &str) -> anyhow::Result<()> {
    let tracker = opts.open_tracker()?;
    let summary = tracker.build_context_summary(student);
    if summary.is_empty() {
        println!("No history for {}", student);
    } else {
        println!("{}", summary);
    }
    Ok(())
}
