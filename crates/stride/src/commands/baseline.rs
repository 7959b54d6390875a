use super::StoreOptions;

pub fn run(opts: &StoreOptions, student: &str) -> anyhow::Result<()> {
    let tracker = opts.open_tracker()?;
    let summary = tracker.get_baseline_summary(student)?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
