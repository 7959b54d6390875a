use super::{read_records, StoreOptions};
use std::path::Path;

pub fn run(opts: &StoreOptions, student: &str, file: &Path) -> anyhow::Result<()> {
    let mut records = read_records(file)?;
    if records.len() > 1 {
        tracing::warn!(count = records.len(), "multiple records supplied; checking the last one");
    }
    let Some(current) = records.pop() else {
        anyhow::bail!("no record in {}", file.display());
    };

    let tracker = opts.open_tracker()?;
    let verdict = tracker.detect_deviation(student, &current);
    println!("{}", serde_json::to_string_pretty(&verdict)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{options, record_json};
    use super::*;
    use stride_core::DeviationFlag;

    #[test]
    fn test_check_does_not_record() {
        let temp = tempfile::TempDir::new().unwrap();
        let opts = options(temp.path());
        let file = temp.path().join("current.json");
        std::fs::write(&file, record_json("Essay", 95).to_string()).unwrap();

        run(&opts, "s1", &file).unwrap();

        let tracker = opts.open_tracker().unwrap();
        assert!(tracker.document("s1").unwrap().is_empty());
        let current = read_records(&file).unwrap().remove(0);
        assert_eq!(tracker.detect_deviation("s1", &current).flag, DeviationFlag::Normal);
    }

    #[test]
    fn test_check_empty_array_fails() {
        let temp = tempfile::TempDir::new().unwrap();
        let opts = options(temp.path());
        let file = temp.path().join("empty.json");
        std::fs::write(&file, "[]").unwrap();
        assert!(run(&opts, "s1", &file).is_err());
    }
}
