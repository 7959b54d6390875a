use super::StoreOptions;
use std::path::Path;
use stride_core::{RubricConfig, TrackerConfig};
use stride_store::atomic_write;

fn write_config<T: serde::Serialize>(path: &Path, value: &T, force: bool) -> anyhow::Result<bool> {
    if path.exists() && !force {
        return Ok(false);
    }
    let json = serde_json::to_string_pretty(value)?;
    atomic_write(path, json.as_bytes())?;
    Ok(true)
}

pub fn run(opts: &StoreOptions, force: bool) -> anyhow::Result<()> {
    let paths = opts.paths()?;
    std::fs::create_dir_all(paths.students_dir())?;

    for (path, written) in [
        (
            paths.rubric_file(),
            write_config(&paths.rubric_file(), &RubricConfig::default(), force)?,
        ),
        (
            paths.tracker_config_file(),
            write_config(&paths.tracker_config_file(), &TrackerConfig::default(), force)?,
        ),
    ] {
        if written {
            println!("Wrote {}", path.display());
        } else {
            println!("Kept existing {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::options;
    use super::*;

    #[test]
    fn test_init_writes_defaults_once() {
        let temp = tempfile::TempDir::new().unwrap();
        let opts = options(temp.path());
        run(&opts, false).unwrap();

        let rubric_path = temp.path().join("rubric.json");
        let loaded = RubricConfig::load(&rubric_path).unwrap();
        assert_eq!(loaded, RubricConfig::default());

        // Edits survive a second init without --force
        std::fs::write(&rubric_path, r#"{"categories":{"style":10}}"#).unwrap();
        run(&opts, false).unwrap();
        assert_eq!(RubricConfig::load(&rubric_path).unwrap().max_points("style"), Some(10));

        run(&opts, true).unwrap();
        assert_eq!(RubricConfig::load(&rubric_path).unwrap(), RubricConfig::default());
    }
}
