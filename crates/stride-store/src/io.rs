//! JSONL import and atomic file writes

use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read all records from a JSONL file, skipping blank lines.
///
/// Import stops at the first malformed line with an `InvalidData` error that
/// names the line, so a batch is never partially read.
pub fn read_jsonl<T: for<'de> Deserialize<'de>>(path: &Path) -> std::io::Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut records = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(&line).map_err(|e| {
            tracing::warn!(path = %path.display(), line = line_no + 1, error = %e, "malformed line");
            std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{}:{}: {}", path.display(), line_no + 1, e),
            )
        })?;
        records.push(record);
    }

    Ok(records)
}

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    std::fs::write(&temp_path, data)?;
    std::fs::rename(temp_path, path)?;
    Ok(())
}
