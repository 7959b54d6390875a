//! Student identity and the "no tracking" sentinel

use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;

/// Identifier the grading pipeline sends when the student is unknown
pub const UNKNOWN_STUDENT: &str = "UNKNOWN";

static UNSAFE_KEY_CHARS: OnceLock<Regex> = OnceLock::new();

fn unsafe_key_chars() -> &'static Regex {
    UNSAFE_KEY_CHARS.get_or_init(|| Regex::new(r"[^A-Za-z0-9-]").unwrap())
}

/// A tracked student. Construction fails for the sentinel and blank ids, so
/// holding a `StudentId` means history may be read and written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StudentId(String);

impl StudentId {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(UNKNOWN_STUDENT) {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe key for the persistence collaborator.
    ///
    /// `_` is the escape character: a literal `_` becomes `__` and every byte
    /// of any other character outside `[A-Za-z0-9-]` becomes `_xx` (lowercase
    /// hex), so distinct ids never share a key.
    pub fn storage_key(&self) -> String {
        let escaped = unsafe_key_chars().replace_all(&self.0, |caps: &Captures| {
            let matched = &caps[0];
            if matched == "_" {
                return "__".to_string();
            }
            matched.bytes().map(|b| format!("_{:02x}", b)).collect()
        });
        format!("student_{}", escaped)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinels_are_untracked() {
        assert!(StudentId::parse("").is_none());
        assert!(StudentId::parse("   ").is_none());
        assert!(StudentId::parse("UNKNOWN").is_none());
        assert!(StudentId::parse("unknown").is_none());
        assert!(StudentId::parse("s-123").is_some());
    }

    #[test]
    fn test_storage_key_is_filesystem_safe() {
        let id = StudentId::parse("Jane Doe/../2024").unwrap();
        assert_eq!(id.storage_key(), "student_Jane_20Doe_2f_2e_2e_2f2024");

        let plain = StudentId::parse("s-123_a").unwrap();
        assert_eq!(plain.storage_key(), "student_s-123__a");

        let accented = StudentId::parse("José").unwrap();
        assert_eq!(accented.storage_key(), "student_Jos_c3_a9");
    }

    #[test]
    fn test_distinct_ids_get_distinct_keys() {
        let ids = [
            "Jane Doe", "Jane.Doe", "Jane_Doe", "Jane__Doe", "Jane_20Doe", "Jane-Doe", "Jane/Doe",
        ];
        let keys: std::collections::HashSet<String> = ids
            .iter()
            .map(|raw| StudentId::parse(raw).unwrap().storage_key())
            .collect();
        assert_eq!(keys.len(), ids.len());

        let key_chars = Regex::new(r"^[A-Za-z0-9_-]+$").unwrap();
        assert!(keys.iter().all(|k| key_chars.is_match(k)));
    }
}
