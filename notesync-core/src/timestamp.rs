//! The `- **Last updated:** YYYY-MM-DD HH:MM` line inside a note.

use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::{NoExpand, Regex};

use crate::error::{io_err, NoteError};

static LAST_UPDATED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^- \*\*Last updated:\*\* \d{4}-\d{2}-\d{2} \d{2}:\d{2}$").unwrap()
});

/// Local date-time format shared by timestamps and commit messages.
pub const STAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// The full line written for `now`.
pub fn last_updated_line(now: NaiveDateTime) -> String {
    format!("- **Last updated:** {}", now.format(STAMP_FORMAT))
}

/// Rewrite the first `Last updated` line of `content` to `now`.
///
/// Returns `None` when the note has no such line.
pub fn rewrite_timestamp(content: &str, now: NaiveDateTime) -> Option<String> {
    if !LAST_UPDATED.is_match(content) {
        return None;
    }
    let line = last_updated_line(now);
    Some(LAST_UPDATED.replacen(content, 1, NoExpand(&line)).into_owned())
}

/// Refresh the timestamp of the note at `path` in place.
///
/// `Ok(false)` means the note carries no timestamp line and was left alone.
pub fn refresh_timestamp(path: &Path, now: NaiveDateTime) -> Result<bool, NoteError> {
    let content = std::fs::read_to_string(path).map_err(|e| io_err(path, e))?;
    match rewrite_timestamp(&content, now) {
        Some(updated) => {
            if updated != content {
                std::fs::write(path, updated).map_err(|e| io_err(path, e))?;
            }
            tracing::debug!(path = %path.display(), "timestamp refreshed");
            Ok(true)
        }
        None => {
            tracing::debug!(path = %path.display(), "no timestamp line");
            Ok(false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    const NOTE: &str = "---\ntitle: \"Test Note\"\n---\n\n## Metadata\n\
                        - **Created:** 2025-01-13 10:00\n\
                        - **Last updated:** 2025-01-13 10:00\n\nContent here.\n";

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn rewrites_only_the_last_updated_line() {
        let out = rewrite_timestamp(NOTE, at(9, 7)).unwrap();
        assert!(out.contains("- **Created:** 2025-01-13 10:00"));
        assert!(out.contains("- **Last updated:** 2025-03-02 09:07"));
        assert!(!out.contains("- **Last updated:** 2025-01-13 10:00"));
        assert_eq!(out.lines().count(), NOTE.lines().count());
    }

    #[test]
    fn only_first_match_is_replaced() {
        let old = "- **Last updated:** 2024-01-01 00:00\n";
        let content = format!("{old}{old}");
        let out = rewrite_timestamp(&content, at(12, 0)).unwrap();
        assert_eq!(
            out,
            "- **Last updated:** 2025-03-02 12:00\n- **Last updated:** 2024-01-01 00:00\n"
        );
    }

    #[test]
    fn unanchored_or_malformed_lines_are_ignored() {
        assert!(rewrite_timestamp("# Note\n\nNo timestamp here.", at(1, 1)).is_none());
        assert!(rewrite_timestamp("  - **Last updated:** 2025-01-13 10:00\n", at(1, 1)).is_none());
        assert!(rewrite_timestamp("- **Last updated:** 2025-1-13 10:00\n", at(1, 1)).is_none());
        assert!(
            rewrite_timestamp("- **Last updated:** 2025-01-13 10:00 UTC\n", at(1, 1)).is_none()
        );
    }

    #[test]
    fn rewrite_is_stable_on_a_frozen_clock() {
        let once = rewrite_timestamp(NOTE, at(9, 7)).unwrap();
        let twice = rewrite_timestamp(&once, at(9, 7)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn refresh_updates_file_on_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.md");
        std::fs::write(&path, NOTE).unwrap();

        assert!(refresh_timestamp(&path, at(9, 7)).unwrap());
        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(on_disk.contains("- **Last updated:** 2025-03-02 09:07"));
    }

    #[test]
    fn refresh_without_line_reports_false_and_keeps_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.md");
        std::fs::write(&path, "# Note\n").unwrap();

        assert!(!refresh_timestamp(&path, at(9, 7)).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# Note\n");
    }

    #[test]
    fn refresh_missing_file_is_an_io_error() {
        let dir = TempDir::new().unwrap();
        let err = refresh_timestamp(&dir.path().join("gone.md"), at(9, 7)).unwrap_err();
        assert!(matches!(err, NoteError::Io { .. }));
        assert!(err.to_string().contains("gone.md"));
    }
}
