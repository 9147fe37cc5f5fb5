//! Automatic commit messages.

use std::path::PathBuf;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use notesync_core::timestamp::STAMP_FORMAT;

static TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^title:\s*"(.+)""#).unwrap());

/// Message used when there is nothing to describe.
pub const EMPTY_MESSAGE: &str = "Sync notes";

/// `title: "..."` from a note's frontmatter, if present.
pub fn frontmatter_title(content: &str) -> Option<&str> {
    TITLE
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Message for a commit covering `notes`.
///
/// - none → [`EMPTY_MESSAGE`]
/// - one → `Update note: <title>`, or `Update note - <now>` when the title
///   cannot be read
/// - several → `Sync <n> notes - <now>`
pub fn commit_message(notes: &[PathBuf], now: NaiveDateTime) -> String {
    let stamp = now.format(STAMP_FORMAT);
    match notes {
        [] => EMPTY_MESSAGE.to_string(),
        [only] => {
            let title = std::fs::read_to_string(only)
                .ok()
                .and_then(|content| frontmatter_title(&content).map(str::to_owned));
            match title {
                Some(title) => format!("Update note: {title}"),
                None => format!("Update note - {stamp}"),
            }
        }
        many => format!("Sync {} notes - {stamp}", many.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(14, 3, 0)
            .unwrap()
    }

    #[test]
    fn empty_list_uses_fixed_message() {
        assert_eq!(commit_message(&[], now()), "Sync notes");
    }

    #[test]
    fn single_note_uses_its_title() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "---\ntitle: \"Weekly Review\"\n---\n").unwrap();
        assert_eq!(commit_message(&[path], now()), "Update note: Weekly Review");
    }

    #[test]
    fn single_note_without_title_uses_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        std::fs::write(&path, "# no frontmatter\n").unwrap();
        assert_eq!(commit_message(&[path], now()), "Update note - 2025-06-01 14:03");
    }

    #[test]
    fn unreadable_single_note_uses_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("deleted.md");
        assert_eq!(commit_message(&[path], now()), "Update note - 2025-06-01 14:03");
    }

    #[test]
    fn several_notes_are_counted() {
        let paths = vec![PathBuf::from("a.md"), PathBuf::from("b.md"), PathBuf::from("c.md")];
        assert_eq!(commit_message(&paths, now()), "Sync 3 notes - 2025-06-01 14:03");
    }

    #[test]
    fn title_must_start_a_line_and_be_quoted() {
        assert_eq!(frontmatter_title("title: \"A\"\n"), Some("A"));
        assert_eq!(frontmatter_title("title:\"B\"\n"), Some("B"));
        assert_eq!(frontmatter_title("  title: \"C\"\n"), None);
        assert_eq!(frontmatter_title("title: D\n"), None);
        assert_eq!(frontmatter_title("subtitle: \"E\"\n"), None);
    }
}
