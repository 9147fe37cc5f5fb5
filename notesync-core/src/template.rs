//! Literal placeholder substitution for the note template.
//!
//! There is no templating language here: each `{{TOKEN}}` is replaced
//! verbatim, with no escaping and no recursive expansion.

use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::NoteError;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{(TITLE|DATE|TIME|TAGS|SHORT_DESCRIPTION|CATEGORY)\}\}").unwrap()
});

pub const TITLE: &str = "{{TITLE}}";
pub const DATE: &str = "{{DATE}}";
pub const TIME: &str = "{{TIME}}";
pub const TAGS: &str = "{{TAGS}}";
pub const SUMMARY: &str = "{{SHORT_DESCRIPTION}}";
pub const CATEGORY: &str = "{{CATEGORY}}";

/// Values substituted into the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateContext<'a> {
    pub title: &'a str,
    /// `YYYY-MM-DD`
    pub date: &'a str,
    /// `HH:MM`
    pub time: &'a str,
    pub tags: &'a str,
    pub summary: &'a str,
    pub category: &'a str,
}

impl TemplateContext<'_> {
    fn value<'s>(&'s self, token: &'s str) -> &'s str {
        match token {
            TITLE => self.title,
            DATE => self.date,
            TIME => self.time,
            TAGS => self.tags,
            SUMMARY => self.summary,
            CATEGORY => self.category,
            other => other,
        }
    }
}

/// Replace every placeholder in `template` in a single left-to-right pass.
pub fn render(template: &str, ctx: &TemplateContext<'_>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures<'_>| ctx.value(&caps[0]).to_string())
        .into_owned()
}

/// Read the template at `path` and render it.
///
/// A missing file is [`NoteError::TemplateMissing`]; any other read failure
/// is [`NoteError::TemplateRead`].
pub fn render_file(path: &Path, ctx: &TemplateContext<'_>) -> Result<String, NoteError> {
    if !path.is_file() {
        return Err(NoteError::TemplateMissing {
            path: path.to_path_buf(),
        });
    }
    let template = std::fs::read_to_string(path).map_err(|source| NoteError::TemplateRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(render(&template, ctx))
}
