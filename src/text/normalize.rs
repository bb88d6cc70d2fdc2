//! Whitespace and entity normalization for extracted page text.

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Matches a whitespace run; group 1 is set when the run contains a newline.
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\s*\n\s*)|\s+").expect("whitespace pattern is valid"));

/// Decodes HTML entities, collapses whitespace runs and trims.
///
/// Every whitespace run becomes a single space. With `keep_paragraph_breaks`,
/// a run that contains a newline becomes a single `\n` instead.
pub fn normalize(raw: &str, keep_paragraph_breaks: bool) -> String {
    if raw.is_empty() {
        return String::new();
    }
    collapse_whitespace(&html_escape::decode_html_entities(raw), keep_paragraph_breaks)
}

/// Collapses whitespace runs and trims, leaving entities alone.
///
/// For text read out of a parsed DOM, where the parser has already decoded
/// entities once.
pub(crate) fn collapse_whitespace(text: &str, keep_paragraph_breaks: bool) -> String {
    let collapsed = if keep_paragraph_breaks {
        WHITESPACE.replace_all(text, |caps: &Captures<'_>| {
            if caps.get(1).is_some() { "\n" } else { " " }
        })
    } else {
        WHITESPACE.replace_all(text, " ")
    };

    collapsed.trim().to_string()
}

/// Normalizes a summary and cuts it at the last sentence boundary.
///
/// Everything from the last `.` onward is dropped; text without any `.` is kept
/// whole. Absent or empty input has no summary.
pub fn normalize_summary(raw: Option<&str>, keep_paragraph_breaks: bool) -> Option<String> {
    let raw = raw.filter(|s| !s.is_empty())?;
    Some(cut_at_last_sentence(normalize(raw, keep_paragraph_breaks)))
}

/// [`normalize_summary`] for DOM text, without decoding entities again.
pub(crate) fn collapse_summary(text: Option<&str>, keep_paragraph_breaks: bool) -> Option<String> {
    let text = text.filter(|s| !s.is_empty())?;
    Some(cut_at_last_sentence(collapse_whitespace(text, keep_paragraph_breaks)))
}

fn cut_at_last_sentence(mut text: String) -> String {
    if let Some(dot) = text.rfind('.') {
        text.truncate(dot);
        text.truncate(text.trim_end().len());
    }
    text
}
