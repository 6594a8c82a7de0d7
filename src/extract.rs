// src/extract.rs
//! Apply a grammar to one description.
//!
//! Pure function of `(text, grammar)`. Nothing here fails: a pattern that
//! does not match at all is logged and every identifier comes back absent.

use std::borrow::Cow;

use tracing::warn;

use crate::{
    core::sanitize::{normalize_whitespace, strip_square_brackets},
    grammar::{Grammar, Matcher, VALUE_GROUP},
};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractionResult {
    /// One entry per grammar identifier, in grammar order.
    pub values: Vec<(String, Option<String>)>,
    pub nothing_extracted: bool,
    /// Colon-terminated text that no known label accounts for.
    pub residual: Option<Vec<String>>,
}

impl ExtractionResult {
    pub fn get(&self, id: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == id)
            .and_then(|(_, v)| v.as_deref())
    }
}

pub fn extract(text: &str, grammar: &Grammar) -> ExtractionResult {
    let mut values: Vec<(String, Option<String>)> =
        grammar.ids().iter().map(|id| (id.clone(), None)).collect();

    match grammar.matcher() {
        Matcher::Labels { spans, groups } => {
            for caps in spans.captures_iter(text) {
                let Some(i) = groups.iter().position(|g| caps.name(g).is_some()) else { continue };
                // first occurrence of a label wins
                if values[i].1.is_none() {
                    values[i].1 = caps.name(VALUE_GROUP).and_then(|m| clean(m.as_str()));
                }
            }
        }
        Matcher::Explicit { pattern } => match pattern.captures(text) {
            Some(caps) => {
                for (id, value) in values.iter_mut() {
                    *value = caps.name(id).and_then(|m| clean(m.as_str()));
                }
            }
            None => warn!(description = %preview(text), "extraction pattern did not match"),
        },
    }

    let nothing_extracted = values.iter().all(|(_, v)| v.is_none());
    ExtractionResult {
        values,
        nothing_extracted,
        residual: residual_labels(text, grammar),
    }
}

/// Candidate labels the grammar does not know about.
///
/// Known `label:` markers are removed first; then for every remaining colon
/// the text back to the nearest `.` or `[` is taken, trimmed of whitespace,
/// punctuation and digits.
pub fn residual_labels(text: &str, grammar: &Grammar) -> Option<Vec<String>> {
    let cleaned = match grammar.markers() {
        Some(markers) => markers.replace_all(text, ""),
        None => Cow::Borrowed(text),
    };

    let mut found: Vec<String> = Vec::new();
    for (colon, _) in cleaned.match_indices(':') {
        let head = &cleaned[..colon];
        let start = head.rfind(|c| c == '.' || c == '[').map_or(0, |i| i + 1);
        let candidate = head[start..]
            .trim_matches(|c: char| c.is_whitespace() || c.is_ascii_punctuation() || c.is_numeric());

        if !candidate.is_empty() && !found.iter().any(|f| f == candidate) {
            found.push(s!(candidate));
        }
    }

    (!found.is_empty()).then_some(found)
}

fn clean(span: &str) -> Option<String> {
    let value = normalize_whitespace(&strip_square_brackets(span));
    (!value.is_empty()).then_some(value)
}

fn preview(text: &str) -> String {
    const MAX: usize = 60;
    match text.char_indices().nth(MAX) {
        Some((cut, _)) => join!(&text[..cut], "…"),
        None => s!(text),
    }
}
