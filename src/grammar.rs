// src/grammar.rs
//! Label grammar: the set of `Label: span` rules applied to a description.
//!
//! For labels `A`, `B`, … the generated pattern is one alternation
//!
//! ```text
//! (?s)(?:(?P<g0>\bA)|(?P<g1>\bB)|…):\s*(?P<value>.*?)(?:\. |\.?$)
//! ```
//!
//! run repeatedly over the text, so each label matches independently and a
//! missing label never blocks the others. Alternatives are ordered longest
//! label first; with leftmost-first matching that makes the longest label
//! win wherever two could start at the same position ("Other petitioners"
//! beats "petitioners"), independent of the order labels were declared in.
//!
//! A row may instead supply its own pattern; its named groups become the
//! identifiers and it is applied once, verbatim.

use std::cmp::Reverse;

use regex::Regex;

use crate::error::ConfigError;

pub(crate) const VALUE_GROUP: &str = "value";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub id: String,
}

impl Label {
    pub fn new(text: &str) -> Result<Self, ConfigError> {
        let text = text.trim();
        let id = label_id(text);
        if id.is_empty() {
            return Err(ConfigError::EmptyLabelId(s!(text)));
        }
        Ok(Self { text: s!(text), id })
    }
}

#[derive(Clone, Debug)]
pub(crate) enum Matcher {
    /// Generated alternation; `groups[i]` is the capture group of `labels[i]`.
    Labels { spans: Regex, groups: Vec<String> },
    /// Row-supplied pattern, one identifier per named group.
    Explicit { pattern: Regex },
}

#[derive(Clone, Debug)]
pub struct Grammar {
    labels: Vec<Label>,
    ids: Vec<String>,
    matcher: Matcher,
    /// `label:` occurrences of every known label, for the residual scan.
    markers: Option<Regex>,
}

/// Identifier for a label: punctuation stripped, whitespace runs to `_`, case-folded.
/// `"Nature of request:"` → `"nature_of_request"`
pub fn label_id(text: &str) -> String {
    let kept: String = text
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join("_").to_lowercase()
}

impl Grammar {
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self, ConfigError> {
        let labels = collect_labels(labels)?;
        if labels.is_empty() {
            return Err(ConfigError::NoLabels);
        }

        let groups: Vec<String> = (0..labels.len()).map(|i| format!("g{i}")).collect();
        let alternation = alternation(&labels, Some(&groups));
        let spans = Regex::new(&format!(
            r"(?s)(?:{alternation}):\s*(?P<{VALUE_GROUP}>.*?)(?:\. |\.?$)"
        ))?;

        Ok(Self {
            ids: labels.iter().map(|l| l.id.clone()).collect(),
            markers: Some(marker_regex(&labels)?),
            matcher: Matcher::Labels { spans, groups },
            labels,
        })
    }

    /// Use `pattern` verbatim. `labels` are only used to recognise known
    /// labels when scanning for unlisted ones.
    pub fn from_pattern<S: AsRef<str>>(pattern: &str, labels: &[S]) -> Result<Self, ConfigError> {
        let pattern = Regex::new(pattern)?;
        let ids: Vec<String> = pattern.capture_names().flatten().map(str::to_string).collect();
        let labels = collect_labels(labels)?;
        let markers = if labels.is_empty() { None } else { Some(marker_regex(&labels)?) };

        Ok(Self { labels, ids, matcher: Matcher::Explicit { pattern }, markers })
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Output identifiers, in column order.
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self.matcher, Matcher::Explicit { .. })
    }

    pub(crate) fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub(crate) fn markers(&self) -> Option<&Regex> {
        self.markers.as_ref()
    }
}

/// Pick the grammar for a row: its own pattern, else its labels, else
/// whatever the previous row left active (possibly nothing).
pub fn build_or_reuse(
    labels: &[String],
    pattern: Option<&str>,
    previous: Option<Grammar>,
) -> Result<Option<Grammar>, ConfigError> {
    if let Some(pattern) = pattern {
        return Grammar::from_pattern(pattern, labels).map(Some);
    }
    if labels.iter().any(|l| !l.trim().is_empty()) {
        return Grammar::from_labels(labels).map(Some);
    }
    Ok(previous)
}

fn collect_labels<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Label>, ConfigError> {
    let mut out: Vec<Label> = Vec::with_capacity(raw.len());
    for text in raw.iter().map(AsRef::as_ref).filter(|t| !t.trim().is_empty()) {
        let label = Label::new(text)?;
        if let Some(first) = out.iter().find(|l| l.id == label.id) {
            return Err(ConfigError::DuplicateLabel {
                first: first.text.clone(),
                second: label.text,
                id: label.id,
            });
        }
        out.push(label);
    }
    Ok(out)
}

/// Escaped labels, longest first, optionally wrapped in named groups.
fn alternation(labels: &[Label], groups: Option<&[String]>) -> String {
    let mut order: Vec<usize> = (0..labels.len()).collect();
    order.sort_by_key(|&i| Reverse(labels[i].text.chars().count()));

    order
        .iter()
        .map(|&i| {
            let text = &labels[i].text;
            let boundary = if text.starts_with(|c: char| c.is_alphanumeric()) { r"\b" } else { "" };
            let body = join!(boundary, &regex::escape(text));
            match groups {
                Some(g) => format!("(?P<{}>{body})", g[i]),
                None => body,
            }
        })
        .collect::<Vec<_>>()
        .join("|")
}

fn marker_regex(labels: &[Label]) -> Result<Regex, ConfigError> {
    Ok(Regex::new(&format!("(?:{}):", alternation(labels, None)))?)
}
