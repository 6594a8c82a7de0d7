// src/core/sanitize.rs

use std::path::{Component, Path, PathBuf};

const FORBIDDEN_IN_FILENAME: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Drop every `[` and `]`, keeping what was between them.
/// Square brackets mark editorial insertions in catalogue descriptions.
pub fn strip_square_brackets(s: &str) -> String {
    s.chars().filter(|&c| c != '[' && c != ']').collect()
}

/// Collapse whitespace runs (line breaks included) into single spaces and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Make one path segment safe to create on common file systems.
pub fn sanitize_segment(name: &str) -> String {
    let mut out: String = name
        .chars()
        .map(|c| if c.is_control() || FORBIDDEN_IN_FILENAME.contains(&c) { '_' } else { c })
        .collect();

    // Windows silently drops trailing dots/spaces
    let trimmed = out.trim_end_matches(&['.', ' '][..]).len();
    out.truncate(trimmed);
    let out = out.trim_start().to_string();

    if out.is_empty() { s!("_") } else { out }
}

/// Sanitize every segment of `path` that does not exist yet.
/// Segments already on disk are left untouched.
pub fn sanitize_path(path: &Path) -> PathBuf {
    let mut acc = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::Normal(seg) => {
                let existing = acc.join(seg);
                if existing.exists() {
                    acc = existing;
                } else {
                    acc.push(sanitize_segment(&seg.to_string_lossy()));
                }
            }
            other => acc.push(other.as_os_str()),
        }
    }
    acc
}
