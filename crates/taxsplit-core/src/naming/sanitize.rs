//! Filesystem-safe filename sanitization.

use lazy_static::lazy_static;
use regex::Regex;

/// Default maximum length (in characters) of a sanitized label.
pub const DEFAULT_MAX_FILENAME_LENGTH: usize = 120;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Characters rejected by common filesystems (Windows being the strictest).
const RESERVED: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Convert an arbitrary label into a filesystem-safe, length-bounded token.
///
/// Reserved characters and control characters (U+0000 to U+001F) become `_`,
/// whitespace runs collapse to one space, and leading/trailing spaces, periods
/// and underscores are stripped before truncating to `max_length` characters.
///
/// The result may be empty; callers fall back to a positional label then.
pub fn sanitize_filename(label: &str, max_length: usize) -> String {
    let replaced: String = label
        .trim()
        .chars()
        .map(|c| {
            if RESERVED.contains(&c) || (c as u32) < 0x20 {
                '_'
            } else {
                c
            }
        })
        .collect();

    let collapsed = WHITESPACE_RUN.replace_all(&replaced, " ");
    let stripped = collapsed.trim_matches(|c| c == ' ' || c == '.' || c == '_');

    stripped.chars().take(max_length).collect()
}
