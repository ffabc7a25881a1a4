//! Collision-free output filename allocation.

use std::collections::HashSet;

use tracing::debug;

use super::sanitize::{sanitize_filename, DEFAULT_MAX_FILENAME_LENGTH};

/// Placeholder label for a page without a detected invoice number.
pub fn positional_label(page: u32) -> String {
    format!("unmatched_page_{:02}", page)
}

/// Filenames already handed out during one split.
///
/// Names are compared case-insensitively. A set belongs to exactly one split
/// invocation and is dropped together with it.
#[derive(Debug, Clone)]
pub struct UsedNames {
    names: HashSet<String>,
    max_length: usize,
}

impl UsedNames {
    /// Create an empty set using the default label length.
    pub fn new() -> Self {
        Self::with_max_length(DEFAULT_MAX_FILENAME_LENGTH)
    }

    /// Create an empty set that truncates labels to `max_length` characters.
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            names: HashSet::new(),
            max_length,
        }
    }

    /// Allocate a unique `.pdf` filename for `base_label` on page `page` (1-based).
    ///
    /// The plain `<label>.pdf` is used when free, otherwise
    /// `<label>__p<NN>.pdf`. Should that be taken as well, a counter is
    /// appended (`<label>__p<NN>_2.pdf`, `_3`, ...) so no entry is ever
    /// overwritten.
    pub fn allocate(&mut self, base_label: &str, page: u32) -> String {
        let mut stem = sanitize_filename(base_label, self.max_length);
        if stem.is_empty() {
            stem = format!("page_{:02}", page);
        }

        let plain = format!("{}.pdf", stem);
        if self.claim(&plain) {
            return plain;
        }

        let suffixed = format!("{}__p{:02}.pdf", stem, page);
        if self.claim(&suffixed) {
            debug!("Name {} already used, page {} becomes {}", plain, page, suffixed);
            return suffixed;
        }

        let mut counter = 2u32;
        loop {
            let candidate = format!("{}__p{:02}_{}.pdf", stem, page, counter);
            if self.claim(&candidate) {
                debug!("Second-order collision on {}, using {}", suffixed, candidate);
                return candidate;
            }
            counter += 1;
        }
    }

    /// Check whether a name has been allocated (case-insensitive).
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(&name.to_lowercase())
    }

    /// Number of allocated names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when nothing has been allocated yet.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn claim(&mut self, name: &str) -> bool {
        self.names.insert(name.to_lowercase())
    }
}

impl Default for UsedNames {
    fn default() -> Self {
        Self::new()
    }
}
