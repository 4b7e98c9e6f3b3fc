//! Normalized path lists.
//!
//! A [`PathList`] is the trimmed, deduplicated, case-insensitively sorted form
//! of the raw lines read from the input file. The only way to build one is
//! [`normalize`], so every list in the program upholds both invariants.

use std::collections::HashSet;
use std::fmt;

// ============================================================================
// Path Entry
// ============================================================================

/// One trimmed, non-empty line of the input, treated as an opaque path string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathEntry(String);

impl PathEntry {
    /// Trim a raw line, returning `None` when nothing is left.
    #[must_use]
    pub fn from_raw(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// The entry text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used for the case-insensitive ordering.
    fn fold_key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl AsRef<str> for PathEntry {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Path List
// ============================================================================

/// Ordered, duplicate-free sequence of [`PathEntry`] values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathList {
    entries: Vec<PathEntry>,
}

impl PathList {
    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the entries in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PathEntry> {
        self.entries.iter()
    }

    /// Entries joined with a single `\n`, without a trailing newline.
    #[must_use]
    pub fn joined(&self) -> String {
        self.entries
            .iter()
            .map(PathEntry::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl IntoIterator for PathList {
    type Item = PathEntry;
    type IntoIter = std::vec::IntoIter<PathEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a PathList {
    type Item = &'a PathEntry;
    type IntoIter = std::slice::Iter<'a, PathEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// ============================================================================
// Normalization
// ============================================================================

/// Build a [`PathList`] from raw input lines.
///
/// Lines are trimmed and blanks dropped, exact duplicates collapse onto their
/// first occurrence, and the survivors are stable-sorted by their lowercase
/// form. Entries differing only in case keep their first-seen order.
///
/// # Returns
///
/// The normalized list; empty when no line had any content.
#[must_use]
pub fn normalize<I, S>(lines: I) -> PathList
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut entries: Vec<PathEntry> = lines
        .into_iter()
        .filter_map(|line| PathEntry::from_raw(line.as_ref()))
        .filter(|entry| seen.insert(entry.clone()))
        .collect();

    // sort_by_cached_key is stable
    entries.sort_by_cached_key(PathEntry::fold_key);

    PathList { entries }
}

// ============================================================================
// Tests
// ============================================================================
