//! Path exclusion for the source walk.

use rustc_hash::FxHashSet;

/// Literal exclusion matcher over `/`-separated paths relative to the source root.
///
/// A path is excluded when it equals an entry, lies under an entry
/// (`entry/…`), or its base name equals an entry. No globbing, no case folding.
#[derive(Debug, Default)]
pub struct ExcludeFilter {
    entries: FxHashSet<String>,
}

impl ExcludeFilter {
    /// Build from already-normalized entries; empty entries are ignored.
    pub fn new(entries: &[String]) -> Self {
        let entries = entries
            .iter()
            .filter(|e| !e.is_empty())
            .cloned()
            .collect();
        Self { entries }
    }

    pub fn is_excluded(&self, rel: &str) -> bool {
        if rel.is_empty() || self.entries.is_empty() {
            return false;
        }

        let base_name = rel.rsplit('/').next().unwrap_or(rel);
        if self.entries.contains(rel) || self.entries.contains(base_name) {
            return true;
        }

        // every proper ancestor of `rel`
        rel.match_indices('/')
            .any(|(i, _)| self.entries.contains(&rel[..i]))
    }
}
