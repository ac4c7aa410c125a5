//! `[build.obfuscate]` section: hashed JavaScript file names.

use serde::{Deserialize, Serialize};

/// What gets mixed into the hash next to the original file name.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NameSeed {
    /// Wall-clock milliseconds at the time the file is processed (new names every run).
    #[default]
    Timestamp,
    /// File contents (same input, same name).
    Content,
}

/// When HTML files see the JavaScript renames.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RewriteMode {
    /// HTML is processed after every other file, so every rename is visible.
    #[default]
    Deferred,
    /// Strict traversal order: HTML only sees renames recorded before it.
    Ordered,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ObfuscateConfig {
    /// Rename `.js` outputs to hashed names and rewrite HTML `src` references.
    pub enable: bool,
    /// Hash seed for new names.
    pub seed: NameSeed,
    /// HTML rewrite ordering.
    pub rewrite: RewriteMode,
}
