//! `[build]` section configuration.
//!
//! Contains build paths, the exclusion list, minification and sub-configurations.
//!
//! # Example
//!
//! ```toml
//! [build]
//! source = "."                  # Directory to read from (relative to project root)
//! output = "dist"               # Directory to write to, deleted and recreated every run
//! exclude = [".git", "data"]    # Path literals or base names never processed
//! minify = true                 # Minify JS, HTML and CSS
//!
//! [build.obfuscate]
//! enable = true                 # Hashed .js names, HTML src attributes rewritten
//!
//! [build.guard]
//! domains = ["example.com"]     # Domain lock injected into every script
//!
//! [build.stage]
//! source = "data/llm"           # Mirrored after the main walk, one extension only
//! ```
//!
//! See submodules for detailed options: [`obfuscate`], [`guard`], [`stage`].

pub mod guard;
pub mod obfuscate;
pub mod stage;

pub use guard::GuardConfig;
pub use obfuscate::{NameSeed, ObfuscateConfig, RewriteMode};
pub use stage::StageConfig;

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Source root.
    pub source: PathBuf,

    /// Output root (destroyed and recreated each run).
    pub output: PathBuf,

    /// Path literals and base names skipped during the walk.
    pub exclude: Vec<String>,

    /// Minify JavaScript, HTML and CSS.
    pub minify: bool,

    /// JavaScript file name obfuscation.
    pub obfuscate: ObfuscateConfig,

    /// Domain lock for JavaScript outputs.
    pub guard: GuardConfig,

    /// Curated data directory staging.
    pub stage: StageConfig,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            source: ".".into(),
            output: "dist".into(),
            exclude: [
                ".git",
                "node_modules",
                "dist",
                "data",
                "target",
                "sitepack.toml",
                ".DS_Store",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            minify: true,
            obfuscate: ObfuscateConfig::default(),
            guard: GuardConfig::default(),
            stage: StageConfig::default(),
        }
    }
}

impl BuildSectionConfig {
    /// Normalize exclusion entries to `/`-separated relative form.
    ///
    /// `"./assets/"` and `"assets\\"` both become `"assets"`; empty entries are dropped.
    pub fn normalize_exclude(&mut self) {
        self.exclude = self
            .exclude
            .iter()
            .map(|entry| normalize_entry(entry))
            .filter(|entry| !entry.is_empty())
            .collect();
    }

    /// Add an exclusion entry unless an equal one is already present.
    pub fn push_exclude(&mut self, entry: &str) {
        let entry = normalize_entry(entry);
        if !entry.is_empty() && !self.exclude.contains(&entry) {
            self.exclude.push(entry);
        }
    }

    /// Validate paths after they have been resolved against the project root.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.output == self.source {
            diag.error(
                FieldPath::new("build.output"),
                "output root is the source root and would be deleted",
            );
        } else if self.source.starts_with(&self.output) {
            diag.error_with_hint(
                FieldPath::new("build.output"),
                format!(
                    "output root `{}` contains the source root and would be deleted",
                    self.output.display()
                ),
                "point `output` at a sibling or child directory of `source`",
            );
        }

        self.guard.validate(diag);
        self.stage.validate(diag);
    }
}

fn normalize_entry(entry: &str) -> String {
    let entry = entry.trim().replace('\\', "/");
    let mut entry = entry.as_str();
    while let Some(rest) = entry.strip_prefix("./") {
        entry = rest;
    }
    entry.trim_end_matches('/').to_string()
}
