//! `[build.stage]` section: curated data directory copied after the main walk.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    /// Directory to mirror, relative to the source root.
    pub source: PathBuf,
    /// Destination, relative to the output root.
    pub output: PathBuf,
    /// The only file extension copied (without the dot).
    pub extension: String,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            source: "data/llm".into(),
            output: "data/llm".into(),
            extension: "json".into(),
        }
    }
}

impl StageConfig {
    /// Drop a leading `.` so `".json"` and `"json"` mean the same thing.
    pub fn normalize(&mut self) {
        self.extension = self.extension.trim().trim_start_matches('.').to_string();
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.extension.is_empty() {
            diag.error_with_hint(
                FieldPath::new("build.stage.extension"),
                "extension must not be empty",
                "e.g. extension = \"json\"",
            );
        }
        if self.output.is_absolute() {
            diag.error(
                FieldPath::new("build.stage.output"),
                "must be relative to the output root",
            );
        }
    }
}
