//! Build configuration management for `sitepack.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   └── build/     # [build] and sub-sections (obfuscate, guard, stage)
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # PackConfig (this file)
//! ```
//!
//! The config is loaded once, finalized against the CLI, validated, and then
//! passed by reference through the whole build. Nothing mutates it afterwards.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    BuildSectionConfig, GuardConfig, NameSeed, ObfuscateConfig, RewriteMode, StageConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{cli::Cli, log, utils::path::normalize_path};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing sitepack.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackConfig {
    /// Absolute path to the config file, `None` when running on defaults
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory - parent of config file, or cwd (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Build settings
    #[serde(default)]
    pub build: BuildSectionConfig,
}

impl PackConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. Without one, the built-in
    /// defaults apply and the project root is the current directory.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let (mut config, root) = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                let root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = Some(normalize_path(&path));
                (config, root)
            }
            None => {
                crate::debug!("config"; "{} not found, using defaults", cli.config.display());
                (Self::default(), cwd)
            }
        };

        config.finalize(cli, &root);
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warn"; "unknown fields in {} are ignored:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // finalization
    // ========================================================================

    /// Apply CLI overrides, resolve paths against `root`, normalize entries.
    pub fn finalize(&mut self, cli: &Cli, root: &Path) {
        crate::logger::set_verbose(cli.verbose);

        Self::update_option(&mut self.build.source, cli.source.as_ref());
        Self::update_option(&mut self.build.output, cli.output.as_ref());
        Self::update_option(&mut self.build.minify, cli.minify.as_ref());
        Self::update_option(&mut self.build.obfuscate.enable, cli.obfuscate.as_ref());
        self.build.guard.domains.extend(cli.domains.iter().cloned());

        self.normalize_paths(root);
        self.build.normalize_exclude();
        self.build.guard.normalize();
        self.build.stage.normalize();
        self.exclude_nested_output();
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Resolve source/output to absolute paths.
    fn normalize_paths(&mut self, root: &Path) {
        let root = normalize_path(root);
        self.build.source = normalize_path(&root.join(&self.build.source));
        self.build.output = normalize_path(&root.join(&self.build.output));
        self.root = root;
    }

    /// Keep the walk out of its own output when the output lives under the source.
    fn exclude_nested_output(&mut self) {
        let Ok(rel) = self.build.output.strip_prefix(&self.build.source) else {
            return;
        };
        if rel.as_os_str().is_empty() {
            return;
        }
        let rel = crate::utils::path::to_slash(rel);
        self.build.push_exclude(&rel);
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, collecting every error before failing.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();
        self.build.validate(&mut diag);
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Print the resolved configuration.
    pub fn print_summary(&self) {
        let build = &self.build;
        match &self.config_path {
            Some(path) => log!("config"; "file: {}", path.display()),
            None => log!("config"; "file: none (defaults)"),
        }
        log!("config"; "source: {}", build.source.display());
        log!("config"; "output: {}", build.output.display());
        log!("config"; "exclude: [{}]", build.exclude.join(", "));
        log!("config"; "minify: {}", build.minify);
        if build.obfuscate.enable {
            log!(
                "config";
                "obfuscate: seed={:?} rewrite={:?}",
                build.obfuscate.seed,
                build.obfuscate.rewrite
            );
        } else {
            log!("config"; "obfuscate: false");
        }
        if build.guard.is_enabled() {
            log!("config"; "domain lock: [{}]", build.guard.domains.join(", "));
        } else {
            log!("config"; "domain lock: disabled");
        }
        log!(
            "config";
            "stage: {} -> {} (*.{})",
            build.stage.source.display(),
            build.stage.output.display(),
            build.stage.extension
        );
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> PackConfig {
    let (parsed, ignored) = PackConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Finalized config for a source tree rooted at `root`, as if run with no CLI flags.
#[cfg(test)]
pub fn test_config_for(root: &Path, toml: &str) -> PackConfig {
    let mut config = test_parse_config(toml);
    config.finalize(&Cli::default(), root);
    config
}

// ============================================================================
// tests
// ============================================================================
