//! Build orchestration.
//!
//! Pipeline phases:
//! - **Init** - print the resolved config, recreate the output root
//! - **Collect** - walk the source tree through the exclusion filter
//! - **Transform** - one output per input (JS, HTML, CSS, verbatim copy)
//! - **Stage** - mirror the curated data directory
//! - **Finalize** - summary line

mod exclude;
mod stage;
mod walk;

#[cfg(test)]
mod tests;

pub use exclude::ExcludeFilter;
pub use stage::stage_data;
pub use walk::{SourceFile, collect_source_files};

use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use crate::asset::{AssetKind, FileOutcome, NameMap, TransformContext, process_file};
use crate::config::{PackConfig, RewriteMode};
use crate::{debug, log, utils::plural_count};

/// Counters reported at the end of a build.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildStats {
    pub scripts: usize,
    pub markup: usize,
    pub styles: usize,
    pub copied: usize,
    /// Scripts written under an obfuscated name.
    pub renamed: usize,
    /// Recoverable per-file problems.
    pub warnings: usize,
    /// Files written by the data stager.
    pub staged: usize,
}

impl BuildStats {
    fn record(&mut self, outcome: &FileOutcome) {
        match outcome.kind {
            AssetKind::Script => self.scripts += 1,
            AssetKind::Markup => self.markup += 1,
            AssetKind::Style => self.styles += 1,
            AssetKind::Other => self.copied += 1,
        }
        self.renamed += usize::from(outcome.renamed);
        self.warnings += outcome.warnings;
    }

    /// Files written by the walk (staged files excluded).
    pub fn processed(&self) -> usize {
        self.scripts + self.markup + self.styles + self.copied
    }
}

/// Build the whole site described by `config`.
///
/// Pipeline: init -> collect -> transform -> stage -> finalize
pub fn build_site(config: &PackConfig) -> Result<BuildStats> {
    let start = Instant::now();
    let build = &config.build;

    config.print_summary();
    reset_output(&build.output)?;

    let filter = ExcludeFilter::new(&build.exclude);
    let files = collect_source_files(&build.source, &filter)?;
    debug!("build"; "collected {}", plural_count(files.len(), "file"));

    let files = transform_order(files, build.obfuscate.enable, build.obfuscate.rewrite);

    let ctx = TransformContext::new(build);
    let mut names = NameMap::new();
    let mut stats = BuildStats::default();
    for file in &files {
        let outcome = process_file(&file.path, &file.rel, &build.output, &ctx, &mut names)?;
        stats.record(&outcome);
    }

    stats.staged = stage_data(&build.source, &build.output, &build.stage)?;

    log_summary(&stats, start);
    Ok(stats)
}

/// Delete and recreate the output root.
fn reset_output(output: &Path) -> Result<()> {
    if output.exists() {
        fs::remove_dir_all(output).with_context(|| {
            format!("Failed to clear output directory: {}", output.display())
        })?;
    }
    fs::create_dir_all(output)
        .with_context(|| format!("Failed to create output directory: {}", output.display()))
}

/// Order files for transformation.
///
/// With obfuscation in deferred mode, HTML moves after everything else so it
/// sees every script mapping. Relative order within each group is kept.
fn transform_order(files: Vec<SourceFile>, obfuscate: bool, mode: RewriteMode) -> Vec<SourceFile> {
    if !obfuscate || mode == RewriteMode::Ordered {
        return files;
    }
    let (markup, mut rest): (Vec<_>, Vec<_>) = files
        .into_iter()
        .partition(|f| AssetKind::from_path(&f.path) == AssetKind::Markup);
    rest.extend(markup);
    rest
}

fn log_summary(stats: &BuildStats, start: Instant) {
    log!(
        "build";
        "{} ({} js, {} html, {} css, {} copied), {} staged in {:.2?}",
        plural_count(stats.processed(), "file"),
        stats.scripts,
        stats.markup,
        stats.styles,
        stats.copied,
        plural_count(stats.staged, "data file"),
        start.elapsed()
    );
    if stats.renamed > 0 {
        log!("build"; "{} renamed", plural_count(stats.renamed, "script"));
    }
    if stats.warnings > 0 {
        log!("warn"; "{} during build", plural_count(stats.warnings, "warning"));
    }
}
