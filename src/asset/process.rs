//! Per-file transformation with side effects (reading, writing, renaming).
//!
//! One input file always produces exactly one output file. Minification
//! failures degrade to the unminified content with a warning; I/O failures
//! abort the build.

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::{BuildSectionConfig, NameSeed};
use crate::embed::script::{GUARD_JS, GuardVars};
use crate::utils::path::to_slash;
use crate::{debug, log};

use super::kind::AssetKind;
use super::minify::{minify_css, minify_html, minify_js};
use super::obfuscate::{NameMap, obfuscated_name, timestamp_seed};
use super::rewrite::rewrite_script_refs;

/// Read-only state shared by every transform in one run.
pub struct TransformContext<'a> {
    build: &'a BuildSectionConfig,
    /// Rendered guard snippet, `None` when no domains are configured.
    guard: Option<String>,
}

impl<'a> TransformContext<'a> {
    pub fn new(build: &'a BuildSectionConfig) -> Self {
        let guard = build
            .guard
            .is_enabled()
            .then(|| GUARD_JS.render(&GuardVars::from_config(&build.guard)));
        Self { build, guard }
    }

    pub fn guard(&self) -> Option<&str> {
        self.guard.as_deref()
    }
}

/// Result of transforming one file.
#[derive(Debug)]
pub struct FileOutcome {
    pub kind: AssetKind,
    /// Absolute path of the written output.
    pub dest: PathBuf,
    /// Whether the output name differs from the input name.
    pub renamed: bool,
    /// Number of recoverable problems (minification fallbacks etc).
    pub warnings: usize,
}

/// Transform `source` into `out_root/rel`, recording JS renames in `names`.
pub fn process_file(
    source: &Path,
    rel: &Path,
    out_root: &Path,
    ctx: &TransformContext,
    names: &mut NameMap,
) -> Result<FileOutcome> {
    let kind = AssetKind::from_path(source);
    let rel_display = to_slash(rel);
    let mut outcome = FileOutcome {
        kind,
        dest: out_root.join(rel),
        renamed: false,
        warnings: 0,
    };

    match kind {
        AssetKind::Script => process_script(source, &rel_display, ctx, names, &mut outcome)?,
        AssetKind::Markup => process_markup(source, &rel_display, ctx, names, &mut outcome)?,
        AssetKind::Style => process_style(source, &rel_display, ctx, &mut outcome)?,
        AssetKind::Other => {
            ensure_parent(&outcome.dest)?;
            fs::copy(source, &outcome.dest).with_context(|| {
                format!(
                    "Failed to copy {} to {}",
                    source.display(),
                    outcome.dest.display()
                )
            })?;
        }
    }

    if outcome.renamed {
        let new_name = outcome
            .dest
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        log!(kind.label(); "{} -> {}", rel_display, new_name);
    } else {
        log!(kind.label(); "{}", rel_display);
    }

    Ok(outcome)
}

fn process_script(
    source: &Path,
    rel: &str,
    ctx: &TransformContext,
    names: &mut NameMap,
    outcome: &mut FileOutcome,
) -> Result<()> {
    let original = read_bytes(source)?;

    let minified = if ctx.build.minify {
        let result = std::str::from_utf8(&original)
            .map_err(Into::into)
            .and_then(minify_js);
        match result {
            Ok(code) => Some(code.into_bytes()),
            Err(err) => {
                log!("warn"; "js minify failed for {}: {}, keeping original", rel, err);
                outcome.warnings += 1;
                None
            }
        }
    } else {
        None
    };
    let body = minified.as_deref().unwrap_or(&original);

    let content: Cow<[u8]> = match ctx.guard() {
        Some(guard) => {
            let mut buf = Vec::with_capacity(guard.len() + 1 + body.len());
            buf.extend_from_slice(guard.as_bytes());
            buf.push(b'\n');
            buf.extend_from_slice(body);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(body),
    };

    if ctx.build.obfuscate.enable {
        match outcome.dest.file_name().and_then(|n| n.to_str()) {
            Some(file_name) => {
                let file_name = file_name.to_string();
                let hashed = match ctx.build.obfuscate.seed {
                    NameSeed::Timestamp => obfuscated_name(&file_name, &timestamp_seed()),
                    NameSeed::Content => obfuscated_name(&file_name, &original),
                };
                debug!("js"; "mapping {} -> {}", file_name, hashed);
                outcome.dest.set_file_name(&hashed);
                outcome.renamed = true;
                names.insert(file_name, hashed);
            }
            None => {
                log!("warn"; "{} has a non UTF-8 file name, written without renaming", rel);
                outcome.warnings += 1;
            }
        }
    }

    write_bytes(&outcome.dest, &content)
}

fn process_markup(
    source: &Path,
    rel: &str,
    ctx: &TransformContext,
    names: &NameMap,
    outcome: &mut FileOutcome,
) -> Result<()> {
    let mut content = read_bytes(source)?;

    if ctx.build.obfuscate.enable && !names.is_empty() {
        let rewritten = match std::str::from_utf8(&content) {
            Ok(text) => match rewrite_script_refs(text, names) {
                Cow::Owned(text) => Some(text),
                Cow::Borrowed(_) => None,
            },
            Err(_) => {
                log!("warn"; "{} is not valid UTF-8, script references left as-is", rel);
                outcome.warnings += 1;
                None
            }
        };
        if let Some(text) = rewritten {
            content = text.into_bytes();
        }
    }

    if ctx.build.minify {
        match minify_html(&content) {
            Ok(minified) => content = minified,
            Err(err) => {
                log!("warn"; "html minify failed for {}: {}, keeping original", rel, err);
                outcome.warnings += 1;
            }
        }
    }

    write_bytes(&outcome.dest, &content)
}

fn process_style(
    source: &Path,
    rel: &str,
    ctx: &TransformContext,
    outcome: &mut FileOutcome,
) -> Result<()> {
    let content = read_bytes(source)?;

    if !ctx.build.minify {
        return write_bytes(&outcome.dest, &content);
    }

    match String::from_utf8(content) {
        Ok(text) => write_bytes(&outcome.dest, minify_css(&text).as_bytes()),
        Err(err) => {
            log!("warn"; "css minify failed for {}: input is not valid UTF-8, keeping original", rel);
            outcome.warnings += 1;
            write_bytes(&outcome.dest, err.as_bytes())
        }
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn write_bytes(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}
