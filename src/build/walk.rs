//! Recursive source traversal.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use walkdir::{DirEntry, WalkDir};

use crate::debug;
use crate::utils::path::to_slash;

use super::exclude::ExcludeFilter;

/// A file discovered under the source root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path of the input.
    pub path: PathBuf,
    /// Path relative to the source root, mirrored into the output root.
    pub rel: PathBuf,
}

/// Collect every non-excluded file under `root`.
///
/// Excluded directories are pruned without being read. Entries are visited
/// depth-first in file name order and symbolic links are followed.
pub fn collect_source_files(root: &Path, filter: &ExcludeFilter) -> Result<Vec<SourceFile>> {
    if !root.is_dir() {
        bail!("source directory `{}` does not exist", root.display());
    }

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| keep_entry(root, entry, filter));

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .with_context(|| format!("{} is outside {}", entry.path().display(), root.display()))?
            .to_path_buf();
        files.push(SourceFile {
            path: entry.into_path(),
            rel,
        });
    }
    Ok(files)
}

fn keep_entry(root: &Path, entry: &DirEntry, filter: &ExcludeFilter) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    let Ok(rel) = entry.path().strip_prefix(root) else {
        return true;
    };
    let rel = to_slash(rel);
    if filter.is_excluded(&rel) {
        debug!("walk"; "skipping {}", rel);
        return false;
    }
    true
}
