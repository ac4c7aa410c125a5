//! Curated data staging.
//!
//! Mirrors one source subdirectory into the output, keeping only files with a
//! single extension. Runs after the main walk and ignores the exclusion list,
//! so a directory excluded from the walk (the default `data`) can still ship
//! a filtered subset.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use walkdir::WalkDir;

use crate::config::StageConfig;
use crate::{debug, log};

/// Stage `stage.source` (under `source_root`) into `stage.output` (under `output_root`).
///
/// Returns the number of files copied. A missing source directory is not an error.
pub fn stage_data(source_root: &Path, output_root: &Path, stage: &StageConfig) -> Result<usize> {
    let from = source_root.join(&stage.source);
    if !from.is_dir() {
        log!("stage"; "{} not found, skipping", stage.source.display());
        return Ok(0);
    }

    let to = output_root.join(&stage.output);
    copy_matching(&from, &to, &stage.extension)
}

/// Mirror `src` into `dst`, copying files whose extension matches.
///
/// Every subdirectory is created, even when it ends up holding no files.
/// Symbolic links are followed; a link back to an ancestor is skipped.
fn copy_matching(src: &Path, dst: &Path, extension: &str) -> Result<usize> {
    let mut count = 0;
    let walker = WalkDir::new(src).follow_links(true).sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.loop_ancestor().is_some() => {
                log!("warn"; "skipping symlink loop at {}", err.path().unwrap_or(src).display());
                continue;
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to walk {}", src.display()));
            }
        };

        let path = entry.path();
        let rel = path
            .strip_prefix(src)
            .with_context(|| format!("{} is outside {}", path.display(), src.display()))?;
        let target = dst.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create directory {}", target.display()))?;
        } else if has_extension(path, extension) {
            fs::copy(path, &target).with_context(|| {
                format!("Failed to copy {} to {}", path.display(), target.display())
            })?;
            log!("stage"; "{}", target.display());
            count += 1;
        } else {
            debug!("stage"; "ignoring {}", path.display());
        }
    }
    Ok(count)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}
