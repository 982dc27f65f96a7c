//! Copy a package tree into the deployment directory.

use crate::error::{AgentDeployError, Result};
use glob::Pattern;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Shell-style file name pattern (`*`, `?`, `[seq]`, `[!seq]`). Patterns
/// match a single path component, never a full path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnorePattern(Pattern);

impl IgnorePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Pattern::new(pattern).map(Self).map_err(|e| {
            AgentDeployError::InvalidConfig(format!(
                "Invalid ignore pattern '{}': {}",
                pattern, e
            ))
        })
    }

    pub fn matches(&self, name: &str) -> bool {
        self.0.matches(name)
    }
}

/// Summary of a staged copy
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyStats {
    pub files: usize,
    pub dirs: usize,
    pub skipped: usize,
}

/// Replace `target` with a copy of `source`, leaving out ignored entries.
///
/// An ignored directory is skipped as a whole. Symlinks are followed and their
/// targets copied. An existing `target` is removed first so stale files never
/// survive a rebuild.
pub fn copy_package(source: &Path, target: &Path, ignore: &[IgnorePattern]) -> Result<CopyStats> {
    if !source.is_dir() {
        return Err(AgentDeployError::SourceNotFound(source.to_path_buf()));
    }

    if target.exists() {
        tracing::debug!(target = %target.display(), "removing previous copy");
        fs::remove_dir_all(target)?;
    }
    fs::create_dir_all(target)?;

    let mut stats = CopyStats::default();
    let is_ignored = |name: &str| ignore.iter().any(|p| p.matches(name));

    let walker = WalkDir::new(source).min_depth(1).follow_links(true).into_iter();
    for entry in walker.filter_entry(|e| {
        let ignored = is_ignored(&e.file_name().to_string_lossy());
        if ignored {
            tracing::debug!(path = %e.path().display(), "skipping ignored entry");
        }
        !ignored
    }) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| AgentDeployError::InvalidConfig(e.to_string()))?;
        let dest = target.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
            stats.dirs += 1;
        } else {
            fs::copy(entry.path(), &dest)?;
            stats.files += 1;
        }
    }

    stats.skipped = count_ignored(source, &is_ignored);
    Ok(stats)
}

fn count_ignored(source: &Path, is_ignored: &dyn Fn(&str) -> bool) -> usize {
    WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| is_ignored(&e.file_name().to_string_lossy()))
        .filter(|e| {
            // Only count the outermost ignored entry
            e.path()
                .strip_prefix(source)
                .ok()
                .and_then(|rel| rel.parent())
                .map(|parent| {
                    !parent
                        .components()
                        .any(|c| is_ignored(&c.as_os_str().to_string_lossy()))
                })
                .unwrap_or(true)
        })
        .count()
}
