//! Line-based rewriting of deployment configuration files.
//!
//! Once the package is staged next to the deployment script, the files that
//! pointed at the external package (an `extra_packages=` argument, a path
//! dependency in the manifest) must no longer reference it. Each file gets a
//! [`RewriteRule`]: lines matching a drop marker are removed, then literal
//! replacements are applied, and the result is verified before it is written.

use crate::error::{AgentDeployError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RewriteRule {
    /// File to rewrite, relative to the deployment directory
    pub file: String,

    /// Drop every line containing one of these markers
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drop_containing: Vec<String>,

    /// Drop every line whose indentation-stripped text starts with one of these
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub drop_starting_with: Vec<String>,

    /// Literal replacements applied after line filtering
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub replace: Vec<Replacement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Replacement {
    pub from: String,
    pub to: String,
}

impl RewriteRule {
    fn drops(&self, line: &str) -> bool {
        self.drop_containing
            .iter()
            .any(|marker| line.contains(marker.as_str()))
            || self
                .drop_starting_with
                .iter()
                .any(|prefix| line.trim_start().starts_with(prefix.as_str()))
    }
}

/// Apply a rule to file content.
///
/// Lines are split on `\n` and re-joined with `\n`, so a trailing newline
/// survives and untouched lines keep their exact bytes.
pub fn apply(content: &str, rule: &RewriteRule) -> String {
    let mut result = content
        .split('\n')
        .filter(|line| !rule.drops(line))
        .collect::<Vec<_>>()
        .join("\n");

    for replacement in &rule.replace {
        result = result.replace(&replacement.from, &replacement.to);
    }

    result
}

/// Return the first line (1-based) that a drop marker still matches.
pub fn find_violation<'a>(content: &'a str, rule: &RewriteRule) -> Option<(usize, &'a str)> {
    content
        .split('\n')
        .enumerate()
        .find(|(_, line)| rule.drops(line))
        .map(|(index, line)| (index + 1, line))
}

/// Rewrite a file in place, verifying the result before writing.
///
/// Returns the number of lines removed.
pub fn rewrite_file(dir: &Path, rule: &RewriteRule) -> Result<usize> {
    let path: PathBuf = dir.join(&rule.file);
    if !path.is_file() {
        return Err(AgentDeployError::RewriteTargetMissing(path));
    }

    let original = fs::read_to_string(&path)?;
    let rewritten = apply(&original, rule);

    if let Some((line, content)) = find_violation(&rewritten, rule) {
        return Err(AgentDeployError::RewriteVerification {
            file: path,
            line,
            content: content.trim().to_string(),
        });
    }

    let removed = original
        .split('\n')
        .count()
        .saturating_sub(rewritten.split('\n').count());
    tracing::debug!(file = %path.display(), removed, "rewrote file");

    if rewritten != original {
        fs::write(&path, rewritten)?;
    }

    Ok(removed)
}
