use std::path::{Path, PathBuf};

/// Expand a leading `~` to the current user's home directory.
///
/// Paths without a tilde are returned unchanged. Returns `None` when the path
/// starts with `~` but `HOME` is not set or the path is not valid UTF-8.
///
/// # Examples
///
/// ```
/// use agent_deploy::utils::path::expand_tilde;
///
/// let path = expand_tilde("relative/dir").unwrap();
/// assert_eq!(path.to_str(), Some("relative/dir"));
/// ```
pub fn expand_tilde<P: AsRef<Path>>(path: P) -> Option<PathBuf> {
    let path = path.as_ref();
    let path_str = path.to_str()?;

    if path_str == "~" {
        return std::env::var("HOME").ok().map(PathBuf::from);
    }

    if let Some(rest) = path_str.strip_prefix("~/") {
        let home = std::env::var("HOME").ok()?;
        return Some(PathBuf::from(home).join(rest));
    }

    Some(path.to_path_buf())
}

/// Resolve a configured path against a base directory.
///
/// Tilde paths expand to the home directory, absolute paths are kept, and
/// anything else is joined onto `base`.
pub fn resolve(base: &Path, path: &str) -> PathBuf {
    let expanded = expand_tilde(path).unwrap_or_else(|| PathBuf::from(path));
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}
