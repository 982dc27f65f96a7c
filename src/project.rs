use crate::config::CONFIG_FILE;
use crate::error::{AgentDeployError, Result};
use std::path::{Path, PathBuf};

/// The deployment directory the tool operates on
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
}

impl Project {
    /// Detect the deployment directory from the current working directory.
    ///
    /// Priority: nearest ancestor containing `.agent-deploy.toml`, then the
    /// working directory itself.
    pub fn detect() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| {
            AgentDeployError::ProjectDetection(format!("Failed to get current directory: {}", e))
        })?;
        Ok(Self {
            root: Self::find_root(&cwd),
        })
    }

    /// Use an explicit deployment directory
    pub fn at(dir: &Path) -> Result<Self> {
        let root = dir.canonicalize().map_err(|e| {
            AgentDeployError::ProjectDetection(format!(
                "Deployment directory {} is not accessible: {}",
                dir.display(),
                e
            ))
        })?;
        if !root.is_dir() {
            return Err(AgentDeployError::ProjectDetection(format!(
                "{} is not a directory",
                root.display()
            )));
        }
        Ok(Self { root })
    }

    fn find_root(start: &Path) -> PathBuf {
        start
            .ancestors()
            .find(|dir| dir.join(CONFIG_FILE).is_file())
            .unwrap_or(start)
            .to_path_buf()
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}
