use crate::error::{AgentDeployError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Load `KEY=VALUE` pairs from a dotenv-style file.
///
/// Blank lines and `#` comments are skipped, an optional `export ` prefix is
/// accepted, and values wrapped in matching single or double quotes are
/// unquoted.
pub fn load_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        AgentDeployError::InvalidConfig(format!("Failed to read env file {}: {}", path.display(), e))
    })?;

    let mut env_vars = HashMap::new();
    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let line = line.strip_prefix("export ").unwrap_or(line);

        if let Some((key, value)) = line.split_once('=') {
            env_vars.insert(key.trim().to_string(), unquote(value.trim()).to_string());
        } else {
            return Err(AgentDeployError::InvalidConfig(format!(
                "Invalid env format at {}:{}: {}",
                path.display(),
                line_num + 1,
                line
            )));
        }
    }

    Ok(env_vars)
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Variable lookup that prefers the process environment over file values.
#[derive(Debug, Clone, Default)]
pub struct EnvLookup {
    file_vars: HashMap<String, String>,
}

impl EnvLookup {
    pub fn new(file_vars: HashMap<String, String>) -> Self {
        Self { file_vars }
    }

    /// Build a lookup from an env file; a missing file yields an empty lookup
    /// unless `required` is set.
    pub fn from_file(path: &Path, required: bool) -> Result<Self> {
        if !path.exists() {
            if required {
                return Err(AgentDeployError::InvalidConfig(format!(
                    "Env file not found: {}",
                    path.display()
                )));
            }
            tracing::debug!(path = %path.display(), "no env file, using process environment only");
            return Ok(Self::default());
        }
        Ok(Self::new(load_env_file(path)?))
    }

    pub fn get(&self, key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .or_else(|| self.file_vars.get(key).cloned())
            .filter(|v| !v.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    fn write_env(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_env_file() {
        let file = write_env(
            "# cloud settings\n\
             GOOGLE_CLOUD_PROJECT=my-project\n\
             \n\
             export REGION=us-central1\n\
             GOOGLE_CLOUD_STAGING_BUCKET=\"gs://staging\"\n\
             QUOTED='single'\n",
        );

        let vars = load_env_file(file.path()).unwrap();
        assert_eq!(vars.get("GOOGLE_CLOUD_PROJECT").unwrap(), "my-project");
        assert_eq!(vars.get("REGION").unwrap(), "us-central1");
        assert_eq!(vars.get("GOOGLE_CLOUD_STAGING_BUCKET").unwrap(), "gs://staging");
        assert_eq!(vars.get("QUOTED").unwrap(), "single");
        assert_eq!(vars.len(), 4);
    }

    #[test]
    fn test_load_env_file_invalid_line() {
        let file = write_env("VALID=1\nINVALID\n");
        let err = load_env_file(file.path()).unwrap_err();
        assert!(err.to_string().contains(":2"));
    }

    #[test]
    fn test_unquote_mismatched() {
        assert_eq!(unquote("\"abc'"), "\"abc'");
        assert_eq!(unquote("\""), "\"");
    }

    #[test]
    fn test_from_file_missing_optional() {
        let lookup = EnvLookup::from_file(Path::new("/nonexistent/.env"), false).unwrap();
        assert!(lookup.file_vars.is_empty());
    }

    #[test]
    fn test_from_file_missing_required() {
        assert!(EnvLookup::from_file(Path::new("/nonexistent/.env"), true).is_err());
    }

    #[test]
    #[serial]
    fn test_process_env_wins() {
        std::env::set_var("AGENT_DEPLOY_TEST_LOOKUP", "from-process");
        let mut vars = HashMap::new();
        vars.insert("AGENT_DEPLOY_TEST_LOOKUP".to_string(), "from-file".to_string());
        vars.insert("AGENT_DEPLOY_TEST_ONLY_FILE".to_string(), "file".to_string());
        vars.insert("AGENT_DEPLOY_TEST_EMPTY".to_string(), "  ".to_string());

        let lookup = EnvLookup::new(vars);
        assert_eq!(lookup.get("AGENT_DEPLOY_TEST_LOOKUP").unwrap(), "from-process");
        assert_eq!(lookup.get("AGENT_DEPLOY_TEST_ONLY_FILE").unwrap(), "file");
        assert!(lookup.get("AGENT_DEPLOY_TEST_EMPTY").is_none());

        std::env::remove_var("AGENT_DEPLOY_TEST_LOOKUP");
    }
}
