use crate::error::{AgentDeployError, Result};
use crate::rewrite::{Replacement, RewriteRule};
use crate::staging::IgnorePattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the project and global configuration file.
pub const CONFIG_FILE: &str = ".agent-deploy.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub package: PackageConfig,

    #[serde(default)]
    pub tools: ToolsConfig,

    /// Explicit rewrite rules; when empty, rules are derived from `package`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rewrite: Vec<RewriteRule>,

    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default)]
    pub cloud: CloudConfig,

    #[serde(default)]
    pub agents: AgentsConfig,

    /// Verbose mode (not stored in config file)
    #[serde(skip)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageConfig {
    /// Package project directory, relative to the deployment directory
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Dependency name as declared in the deployment manifest
    #[serde(default = "default_package_name")]
    pub name: String,

    /// Importable module directory inside `source_dir`
    #[serde(default = "default_module")]
    pub module: String,

    /// File name patterns skipped when staging the module
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            name: default_package_name(),
            module: default_module(),
            ignore: default_ignore(),
        }
    }
}

fn default_source_dir() -> String {
    "../interview-agents".to_string()
}

fn default_package_name() -> String {
    "interview-agents".to_string()
}

fn default_module() -> String {
    "interview_agents".to_string()
}

fn default_ignore() -> Vec<String> {
    vec!["__pycache__".to_string(), "*.pyc".to_string()]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolsConfig {
    #[serde(default = "default_package_manager")]
    pub package_manager: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            package_manager: default_package_manager(),
        }
    }
}

fn default_package_manager() -> String {
    "poetry".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeployConfig {
    /// Deployment script run by the final pipeline stage
    #[serde(default = "default_script")]
    pub script: String,

    /// Package manifest of the deployment project
    #[serde(default = "default_manifest")]
    pub manifest: String,

    /// Full command for the final stage; overrides `script`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<Vec<String>>,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            script: default_script(),
            manifest: default_manifest(),
            command: None,
        }
    }
}

fn default_script() -> String {
    "remote.py".to_string()
}

fn default_manifest() -> String {
    "pyproject.toml".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CloudConfig {
    /// Python requirements installed in the hosted agent
    #[serde(default = "default_requirements")]
    pub requirements: Vec<String>,

    /// Enable Cloud Trace for the deployed agent (default: on)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_to_cloud: Option<bool>,

    /// Env file holding the cloud settings, relative to the deployment directory
    #[serde(default = "default_env_file")]
    pub env_file: String,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            requirements: default_requirements(),
            trace_to_cloud: None,
            env_file: default_env_file(),
        }
    }
}

fn default_requirements() -> Vec<String> {
    vec!["google-cloud-aiplatform[adk,agent_engines]".to_string()]
}

fn default_env_file() -> String {
    ".env".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AgentsConfig {
    /// Directory with extra agent definitions, relative to the deployment directory
    #[serde(default = "default_agents_dir")]
    pub dir: String,

    /// Agent deployed when `--agent` is not given
    #[serde(default = "default_agent")]
    pub default: String,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            dir: default_agents_dir(),
            default: default_agent(),
        }
    }
}

fn default_agents_dir() -> String {
    "agents".to_string()
}

fn default_agent() -> String {
    "simple-test".to_string()
}

impl Config {
    /// Load configuration with precedence:
    /// 1. CLI flags (applied later via with_verbose)
    /// 2. Environment variables
    /// 3. Project config (.agent-deploy.toml in the deployment directory)
    /// 4. Global config (~/.agent-deploy.toml)
    /// 5. Built-in defaults
    pub fn load(deployment_dir: &Path) -> Result<Self> {
        let mut config = Self::default();

        if let Some(home) = home_dir() {
            let global_config = home.join(CONFIG_FILE);
            if global_config.exists() {
                tracing::debug!(path = %global_config.display(), "loading global config");
                config = config.merge(Self::from_file(&global_config)?);
            }
        }

        let project_config = deployment_dir.join(CONFIG_FILE);
        if project_config.exists() {
            tracing::debug!(path = %project_config.display(), "loading project config");
            config = config.merge(Self::from_file(&project_config)?);
        }

        config = config.merge_env();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(mut self, other: Self) -> Self {
        let package_defaults = PackageConfig::default();
        if other.package.source_dir != package_defaults.source_dir {
            self.package.source_dir = other.package.source_dir;
        }
        if other.package.name != package_defaults.name {
            self.package.name = other.package.name;
        }
        if other.package.module != package_defaults.module {
            self.package.module = other.package.module;
        }
        if other.package.ignore != package_defaults.ignore {
            self.package.ignore = other.package.ignore;
        }

        if other.tools.package_manager != default_package_manager() {
            self.tools.package_manager = other.tools.package_manager;
        }

        // Rewrite rules (replace as a whole)
        if !other.rewrite.is_empty() {
            self.rewrite = other.rewrite;
        }

        if other.deploy.script != default_script() {
            self.deploy.script = other.deploy.script;
        }
        if other.deploy.manifest != default_manifest() {
            self.deploy.manifest = other.deploy.manifest;
        }
        if other.deploy.command.is_some() {
            self.deploy.command = other.deploy.command;
        }

        if other.cloud.requirements != default_requirements() {
            self.cloud.requirements = other.cloud.requirements;
        }
        if other.cloud.trace_to_cloud.is_some() {
            self.cloud.trace_to_cloud = other.cloud.trace_to_cloud;
        }
        if other.cloud.env_file != default_env_file() {
            self.cloud.env_file = other.cloud.env_file;
        }

        if other.agents.dir != default_agents_dir() {
            self.agents.dir = other.agents.dir;
        }
        if other.agents.default != default_agent() {
            self.agents.default = other.agents.default;
        }

        self
    }

    fn merge_env(mut self) -> Self {
        if let Ok(pm) = std::env::var("AGENT_DEPLOY_PACKAGE_MANAGER") {
            if !pm.trim().is_empty() {
                self.tools.package_manager = pm;
            }
        }
        if let Ok(dir) = std::env::var("AGENT_DEPLOY_SOURCE_DIR") {
            if !dir.trim().is_empty() {
                self.package.source_dir = dir;
            }
        }
        self
    }

    /// Apply CLI overrides (highest precedence)
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the configuration for values the pipeline cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.package.module.trim().is_empty() {
            return Err(AgentDeployError::InvalidConfig(
                "package.module cannot be empty".to_string(),
            ));
        }
        if self.tools.package_manager.trim().is_empty() {
            return Err(AgentDeployError::InvalidConfig(
                "tools.package_manager cannot be empty".to_string(),
            ));
        }
        if let Some(command) = &self.deploy.command {
            if command.is_empty() || command[0].trim().is_empty() {
                return Err(AgentDeployError::InvalidConfig(
                    "deploy.command cannot be empty".to_string(),
                ));
            }
        }
        for (index, rule) in self.rewrite.iter().enumerate() {
            if rule.file.trim().is_empty() {
                return Err(AgentDeployError::InvalidConfig(format!(
                    "rewrite[{}].file cannot be empty",
                    index
                )));
            }
            if rule.replace.iter().any(|r| r.from.is_empty()) {
                return Err(AgentDeployError::InvalidConfig(format!(
                    "rewrite[{}] has a replacement with an empty 'from'",
                    index
                )));
            }
        }
        for pattern in &self.package.ignore {
            IgnorePattern::new(pattern)?;
        }
        Ok(())
    }

    /// Whether deployments enable Cloud Trace
    pub fn trace_to_cloud(&self) -> bool {
        self.cloud.trace_to_cloud.unwrap_or(true)
    }

    /// Package project directory
    pub fn source_dir(&self, deployment_dir: &Path) -> PathBuf {
        crate::utils::path::resolve(deployment_dir, &self.package.source_dir)
    }

    /// Directory with user-provided agent definitions
    pub fn agents_dir(&self, deployment_dir: &Path) -> PathBuf {
        crate::utils::path::resolve(deployment_dir, &self.agents.dir)
    }

    /// Env file with cloud settings
    pub fn env_file(&self, deployment_dir: &Path) -> PathBuf {
        crate::utils::path::resolve(deployment_dir, &self.cloud.env_file)
    }

    /// Command run by the final pipeline stage
    pub fn deploy_command(&self) -> Vec<String> {
        match &self.deploy.command {
            Some(command) => command.clone(),
            None => vec![
                self.tools.package_manager.clone(),
                "run".to_string(),
                "python".to_string(),
                self.deploy.script.clone(),
                "--create".to_string(),
            ],
        }
    }

    /// Effective rewrite rules
    ///
    /// Without explicit `[[rewrite]]` entries, the deployment script loses its
    /// `extra_packages=` argument and local import shim, and the manifest
    /// loses the path dependency on the package. The manifest entry is matched
    /// by dependency name, whatever path it was declared with.
    pub fn rewrite_rules(&self) -> Vec<RewriteRule> {
        if !self.rewrite.is_empty() {
            return self.rewrite.clone();
        }

        vec![
            RewriteRule {
                file: self.deploy.script.clone(),
                drop_containing: vec!["extra_packages=".to_string()],
                drop_starting_with: vec![],
                replace: vec![Replacement {
                    from: format!(
                        "sys.path.insert(0, os.path.join(os.path.dirname(__file__), '{}-local'))",
                        self.package.name
                    ),
                    to: "# Local package import".to_string(),
                }],
            },
            RewriteRule {
                file: self.deploy.manifest.clone(),
                drop_containing: vec![],
                drop_starting_with: vec![
                    format!("{} = {{path =", self.package.name),
                    format!("{} = {{ path =", self.package.name),
                ],
                replace: vec![],
            },
        ]
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
