use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentDeployError {
    #[error("{0} is not installed or not on PATH")]
    ToolNotInstalled(String),

    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` exited with status {code}")]
    CommandExitCode { command: String, code: i32 },

    #[error("Command `{command}` was terminated by a signal")]
    CommandTerminated { command: String },

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to walk directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Project detection failed: {0}")]
    ProjectDetection(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Package source not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("File to rewrite not found: {0}")]
    RewriteTargetMissing(PathBuf),

    #[error("{file}:{line} still contains a removed declaration: {content}")]
    RewriteVerification {
        file: PathBuf,
        line: usize,
        content: String,
    },

    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    #[error("Agent '{0}' has no model and cannot be deployed")]
    AgentNotDeployable(String),

    #[error("Invalid agent definition: {0}")]
    InvalidAgent(String),

    #[error("Remote deployment failed: {0}")]
    DeployFailed(String),
}

pub type Result<T> = std::result::Result<T, AgentDeployError>;
