//! Data structures for parsing agent TOML files.

use crate::error::{AgentDeployError, Result};
use serde::{Deserialize, Serialize};

/// An agent definition loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Agent metadata (id, name, description, kind)
    pub agent: AgentMeta,

    /// Model settings, required for `llm` agents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMeta {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub kind: AgentKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    /// Model-backed agent hosted remotely
    #[default]
    Llm,
    /// Local stub answering `Processed: <input>`
    Echo,
}

impl AgentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Llm => "llm",
            AgentKind::Echo => "echo",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier, e.g. `gemini-2.5-pro`
    pub name: String,
    pub instruction: String,
    #[serde(default)]
    pub tools: Vec<String>,
}

impl Agent {
    pub fn id(&self) -> &str {
        &self.agent.id
    }

    pub fn name(&self) -> &str {
        &self.agent.name
    }

    /// Answer a query locally. Only echo agents can do this.
    pub fn query(&self, input: &str) -> Result<String> {
        match self.agent.kind {
            AgentKind::Echo => Ok(format!("Processed: {}", input)),
            AgentKind::Llm => Err(AgentDeployError::InvalidAgent(format!(
                "Agent '{}' is model-backed and can only be queried once deployed",
                self.agent.id
            ))),
        }
    }

    /// Model settings of a deployable agent
    pub fn deployable_model(&self) -> Result<&ModelConfig> {
        match (self.agent.kind, &self.model) {
            (AgentKind::Llm, Some(model)) => Ok(model),
            _ => Err(AgentDeployError::AgentNotDeployable(self.agent.id.clone())),
        }
    }

    /// Check that the definition is complete and usable
    pub fn validate(&self) -> Result<()> {
        if self.agent.id.is_empty() {
            return Err(AgentDeployError::InvalidAgent(
                "Agent id cannot be empty".to_string(),
            ));
        }
        if !self
            .agent
            .id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(AgentDeployError::InvalidAgent(format!(
                "Agent id '{}' may only contain letters, digits, '-' and '_'",
                self.agent.id
            )));
        }
        if !is_identifier(&self.agent.name) {
            return Err(AgentDeployError::InvalidAgent(format!(
                "Agent '{}' name '{}' must be a valid identifier",
                self.agent.id, self.agent.name
            )));
        }

        if self.agent.kind == AgentKind::Llm {
            let model = self.model.as_ref().ok_or_else(|| {
                AgentDeployError::InvalidAgent(format!(
                    "Agent '{}' is an llm agent but has no [model] section",
                    self.agent.id
                ))
            })?;
            if model.name.trim().is_empty() {
                return Err(AgentDeployError::InvalidAgent(format!(
                    "Agent '{}' model name cannot be empty",
                    self.agent.id
                )));
            }
            if model.instruction.trim().is_empty() {
                return Err(AgentDeployError::InvalidAgent(format!(
                    "Agent '{}' instruction cannot be empty",
                    self.agent.id
                )));
            }
            if let Some(tool) = model.tools.iter().find(|t| !is_identifier(t)) {
                return Err(AgentDeployError::InvalidAgent(format!(
                    "Agent '{}' tool '{}' must be a valid identifier",
                    self.agent.id, tool
                )));
            }
        }

        Ok(())
    }
}

/// ASCII identifier: a letter or underscore followed by letters, digits or underscores
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
