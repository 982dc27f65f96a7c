//! Agent registry for loading and managing available agents.

use super::definition::Agent;
use crate::error::{AgentDeployError, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

const BUILTIN_AGENTS: &[(&str, &str)] = &[
    ("simple-test", include_str!("../../agents/simple-test.toml")),
    ("minimal-test", include_str!("../../agents/minimal-test.toml")),
    ("simple", include_str!("../../agents/simple.toml")),
    ("ag2", include_str!("../../agents/ag2.toml")),
];

/// Registry of available agents
pub struct AgentRegistry {
    agents: HashMap<String, Arc<Agent>>,
}

impl AgentRegistry {
    /// Load the built-in agent definitions
    pub fn load() -> Result<Self> {
        let mut agents = HashMap::new();

        for (source, content) in BUILTIN_AGENTS {
            let agent = parse_agent(content, source)?;
            agents.insert(agent.agent.id.clone(), Arc::new(agent));
        }

        Ok(Self { agents })
    }

    /// Load built-ins plus every `*.toml` definition in `dir`.
    ///
    /// A missing directory is not an error. A definition whose id matches a
    /// built-in replaces it.
    pub fn load_with_dir(dir: &Path) -> Result<Self> {
        let mut registry = Self::load()?;

        if !dir.is_dir() {
            return Ok(registry);
        }

        let mut paths: Vec<_> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        for path in paths {
            let content = fs::read_to_string(&path)?;
            let agent = parse_agent(&content, &path.display().to_string())?;
            tracing::debug!(id = %agent.agent.id, path = %path.display(), "loaded agent definition");
            registry
                .agents
                .insert(agent.agent.id.clone(), Arc::new(agent));
        }

        Ok(registry)
    }

    /// Get an agent by ID
    pub fn get(&self, id: &str) -> Option<Arc<Agent>> {
        self.agents.get(id).cloned()
    }

    /// Get an agent by ID or fail with the list of known IDs
    pub fn require(&self, id: &str) -> Result<Arc<Agent>> {
        self.get(id).ok_or_else(|| {
            AgentDeployError::AgentNotFound(format!(
                "{} (available: {})",
                id,
                self.list_available().join(", ")
            ))
        })
    }

    /// List all available agent IDs
    pub fn list_available(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.agents.keys().cloned().collect();
        ids.sort();
        ids
    }
}

fn parse_agent(content: &str, source: &str) -> Result<Agent> {
    let agent: Agent = toml::from_str(content).map_err(|e| {
        AgentDeployError::InvalidAgent(format!("Failed to parse {}: {}", source, e))
    })?;
    agent.validate()?;
    Ok(agent)
}
