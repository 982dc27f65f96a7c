//! Render an agent definition into a deployable ADK agent directory.

use crate::agents::{Agent, ModelConfig};
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// A rendered agent directory ready for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub dir: PathBuf,
    pub display_name: String,
    pub description: String,
    pub requirements_file: PathBuf,
}

/// Write `__init__.py`, `agent.py` and `requirements.txt` for `agent` under
/// `root/<agent name>`, replacing any previous render.
pub fn render(
    agent: &Agent,
    model: &ModelConfig,
    requirements: &[String],
    root: &Path,
) -> Result<Bundle> {
    let dir = root.join(agent.name());
    if dir.exists() {
        fs::remove_dir_all(&dir)?;
    }
    fs::create_dir_all(&dir)?;

    fs::write(dir.join("__init__.py"), "from . import agent\n")?;
    fs::write(dir.join("agent.py"), render_agent_module(agent, model)?)?;

    let requirements_file = dir.join("requirements.txt");
    let mut requirements_txt = requirements.join("\n");
    requirements_txt.push('\n');
    fs::write(&requirements_file, requirements_txt)?;

    tracing::debug!(dir = %dir.display(), "rendered deployment bundle");

    Ok(Bundle {
        dir,
        display_name: agent.name().to_string(),
        description: agent.agent.description.clone(),
        requirements_file,
    })
}

/// Python source defining `root_agent`.
///
/// Strings are emitted as JSON literals, which Python parses identically.
/// Tools are imported by name from `google.adk.tools`.
pub fn render_agent_module(agent: &Agent, model: &ModelConfig) -> Result<String> {
    let literal = |s: &str| serde_json::to_string(s);

    let mut out = String::new();
    out.push_str(&format!(
        "\"\"\"Agent '{}' generated by agent-deploy.\"\"\"\n\n",
        agent.id()
    ));
    out.push_str("from google.adk.agents import Agent\n");
    if !model.tools.is_empty() {
        out.push_str(&format!(
            "from google.adk.tools import {}\n",
            model.tools.join(", ")
        ));
    }
    out.push('\n');
    out.push_str("root_agent = Agent(\n");
    out.push_str(&format!("    name={},\n", literal(agent.name())?));
    out.push_str(&format!(
        "    description={},\n",
        literal(&agent.agent.description)?
    ));
    out.push_str(&format!("    model={},\n", literal(&model.name)?));
    out.push_str(&format!(
        "    instruction={},\n",
        literal(&model.instruction)?
    ));
    out.push_str(&format!("    tools=[{}],\n", model.tools.join(", ")));
    out.push_str(")\n");

    Ok(out)
}
