use super::bundle::Bundle;
use super::settings::CloudSettings;
use crate::error::{AgentDeployError, Result};
use crate::runner::{run_checked, CommandRunner, CommandSpec};

/// Result of a remote deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    /// Full resource name of the hosted agent, when the service reported one
    pub resource_name: Option<String>,
}

/// Provisions a hosted instance of a rendered agent bundle.
pub trait RemoteDeployer {
    fn deploy(&self, bundle: &Bundle, settings: &CloudSettings) -> Result<Deployment>;
}

/// Deploys through `adk deploy agent_engine`
pub struct AdkCliDeployer<'a> {
    runner: &'a dyn CommandRunner,
    trace_to_cloud: bool,
}

impl<'a> AdkCliDeployer<'a> {
    pub fn new(runner: &'a dyn CommandRunner, trace_to_cloud: bool) -> Self {
        Self {
            runner,
            trace_to_cloud,
        }
    }

    pub fn command(&self, bundle: &Bundle, settings: &CloudSettings) -> CommandSpec {
        let mut spec = CommandSpec::new("adk")
            .args(["deploy", "agent_engine"])
            .arg("--project")
            .arg(&settings.project_id)
            .arg("--region")
            .arg(&settings.location)
            .arg("--staging_bucket")
            .arg(settings.staging_uri())
            .arg("--display_name")
            .arg(&bundle.display_name);

        if !bundle.description.is_empty() {
            spec = spec.arg("--description").arg(&bundle.description);
        }

        spec = spec
            .arg("--requirements_file")
            .arg(bundle.requirements_file.to_string_lossy());

        if self.trace_to_cloud {
            spec = spec.arg("--trace_to_cloud");
        }

        spec.arg(bundle.dir.to_string_lossy())
    }
}

impl RemoteDeployer for AdkCliDeployer<'_> {
    fn deploy(&self, bundle: &Bundle, settings: &CloudSettings) -> Result<Deployment> {
        let spec = self.command(bundle, settings);
        let output = run_checked(self.runner, &spec).map_err(|e| match e {
            AgentDeployError::ToolNotInstalled(tool) => AgentDeployError::DeployFailed(format!(
                "{} not found; install google-adk to deploy agents",
                tool
            )),
            other => other,
        })?;

        let resource_name = find_resource_name(&output.stdout)
            .or_else(|| find_resource_name(&output.stderr));
        Ok(Deployment { resource_name })
    }
}

/// Extract a `projects/.../reasoningEngines/...` resource name from tool output
pub fn find_resource_name(text: &str) -> Option<String> {
    text.split(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | ',' | '(' | ')'))
        .filter_map(|token| token.find("projects/").map(|start| &token[start..]))
        .find(|token| {
            let parts: Vec<&str> = token.split('/').collect();
            parts.len() >= 6
                && parts[0] == "projects"
                && parts[2] == "locations"
                && parts[4] == "reasoningEngines"
                && parts[1..6].iter().all(|p| !p.is_empty())
        })
        .map(|token| token.trim_end_matches(['.', ':']).to_string())
}
