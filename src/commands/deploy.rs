use crate::agents::AgentRegistry;
use crate::cli::DeployCmd;
use crate::cloud::{self, AdkCliDeployer, DeployRequest};
use crate::config::Config;
use crate::error::Result;
use crate::project::Project;
use crate::runner::SystemRunner;
use crate::utils::env::EnvLookup;

pub fn execute(project: &Project, config: &Config, cmd: &DeployCmd) -> Result<()> {
    let agent_id = cmd.agent.as_deref().unwrap_or(&config.agents.default);

    if !cmd.create {
        println!("Use --create to deploy agent '{}'", agent_id);
        return Ok(());
    }

    let lookup = match &cmd.env_file {
        Some(path) => EnvLookup::from_file(path, true)?,
        None => EnvLookup::from_file(&config.env_file(project.root()), false)?,
    };

    let registry = AgentRegistry::load_with_dir(&config.agents_dir(project.root()))?;
    let agent = registry.require(agent_id)?;
    println!("✅ Loaded agent: {}", agent.name());

    let request = DeployRequest {
        agent: &agent,
        requirements: &config.cloud.requirements,
        bundle_root: project.root().join(cloud::BUNDLE_DIR),
    };
    let runner = SystemRunner;
    let deployer = AdkCliDeployer::new(&runner, config.trace_to_cloud());

    let deployment = cloud::create_deployment(&request, |key| lookup.get(key), &deployer)?;

    match deployment.resource_name {
        Some(name) => println!("Created remote app: {}", name),
        None => println!("Created remote app (resource name not reported)"),
    }

    Ok(())
}
