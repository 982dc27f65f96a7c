use crate::agents::{AgentKind, AgentRegistry};
use crate::cli::AgentsCommands;
use crate::config::Config;
use crate::error::Result;
use crate::project::Project;

pub fn execute(project: &Project, config: &Config, command: &AgentsCommands) -> Result<()> {
    let registry = AgentRegistry::load_with_dir(&config.agents_dir(project.root()))?;

    match command {
        AgentsCommands::List => list(&registry),
        AgentsCommands::Show { id, json } => show(&registry, id, *json),
        AgentsCommands::Query { id, input } => {
            let agent = registry.require(id)?;
            println!("{}", agent.query(input)?);
            Ok(())
        }
    }
}

fn list(registry: &AgentRegistry) -> Result<()> {
    println!("{:<16} {:<22} {:<6} {}", "ID", "NAME", "KIND", "MODEL");
    for id in registry.list_available() {
        let agent = registry.require(&id)?;
        let model = match (agent.agent.kind, &agent.model) {
            (AgentKind::Llm, Some(model)) => model.name.as_str(),
            _ => "-",
        };
        println!(
            "{:<16} {:<22} {:<6} {}",
            id,
            agent.name(),
            agent.agent.kind.as_str(),
            model
        );
    }
    Ok(())
}

fn show(registry: &AgentRegistry, id: &str, json: bool) -> Result<()> {
    let agent = registry.require(id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(agent.as_ref())?);
    } else {
        print!("{}", toml::to_string_pretty(agent.as_ref())?);
    }
    Ok(())
}
