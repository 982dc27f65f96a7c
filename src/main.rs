#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use agent_deploy::cli::{Cli, Commands};
use agent_deploy::commands;
use agent_deploy::config::Config;
use agent_deploy::project::Project;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let project = match &cli.dir {
        Some(dir) => Project::at(dir)?,
        None => Project::detect()?,
    };

    // Config commands load (and report on) the config themselves
    if let Some(Commands::Config { command }) = &cli.command {
        commands::config::execute(&project, command)?;
        return Ok(());
    }

    let config = Config::load(project.root())?.with_verbose(cli.verbose);

    match &cli.command {
        None | Some(Commands::Build) => {
            let report = commands::build::execute(&project, &config)?;
            if !report.success() {
                std::process::exit(report.exit_code());
            }
        }
        Some(Commands::Deploy(cmd)) => {
            commands::deploy::execute(&project, &config, cmd)?;
        }
        Some(Commands::Agents { command }) => {
            commands::agents::execute(&project, &config, command)?;
        }
        Some(Commands::Config { .. }) => unreachable!(),
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("AGENT_DEPLOY_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("agent_deploy={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
