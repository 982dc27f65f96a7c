use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration files
    Validate {
        /// Optional path to a specific config file to validate
        file: Option<PathBuf>,
    },

    /// Show effective configuration after merging all sources
    Show,
}

#[derive(Subcommand, Debug)]
pub enum AgentsCommands {
    /// List available agent definitions
    List,

    /// Show an agent definition
    Show {
        /// Agent ID
        id: String,

        /// Print as JSON instead of TOML
        #[arg(long)]
        json: bool,
    },

    /// Query an echo agent locally
    Query {
        /// Agent ID
        id: String,

        /// Input passed to the agent
        input: String,
    },
}

#[derive(Parser, Debug)]
#[command(name = "agent-deploy")]
#[command(about = "Build and deploy conversational agents to Vertex AI Agent Engine", long_about = None)]
#[command(version = env!("AGENT_DEPLOY_VERSION"))]
#[command(after_help = "\
INVOCATION PATTERNS:
  Running without a subcommand builds and deploys. These are equivalent:

  agent-deploy                       Shorthand for 'agent-deploy build'
  agent-deploy build                 Explicit build command

EXAMPLES:
  agent-deploy -C deployment         Build and deploy from ./deployment
  agent-deploy deploy                Show what 'deploy --create' would do
  agent-deploy deploy --create       Deploy the default agent
  agent-deploy agents list           List agent definitions

For details about a specific command, use:
  agent-deploy <command> --help")]
pub struct Cli {
    /// Show debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    /// Deployment directory (default: nearest directory with .agent-deploy.toml)
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install, stage, rewrite, lock and deploy the agent package
    #[command(long_about = "Install, stage, rewrite, lock and deploy the agent package.\n\n\
        Runs five stages in order and stops at the first failure:\n  \
        1. install the agent package with the package manager\n  \
        2. copy its module into the deployment directory\n  \
        3. drop the external package references from the deployment files\n  \
        4. regenerate the lock file and install deployment dependencies\n  \
        5. run the deployment command\n\n\
        This is the default command.")]
    Build,

    /// Deploy an agent definition to Agent Engine
    Deploy(DeployCmd),

    /// Agent definition commands
    Agents {
        #[command(subcommand)]
        command: AgentsCommands,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Parser, Debug)]
pub struct DeployCmd {
    /// Create the remote deployment (without it, nothing is deployed)
    #[arg(long)]
    pub create: bool,

    /// Agent ID to deploy (default from config)
    #[arg(long)]
    pub agent: Option<String>,

    /// Env file with cloud settings (default: .env in the deployment directory)
    #[arg(long = "env-file")]
    pub env_file: Option<PathBuf>,
}
