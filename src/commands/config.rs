use crate::cli::ConfigCommands;
use crate::config::{Config, CONFIG_FILE};
use crate::error::Result;
use crate::project::Project;
use std::path::{Path, PathBuf};

pub fn execute(project: &Project, command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Validate { file } => match file {
            Some(path) => validate_file(path),
            None => validate(project),
        },
        ConfigCommands::Show => show(project),
    }
}

fn validate_file(path: &Path) -> Result<()> {
    println!("Validating {}...", path.display());
    match Config::from_file(path).and_then(|config| config.validate()) {
        Ok(()) => {
            println!("✓ Configuration is valid!");
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration is invalid!");
            println!("  Error: {}", e);
            Err(e)
        }
    }
}

fn validate(project: &Project) -> Result<()> {
    let project_config = project.root().join(CONFIG_FILE);
    let global_config = std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(CONFIG_FILE))
        .unwrap_or_else(|| PathBuf::from("~").join(CONFIG_FILE));

    println!("Validating configuration files...\n");

    for (label, path) in [("Global config", &global_config), ("Project config", &project_config)] {
        if path.exists() {
            println!("  {}: {}", label, path.display());
        } else {
            println!("  {}: {} - not found (optional)", label, path.display());
        }
    }

    println!("\nLoading and validating configuration...");
    match Config::load(project.root()) {
        Ok(_) => {
            println!("✓ Configuration is valid!");
            Ok(())
        }
        Err(e) => {
            println!("✗ Configuration is invalid!");
            println!("  Error: {}", e);
            Err(e)
        }
    }
}

fn show(project: &Project) -> Result<()> {
    let mut config = Config::load(project.root())?;
    // Show the values that will actually be used
    config.rewrite = config.rewrite_rules();
    config.cloud.trace_to_cloud = Some(config.trace_to_cloud());

    println!("# Effective configuration for {}", project.root().display());
    println!("# (Environment > Project config > Global config > Defaults)\n");
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
