//! Build-and-deploy pipeline.
//!
//! Five stages run once, in order. The first failure stops the pipeline; no
//! later stage runs and the report carries exit code 1.

use crate::config::Config;
use crate::error::{AgentDeployError, Result};
use crate::rewrite::{self, RewriteRule};
use crate::runner::{run_checked, CommandRunner, CommandSpec};
use crate::staging::{self, IgnorePattern};
use std::fmt;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    InstallPackage,
    StagePackage,
    RewriteConfig,
    LockAndInstall,
    Deploy,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::InstallPackage,
        Stage::StagePackage,
        Stage::RewriteConfig,
        Stage::LockAndInstall,
        Stage::Deploy,
    ];

    pub fn number(&self) -> usize {
        match self {
            Stage::InstallPackage => 1,
            Stage::StagePackage => 2,
            Stage::RewriteConfig => 3,
            Stage::LockAndInstall => 4,
            Stage::Deploy => 5,
        }
    }

    fn icon(&self) -> &'static str {
        match self {
            Stage::InstallPackage | Stage::LockAndInstall => "📦",
            Stage::StagePackage => "📁",
            Stage::RewriteConfig => "🔧",
            Stage::Deploy => "🚀",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::InstallPackage => "install package",
            Stage::StagePackage => "stage package",
            Stage::RewriteConfig => "rewrite configuration",
            Stage::LockAndInstall => "lock and install",
            Stage::Deploy => "deploy",
        };
        f.write_str(name)
    }
}

/// Outcome of a pipeline run
#[derive(Debug, Default)]
pub struct PipelineReport {
    pub completed: Vec<Stage>,
    pub failed: Option<(Stage, AgentDeployError)>,
}

impl PipelineReport {
    pub fn success(&self) -> bool {
        self.failed.is_none()
    }

    pub fn exit_code(&self) -> i32 {
        if self.success() {
            0
        } else {
            1
        }
    }
}

/// Resolved inputs of one pipeline run
#[derive(Debug, Clone)]
pub struct Pipeline {
    pub deployment_dir: PathBuf,
    pub source_dir: PathBuf,
    pub package_name: String,
    pub module: String,
    pub ignore: Vec<IgnorePattern>,
    pub package_manager: String,
    pub rewrite_rules: Vec<RewriteRule>,
    pub deploy_command: Vec<String>,
}

impl Pipeline {
    pub fn from_config(config: &Config, deployment_dir: PathBuf) -> Result<Self> {
        let ignore = config
            .package
            .ignore
            .iter()
            .map(|p| IgnorePattern::new(p))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            source_dir: config.source_dir(&deployment_dir),
            package_name: config.package.name.clone(),
            module: config.package.module.clone(),
            ignore,
            package_manager: config.tools.package_manager.clone(),
            rewrite_rules: config.rewrite_rules(),
            deploy_command: config.deploy_command(),
            deployment_dir,
        })
    }

    /// Run every stage, stopping at the first failure
    pub fn run(&self, runner: &dyn CommandRunner) -> PipelineReport {
        println!("🚀 Starting build and deployment process...");

        let mut report = PipelineReport::default();
        for stage in Stage::ALL {
            println!(
                "\n{} Step {}: {}...",
                stage.icon(),
                stage.number(),
                self.describe(stage)
            );

            match self.run_stage(stage, runner) {
                Ok(message) => {
                    println!("✅ {}", message);
                    report.completed.push(stage);
                }
                Err(e) => {
                    eprintln!("❌ {}: {}", self.failure(stage), e);
                    tracing::debug!(stage = %stage, error = ?e, "stage failed");
                    report.failed = Some((stage, e));
                    return report;
                }
            }
        }

        println!("\n🎉 Build and deployment process completed successfully!");
        report
    }

    fn describe(&self, stage: Stage) -> String {
        match stage {
            Stage::InstallPackage => format!("Installing {} package", self.package_name),
            Stage::StagePackage => format!(
                "Copying {} package into deployment directory",
                self.module
            ),
            Stage::RewriteConfig => "Updating deployment configuration".to_string(),
            Stage::LockAndInstall => {
                "Regenerating lock file and installing dependencies".to_string()
            }
            Stage::Deploy => "Running deployment".to_string(),
        }
    }

    fn failure(&self, stage: Stage) -> String {
        match stage {
            Stage::InstallPackage => format!("Failed to install {}", self.package_name),
            Stage::StagePackage => format!("Failed to copy {} package", self.module),
            Stage::RewriteConfig => "Failed to update deployment configuration".to_string(),
            Stage::LockAndInstall => "Failed to install deployment dependencies".to_string(),
            Stage::Deploy => "Deployment failed".to_string(),
        }
    }

    fn run_stage(&self, stage: Stage, runner: &dyn CommandRunner) -> Result<String> {
        match stage {
            Stage::InstallPackage => {
                let spec = CommandSpec::new(&self.package_manager)
                    .arg("install")
                    .cwd(&self.source_dir);
                run_checked(runner, &spec)?;
                Ok(format!(
                    "Successfully installed {} dependencies",
                    self.package_name
                ))
            }
            Stage::StagePackage => {
                let source = self.source_dir.join(&self.module);
                let target = self.deployment_dir.join(&self.module);
                let stats = staging::copy_package(&source, &target, &self.ignore)?;
                tracing::debug!(
                    files = stats.files,
                    dirs = stats.dirs,
                    skipped = stats.skipped,
                    "staged package"
                );
                Ok(format!(
                    "Successfully copied {} package into deployment directory",
                    self.module
                ))
            }
            Stage::RewriteConfig => {
                for rule in &self.rewrite_rules {
                    rewrite::rewrite_file(&self.deployment_dir, rule)?;
                }
                Ok("Successfully updated deployment configuration".to_string())
            }
            Stage::LockAndInstall => {
                for action in ["lock", "install"] {
                    let spec = CommandSpec::new(&self.package_manager)
                        .arg(action)
                        .cwd(&self.deployment_dir);
                    run_checked(runner, &spec)?;
                }
                Ok("Successfully regenerated lock file and installed dependencies".to_string())
            }
            Stage::Deploy => {
                let spec = CommandSpec::from_argv(&self.deploy_command)
                    .ok_or_else(|| {
                        AgentDeployError::InvalidConfig("deploy.command cannot be empty".to_string())
                    })?
                    .cwd(&self.deployment_dir);
                run_checked(runner, &spec)?;
                Ok("Deployment completed successfully!".to_string())
            }
        }
    }
}
