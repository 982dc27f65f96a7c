use crate::config::Config;
use crate::error::Result;
use crate::pipeline::{Pipeline, PipelineReport};
use crate::project::Project;
use crate::runner::SystemRunner;

/// Run the build-and-deploy pipeline in the project's deployment directory
pub fn execute(project: &Project, config: &Config) -> Result<PipelineReport> {
    let pipeline = Pipeline::from_config(config, project.root().to_path_buf())?;
    tracing::debug!(
        deployment_dir = %pipeline.deployment_dir.display(),
        source_dir = %pipeline.source_dir.display(),
        "starting pipeline"
    );
    Ok(pipeline.run(&SystemRunner))
}
