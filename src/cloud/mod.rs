//! Remote deployment to Vertex AI Agent Engine.
//!
//! The hosting service is an opaque collaborator: an agent definition is
//! rendered into an ADK agent directory, and a [`RemoteDeployer`] uploads it.
//! Cloud settings are resolved before anything is written, so a
//! misconfigured environment never reaches the service.

pub mod bundle;
pub mod deployer;
pub mod settings;

pub use bundle::Bundle;
pub use deployer::{AdkCliDeployer, Deployment, RemoteDeployer};
pub use settings::CloudSettings;

use crate::agents::Agent;
use crate::error::Result;
use std::path::PathBuf;

/// Directory, relative to the deployment directory, holding rendered bundles
pub const BUNDLE_DIR: &str = ".agent-deploy/bundles";

/// Everything needed to deploy one agent
pub struct DeployRequest<'a> {
    pub agent: &'a Agent,
    pub requirements: &'a [String],
    pub bundle_root: PathBuf,
}

/// Resolve settings, render the bundle and hand it to `deployer`.
///
/// Missing settings abort before the bundle is rendered or the deployer is
/// touched.
pub fn create_deployment<F>(
    request: &DeployRequest<'_>,
    lookup: F,
    deployer: &dyn RemoteDeployer,
) -> Result<Deployment>
where
    F: Fn(&str) -> Option<String>,
{
    let settings = CloudSettings::resolve(lookup)?;
    let model = request.agent.deployable_model()?;

    tracing::debug!(
        project = %settings.project_id,
        location = %settings.location,
        agent = %request.agent.id(),
        "creating deployment"
    );

    let bundle = bundle::render(
        request.agent,
        model,
        request.requirements,
        &request.bundle_root,
    )?;
    deployer.deploy(&bundle, &settings)
}
