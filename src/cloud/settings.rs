use crate::error::{AgentDeployError, Result};

pub const PROJECT_VAR: &str = "GOOGLE_CLOUD_PROJECT";
pub const REGION_VAR: &str = "REGION";
pub const STAGING_BUCKET_VAR: &str = "GOOGLE_CLOUD_STAGING_BUCKET";

/// Cloud project settings required for a remote deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudSettings {
    pub project_id: String,
    pub location: String,
    pub staging_bucket: String,
}

impl CloudSettings {
    /// Resolve settings through `lookup`, reporting every missing variable at once.
    ///
    /// Empty or whitespace-only values count as missing.
    pub fn resolve<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let project_id = get(PROJECT_VAR);
        let location = get(REGION_VAR);
        let staging_bucket = get(STAGING_BUCKET_VAR);

        match (project_id, location, staging_bucket) {
            (Some(project_id), Some(location), Some(staging_bucket)) => Ok(Self {
                project_id,
                location,
                staging_bucket,
            }),
            (project_id, location, staging_bucket) => {
                let missing = [
                    (PROJECT_VAR, project_id.is_none()),
                    (REGION_VAR, location.is_none()),
                    (STAGING_BUCKET_VAR, staging_bucket.is_none()),
                ]
                .into_iter()
                .filter(|(_, missing)| *missing)
                .map(|(name, _)| name.to_string())
                .collect();
                Err(AgentDeployError::MissingEnv(missing))
            }
        }
    }

    /// Staging bucket as a `gs://` URI
    pub fn staging_uri(&self) -> String {
        if self.staging_bucket.starts_with("gs://") {
            self.staging_bucket.clone()
        } else {
            format!("gs://{}", self.staging_bucket)
        }
    }
}
