//! gcloud CLI wrapper

use crate::error::{GcpError, Result};
use infraflow_cloud::CloudError;
use infraflow_engine::run_tool;
use serde::{Deserialize, Serialize};

/// gcloud CLI wrapper
pub struct Gcloud {
    project: Option<String>,
}

impl Gcloud {
    pub fn new(project: Option<String>) -> Self {
        Self { project }
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    /// Run a gcloud command and return stdout
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut full: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        if let Some(project) = &self.project {
            full.push(format!("--project={}", project));
        }
        full.push("--quiet".to_string());

        let output = run_tool("gcloud", &full, None, false)
            .await
            .map_err(|e| match e {
                CloudError::ToolNotFound(_) => GcpError::GcloudNotFound,
                other => GcpError::CloudError(other),
            })?;

        if !output.success() {
            return Err(GcpError::CommandFailed(output.diagnostic()));
        }

        Ok(output.stdout)
    }

    /// Accounts with active credentials
    pub async fn active_accounts(&self) -> Result<Vec<AccountInfo>> {
        let output = self
            .run_command(&["auth", "list", "--filter=status:ACTIVE", "--format=json"])
            .await?;

        if output.trim().is_empty() || output.trim() == "[]" {
            return Ok(Vec::new());
        }

        let accounts: Vec<AccountInfo> = serde_json::from_str(&output)?;
        Ok(accounts)
    }

    /// Whether the GCS bucket exists
    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        let url = format!("gs://{}", bucket);
        match self
            .run_command(&["storage", "buckets", "describe", &url, "--format=json"])
            .await
        {
            Ok(_) => Ok(true),
            Err(GcpError::CommandFailed(msg)) if is_not_found(&msg) => {
                tracing::debug!(bucket, "State bucket not found");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Write GKE credentials into the local kubeconfig
    pub async fn get_credentials(&self, cluster_name: &str, region: &str) -> Result<()> {
        let region = format!("--region={}", region);
        self.run_command(&["container", "clusters", "get-credentials", cluster_name, &region])
            .await?;
        Ok(())
    }
}

fn is_not_found(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("not found") || lower.contains("404")
}

/// Entry of `gcloud auth list`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub account: String,
    pub status: String,
}
