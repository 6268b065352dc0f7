//! aws CLI wrapper
//!
//! Wraps the aws CLI commands the orchestrator needs: identity, state bucket
//! probing and EKS credential setup.

use crate::error::{AwsError, Result};
use infraflow_cloud::CloudError;
use infraflow_engine::run_tool;
use serde::{Deserialize, Serialize};

/// aws CLI wrapper
pub struct AwsCli {
    region: String,
}

impl AwsCli {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Run an aws command and return stdout
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut full: Vec<String> = vec!["--region".to_string(), self.region.clone()];
        full.extend(args.iter().map(|s| s.to_string()));

        let output = run_tool("aws", &full, None, false)
            .await
            .map_err(|e| match e {
                CloudError::ToolNotFound(_) => AwsError::AwsCliNotFound,
                other => AwsError::CloudError(other),
            })?;

        if !output.success() {
            return Err(AwsError::CommandFailed(output.diagnostic()));
        }

        Ok(output.stdout)
    }

    /// Resolve the caller identity; fails when no credentials are configured
    pub async fn caller_identity(&self) -> Result<CallerIdentity> {
        let output = self
            .run_command(&["sts", "get-caller-identity", "--output", "json"])
            .await
            .map_err(|e| match e {
                AwsError::CommandFailed(msg) => AwsError::AuthenticationFailed(msg),
                other => other,
            })?;

        let identity: CallerIdentity = serde_json::from_str(&output)?;
        Ok(identity)
    }

    /// Whether the S3 bucket exists (and is visible to the caller)
    pub async fn bucket_exists(&self, bucket: &str) -> Result<bool> {
        match self
            .run_command(&["s3api", "head-bucket", "--bucket", bucket])
            .await
        {
            Ok(_) => Ok(true),
            Err(AwsError::CommandFailed(msg)) if is_not_found(&msg) => {
                tracing::debug!(bucket, "State bucket not found");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Write EKS credentials into the local kubeconfig
    pub async fn update_kubeconfig(&self, cluster_name: &str, region: &str) -> Result<()> {
        // the cluster may live outside the backend region
        AwsCli::new(region)
            .run_command(&["eks", "update-kubeconfig", "--name", cluster_name])
            .await?;
        Ok(())
    }
}

/// head-bucket reports a missing bucket as a 404 / Not Found
fn is_not_found(stderr: &str) -> bool {
    stderr.contains("404") || stderr.contains("Not Found") || stderr.contains("NoSuchBucket")
}

/// Identity returned by `sts get-caller-identity`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallerIdentity {
    #[serde(rename = "UserId")]
    pub user_id: String,

    #[serde(rename = "Account")]
    pub account: String,

    #[serde(rename = "Arn")]
    pub arn: String,
}
