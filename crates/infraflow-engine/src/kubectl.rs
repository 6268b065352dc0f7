//! kubectl wrapper

use crate::command::{args, run_checked};
use async_trait::async_trait;
use infraflow_cloud::{ClusterClient, Result};
use std::path::Path;

/// Cluster client backed by `kubectl` and the active kubeconfig context
#[derive(Debug, Clone)]
pub struct Kubectl {
    binary: String,
}

impl Kubectl {
    pub fn new() -> Self {
        Self {
            binary: "kubectl".to_string(),
        }
    }
}

impl Default for Kubectl {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ClusterClient for Kubectl {
    fn binary(&self) -> &str {
        &self.binary
    }

    async fn apply_dir(&self, dir: &Path) -> Result<String> {
        let dir = dir.display().to_string();
        let stdout = run_checked(
            &self.binary,
            &args(&["apply", "-f", &dir, "--recursive"]),
            None,
        )
        .await?;
        Ok(stdout.trim().to_string())
    }

    async fn current_context(&self) -> Result<String> {
        let stdout = run_checked(&self.binary, &args(&["config", "current-context"]), None).await?;
        Ok(stdout.trim().to_string())
    }
}
