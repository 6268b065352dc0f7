//! az CLI wrapper

use crate::error::{AzureError, Result};
use infraflow_cloud::CloudError;
use infraflow_engine::run_tool;
use serde::{Deserialize, Serialize};

const NOT_FOUND_MARKERS: [&str; 3] = ["ResourceNotFound", "ResourceGroupNotFound", "was not found"];

/// az CLI wrapper
#[derive(Debug, Clone, Default)]
pub struct Az;

impl Az {
    pub fn new() -> Self {
        Self
    }

    async fn run_command(&self, args: &[&str]) -> Result<String> {
        let mut full: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        full.push("--only-show-errors".to_string());

        let output = run_tool("az", &full, None, false)
            .await
            .map_err(|e| match e {
                CloudError::ToolNotFound(_) => AzureError::AzCliNotFound,
                other => AzureError::CloudError(other),
            })?;

        if !output.success() {
            return Err(AzureError::CommandFailed(output.diagnostic()));
        }

        Ok(output.stdout)
    }

    /// The signed-in account; fails when `az login` has not been run
    pub async fn account(&self) -> Result<AccountInfo> {
        let output = self
            .run_command(&["account", "show", "--output", "json"])
            .await
            .map_err(|e| match e {
                AzureError::CommandFailed(msg) => AzureError::AuthenticationFailed(msg),
                other => other,
            })?;

        let account: AccountInfo = serde_json::from_str(&output)?;
        Ok(account)
    }

    /// Whether the storage account exists in the resource group
    pub async fn storage_account_exists(&self, name: &str, resource_group: &str) -> Result<bool> {
        match self
            .run_command(&[
                "storage",
                "account",
                "show",
                "--name",
                name,
                "--resource-group",
                resource_group,
                "--output",
                "json",
            ])
            .await
        {
            Ok(_) => Ok(true),
            Err(AzureError::CommandFailed(msg)) if is_not_found(&msg) => {
                tracing::debug!(storage_account = name, "State storage account not found");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Write AKS credentials into the local kubeconfig
    pub async fn get_aks_credentials(&self, cluster_name: &str, resource_group: &str) -> Result<()> {
        self.run_command(&[
            "aks",
            "get-credentials",
            "--resource-group",
            resource_group,
            "--name",
            cluster_name,
            "--overwrite-existing",
        ])
        .await?;
        Ok(())
    }
}

fn is_not_found(stderr: &str) -> bool {
    NOT_FOUND_MARKERS.iter().any(|m| stderr.contains(m))
}

/// Output of `az account show`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub user: Option<AccountUser>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountUser {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl AccountInfo {
    pub fn describe(&self) -> String {
        match &self.user {
            Some(user) => format!("{} on {} ({})", user.name, self.name, self.id),
            None => format!("{} ({})", self.name, self.id),
        }
    }
}
