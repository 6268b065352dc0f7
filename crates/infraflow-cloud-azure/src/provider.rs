//! Azure provider implementation

use crate::az::Az;
use crate::error::AzureError;
use async_trait::async_trait;
use infraflow_cloud::{
    AuthStatus, CloudError, CloudProvider, ClusterCoordinates, Provider, ProviderSettings,
    StateBackend,
};

const BACKEND_TEMPLATE: &str = include_str!("../templates/backend.tf.tera");

/// Blob container holding the state files
pub const STATE_CONTAINER: &str = "tfstate";

/// Storage account names: 3-24 chars, lowercase letters and digits only
const STORAGE_ACCOUNT_MAX_LEN: usize = 24;

/// Azure provider: Blob Storage state backend, AKS clusters
pub struct AzureProvider {
    az: Az,
    region: String,
    storage_account: String,
    resource_group: String,
}

impl AzureProvider {
    pub fn new(project: &str, settings: &ProviderSettings) -> Self {
        Self {
            az: Az::new(),
            region: settings
                .region
                .clone()
                .unwrap_or_else(|| Provider::Azure.default_region().to_string()),
            storage_account: settings
                .state_storage
                .clone()
                .unwrap_or_else(|| storage_account_name(project)),
            resource_group: settings
                .resource_group
                .clone()
                .unwrap_or_else(|| format!("{}-terraform-state", project)),
        }
    }
}

/// Derive a valid storage account name from the project name
fn storage_account_name(project: &str) -> String {
    let mut name: String = format!("{}tfstate", project)
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    name.truncate(STORAGE_ACCOUNT_MAX_LEN);
    name
}

#[async_trait]
impl CloudProvider for AzureProvider {
    fn provider(&self) -> Provider {
        Provider::Azure
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn state_backend(&self) -> StateBackend {
        StateBackend::new(Provider::Azure, &self.storage_account, None, &self.region)
    }

    fn backend_template(&self) -> &'static str {
        BACKEND_TEMPLATE
    }

    fn template_variables(&self) -> Vec<(String, String)> {
        vec![
            ("resource_group".to_string(), self.resource_group.clone()),
            ("container".to_string(), STATE_CONTAINER.to_string()),
        ]
    }

    fn backend_config(&self, backend: &StateBackend) -> Vec<(String, String)> {
        vec![
            ("resource_group_name".to_string(), self.resource_group.clone()),
            (
                "storage_account_name".to_string(),
                backend.storage_location_id.clone(),
            ),
            ("container_name".to_string(), STATE_CONTAINER.to_string()),
            ("key".to_string(), format!("{}/state", Provider::Azure)),
        ]
    }

    async fn check_auth(&self) -> infraflow_cloud::Result<AuthStatus> {
        match self.az.account().await {
            Ok(account) => Ok(AuthStatus::ok(account.describe())),
            Err(AzureError::AzCliNotFound) => Ok(AuthStatus::failed("az CLI is not installed")),
            Err(e) => Ok(AuthStatus::failed(e.to_string())),
        }
    }

    async fn backend_exists(&self, backend: &StateBackend) -> infraflow_cloud::Result<bool> {
        Ok(self
            .az
            .storage_account_exists(&backend.storage_location_id, &self.resource_group)
            .await?)
    }

    async fn configure_cluster_access(
        &self,
        cluster: &ClusterCoordinates,
    ) -> infraflow_cloud::Result<()> {
        let resource_group = cluster
            .resource_group
            .as_deref()
            .ok_or_else(|| CloudError::MissingOutput("resource_group_name".to_string()))?;

        tracing::info!(cluster = %cluster.name, resource_group, "Fetching AKS credentials");
        self.az
            .get_aks_credentials(&cluster.name, resource_group)
            .await?;
        Ok(())
    }
}
