//! Cloud provider trait definition

use crate::backend::StateBackend;
use crate::error::{CloudError, Result};
use crate::outputs::ProvisioningOutputs;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The closed set of supported cloud providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Gcp,
    Azure,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::Aws, Provider::Gcp, Provider::Azure];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Gcp => "gcp",
            Provider::Azure => "azure",
        }
    }

    /// Executable name of the provider's own CLI
    pub fn cli_binary(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Gcp => "gcloud",
            Provider::Azure => "az",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::Aws => "Amazon Web Services",
            Provider::Gcp => "Google Cloud",
            Provider::Azure => "Microsoft Azure",
        }
    }

    pub fn default_region(&self) -> &'static str {
        match self {
            Provider::Aws => "us-east-1",
            Provider::Gcp => "us-central1",
            Provider::Azure => "eastus",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "aws" => Ok(Provider::Aws),
            "gcp" | "google" => Ok(Provider::Gcp),
            "azure" => Ok(Provider::Azure),
            other => Err(CloudError::UnsupportedProvider(format!(
                "{} (expected one of: aws, gcp, azure)",
                other
            ))),
        }
    }
}

/// Per-provider settings as they appear in the project configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderSettings {
    /// Region (or location) for the state backend and the cluster
    pub region: Option<String>,

    /// Name of the state bucket / storage account
    pub state_storage: Option<String>,

    /// Name of the lock table (aws only)
    pub lock_table: Option<String>,

    /// GCP project id
    pub project: Option<String>,

    /// Azure resource group holding the state storage account
    pub resource_group: Option<String>,
}

/// Authentication status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether authentication is valid
    pub authenticated: bool,

    /// Account/user information if available
    pub account_info: Option<String>,

    /// Error message if not authenticated
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}

/// Where the managed cluster lives, as read from provisioning outputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterCoordinates {
    pub name: String,
    pub region: String,
    pub resource_group: Option<String>,
    pub project: Option<String>,
}

impl ClusterCoordinates {
    /// Read the coordinates from captured outputs.
    ///
    /// The cluster name is required. The region falls back to `fallback_region`
    /// when the engine did not export one.
    pub fn from_outputs(outputs: &ProvisioningOutputs, fallback_region: &str) -> Result<Self> {
        let name = outputs.require_cluster_name()?.to_string();
        let region = match outputs.cluster_region.as_deref() {
            Some(region) => region.to_string(),
            None => {
                tracing::warn!(
                    fallback = fallback_region,
                    "cluster_region output missing, using configured region"
                );
                fallback_region.to_string()
            }
        };

        Ok(Self {
            name,
            region,
            resource_group: outputs.resource_group_name.clone(),
            project: outputs.project_id.clone(),
        })
    }
}

/// Cloud provider abstraction trait
///
/// Each provider (aws, gcp, azure) wraps its own CLI and knows how to name,
/// probe and describe its state backend, and how to hand cluster credentials
/// to the local cluster client.
#[async_trait]
pub trait CloudProvider: Send + Sync {
    /// Which provider this adapter drives
    fn provider(&self) -> Provider;

    /// Returns the provider display name for UI
    fn display_name(&self) -> &str {
        self.provider().display_name()
    }

    /// Region used for the backend and as the cluster region fallback
    fn region(&self) -> &str;

    /// Names of the shared state backend for this provider (`exists` is false
    /// until probed)
    fn state_backend(&self) -> StateBackend;

    /// Tera template for the minimal backend-provisioning definition
    fn backend_template(&self) -> &'static str;

    /// Extra template variables the backend template needs beyond the backend
    /// names (e.g. resource group, project id)
    fn template_variables(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// `-backend-config` key/value pairs for engine initialisation
    fn backend_config(&self, backend: &StateBackend) -> Vec<(String, String)>;

    /// Check if the provider CLI is properly configured and authenticated
    async fn check_auth(&self) -> Result<AuthStatus>;

    /// Whether the backend's storage location already exists
    async fn backend_exists(&self, backend: &StateBackend) -> Result<bool>;

    /// Write cluster credentials into the local cluster-client configuration
    async fn configure_cluster_access(&self, cluster: &ClusterCoordinates) -> Result<()>;
}
