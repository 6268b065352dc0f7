//! Capabilities for the external tools the orchestrator drives
//!
//! Every external process is reached through one of these traits so the
//! orchestration logic can run against fakes.

use crate::action::PlanArtifact;
use crate::error::Result;
use crate::outputs::ProvisioningOutputs;
use async_trait::async_trait;
use std::path::Path;

/// Resolves whether an executable is available on the host
#[async_trait]
pub trait ToolProbe: Send + Sync {
    async fn is_available(&self, tool: &str) -> bool;
}

/// Declarative provisioning engine (Terraform-compatible)
///
/// All operations run against a configuration directory. Failures carry the
/// engine's diagnostic text verbatim; a state-lock failure is reported as
/// [`crate::CloudError::LockError`] and a missing workspace on select as
/// [`crate::CloudError::WorkspaceNotFound`].
#[async_trait]
pub trait Engine: Send + Sync {
    /// Executable name, for prerequisite checks
    fn binary(&self) -> &str;

    /// Initialise the directory; `backend_config` pairs become partial backend
    /// configuration (empty for local state)
    async fn init(&self, dir: &Path, backend_config: &[(String, String)]) -> Result<()>;

    /// Static validation of the configuration
    async fn validate(&self, dir: &Path) -> Result<()>;

    async fn select_workspace(&self, dir: &Path, name: &str) -> Result<()>;

    async fn new_workspace(&self, dir: &Path, name: &str) -> Result<()>;

    /// Write a saved plan to `out`
    async fn plan(&self, dir: &Path, var_file: Option<&Path>, out: &Path)
        -> Result<PlanArtifact>;

    /// Apply a previously saved plan
    async fn apply(&self, dir: &Path, plan: &Path) -> Result<()>;

    /// Destroy everything tracked by the current workspace, without prompting
    async fn destroy(&self, dir: &Path, var_file: Option<&Path>) -> Result<()>;

    async fn outputs(&self, dir: &Path) -> Result<ProvisioningOutputs>;
}

/// Kubernetes cluster client
#[async_trait]
pub trait ClusterClient: Send + Sync {
    /// Executable name, for prerequisite checks
    fn binary(&self) -> &str;

    /// Apply every manifest under `dir`, returning the tool's summary
    async fn apply_dir(&self, dir: &Path) -> Result<String>;

    /// Name of the active context
    async fn current_context(&self) -> Result<String>;
}
