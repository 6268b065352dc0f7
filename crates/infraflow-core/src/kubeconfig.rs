//! Cluster client configuration from provisioning outputs

use crate::error::{OrchestratorError, Result};
use infraflow_cloud::{CloudProvider, ClusterClient, ClusterCoordinates, ProvisioningOutputs};

pub struct KubeconfigConfigurer<'a> {
    provider: &'a dyn CloudProvider,
    client: &'a dyn ClusterClient,
}

impl<'a> KubeconfigConfigurer<'a> {
    pub fn new(provider: &'a dyn CloudProvider, client: &'a dyn ClusterClient) -> Self {
        Self { provider, client }
    }

    /// Point the cluster client at the provisioned cluster and return the
    /// resulting context name. Every failure is a [`OrchestratorError::KubeconfigFailure`].
    pub async fn configure(&self, outputs: &ProvisioningOutputs) -> Result<String> {
        let failure = |e: infraflow_cloud::CloudError| OrchestratorError::KubeconfigFailure(e.to_string());

        let coords = ClusterCoordinates::from_outputs(outputs, self.provider.region()).map_err(failure)?;
        self.provider
            .configure_cluster_access(&coords)
            .await
            .map_err(failure)?;

        let context = self.client.current_context().await.map_err(failure)?;
        tracing::info!(cluster = %coords.name, context = %context, "Cluster client configured");
        Ok(context)
    }
}
