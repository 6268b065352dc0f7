//! Google Cloud provider implementation

use crate::error::GcpError;
use crate::gcloud::Gcloud;
use async_trait::async_trait;
use infraflow_cloud::{
    AuthStatus, CloudProvider, ClusterCoordinates, Provider, ProviderSettings, StateBackend,
};

const BACKEND_TEMPLATE: &str = include_str!("../templates/backend.tf.tera");

/// Google Cloud provider: GCS state backend, GKE clusters
pub struct GcpProvider {
    gcloud: Gcloud,
    region: String,
    bucket: String,
}

impl GcpProvider {
    pub fn new(project: &str, settings: &ProviderSettings) -> Self {
        Self {
            gcloud: Gcloud::new(settings.project.clone()),
            region: settings
                .region
                .clone()
                .unwrap_or_else(|| Provider::Gcp.default_region().to_string()),
            bucket: settings
                .state_storage
                .clone()
                .unwrap_or_else(|| StateBackend::default_storage_name(project, Provider::Gcp)),
        }
    }
}

#[async_trait]
impl CloudProvider for GcpProvider {
    fn provider(&self) -> Provider {
        Provider::Gcp
    }

    fn region(&self) -> &str {
        &self.region
    }

    fn state_backend(&self) -> StateBackend {
        StateBackend::new(Provider::Gcp, &self.bucket, None, &self.region)
    }

    fn backend_template(&self) -> &'static str {
        BACKEND_TEMPLATE
    }

    fn template_variables(&self) -> Vec<(String, String)> {
        vec![(
            "gcp_project".to_string(),
            self.gcloud.project().unwrap_or_default().to_string(),
        )]
    }

    fn backend_config(&self, backend: &StateBackend) -> Vec<(String, String)> {
        // state lands at gs://<bucket>/gcp/<workspace>.tfstate
        vec![
            ("bucket".to_string(), backend.storage_location_id.clone()),
            ("prefix".to_string(), Provider::Gcp.to_string()),
        ]
    }

    async fn check_auth(&self) -> infraflow_cloud::Result<AuthStatus> {
        match self.gcloud.active_accounts().await {
            Ok(accounts) => match accounts.first() {
                Some(account) => Ok(AuthStatus::ok(account.account.clone())),
                None => Ok(AuthStatus::failed(
                    "no active gcloud account (run `gcloud auth login`)",
                )),
            },
            Err(GcpError::GcloudNotFound) => Ok(AuthStatus::failed("gcloud is not installed")),
            Err(e) => Ok(AuthStatus::failed(e.to_string())),
        }
    }

    async fn backend_exists(&self, backend: &StateBackend) -> infraflow_cloud::Result<bool> {
        Ok(self
            .gcloud
            .bucket_exists(&backend.storage_location_id)
            .await?)
    }

    async fn configure_cluster_access(
        &self,
        cluster: &ClusterCoordinates,
    ) -> infraflow_cloud::Result<()> {
        // the project exported by the engine wins over the configured one
        let gcloud = match &cluster.project {
            Some(project) => Gcloud::new(Some(project.clone())),
            None => Gcloud::new(self.gcloud.project().map(str::to_string)),
        };

        tracing::info!(cluster = %cluster.name, region = %cluster.region, "Fetching GKE credentials");
        gcloud
            .get_credentials(&cluster.name, &cluster.region)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_has_no_lock_table() {
        let provider = GcpProvider::new("platform", &ProviderSettings::default());
        let backend = provider.state_backend();
        assert_eq!(backend.storage_location_id, "platform-terraform-state-gcp");
        assert_eq!(backend.lock_table_id, None);
        assert_eq!(backend.region, "us-central1");
    }

    #[test]
    fn test_backend_config_prefix() {
        let provider = GcpProvider::new("platform", &ProviderSettings::default());
        let config = provider.backend_config(&provider.state_backend());
        assert_eq!(
            config,
            vec![
                (
                    "bucket".to_string(),
                    "platform-terraform-state-gcp".to_string()
                ),
                ("prefix".to_string(), "gcp".to_string()),
            ]
        );
    }

    #[test]
    fn test_backend_template_with_and_without_project() {
        let render = |gcp_project: &str| {
            let mut context = tera::Context::new();
            context.insert("project", "platform");
            context.insert("region", "europe-west1");
            context.insert("storage", "platform-terraform-state-gcp");
            context.insert("lock_table", "");
            context.insert("gcp_project", gcp_project);
            tera::Tera::one_off(BACKEND_TEMPLATE, &context, false).unwrap()
        };

        let with_project = render("acme-prod");
        assert!(with_project.contains(r#"project = "acme-prod""#));
        assert!(with_project.contains(r#"public_access_prevention    = "enforced""#));

        let without_project = render("");
        assert!(!without_project.contains("project = "));
        assert!(without_project.contains(r#"location                    = "europe-west1""#));
    }

    #[test]
    fn test_template_variables() {
        let settings = ProviderSettings {
            project: Some("acme-prod".to_string()),
            ..Default::default()
        };
        let provider = GcpProvider::new("platform", &settings);
        assert_eq!(
            provider.template_variables(),
            vec![("gcp_project".to_string(), "acme-prod".to_string())]
        );
    }
}
