//! AWS provider implementation

use crate::aws::AwsCli;
use crate::error::AwsError;
use async_trait::async_trait;
use infraflow_cloud::{
    AuthStatus, CloudProvider, ClusterCoordinates, Provider, ProviderSettings, StateBackend,
};

const BACKEND_TEMPLATE: &str = include_str!("../templates/backend.tf.tera");

/// AWS provider: S3 + DynamoDB state backend, EKS clusters
pub struct AwsProvider {
    cli: AwsCli,
    bucket: String,
    lock_table: String,
}

impl AwsProvider {
    pub fn new(project: &str, settings: &ProviderSettings) -> Self {
        let region = settings
            .region
            .clone()
            .unwrap_or_else(|| Provider::Aws.default_region().to_string());

        Self {
            cli: AwsCli::new(region),
            bucket: settings
                .state_storage
                .clone()
                .unwrap_or_else(|| StateBackend::default_storage_name(project, Provider::Aws)),
            lock_table: settings
                .lock_table
                .clone()
                .unwrap_or_else(|| StateBackend::default_lock_table(project)),
        }
    }
}

#[async_trait]
impl CloudProvider for AwsProvider {
    fn provider(&self) -> Provider {
        Provider::Aws
    }

    fn region(&self) -> &str {
        self.cli.region()
    }

    fn state_backend(&self) -> StateBackend {
        StateBackend::new(
            Provider::Aws,
            &self.bucket,
            Some(self.lock_table.clone()),
            self.cli.region(),
        )
    }

    fn backend_template(&self) -> &'static str {
        BACKEND_TEMPLATE
    }

    fn backend_config(&self, backend: &StateBackend) -> Vec<(String, String)> {
        // state lands at s3://<bucket>/aws/<workspace>/state
        let mut config = vec![
            ("bucket".to_string(), backend.storage_location_id.clone()),
            ("region".to_string(), backend.region.clone()),
            ("key".to_string(), "state".to_string()),
            ("workspace_key_prefix".to_string(), Provider::Aws.to_string()),
            ("encrypt".to_string(), "true".to_string()),
        ];
        if let Some(lock_table) = &backend.lock_table_id {
            config.push(("dynamodb_table".to_string(), lock_table.clone()));
        }
        config
    }

    async fn check_auth(&self) -> infraflow_cloud::Result<AuthStatus> {
        match self.cli.caller_identity().await {
            Ok(identity) => Ok(AuthStatus::ok(format!(
                "{} ({})",
                identity.arn, identity.account
            ))),
            Err(AwsError::AwsCliNotFound) => Ok(AuthStatus::failed("aws CLI is not installed")),
            Err(e) => Ok(AuthStatus::failed(e.to_string())),
        }
    }

    async fn backend_exists(&self, backend: &StateBackend) -> infraflow_cloud::Result<bool> {
        Ok(self.cli.bucket_exists(&backend.storage_location_id).await?)
    }

    async fn configure_cluster_access(
        &self,
        cluster: &ClusterCoordinates,
    ) -> infraflow_cloud::Result<()> {
        tracing::info!(cluster = %cluster.name, region = %cluster.region, "Updating kubeconfig for EKS");
        self.cli
            .update_kubeconfig(&cluster.name, &cluster.region)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider() -> AwsProvider {
        AwsProvider::new("platform", &ProviderSettings::default())
    }

    #[test]
    fn test_default_backend_names() {
        let backend = provider().state_backend();
        assert_eq!(backend.storage_location_id, "platform-terraform-state-aws");
        assert_eq!(
            backend.lock_table_id.as_deref(),
            Some("platform-terraform-locks")
        );
        assert_eq!(backend.region, "us-east-1");
        assert!(!backend.exists);
    }

    #[test]
    fn test_settings_override_names() {
        let settings = ProviderSettings {
            region: Some("eu-central-1".to_string()),
            state_storage: Some("acme-state".to_string()),
            lock_table: Some("acme-locks".to_string()),
            ..Default::default()
        };
        let backend = AwsProvider::new("platform", &settings).state_backend();
        assert_eq!(backend.storage_location_id, "acme-state");
        assert_eq!(backend.lock_table_id.as_deref(), Some("acme-locks"));
        assert_eq!(backend.region, "eu-central-1");
    }

    #[test]
    fn test_backend_config_state_key_layout() {
        let provider = provider();
        let config = provider.backend_config(&provider.state_backend());
        let get = |key: &str| {
            config
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("bucket"), Some("platform-terraform-state-aws"));
        assert_eq!(get("workspace_key_prefix"), Some("aws"));
        assert_eq!(get("key"), Some("state"));
        assert_eq!(get("dynamodb_table"), Some("platform-terraform-locks"));
        assert_eq!(get("encrypt"), Some("true"));
    }

    #[test]
    fn test_backend_template_renders() {
        let mut context = tera::Context::new();
        context.insert("project", "platform");
        context.insert("region", "us-east-1");
        context.insert("storage", "platform-terraform-state-aws");
        context.insert("lock_table", "platform-terraform-locks");

        let rendered = tera::Tera::one_off(provider().backend_template(), &context, false).unwrap();
        assert!(rendered.contains(r#"bucket = "platform-terraform-state-aws""#));
        assert!(rendered.contains(r#"name         = "platform-terraform-locks""#));
        assert!(rendered.contains("restrict_public_buckets = true"));
        assert!(rendered.contains(r#"status = "Enabled""#));
    }
}
