//! Where things live inside a project

use crate::config::InfraflowConfig;
use infraflow_cloud::{Environment, Provider};
use std::path::{Path, PathBuf};

/// Absolute paths of every file the orchestrator reads or writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
    terraform_dir: PathBuf,
    manifests_dir: PathBuf,
    state_dir: PathBuf,
}

impl ProjectLayout {
    /// A relative `root` is resolved against the current directory
    pub fn new(root: &Path, config: &InfraflowConfig) -> Self {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        Self {
            root: root.clone(),
            terraform_dir: root.join(&config.terraform_dir),
            manifests_dir: root.join(&config.manifests_dir),
            state_dir: root.join(&config.state_dir),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn manifests_dir(&self) -> &Path {
        &self.manifests_dir
    }

    /// Module directory of one provider (`terraform/aws`)
    pub fn provider_dir(&self, provider: Provider) -> PathBuf {
        self.terraform_dir.join(provider.as_str())
    }

    pub fn var_file(&self, provider: Provider, environment: &Environment) -> PathBuf {
        self.provider_dir(provider)
            .join("environments")
            .join(format!("{}.tfvars", environment))
    }

    /// Template the operator copies a variable file from
    pub fn example_file(&self, provider: Provider) -> PathBuf {
        self.provider_dir(provider).join("terraform.tfvars.example")
    }

    pub fn plan_file(&self, provider: Provider, environment: &Environment) -> PathBuf {
        self.provider_dir(provider)
            .join(format!("{}.tfplan", environment))
    }

    /// Scratch directory for the rendered backend definition
    pub fn bootstrap_dir(&self, provider: Provider) -> PathBuf {
        self.state_dir.join("bootstrap").join(provider.as_str())
    }

    pub fn snapshot_path(&self, provider: Provider, environment: &Environment) -> PathBuf {
        self.state_dir
            .join("runs")
            .join(format!("{}-{}.json", provider, environment))
    }

    pub fn manifest_dir(&self, group: &str) -> PathBuf {
        self.manifests_dir.join(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout() -> ProjectLayout {
        ProjectLayout::new(Path::new("/srv/platform"), &InfraflowConfig::default())
    }

    #[test]
    fn test_engine_paths() {
        let layout = layout();
        let staging: Environment = "staging".parse().unwrap();

        assert_eq!(
            layout.var_file(Provider::Aws, &staging),
            PathBuf::from("/srv/platform/terraform/aws/environments/staging.tfvars")
        );
        assert_eq!(
            layout.example_file(Provider::Gcp),
            PathBuf::from("/srv/platform/terraform/gcp/terraform.tfvars.example")
        );
        assert_eq!(
            layout.plan_file(Provider::Azure, &staging),
            PathBuf::from("/srv/platform/terraform/azure/staging.tfplan")
        );
    }

    #[test]
    fn test_state_paths() {
        let layout = layout();
        let production = Environment::default();

        assert_eq!(
            layout.bootstrap_dir(Provider::Aws),
            PathBuf::from("/srv/platform/.infraflow/bootstrap/aws")
        );
        assert_eq!(
            layout.snapshot_path(Provider::Gcp, &production),
            PathBuf::from("/srv/platform/.infraflow/runs/gcp-production.json")
        );
        assert_eq!(
            layout.manifest_dir("namespaces"),
            PathBuf::from("/srv/platform/k8s/namespaces")
        );
    }

    #[test]
    fn test_configured_directories() {
        let config = InfraflowConfig {
            terraform_dir: PathBuf::from("infra/modules"),
            manifests_dir: PathBuf::from("/opt/manifests"),
            ..Default::default()
        };
        let layout = ProjectLayout::new(Path::new("/srv/platform"), &config);
        assert_eq!(
            layout.provider_dir(Provider::Aws),
            PathBuf::from("/srv/platform/infra/modules/aws")
        );
        assert_eq!(layout.manifests_dir(), Path::new("/opt/manifests"));
    }

    #[test]
    #[serial_test::serial]
    fn test_relative_root_yields_absolute_paths() {
        let layout = ProjectLayout::new(Path::new("infra"), &InfraflowConfig::default());
        let staging: Environment = "staging".parse().unwrap();
        let cwd = std::env::current_dir().unwrap();

        assert_eq!(layout.root(), cwd.join("infra"));
        assert!(layout.var_file(Provider::Aws, &staging).is_absolute());
        assert!(layout.plan_file(Provider::Aws, &staging).is_absolute());
        assert!(layout.bootstrap_dir(Provider::Aws).is_absolute());
    }
}
