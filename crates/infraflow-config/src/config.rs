//! `infraflow.yaml` model

use infraflow_cloud::{Provider, ProviderSettings};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Project configuration
///
/// Every key is optional; a project without `infraflow.yaml` runs on these
/// defaults with the project named after its root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InfraflowConfig {
    /// Project name, used to derive state backend names
    pub project: String,

    /// Engine executable (`terraform`, `tofu`, ...)
    pub engine: String,

    /// Root of the per-provider module directories
    pub terraform_dir: PathBuf,

    /// Root of the manifest group directories
    pub manifests_dir: PathBuf,

    /// Working directory for bootstrap definitions and run snapshots
    pub state_dir: PathBuf,

    pub providers: ProvidersConfig,

    /// Public endpoints listed after a successful rollout
    pub endpoints: Vec<Endpoint>,
}

impl Default for InfraflowConfig {
    fn default() -> Self {
        Self {
            project: String::new(),
            engine: "terraform".to_string(),
            terraform_dir: PathBuf::from("terraform"),
            manifests_dir: PathBuf::from("k8s"),
            state_dir: PathBuf::from(".infraflow"),
            providers: ProvidersConfig::default(),
            endpoints: default_endpoints(),
        }
    }
}

impl InfraflowConfig {
    pub fn provider_settings(&self, provider: Provider) -> &ProviderSettings {
        self.providers.get(provider)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProvidersConfig {
    pub aws: ProviderSettings,
    pub gcp: ProviderSettings,
    pub azure: ProviderSettings,
}

impl ProvidersConfig {
    pub fn get(&self, provider: Provider) -> &ProviderSettings {
        match provider {
            Provider::Aws => &self.aws,
            Provider::Gcp => &self.gcp,
            Provider::Azure => &self.azure,
        }
    }
}

/// An externally reachable URL derived from the public domain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Endpoint {
    pub name: String,

    /// Host label prepended to the domain (`api` → `api.example.com`)
    #[serde(default)]
    pub subdomain: Option<String>,

    #[serde(default)]
    pub path: Option<String>,
}

impl Endpoint {
    pub fn new(name: &str, subdomain: Option<&str>, path: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            subdomain: subdomain.map(str::to_string),
            path: path.map(str::to_string),
        }
    }

    pub fn url(&self, domain: &str) -> String {
        let host = match self.subdomain.as_deref() {
            Some(sub) if !sub.is_empty() => format!("{}.{}", sub, domain),
            _ => domain.to_string(),
        };
        match self.path.as_deref() {
            Some(path) if path.starts_with('/') => format!("https://{}{}", host, path),
            Some(path) if !path.is_empty() => format!("https://{}/{}", host, path),
            _ => format!("https://{}", host),
        }
    }
}

pub fn default_endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::new("Dashboard", None, None),
        Endpoint::new("API Gateway", Some("api"), None),
        Endpoint::new("API Docs", Some("api"), Some("/docs")),
        Endpoint::new("Grafana", Some("grafana"), None),
    ]
}
