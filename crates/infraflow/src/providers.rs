use infraflow_cloud::{CloudProvider, Provider};
use infraflow_cloud_aws::AwsProvider;
use infraflow_cloud_azure::AzureProvider;
use infraflow_cloud_gcp::GcpProvider;
use infraflow_config::InfraflowConfig;

/// Adapter for the selected provider, configured from `providers.<name>`
pub fn build(provider: Provider, config: &InfraflowConfig) -> Box<dyn CloudProvider> {
    let settings = config.provider_settings(provider);
    match provider {
        Provider::Aws => Box::new(AwsProvider::new(&config.project, settings)),
        Provider::Gcp => Box::new(GcpProvider::new(&config.project, settings)),
        Provider::Azure => Box::new(AzureProvider::new(&config.project, settings)),
    }
}
