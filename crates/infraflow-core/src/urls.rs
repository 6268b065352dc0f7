//! Public URLs derived from the domain output

use infraflow_cloud::ProvisioningOutputs;
use infraflow_config::Endpoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedUrl {
    pub name: String,
    pub url: String,
}

/// Resolve every configured endpoint against `domain_name`; `None` when the
/// engine exported no domain
pub fn derive_urls(outputs: &ProvisioningOutputs, endpoints: &[Endpoint]) -> Option<Vec<DerivedUrl>> {
    let domain = outputs.require_domain_name().ok()?;
    Some(
        endpoints
            .iter()
            .map(|endpoint| DerivedUrl {
                name: endpoint.name.clone(),
                url: endpoint.url(domain),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use infraflow_config::default_endpoints;

    #[test]
    fn test_urls_follow_domain() {
        let outputs = ProvisioningOutputs {
            domain_name: Some("staging.example.com".to_string()),
            ..Default::default()
        };
        let urls = derive_urls(&outputs, &default_endpoints()).unwrap();
        assert_eq!(urls[0].url, "https://staging.example.com");
        assert_eq!(urls[2].name, "API Docs");
        assert_eq!(urls[2].url, "https://api.staging.example.com/docs");
    }

    #[test]
    fn test_no_domain_no_urls() {
        assert_eq!(
            derive_urls(&ProvisioningOutputs::default(), &default_endpoints()),
            None
        );
    }
}
