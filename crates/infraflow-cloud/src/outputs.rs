//! Typed provisioning outputs
//!
//! The engine reports outputs as a JSON object of
//! `{ "<name>": { "value": ..., "type": ..., "sensitive": bool } }`.
//! Only the well-known names below are lifted into typed fields; everything
//! else is kept in `extra` with sensitive values redacted.

use crate::error::{CloudError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

const REDACTED: &str = "(sensitive)";

/// One raw output as reported by the engine
#[derive(Debug, Clone, Deserialize)]
pub struct OutputValue {
    pub value: serde_json::Value,

    #[serde(default)]
    pub sensitive: bool,
}

/// Outputs the orchestrator knows how to use
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvisioningOutputs {
    pub cluster_name: Option<String>,
    pub cluster_region: Option<String>,
    pub cluster_endpoint: Option<String>,
    pub database_endpoint: Option<String>,
    pub cache_endpoint: Option<String>,
    pub load_balancer_dns_name: Option<String>,
    pub load_balancer_zone_id: Option<String>,
    pub domain_name: Option<String>,
    pub resource_group_name: Option<String>,
    pub project_id: Option<String>,

    /// Remaining outputs, sensitive values redacted
    #[serde(default)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ProvisioningOutputs {
    /// Parse the engine's `output -json` document
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        let raw: HashMap<String, OutputValue> = serde_json::from_str(json)?;
        Ok(Self::from_raw(raw))
    }

    pub fn from_raw(raw: HashMap<String, OutputValue>) -> Self {
        let mut outputs = Self::default();

        for (name, output) in raw {
            if output.sensitive {
                outputs
                    .extra
                    .insert(name, serde_json::Value::String(REDACTED.to_string()));
                continue;
            }

            let value = match output.value {
                serde_json::Value::String(value) => value,
                other => {
                    if outputs.slot(&name).is_some() {
                        tracing::warn!(output = %name, "output is not a string, keeping it untyped");
                    }
                    outputs.extra.insert(name, other);
                    continue;
                }
            };

            match outputs.slot(&name) {
                Some(slot) => *slot = Some(value),
                None => {
                    outputs.extra.insert(name, serde_json::Value::String(value));
                }
            }
        }

        outputs
    }

    fn slot(&mut self, name: &str) -> Option<&mut Option<String>> {
        match name {
            "cluster_name" => Some(&mut self.cluster_name),
            "cluster_region" => Some(&mut self.cluster_region),
            "cluster_endpoint" => Some(&mut self.cluster_endpoint),
            "database_endpoint" => Some(&mut self.database_endpoint),
            "cache_endpoint" => Some(&mut self.cache_endpoint),
            "load_balancer_dns_name" => Some(&mut self.load_balancer_dns_name),
            "load_balancer_zone_id" => Some(&mut self.load_balancer_zone_id),
            "domain_name" => Some(&mut self.domain_name),
            "resource_group_name" => Some(&mut self.resource_group_name),
            "project_id" => Some(&mut self.project_id),
            _ => None,
        }
    }

    pub fn require_cluster_name(&self) -> Result<&str> {
        self.cluster_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| CloudError::MissingOutput("cluster_name".to_string()))
    }

    pub fn require_domain_name(&self) -> Result<&str> {
        self.domain_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| CloudError::MissingOutput("domain_name".to_string()))
    }

    pub fn require_resource_group(&self) -> Result<&str> {
        self.resource_group_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| CloudError::MissingOutput("resource_group_name".to_string()))
    }

    /// Non-empty typed outputs as (name, value) pairs, for display
    pub fn known(&self) -> Vec<(&'static str, &str)> {
        [
            ("cluster_name", &self.cluster_name),
            ("cluster_region", &self.cluster_region),
            ("cluster_endpoint", &self.cluster_endpoint),
            ("database_endpoint", &self.database_endpoint),
            ("cache_endpoint", &self.cache_endpoint),
            ("load_balancer_dns_name", &self.load_balancer_dns_name),
            ("load_balancer_zone_id", &self.load_balancer_zone_id),
            ("domain_name", &self.domain_name),
            ("resource_group_name", &self.resource_group_name),
            ("project_id", &self.project_id),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "cluster_name": {"sensitive": false, "type": "string", "value": "platform-staging"},
        "cluster_region": {"sensitive": false, "type": "string", "value": "us-east-1"},
        "database_endpoint": {"sensitive": false, "type": "string", "value": "db.internal:5432"},
        "domain_name": {"sensitive": false, "type": "string", "value": "staging.example.com"},
        "database_password": {"sensitive": true, "type": "string", "value": "hunter2"},
        "subnet_ids": {"sensitive": false, "type": ["list", "string"], "value": ["a", "b"]}
    }"#;

    #[test]
    fn test_parse_outputs() {
        let outputs = ProvisioningOutputs::from_json(SAMPLE).unwrap();
        assert_eq!(outputs.cluster_name.as_deref(), Some("platform-staging"));
        assert_eq!(outputs.cluster_region.as_deref(), Some("us-east-1"));
        assert_eq!(outputs.domain_name.as_deref(), Some("staging.example.com"));
        assert_eq!(outputs.cache_endpoint, None);
        assert_eq!(outputs.extra["subnet_ids"], serde_json::json!(["a", "b"]));
    }

    #[test]
    fn test_sensitive_outputs_redacted() {
        let outputs = ProvisioningOutputs::from_json(SAMPLE).unwrap();
        assert_eq!(outputs.extra["database_password"], serde_json::json!(REDACTED));
        let serialized = serde_json::to_string(&outputs).unwrap();
        assert!(!serialized.contains("hunter2"));
    }

    #[test]
    fn test_empty_outputs() {
        let outputs = ProvisioningOutputs::from_json("{}").unwrap();
        assert!(outputs.known().is_empty());
        assert!(matches!(
            outputs.require_cluster_name(),
            Err(CloudError::MissingOutput(_))
        ));
        assert!(ProvisioningOutputs::from_json("").unwrap().extra.is_empty());
    }

    #[test]
    fn test_empty_string_is_missing() {
        let outputs = ProvisioningOutputs {
            domain_name: Some(String::new()),
            ..Default::default()
        };
        assert!(outputs.require_domain_name().is_err());
    }
}
