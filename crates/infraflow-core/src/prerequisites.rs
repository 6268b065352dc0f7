//! External tool presence check

use crate::error::{OrchestratorError, Result};
use infraflow_cloud::{Provider, ToolProbe};

/// Package manager client used by the cluster add-ons
pub const PACKAGE_MANAGER: &str = "helm";

pub struct PrerequisiteChecker<'a> {
    probe: &'a dyn ToolProbe,
    tools: Vec<String>,
}

impl<'a> PrerequisiteChecker<'a> {
    /// Tools are checked in order: engine, provider CLI, cluster client,
    /// package manager
    pub fn new(
        probe: &'a dyn ToolProbe,
        engine_binary: &str,
        provider: Provider,
        cluster_binary: &str,
    ) -> Self {
        Self {
            probe,
            tools: vec![
                engine_binary.to_string(),
                provider.cli_binary().to_string(),
                cluster_binary.to_string(),
                PACKAGE_MANAGER.to_string(),
            ],
        }
    }

    /// Fails with the first tool that is not on PATH
    pub async fn check(&self) -> Result<()> {
        for tool in &self.tools {
            if !self.probe.is_available(tool).await {
                return Err(OrchestratorError::MissingPrerequisite(tool.clone()));
            }
        }
        tracing::info!(tools = %self.tools.join(", "), "Prerequisites present");
        Ok(())
    }
}
