//! Workspace selection

use crate::error::{OrchestratorError, Result};
use infraflow_cloud::{CloudError, Engine, Workspace};
use infraflow_config::ProjectLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceOutcome {
    Selected,
    Created,
}

pub struct WorkspaceManager<'a> {
    engine: &'a dyn Engine,
    layout: &'a ProjectLayout,
}

impl<'a> WorkspaceManager<'a> {
    pub fn new(engine: &'a dyn Engine, layout: &'a ProjectLayout) -> Self {
        Self { engine, layout }
    }

    /// Select the workspace, creating it only when it does not exist yet
    pub async fn select_or_create(&self, workspace: &Workspace) -> Result<WorkspaceOutcome> {
        let dir = self.layout.provider_dir(workspace.provider);
        let name = workspace.name();

        match self.engine.select_workspace(&dir, name).await {
            Ok(()) => {
                tracing::info!(workspace = name, state_key = %workspace.state_key, "Workspace selected");
                Ok(WorkspaceOutcome::Selected)
            }
            Err(CloudError::WorkspaceNotFound(_)) => {
                self.engine
                    .new_workspace(&dir, name)
                    .await
                    .map_err(|e| OrchestratorError::from_engine(e, OrchestratorError::WorkspaceFailure))?;
                tracing::info!(workspace = name, state_key = %workspace.state_key, "Workspace created");
                Ok(WorkspaceOutcome::Created)
            }
            Err(e) => Err(OrchestratorError::from_engine(
                e,
                OrchestratorError::WorkspaceFailure,
            )),
        }
    }
}
