//! Provisioning run record and its state machine
//!
//! ```text
//! Init -> PrereqChecked -> BackendReady -> Validated -> WorkspaceSelected
//!                                                             |
//!                        +-----------+-----------+------------+
//!                        v           v           v            v
//!                     Planned     Applied    Destroyed    Cancelled
//!                                    |
//!                                    v  (manifest rollout failed)
//!                                  Failed
//! ```
//!
//! Every non-terminal state may also move to `Failed`.

use crate::error::{OrchestratorError, Result};
use crate::rollout::ManifestGroup;
use crate::urls::DerivedUrl;
use chrono::{DateTime, Utc};
use infraflow_cloud::{Action, Environment, PlanArtifact, Provider, ProvisioningOutputs};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Init,
    PrereqChecked,
    BackendReady,
    Validated,
    WorkspaceSelected,
    Planned,
    Applied,
    Destroyed,
    Cancelled,
    Failed,
}

impl RunState {
    /// `Applied` is not terminal: rollout continues from it
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Planned | RunState::Destroyed | RunState::Cancelled | RunState::Failed
        )
    }

    pub fn can_transition_to(&self, next: RunState) -> bool {
        use RunState::*;
        match (self, next) {
            (Init, PrereqChecked)
            | (PrereqChecked, BackendReady)
            | (BackendReady, Validated)
            | (Validated, WorkspaceSelected)
            | (WorkspaceSelected, Planned | Applied | Destroyed | Cancelled) => true,
            (Applied, Failed) => true,
            (Applied, _) => false,
            (state, Failed) => !state.is_terminal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RunState::Init => "init",
            RunState::PrereqChecked => "prereq_checked",
            RunState::BackendReady => "backend_ready",
            RunState::Validated => "validated",
            RunState::WorkspaceSelected => "workspace_selected",
            RunState::Planned => "planned",
            RunState::Applied => "applied",
            RunState::Destroyed => "destroyed",
            RunState::Cancelled => "cancelled",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The failure a run ended with, as recorded in the snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunError {
    pub category: String,
    pub message: String,
}

impl From<&OrchestratorError> for RunError {
    fn from(err: &OrchestratorError) -> Self {
        Self {
            category: err.category().to_string(),
            message: err.to_string(),
        }
    }
}

/// One invocation of the orchestrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningRun {
    pub environment: Environment,
    pub provider: Provider,
    pub action: Action,
    pub state: RunState,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub plan_artifact: Option<PlanArtifact>,
    pub outputs: Option<ProvisioningOutputs>,
    pub kube_context: Option<String>,

    #[serde(default)]
    pub manifest_groups: Vec<ManifestGroup>,

    #[serde(default)]
    pub urls: Vec<DerivedUrl>,

    #[serde(default)]
    pub warnings: Vec<String>,

    pub error: Option<RunError>,
}

impl ProvisioningRun {
    pub fn new(environment: Environment, provider: Provider, action: Action) -> Self {
        Self {
            environment,
            provider,
            action,
            state: RunState::Init,
            started_at: Utc::now(),
            finished_at: None,
            plan_artifact: None,
            outputs: None,
            kube_context: None,
            manifest_groups: Vec::new(),
            urls: Vec::new(),
            warnings: Vec::new(),
            error: None,
        }
    }

    pub fn transition(&mut self, next: RunState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(OrchestratorError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::debug!(from = %self.state, to = %next, "Run state transition");
        self.state = next;
        Ok(())
    }

    /// Move to `Failed` and record the error
    pub fn fail(&mut self, err: &OrchestratorError) {
        if let Err(invalid) = self.transition(RunState::Failed) {
            tracing::error!(error = %invalid, "Could not mark run as failed");
            self.state = RunState::Failed;
        }
        self.error = Some(RunError::from(err));
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
            && matches!(
                self.state,
                RunState::Planned | RunState::Applied | RunState::Destroyed | RunState::Cancelled
            )
    }
}
