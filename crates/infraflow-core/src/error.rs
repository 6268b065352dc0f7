use crate::rollout::ManifestStage;
use crate::run::RunState;
use infraflow_cloud::CloudError;
use std::path::PathBuf;
use thiserror::Error;

/// Every way a provisioning run can stop short
///
/// Variants carrying a `String` hold the underlying tool's diagnostic verbatim.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("required tool not found on PATH: {0}")]
    MissingPrerequisite(String),

    #[error(
        "variable file not found: {}\ncopy {} to it and fill in the values",
        var_file.display(),
        example.display()
    )]
    MissingConfig { var_file: PathBuf, example: PathBuf },

    #[error("{0}")]
    ValidationError(String),

    #[error("{0}")]
    BackendBootstrapFailure(String),

    #[error("another run holds the state lock\n{0}")]
    ConcurrentRunDetected(String),

    #[error("{0}")]
    WorkspaceFailure(String),

    #[error("{0}")]
    PlanFailure(String),

    #[error("{0}")]
    ApplyFailure(String),

    #[error("{0}")]
    DestroyFailure(String),

    #[error("destroy was not confirmed")]
    DestroyAborted,

    #[error("{0}")]
    KubeconfigFailure(String),

    #[error("manifest group '{stage}' failed\n{diagnostic}")]
    ManifestApplyFailure {
        stage: ManifestStage,
        diagnostic: String,
    },

    #[error("invalid run state transition: {from} -> {to}")]
    InvalidTransition { from: RunState, to: RunState },

    #[error("run snapshot: {0}")]
    Snapshot(String),
}

impl OrchestratorError {
    /// Category name reported alongside the diagnostic
    pub fn category(&self) -> &'static str {
        match self {
            OrchestratorError::MissingPrerequisite(_) => "MissingPrerequisite",
            OrchestratorError::MissingConfig { .. } => "MissingConfig",
            OrchestratorError::ValidationError(_) => "ValidationError",
            OrchestratorError::BackendBootstrapFailure(_) => "BackendBootstrapFailure",
            OrchestratorError::ConcurrentRunDetected(_) => "ConcurrentRunDetected",
            OrchestratorError::WorkspaceFailure(_) => "WorkspaceFailure",
            OrchestratorError::PlanFailure(_) => "PlanFailure",
            OrchestratorError::ApplyFailure(_) => "ApplyFailure",
            OrchestratorError::DestroyFailure(_) => "DestroyFailure",
            OrchestratorError::DestroyAborted => "DestroyAborted",
            OrchestratorError::KubeconfigFailure(_) => "KubeconfigFailure",
            OrchestratorError::ManifestApplyFailure { .. } => "ManifestApplyFailure",
            OrchestratorError::InvalidTransition { .. } => "InvalidTransition",
            OrchestratorError::Snapshot(_) => "Snapshot",
        }
    }

    /// Whether the error aborts the run. Non-fatal errors become warnings or a
    /// cancelled run.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            OrchestratorError::DestroyAborted | OrchestratorError::KubeconfigFailure(_)
        )
    }

    /// Map an engine error, turning a state-lock failure into
    /// [`OrchestratorError::ConcurrentRunDetected`] and anything else into
    /// `wrap(diagnostic)`
    pub fn from_engine(err: CloudError, wrap: impl FnOnce(String) -> Self) -> Self {
        match err {
            CloudError::LockError(diagnostic) => OrchestratorError::ConcurrentRunDetected(diagnostic),
            other => wrap(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_error_becomes_concurrent_run() {
        let err = OrchestratorError::from_engine(
            CloudError::LockError("Error acquiring the state lock".to_string()),
            OrchestratorError::PlanFailure,
        );
        assert_eq!(err.category(), "ConcurrentRunDetected");
        assert!(err.is_fatal());
    }

    #[test]
    fn test_engine_diagnostic_is_verbatim() {
        let err = OrchestratorError::from_engine(
            CloudError::CommandFailed("Error: Invalid reference\n  on main.tf line 12".to_string()),
            OrchestratorError::ApplyFailure,
        );
        assert_eq!(err.category(), "ApplyFailure");
        assert_eq!(err.to_string(), "Error: Invalid reference\n  on main.tf line 12");
    }

    #[test]
    fn test_non_fatal_categories() {
        assert!(!OrchestratorError::DestroyAborted.is_fatal());
        assert!(!OrchestratorError::KubeconfigFailure("no cluster".to_string()).is_fatal());
        assert!(OrchestratorError::MissingPrerequisite("helm".to_string()).is_fatal());
    }

    #[test]
    fn test_missing_config_names_example() {
        let err = OrchestratorError::MissingConfig {
            var_file: PathBuf::from("terraform/aws/environments/staging.tfvars"),
            example: PathBuf::from("terraform/aws/terraform.tfvars.example"),
        };
        let message = err.to_string();
        assert!(message.contains("terraform/aws/environments/staging.tfvars"));
        assert!(message.contains("copy terraform/aws/terraform.tfvars.example"));
    }
}
