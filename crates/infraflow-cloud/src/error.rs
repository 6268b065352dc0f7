//! Cloud provider and tool error types

use thiserror::Error;

/// Errors raised by provider CLIs, the provisioning engine and the cluster client
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Tool not found on PATH: {0}")]
    ToolNotFound(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("Invalid environment name: {0}")]
    InvalidEnvironment(String),

    #[error("Invalid action: {0}")]
    InvalidAction(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The tool exited unsuccessfully. Carries the tool's stderr verbatim.
    #[error("{0}")]
    CommandFailed(String),

    /// The engine could not acquire the state lock. Carries the engine's stderr verbatim.
    #[error("{0}")]
    LockError(String),

    #[error("Workspace does not exist: {0}")]
    WorkspaceNotFound(String),

    #[error("Required output missing: {0}")]
    MissingOutput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    /// Whether this error means another run holds the state lock
    pub fn is_lock_error(&self) -> bool {
        matches!(self, CloudError::LockError(_))
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
