//! Google Cloud provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GcpError {
    #[error("gcloud not found. Please install the Google Cloud SDK: https://cloud.google.com/sdk")]
    GcloudNotFound,

    #[error("gcloud authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Carries the CLI's stderr verbatim
    #[error("{0}")]
    CommandFailed(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Cloud error: {0}")]
    CloudError(#[from] infraflow_cloud::CloudError),
}

impl From<GcpError> for infraflow_cloud::CloudError {
    fn from(err: GcpError) -> Self {
        match err {
            GcpError::GcloudNotFound => {
                infraflow_cloud::CloudError::ToolNotFound("gcloud".to_string())
            }
            GcpError::AuthenticationFailed(msg) => {
                infraflow_cloud::CloudError::AuthenticationFailed(msg)
            }
            GcpError::CommandFailed(msg) => infraflow_cloud::CloudError::CommandFailed(msg),
            GcpError::JsonError(e) => infraflow_cloud::CloudError::Json(e),
            GcpError::CloudError(e) => e,
        }
    }
}

pub type Result<T> = std::result::Result<T, GcpError>;
