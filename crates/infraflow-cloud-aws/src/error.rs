//! AWS provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("aws CLI not found. Please install: https://aws.amazon.com/cli/")]
    AwsCliNotFound,

    #[error("aws authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Carries the CLI's stderr verbatim
    #[error("{0}")]
    CommandFailed(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Cloud error: {0}")]
    CloudError(#[from] infraflow_cloud::CloudError),
}

impl From<AwsError> for infraflow_cloud::CloudError {
    fn from(err: AwsError) -> Self {
        match err {
            AwsError::AwsCliNotFound => infraflow_cloud::CloudError::ToolNotFound("aws".to_string()),
            AwsError::AuthenticationFailed(msg) => {
                infraflow_cloud::CloudError::AuthenticationFailed(msg)
            }
            AwsError::CommandFailed(msg) => infraflow_cloud::CloudError::CommandFailed(msg),
            AwsError::JsonError(e) => infraflow_cloud::CloudError::Json(e),
            AwsError::CloudError(e) => e,
        }
    }
}

pub type Result<T> = std::result::Result<T, AwsError>;
