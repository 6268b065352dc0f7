//! Azure provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AzureError {
    #[error("az CLI not found. Please install the Azure CLI: https://learn.microsoft.com/cli/azure/install-azure-cli")]
    AzCliNotFound,

    #[error("Azure authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("{0}")]
    CommandFailed(String),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Cloud error: {0}")]
    CloudError(#[from] infraflow_cloud::CloudError),
}

impl From<AzureError> for infraflow_cloud::CloudError {
    fn from(err: AzureError) -> Self {
        use infraflow_cloud::CloudError;
        match err {
            AzureError::AzCliNotFound => CloudError::ToolNotFound("az".to_string()),
            AzureError::AuthenticationFailed(msg) => CloudError::AuthenticationFailed(msg),
            AzureError::CommandFailed(msg) => CloudError::CommandFailed(msg),
            AzureError::JsonError(e) => CloudError::Json(e),
            AzureError::CloudError(e) => e,
        }
    }
}

pub type Result<T> = std::result::Result<T, AzureError>;
