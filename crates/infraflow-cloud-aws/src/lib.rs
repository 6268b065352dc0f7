//! AWS provider for infraflow
//!
//! This crate implements the CloudProvider trait for AWS.
//!
//! # Features
//!
//! - State backend: S3 bucket (versioned, encrypted, no public access) plus a
//!   DynamoDB lock table keyed by `LockID`
//! - Caller identity check via `sts get-caller-identity`
//! - EKS kubeconfig setup via `eks update-kubeconfig`
//!
//! # Requirements
//!
//! - `aws` CLI must be installed and configured
//! - Authentication is managed through the usual AWS credential chain
//!
//! # Example
//!
//! ```ignore
//! use infraflow_cloud::{CloudProvider, ProviderSettings};
//! use infraflow_cloud_aws::AwsProvider;
//!
//! let provider = AwsProvider::new("platform", &ProviderSettings::default());
//!
//! let backend = provider.state_backend();
//! if !provider.backend_exists(&backend).await? {
//!     // render provider.backend_template() and apply it
//! }
//! ```

pub mod aws;
pub mod error;
pub mod provider;

pub use aws::{AwsCli, CallerIdentity};
pub use error::{AwsError, Result};
pub use provider::AwsProvider;
