//! infraflow cloud abstractions
//!
//! This crate holds the vocabulary shared by every infraflow crate: the
//! supported providers, environments and their workspaces, the state backend,
//! typed provisioning outputs, and the capability traits behind which every
//! external tool is driven.
//!
//! # Supported Providers
//!
//! - **AWS**: S3 state bucket + DynamoDB lock table, EKS (via `aws` CLI)
//! - **GCP**: GCS state bucket, GKE (via `gcloud` CLI)
//! - **Azure**: Storage account state container, AKS (via `az` CLI)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 infraflow CLI                    │
//! │        infraflow <env> <provider> <action>       │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                infraflow-core                    │
//! │   prerequisites → backend → validate → workspace │
//! │   → plan/apply/destroy → kubeconfig → rollout    │
//! └───────┬──────────────────┬──────────────────────┘
//!         │ CloudProvider    │ Engine / ClusterClient
//! ┌───────▼────────┐ ┌───────▼──────────┐
//! │ aws/gcp/azure  │ │ terraform/kubectl │
//! └────────────────┘ └──────────────────┘
//! ```

pub mod action;
pub mod backend;
pub mod engine;
pub mod error;
pub mod outputs;
pub mod provider;
pub mod workspace;

// Re-exports
pub use action::{Action, PlanArtifact};
pub use backend::StateBackend;
pub use engine::{ClusterClient, Engine, ToolProbe};
pub use error::{CloudError, Result};
pub use outputs::{OutputValue, ProvisioningOutputs};
pub use provider::{AuthStatus, CloudProvider, ClusterCoordinates, Provider, ProviderSettings};
pub use workspace::{Environment, Workspace};
