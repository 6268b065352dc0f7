//! Process adapters for the provisioning engine and the cluster client
//!
//! - [`Terraform`] implements [`infraflow_cloud::Engine`] on top of the
//!   `terraform` CLI (any compatible binary can be substituted)
//! - [`Kubectl`] implements [`infraflow_cloud::ClusterClient`]
//! - [`WhichProbe`] implements [`infraflow_cloud::ToolProbe`]
//!
//! The provider crates reuse [`command`] to drive their own CLIs.

pub mod command;
pub mod kubectl;
pub mod terraform;

pub use command::{ToolOutput, WhichProbe, run_checked, run_tool};
pub use kubectl::Kubectl;
pub use terraform::Terraform;
