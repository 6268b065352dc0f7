//! Microsoft Azure provider for infraflow
//!
//! This crate implements the CloudProvider trait for Azure.
//!
//! # Features
//!
//! - State backend: resource group, storage account (versioned blobs, no
//!   public nested items, TLS 1.2) and a private `tfstate` container; blob
//!   leases lock state natively
//! - Signed-in account check via `az account show`
//! - AKS kubeconfig setup via `az aks get-credentials`
//!
//! # Requirements
//!
//! - `az` CLI must be installed and logged in (`az login`)

pub mod az;
pub mod error;
pub mod provider;

pub use az::{AccountInfo, Az};
pub use error::{AzureError, Result};
pub use provider::{AzureProvider, STATE_CONTAINER};
