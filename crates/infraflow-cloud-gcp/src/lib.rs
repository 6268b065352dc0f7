//! Google Cloud provider for infraflow
//!
//! This crate implements the CloudProvider trait for Google Cloud.
//!
//! # Features
//!
//! - State backend: GCS bucket (versioned, uniform access, public access
//!   prevention enforced); GCS locks state natively
//! - Credential check via `gcloud auth list`
//! - GKE kubeconfig setup via `gcloud container clusters get-credentials`
//!
//! # Requirements
//!
//! - `gcloud` CLI must be installed and logged in (`gcloud auth login`)

pub mod error;
pub mod gcloud;
pub mod provider;

pub use error::{GcpError, Result};
pub use gcloud::{AccountInfo, Gcloud};
pub use provider::GcpProvider;
