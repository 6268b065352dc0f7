//! infraflow orchestrator
//!
//! One run walks these stages, stopping at the first fatal error:
//!
//! ```text
//! PrerequisiteChecker      engine, provider CLI, kubectl, helm on PATH
//! ConfigValidator          variable file present (local, before any network call)
//! BackendBootstrapper      provider auth, state backend created on first use,
//!                          engine initialised against it
//! ConfigValidator          engine validation
//! WorkspaceManager         select or create the environment's workspace
//! Orchestrator             plan | apply | destroy (destroy needs confirmation)
//! KubeconfigConfigurer     apply only; failure is a warning
//! ManifestRolloutSequencer apply only; eight groups in fixed order
//! ```
//!
//! Every external process is reached through the capability traits in
//! `infraflow-cloud` plus [`Confirmation`], so runs can be exercised with fakes.

pub mod bootstrap;
pub mod confirm;
pub mod error;
pub mod executor;
pub mod kubeconfig;
pub mod prerequisites;
pub mod rollout;
pub mod run;
pub mod snapshot;
pub mod urls;
pub mod validator;
pub mod workspace;

pub use bootstrap::{BackendBootstrapper, BootstrapOutcome, render_definition};
pub use confirm::{Confirmation, DESTROY_CONFIRMATION_TOKEN, is_confirmed};
pub use error::{OrchestratorError, Result};
pub use executor::{Capabilities, Orchestrator, RunOutcome, RunRequest};
pub use kubeconfig::KubeconfigConfigurer;
pub use prerequisites::{PACKAGE_MANAGER, PrerequisiteChecker};
pub use rollout::{ManifestGroup, ManifestRolloutSequencer, ManifestStage};
pub use run::{ProvisioningRun, RunError, RunState};
pub use snapshot::{RunSnapshot, SnapshotStore};
pub use urls::{DerivedUrl, derive_urls};
pub use validator::ConfigValidator;
pub use workspace::{WorkspaceManager, WorkspaceOutcome};
