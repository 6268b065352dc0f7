//! Lifecycle actions and plan artifacts

use crate::error::{CloudError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Lifecycle action requested for a provisioning run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Compute the difference between current and desired state
    #[default]
    Plan,
    /// Plan, then mutate real infrastructure and roll out manifests
    Apply,
    /// Remove everything tracked by the workspace
    Destroy,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Plan => write!(f, "plan"),
            Action::Apply => write!(f, "apply"),
            Action::Destroy => write!(f, "destroy"),
        }
    }
}

impl FromStr for Action {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "plan" => Ok(Action::Plan),
            "apply" => Ok(Action::Apply),
            "destroy" => Ok(Action::Destroy),
            other => Err(CloudError::InvalidAction(format!(
                "{} (expected one of: plan, apply, destroy)",
                other
            ))),
        }
    }
}

/// A saved plan produced by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanArtifact {
    /// Location of the saved plan file
    pub path: PathBuf,

    /// Whether the plan contains any changes
    pub has_changes: bool,
}

impl PlanArtifact {
    pub fn new(path: impl Into<PathBuf>, has_changes: bool) -> Self {
        Self {
            path: path.into(),
            has_changes,
        }
    }
}

impl std::fmt::Display for PlanArtifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let summary = if self.has_changes {
            "changes pending"
        } else {
            "no changes"
        };
        write!(f, "{} ({})", self.path.display(), summary)
    }
}
