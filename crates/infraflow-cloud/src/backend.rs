//! Remote state backend description

use crate::provider::Provider;
use serde::{Deserialize, Serialize};

/// Remote storage for provisioning state plus its lock mechanism.
///
/// One backend exists per provider and is shared by every environment of that
/// provider; environments are isolated from each other by workspaces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateBackend {
    pub provider: Provider,

    /// Bucket (aws, gcp) or storage account (azure) holding state objects
    pub storage_location_id: String,

    /// Lock table for providers whose object store does not lock natively
    pub lock_table_id: Option<String>,

    pub region: String,

    /// Whether the storage location was confirmed to exist
    pub exists: bool,
}

impl StateBackend {
    pub fn new(
        provider: Provider,
        storage_location_id: impl Into<String>,
        lock_table_id: Option<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            storage_location_id: storage_location_id.into(),
            lock_table_id,
            region: region.into(),
            exists: false,
        }
    }

    pub fn confirmed(mut self) -> Self {
        self.exists = true;
        self
    }

    /// Default storage name: `{project}-terraform-state-{provider}`
    pub fn default_storage_name(project: &str, provider: Provider) -> String {
        format!("{}-terraform-state-{}", project, provider)
    }

    /// Default lock table name: `{project}-terraform-locks`
    pub fn default_lock_table(project: &str) -> String {
        format!("{}-terraform-locks", project)
    }
}

impl std::fmt::Display for StateBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.storage_location_id, self.region)?;
        if let Some(lock) = &self.lock_table_id {
            write!(f, ", lock table {}", lock)?;
        }
        Ok(())
    }
}
