//! Run snapshot files
//!
//! The last run per (provider, environment) is kept at
//! `.infraflow/runs/{provider}-{environment}.json`, the one before it at
//! `.json.backup`.

use crate::error::{OrchestratorError, Result};
use crate::run::ProvisioningRun;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSnapshot {
    /// Snapshot format version
    pub version: u32,

    pub saved_at: DateTime<Utc>,

    pub run: ProvisioningRun,
}

pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self) -> PathBuf {
        let mut backup = self.path.clone().into_os_string();
        backup.push(".backup");
        PathBuf::from(backup)
    }

    /// Load the last snapshot, if any
    pub async fn load(&self) -> Result<Option<RunSnapshot>> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "No run snapshot");
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).await.map_err(io_error)?;
        let snapshot: RunSnapshot = serde_json::from_str(&content)
            .map_err(|e| OrchestratorError::Snapshot(e.to_string()))?;

        if snapshot.version > SNAPSHOT_VERSION {
            return Err(OrchestratorError::Snapshot(format!(
                "snapshot version {} is newer than supported version {}",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }

        Ok(Some(snapshot))
    }

    /// Write `run`, moving the previous snapshot to the backup file
    pub async fn save(&self, run: &ProvisioningRun) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await.map_err(io_error)?;
        }

        if self.path.exists() {
            let backup = self.backup_path();
            if backup.exists() {
                fs::remove_file(&backup).await.map_err(io_error)?;
            }
            fs::rename(&self.path, &backup).await.map_err(io_error)?;
        }

        let snapshot = RunSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            run: run.clone(),
        };
        let content = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| OrchestratorError::Snapshot(e.to_string()))?;
        fs::write(&self.path, content).await.map_err(io_error)?;

        tracing::debug!(path = %self.path.display(), state = %run.state, "Saved run snapshot");
        Ok(())
    }
}

fn io_error(e: std::io::Error) -> OrchestratorError {
    OrchestratorError::Snapshot(e.to_string())
}
