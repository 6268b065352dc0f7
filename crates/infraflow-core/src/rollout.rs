//! Ordered manifest rollout
//!
//! Groups are applied strictly one after another. A failed group stops the
//! rollout; groups already applied stay applied. A group directory without
//! any manifest file is skipped and counts as applied.

use crate::error::{OrchestratorError, Result};
use infraflow_cloud::ClusterClient;
use infraflow_config::ProjectLayout;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestStage {
    Namespaces,
    Storage,
    Configmaps,
    Secrets,
    Deployments,
    Services,
    Ingress,
    Monitoring,
}

impl ManifestStage {
    /// Rollout order
    pub const ALL: [ManifestStage; 8] = [
        ManifestStage::Namespaces,
        ManifestStage::Storage,
        ManifestStage::Configmaps,
        ManifestStage::Secrets,
        ManifestStage::Deployments,
        ManifestStage::Services,
        ManifestStage::Ingress,
        ManifestStage::Monitoring,
    ];

    /// Subdirectory of the manifests directory
    pub fn dir_name(&self) -> &'static str {
        match self {
            ManifestStage::Namespaces => "namespaces",
            ManifestStage::Storage => "storage",
            ManifestStage::Configmaps => "configmaps",
            ManifestStage::Secrets => "secrets",
            ManifestStage::Deployments => "deployments",
            ManifestStage::Services => "services",
            ManifestStage::Ingress => "ingress",
            ManifestStage::Monitoring => "monitoring",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ManifestStage::Namespaces => "namespaces",
            ManifestStage::Storage => "storage",
            ManifestStage::Configmaps => "configuration",
            ManifestStage::Secrets => "secrets",
            ManifestStage::Deployments => "workloads",
            ManifestStage::Services => "network services",
            ManifestStage::Ingress => "ingress",
            ManifestStage::Monitoring => "monitoring",
        }
    }
}

impl std::fmt::Display for ManifestStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestGroup {
    pub stage_index: usize,
    pub stage: ManifestStage,
    pub source_path: PathBuf,
    pub applied: bool,
}

pub struct ManifestRolloutSequencer<'a> {
    client: &'a dyn ClusterClient,
    layout: &'a ProjectLayout,
}

impl<'a> ManifestRolloutSequencer<'a> {
    pub fn new(client: &'a dyn ClusterClient, layout: &'a ProjectLayout) -> Self {
        Self { client, layout }
    }

    /// All groups in rollout order, none applied
    pub fn groups(&self) -> Vec<ManifestGroup> {
        ManifestStage::ALL
            .iter()
            .enumerate()
            .map(|(stage_index, stage)| ManifestGroup {
                stage_index,
                stage: *stage,
                source_path: self.layout.manifest_dir(stage.dir_name()),
                applied: false,
            })
            .collect()
    }

    /// Apply `groups` in order, marking each one applied as it succeeds
    pub async fn apply(&self, groups: &mut [ManifestGroup]) -> Result<()> {
        for group in groups.iter_mut() {
            if !group.source_path.is_dir() {
                return Err(OrchestratorError::ManifestApplyFailure {
                    stage: group.stage,
                    diagnostic: format!(
                        "manifest directory not found: {}",
                        group.source_path.display()
                    ),
                });
            }

            let has_manifests = contains_manifests(&group.source_path).map_err(|e| {
                OrchestratorError::ManifestApplyFailure {
                    stage: group.stage,
                    diagnostic: format!("reading {}: {}", group.source_path.display(), e),
                }
            })?;
            if !has_manifests {
                tracing::info!(stage = %group.stage, "No manifests, skipping");
                group.applied = true;
                continue;
            }

            tracing::info!(
                stage = %group.stage,
                index = group.stage_index,
                "Applying {} manifests",
                group.stage.description()
            );
            let summary = self
                .client
                .apply_dir(&group.source_path)
                .await
                .map_err(|e| OrchestratorError::ManifestApplyFailure {
                    stage: group.stage,
                    diagnostic: e.to_string(),
                })?;
            tracing::debug!(stage = %group.stage, "{}", summary.trim());
            group.applied = true;
        }
        Ok(())
    }
}

/// Extensions the cluster client picks up when applying a directory
const MANIFEST_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Whether `dir` holds at least one manifest file, searching subdirectories
fn contains_manifests(dir: &Path) -> std::io::Result<bool> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type()?.is_dir() {
            if contains_manifests(&path)? {
                return Ok(true);
            }
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext))
        {
            return Ok(true);
        }
    }
    Ok(false)
}
