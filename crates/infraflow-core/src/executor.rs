//! Provisioning run executor
//!
//! Drives one run through every stage in order. The first fatal error ends the
//! run; nothing is retried and nothing is rolled back.

use crate::bootstrap::BackendBootstrapper;
use crate::confirm::{Confirmation, is_confirmed};
use crate::error::{OrchestratorError, Result};
use crate::kubeconfig::KubeconfigConfigurer;
use crate::prerequisites::PrerequisiteChecker;
use crate::rollout::ManifestRolloutSequencer;
use crate::run::{ProvisioningRun, RunState};
use crate::snapshot::SnapshotStore;
use crate::urls::derive_urls;
use crate::validator::ConfigValidator;
use crate::workspace::WorkspaceManager;
use infraflow_cloud::{
    Action, CloudProvider, ClusterClient, Engine, Environment, ToolProbe, Workspace,
};
use infraflow_config::{InfraflowConfig, ProjectLayout};
use std::path::Path;
use tracing::{info, warn};

/// What to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub environment: Environment,
    pub action: Action,
}

/// External tools a run drives
pub struct Capabilities<'a> {
    pub probe: &'a dyn ToolProbe,
    pub engine: &'a dyn Engine,
    pub provider: &'a dyn CloudProvider,
    pub cluster: &'a dyn ClusterClient,
    pub confirmation: &'a dyn Confirmation,
}

/// Result of a run: the final record plus the fatal error, if any
#[derive(Debug)]
pub struct RunOutcome {
    pub run: ProvisioningRun,
    pub error: Option<OrchestratorError>,
}

impl RunOutcome {
    pub fn exit_code(&self) -> i32 {
        if self.error.is_some() { 1 } else { 0 }
    }

    pub fn is_cancelled(&self) -> bool {
        self.run.state == RunState::Cancelled
    }
}

pub struct Orchestrator<'a> {
    config: &'a InfraflowConfig,
    layout: &'a ProjectLayout,
    caps: Capabilities<'a>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a InfraflowConfig, layout: &'a ProjectLayout, caps: Capabilities<'a>) -> Self {
        Self {
            config,
            layout,
            caps,
        }
    }

    /// Run every stage for `request`, then write the run snapshot
    pub async fn run(&self, request: RunRequest) -> RunOutcome {
        let provider = self.caps.provider.provider();
        let mut run = ProvisioningRun::new(request.environment.clone(), provider, request.action);
        info!(
            environment = %request.environment,
            provider = %provider,
            action = %request.action,
            "Starting provisioning run"
        );

        let error = match self.execute(&mut run).await {
            Ok(()) => None,
            Err(err) => {
                tracing::error!(category = err.category(), "{}", err);
                run.fail(&err);
                Some(err)
            }
        };
        run.finish();

        let store = SnapshotStore::new(self.layout.snapshot_path(provider, &run.environment));
        if let Err(e) = store.save(&run).await {
            warn!(error = %e, "Could not write run snapshot");
        }

        RunOutcome { run, error }
    }

    async fn execute(&self, run: &mut ProvisioningRun) -> Result<()> {
        let provider = run.provider;

        PrerequisiteChecker::new(
            self.caps.probe,
            self.caps.engine.binary(),
            provider,
            self.caps.cluster.binary(),
        )
        .check()
        .await?;
        run.transition(RunState::PrereqChecked)?;

        // local check, before any network call
        let validator = ConfigValidator::new(self.caps.engine, self.layout);
        let var_file = validator.require_var_file(provider, &run.environment)?;

        let bootstrapper = BackendBootstrapper::new(
            self.caps.provider,
            self.caps.engine,
            self.layout,
            &self.config.project,
        );
        let (backend, _) = bootstrapper.ensure().await?;
        bootstrapper.initialise(&backend).await?;
        run.transition(RunState::BackendReady)?;

        validator.validate(provider).await?;
        run.transition(RunState::Validated)?;

        let workspace = Workspace::new(run.environment.clone(), provider);
        WorkspaceManager::new(self.caps.engine, self.layout)
            .select_or_create(&workspace)
            .await?;
        run.transition(RunState::WorkspaceSelected)?;

        match run.action {
            Action::Plan => self.plan(run, &var_file).await,
            Action::Apply => self.apply(run, &var_file).await,
            Action::Destroy => self.destroy(run, &var_file).await,
        }
    }

    async fn plan(&self, run: &mut ProvisioningRun, var_file: &Path) -> Result<()> {
        self.write_plan(run, var_file).await?;
        run.transition(RunState::Planned)
    }

    async fn write_plan(&self, run: &mut ProvisioningRun, var_file: &Path) -> Result<()> {
        let dir = self.layout.provider_dir(run.provider);
        let out = self.layout.plan_file(run.provider, &run.environment);

        let artifact = self
            .caps
            .engine
            .plan(&dir, Some(var_file), &out)
            .await
            .map_err(|e| OrchestratorError::from_engine(e, OrchestratorError::PlanFailure))?;

        if artifact.has_changes {
            info!(plan = %artifact.path.display(), "Plan has pending changes");
        } else {
            info!(plan = %artifact.path.display(), "No changes. Infrastructure is up to date");
        }
        run.plan_artifact = Some(artifact);
        Ok(())
    }

    async fn apply(&self, run: &mut ProvisioningRun, var_file: &Path) -> Result<()> {
        let dir = self.layout.provider_dir(run.provider);
        self.write_plan(run, var_file).await?;

        let plan = self.layout.plan_file(run.provider, &run.environment);
        self.caps
            .engine
            .apply(&dir, &plan)
            .await
            .map_err(|e| OrchestratorError::from_engine(e, OrchestratorError::ApplyFailure))?;

        let outputs = self
            .caps
            .engine
            .outputs(&dir)
            .await
            .map_err(|e| OrchestratorError::from_engine(e, OrchestratorError::ApplyFailure))?;
        run.outputs = Some(outputs);
        run.transition(RunState::Applied)?;
        info!("Infrastructure applied");

        self.continue_rollout(run).await
    }

    /// Cluster configuration and manifest rollout after a successful apply
    async fn continue_rollout(&self, run: &mut ProvisioningRun) -> Result<()> {
        let outputs = run.outputs.clone().unwrap_or_default();

        match KubeconfigConfigurer::new(self.caps.provider, self.caps.cluster)
            .configure(&outputs)
            .await
        {
            Ok(context) => run.kube_context = Some(context),
            Err(err) => {
                run.warn(format!("{}: {}", err.category(), err));
                run.warn("Manifest rollout skipped: cluster client is not configured");
                return Ok(());
            }
        }

        let sequencer = ManifestRolloutSequencer::new(self.caps.cluster, self.layout);
        let mut groups = sequencer.groups();
        let result = sequencer.apply(&mut groups).await;
        run.manifest_groups = groups;
        result?;
        info!("All manifest groups applied");

        match derive_urls(&outputs, &self.config.endpoints) {
            Some(urls) => run.urls = urls,
            None => run.warn("domain_name output missing, no URLs to list"),
        }
        Ok(())
    }

    async fn destroy(&self, run: &mut ProvisioningRun, var_file: &Path) -> Result<()> {
        let prompt = format!(
            "This destroys every {} resource in workspace '{}'. Type '{}' to continue: ",
            run.provider,
            run.environment,
            crate::confirm::DESTROY_CONFIRMATION_TOKEN
        );
        let answer = self.caps.confirmation.ask(&prompt).await;
        if !is_confirmed(answer.as_deref()) {
            info!(
                environment = %run.environment,
                "{}, nothing was changed",
                OrchestratorError::DestroyAborted
            );
            return run.transition(RunState::Cancelled);
        }

        let dir = self.layout.provider_dir(run.provider);
        self.caps
            .engine
            .destroy(&dir, Some(var_file))
            .await
            .map_err(|e| OrchestratorError::from_engine(e, OrchestratorError::DestroyFailure))?;
        info!(environment = %run.environment, "Infrastructure destroyed");
        run.transition(RunState::Destroyed)
    }
}
