//! Remote state backend bootstrap
//!
//! The backend a provider's modules store their state in has to exist before
//! the engine can be initialised against it. On first use the bootstrapper
//! renders a minimal definition of the backend from the provider's template and
//! applies it with local state; afterwards it only confirms the backend exists.

use crate::error::{OrchestratorError, Result};
use infraflow_cloud::{CloudProvider, Engine, StateBackend};
use infraflow_config::ProjectLayout;
use std::path::Path;
use tera::{Context, Tera};
use tracing::{debug, info};

const DEFINITION_FILE: &str = "main.tf";
const PLAN_FILE: &str = "backend.tfplan";

/// Whether the last [`BackendBootstrapper::ensure`] created the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    AlreadyPresent,
    Created,
}

pub struct BackendBootstrapper<'a> {
    provider: &'a dyn CloudProvider,
    engine: &'a dyn Engine,
    layout: &'a ProjectLayout,
    project: &'a str,
}

impl<'a> BackendBootstrapper<'a> {
    pub fn new(
        provider: &'a dyn CloudProvider,
        engine: &'a dyn Engine,
        layout: &'a ProjectLayout,
        project: &'a str,
    ) -> Self {
        Self {
            provider,
            engine,
            layout,
            project,
        }
    }

    /// Make sure the backend exists, creating it on first use
    #[tracing::instrument(skip(self), fields(provider = %self.provider.provider()))]
    pub async fn ensure(&self) -> Result<(StateBackend, BootstrapOutcome)> {
        self.check_auth().await?;

        let backend = self.provider.state_backend();
        let exists = self
            .provider
            .backend_exists(&backend)
            .await
            .map_err(|e| OrchestratorError::BackendBootstrapFailure(e.to_string()))?;

        if exists {
            info!(backend = %backend, "State backend already exists");
            return Ok((backend.confirmed(), BootstrapOutcome::AlreadyPresent));
        }

        info!(backend = %backend, "State backend not found, creating it");
        self.create(&backend).await?;
        info!(backend = %backend, "State backend created");
        Ok((backend.confirmed(), BootstrapOutcome::Created))
    }

    async fn check_auth(&self) -> Result<()> {
        let status = self
            .provider
            .check_auth()
            .await
            .map_err(|e| OrchestratorError::BackendBootstrapFailure(e.to_string()))?;

        if !status.authenticated {
            return Err(OrchestratorError::BackendBootstrapFailure(format!(
                "{} CLI is not authenticated: {}",
                self.provider.provider().cli_binary(),
                status.error.unwrap_or_default()
            )));
        }
        debug!(account = ?status.account_info, "Provider CLI authenticated");
        Ok(())
    }

    async fn create(&self, backend: &StateBackend) -> Result<()> {
        let dir = self.layout.bootstrap_dir(self.provider.provider());
        let definition = render_definition(self.provider, backend, self.project)?;
        write_definition(&dir, &definition).await?;

        let failure = |e: infraflow_cloud::CloudError| {
            OrchestratorError::BackendBootstrapFailure(e.to_string())
        };
        self.engine.init(&dir, &[]).await.map_err(failure)?;
        let plan = self
            .engine
            .plan(&dir, None, &dir.join(PLAN_FILE))
            .await
            .map_err(failure)?;
        self.engine.apply(&dir, &plan.path).await.map_err(failure)?;
        Ok(())
    }

    /// Initialise the provider's module directory against the backend
    pub async fn initialise(&self, backend: &StateBackend) -> Result<()> {
        let dir = self.layout.provider_dir(self.provider.provider());
        let config = self.provider.backend_config(backend);
        self.engine.init(&dir, &config).await.map_err(|e| {
            OrchestratorError::from_engine(e, OrchestratorError::BackendBootstrapFailure)
        })?;
        info!(dir = %dir.display(), "Engine initialised against remote state");
        Ok(())
    }
}

/// Render the provider's backend template
pub fn render_definition(
    provider: &dyn CloudProvider,
    backend: &StateBackend,
    project: &str,
) -> Result<String> {
    let mut context = Context::new();
    context.insert("project", project);
    context.insert("provider", provider.provider().as_str());
    context.insert("region", &backend.region);
    context.insert("storage", &backend.storage_location_id);
    context.insert(
        "lock_table",
        backend.lock_table_id.as_deref().unwrap_or_default(),
    );
    for (key, value) in provider.template_variables() {
        context.insert(key, &value);
    }

    Tera::one_off(provider.backend_template(), &context, false).map_err(|e| {
        OrchestratorError::BackendBootstrapFailure(format!("backend template: {}", e))
    })
}

async fn write_definition(dir: &Path, definition: &str) -> Result<()> {
    let io_failure = |e: std::io::Error| {
        OrchestratorError::BackendBootstrapFailure(format!("{}: {}", dir.display(), e))
    };
    tokio::fs::create_dir_all(dir).await.map_err(io_failure)?;
    tokio::fs::write(dir.join(DEFINITION_FILE), definition)
        .await
        .map_err(io_failure)?;
    debug!(dir = %dir.display(), "Wrote backend definition");
    Ok(())
}
