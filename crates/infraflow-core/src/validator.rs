//! Variable file presence and engine validation

use crate::error::{OrchestratorError, Result};
use infraflow_cloud::{Engine, Environment, Provider};
use infraflow_config::ProjectLayout;
use std::path::PathBuf;

pub struct ConfigValidator<'a> {
    engine: &'a dyn Engine,
    layout: &'a ProjectLayout,
}

impl<'a> ConfigValidator<'a> {
    pub fn new(engine: &'a dyn Engine, layout: &'a ProjectLayout) -> Self {
        Self { engine, layout }
    }

    /// Local check only; never copies the example file into place
    pub fn require_var_file(&self, provider: Provider, environment: &Environment) -> Result<PathBuf> {
        let var_file = self.layout.var_file(provider, environment);
        if !var_file.is_file() {
            return Err(OrchestratorError::MissingConfig {
                var_file,
                example: self.layout.example_file(provider),
            });
        }
        tracing::debug!(var_file = %var_file.display(), "Variable file present");
        Ok(var_file)
    }

    /// Static validation of the provider's module directory
    pub async fn validate(&self, provider: Provider) -> Result<()> {
        let dir = self.layout.provider_dir(provider);
        self.engine
            .validate(&dir)
            .await
            .map_err(|e| OrchestratorError::from_engine(e, OrchestratorError::ValidationError))?;
        tracing::info!(dir = %dir.display(), "Configuration valid");
        Ok(())
    }
}
