//! Environments and the state workspaces that isolate them

use crate::error::{CloudError, Result};
use crate::provider::Provider;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Deployment environment name (production, staging, development, ...)
///
/// Used verbatim as the workspace name and in file names, so it is restricted
/// to lowercase ASCII letters, digits and `-`, starting with a letter or digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Environment(String);

impl Environment {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let mut chars = name.chars();
        let valid_start = chars
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        let valid_rest = chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

        if valid_start && valid_rest {
            Ok(Self(name))
        } else {
            Err(CloudError::InvalidEnvironment(format!(
                "'{}' (use lowercase letters, digits and '-')",
                name
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self("production".to_string())
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Environment {
    type Err = CloudError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for Environment {
    type Error = CloudError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Environment> for String {
    fn from(env: Environment) -> Self {
        env.0
    }
}

/// An isolated slice of state inside the provider's shared backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub environment: Environment,
    pub provider: Provider,
    pub state_key: String,
}

impl Workspace {
    pub fn new(environment: Environment, provider: Provider) -> Self {
        let state_key = format!("{}/{}/state", provider, environment);
        Self {
            environment,
            provider,
            state_key,
        }
    }

    /// Engine workspace name; one workspace per environment
    pub fn name(&self) -> &str {
        self.environment.as_str()
    }
}
