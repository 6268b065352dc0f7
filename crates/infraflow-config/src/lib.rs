//! Project discovery and configuration for infraflow
//!
//! A project is a directory holding `infraflow.yaml` (optional), the
//! per-provider module directories under `terraform/` and the manifest groups
//! under `k8s/`.

pub mod config;
pub mod error;
pub mod layout;

pub use config::{Endpoint, InfraflowConfig, ProvidersConfig, default_endpoints};
pub use error::*;
pub use layout::ProjectLayout;

use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const CONFIG_FILE_NAME: &str = "infraflow.yaml";

pub const PROJECT_ROOT_ENV: &str = "INFRAFLOW_PROJECT_ROOT";
pub const CONFIG_PATH_ENV: &str = "INFRAFLOW_CONFIG_PATH";

/// Locate the project root
///
/// Priority:
/// 1. `explicit` (the `--project-root` flag)
/// 2. `INFRAFLOW_PROJECT_ROOT`
/// 3. the nearest ancestor of the current directory holding `infraflow.yaml`
/// 4. the current directory
#[tracing::instrument]
pub fn find_project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return existing_dir(root.to_path_buf());
    }

    if let Ok(root) = std::env::var(PROJECT_ROOT_ENV) {
        debug!(env_root = %root, "Using INFRAFLOW_PROJECT_ROOT");
        return existing_dir(PathBuf::from(root));
    }

    let start_dir = std::env::current_dir()?;
    let mut current = start_dir.clone();
    loop {
        if current.join(CONFIG_FILE_NAME).is_file() {
            info!(project_root = %current.display(), "Found project root");
            return Ok(current);
        }
        if !current.pop() {
            break;
        }
    }

    debug!(start_dir = %start_dir.display(), "No infraflow.yaml found, using current directory");
    Ok(start_dir)
}

/// The engine runs with `-chdir`, so the root must not stay relative to the
/// caller's working directory
fn existing_dir(path: PathBuf) -> Result<PathBuf> {
    if path.is_dir() {
        Ok(path.canonicalize()?)
    } else {
        Err(ConfigError::ProjectRootNotFound(path))
    }
}

/// Locate the configuration file, if any
///
/// `explicit` (the `--config` flag) and `INFRAFLOW_CONFIG_PATH` must point at
/// an existing file; otherwise `infraflow.yaml` in the project root is used
/// when present.
#[tracing::instrument(skip(project_root), fields(project_root = %project_root.display()))]
pub fn find_config_file(project_root: &Path, explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    let requested = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from),
    };

    if let Some(path) = requested {
        let path = if path.is_relative() {
            project_root.join(path)
        } else {
            path
        };
        return if path.is_file() {
            Ok(Some(path))
        } else {
            Err(ConfigError::ConfigFileNotFound(path))
        };
    }

    let default = project_root.join(CONFIG_FILE_NAME);
    Ok(default.is_file().then_some(default))
}

/// Load the project configuration, falling back to defaults when no file exists
#[tracing::instrument(skip(project_root), fields(project_root = %project_root.display()))]
pub fn load_config(project_root: &Path, explicit: Option<&Path>) -> Result<InfraflowConfig> {
    let mut config = match find_config_file(project_root, explicit)? {
        Some(path) => {
            debug!(file = %path.display(), "Loading configuration");
            let content = std::fs::read_to_string(&path)?;
            parse_config(&content, &path)?
        }
        None => InfraflowConfig::default(),
    };

    if config.project.trim().is_empty() {
        config.project = project_root
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("infraflow")
            .to_string();
    }

    validate(&config)?;
    Ok(config)
}

fn parse_config(content: &str, path: &Path) -> Result<InfraflowConfig> {
    // an empty file deserializes to null, which means "all defaults"
    if content.trim().is_empty() {
        return Ok(InfraflowConfig::default());
    }
    serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn validate(config: &InfraflowConfig) -> Result<()> {
    if config.engine.trim().is_empty() {
        return Err(ConfigError::Invalid("engine must not be empty".to_string()));
    }
    if let Some(endpoint) = config.endpoints.iter().find(|e| e.name.trim().is_empty()) {
        return Err(ConfigError::Invalid(format!(
            "endpoint with empty name (subdomain: {:?})",
            endpoint.subdomain
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    #[serial]
    fn test_find_project_root_walks_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        fs::write(root.join(CONFIG_FILE_NAME), "project: platform\n").unwrap();
        let nested = root.join("terraform/aws");
        fs::create_dir_all(&nested).unwrap();

        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&nested).unwrap();

        let found = temp_env::with_var_unset(PROJECT_ROOT_ENV, || find_project_root(None));

        std::env::set_current_dir(original_dir).unwrap();
        assert_eq!(found.unwrap(), root);
    }

    #[test]
    #[serial]
    fn test_find_project_root_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let found = temp_env::with_var(PROJECT_ROOT_ENV, Some(temp_dir.path()), || {
            find_project_root(None)
        });
        assert_eq!(found.unwrap(), temp_dir.path().canonicalize().unwrap());
    }

    #[test]
    #[serial]
    fn test_relative_project_root_is_made_absolute() {
        let temp_dir = tempfile::tempdir().unwrap();
        let base = temp_dir.path().canonicalize().unwrap();
        fs::create_dir(base.join("infra")).unwrap();

        let original_dir = std::env::current_dir().unwrap();
        std::env::set_current_dir(&base).unwrap();

        let explicit = find_project_root(Some(Path::new("infra")));
        let from_env =
            temp_env::with_var(PROJECT_ROOT_ENV, Some("./infra"), || find_project_root(None));

        std::env::set_current_dir(original_dir).unwrap();
        assert_eq!(explicit.unwrap(), base.join("infra"));
        assert_eq!(from_env.unwrap(), base.join("infra"));
    }

    #[test]
    #[serial]
    fn test_explicit_root_must_exist() {
        let err = find_project_root(Some(Path::new("/nonexistent/infraflow-project"))).unwrap_err();
        assert!(matches!(err, ConfigError::ProjectRootNotFound(_)));
    }

    #[test]
    #[serial]
    fn test_load_defaults_without_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let root = temp_dir.path().join("platform");
        fs::create_dir(&root).unwrap();

        let config = temp_env::with_var_unset(CONFIG_PATH_ENV, || load_config(&root, None)).unwrap();
        assert_eq!(config.project, "platform");
        assert_eq!(config.engine, "terraform");
        assert_eq!(config.endpoints, default_endpoints());
    }

    #[test]
    #[serial]
    fn test_load_from_project_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(
            temp_dir.path().join(CONFIG_FILE_NAME),
            "project: acme\nengine: tofu\nproviders:\n  aws:\n    region: eu-west-1\n",
        )
        .unwrap();

        let config = temp_env::with_var_unset(CONFIG_PATH_ENV, || {
            load_config(temp_dir.path(), None)
        })
        .unwrap();
        assert_eq!(config.project, "acme");
        assert_eq!(config.engine, "tofu");
        assert_eq!(config.providers.aws.region.as_deref(), Some("eu-west-1"));
    }

    #[test]
    #[serial]
    fn test_config_path_env_var() {
        let temp_dir = tempfile::tempdir().unwrap();
        let custom = temp_dir.path().join("custom.yaml");
        fs::write(&custom, "project: custom\n").unwrap();

        let config = temp_env::with_var(CONFIG_PATH_ENV, Some(&custom), || {
            load_config(temp_dir.path(), None)
        })
        .unwrap();
        assert_eq!(config.project, "custom");
    }

    #[test]
    #[serial]
    fn test_explicit_config_missing() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = load_config(temp_dir.path(), Some(Path::new("missing.yaml"))).unwrap_err();
        match err {
            ConfigError::ConfigFileNotFound(path) => {
                assert_eq!(path, temp_dir.path().join("missing.yaml"))
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    #[serial]
    fn test_parse_error_names_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "unknown_key: 1\n").unwrap();

        let err = temp_env::with_var_unset(CONFIG_PATH_ENV, || load_config(temp_dir.path(), None))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    #[serial]
    fn test_empty_engine_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "engine: \"\"\n").unwrap();

        let err = temp_env::with_var_unset(CONFIG_PATH_ENV, || load_config(temp_dir.path(), None))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }
}
