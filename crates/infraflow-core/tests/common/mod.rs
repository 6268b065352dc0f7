//! Fake capabilities for orchestrator tests
//!
//! Every fake appends to a shared call log so tests can assert on ordering.

#![allow(dead_code)]

use async_trait::async_trait;
use infraflow_cloud::{
    AuthStatus, CloudError, CloudProvider, ClusterClient, ClusterCoordinates, Engine,
    PlanArtifact, Provider, ProvisioningOutputs, Result, StateBackend, ToolProbe,
};
use infraflow_config::{InfraflowConfig, ProjectLayout};
use infraflow_core::{
    Capabilities, Confirmation, ManifestStage, Orchestrator, RunOutcome, RunRequest,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

pub const LOCK_DIAGNOSTIC: &str =
    "Error: Error acquiring the state lock\n\nLock Info:\n  ID: 42\n  Who: ci@runner";

pub type CallLog = Arc<Mutex<Vec<String>>>;

fn record(log: &CallLog, call: impl Into<String>) {
    log.lock().unwrap().push(call.into());
}

/// Directory label used in the log: `bootstrap` for the backend definition,
/// `modules` for the provider's module directory
fn label(dir: &Path) -> &'static str {
    if dir.components().any(|c| c.as_os_str() == "bootstrap") {
        "bootstrap"
    } else {
        "modules"
    }
}

#[derive(Debug, Clone)]
pub enum Failure {
    Command(String),
    Lock,
}

impl Failure {
    fn error(&self) -> CloudError {
        match self {
            Failure::Command(msg) => CloudError::CommandFailed(msg.clone()),
            Failure::Lock => CloudError::LockError(LOCK_DIAGNOSTIC.to_string()),
        }
    }
}

pub struct FakeProbe {
    pub missing: HashSet<String>,
}

#[async_trait]
impl ToolProbe for FakeProbe {
    async fn is_available(&self, tool: &str) -> bool {
        !self.missing.contains(tool)
    }
}

pub struct FakeEngine {
    pub log: CallLog,
    /// Set when the backend definition is applied
    pub backend_created: Arc<AtomicBool>,
    pub workspaces: Mutex<HashSet<String>>,
    /// Failures keyed by operation name (`init`, `validate`, `select`, `plan`, ...)
    pub failures: Mutex<HashMap<&'static str, Failure>>,
    pub has_changes: bool,
    pub outputs: ProvisioningOutputs,
}

impl FakeEngine {
    fn fail(&self, op: &'static str) -> Result<()> {
        match self.failures.lock().unwrap().get(op) {
            Some(failure) => Err(failure.error()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Engine for FakeEngine {
    fn binary(&self) -> &str {
        "terraform"
    }

    async fn init(&self, dir: &Path, backend_config: &[(String, String)]) -> Result<()> {
        record(&self.log, format!("engine.init {} ({})", label(dir), backend_config.len()));
        self.fail("init")
    }

    async fn validate(&self, dir: &Path) -> Result<()> {
        record(&self.log, format!("engine.validate {}", label(dir)));
        self.fail("validate")
    }

    async fn select_workspace(&self, _dir: &Path, name: &str) -> Result<()> {
        record(&self.log, format!("engine.select {}", name));
        self.fail("select")?;
        if self.workspaces.lock().unwrap().contains(name) {
            Ok(())
        } else {
            Err(CloudError::WorkspaceNotFound(name.to_string()))
        }
    }

    async fn new_workspace(&self, _dir: &Path, name: &str) -> Result<()> {
        record(&self.log, format!("engine.new {}", name));
        self.fail("new")?;
        let mut workspaces = self.workspaces.lock().unwrap();
        if !workspaces.insert(name.to_string()) {
            return Err(CloudError::CommandFailed(format!(
                "Workspace \"{}\" already exists",
                name
            )));
        }
        Ok(())
    }

    async fn plan(&self, dir: &Path, var_file: Option<&Path>, out: &Path) -> Result<PlanArtifact> {
        let with_vars = if var_file.is_some() { " +vars" } else { "" };
        record(&self.log, format!("engine.plan {}{}", label(dir), with_vars));
        self.fail("plan")?;
        Ok(PlanArtifact::new(out, self.has_changes))
    }

    async fn apply(&self, dir: &Path, _plan: &Path) -> Result<()> {
        record(&self.log, format!("engine.apply {}", label(dir)));
        if label(dir) == "bootstrap" {
            self.fail("bootstrap")?;
            self.backend_created.store(true, Ordering::SeqCst);
            return Ok(());
        }
        self.fail("apply")
    }

    async fn destroy(&self, dir: &Path, _var_file: Option<&Path>) -> Result<()> {
        record(&self.log, format!("engine.destroy {}", label(dir)));
        self.fail("destroy")
    }

    async fn outputs(&self, dir: &Path) -> Result<ProvisioningOutputs> {
        record(&self.log, format!("engine.outputs {}", label(dir)));
        self.fail("outputs")?;
        Ok(self.outputs.clone())
    }
}

pub struct FakeProvider {
    pub log: CallLog,
    pub backend_created: Arc<AtomicBool>,
    pub authenticated: bool,
    pub cluster_access_fails: bool,
    pub backend_checks: AtomicUsize,
}

const FAKE_TEMPLATE: &str = "bucket = \"{{ storage }}\"\nlock = \"{{ lock_table }}\"\nproject = \"{{ project }}\"\n";

#[async_trait]
impl CloudProvider for FakeProvider {
    fn provider(&self) -> Provider {
        Provider::Aws
    }

    fn region(&self) -> &str {
        "us-east-1"
    }

    fn state_backend(&self) -> StateBackend {
        StateBackend::new(
            Provider::Aws,
            "platform-terraform-state-aws",
            Some("platform-terraform-locks".to_string()),
            "us-east-1",
        )
    }

    fn backend_template(&self) -> &'static str {
        FAKE_TEMPLATE
    }

    fn backend_config(&self, backend: &StateBackend) -> Vec<(String, String)> {
        vec![("bucket".to_string(), backend.storage_location_id.clone())]
    }

    async fn check_auth(&self) -> Result<AuthStatus> {
        record(&self.log, "provider.auth");
        if self.authenticated {
            Ok(AuthStatus::ok("arn:aws:iam::123456789012:user/ops"))
        } else {
            Ok(AuthStatus::failed("Unable to locate credentials"))
        }
    }

    async fn backend_exists(&self, _backend: &StateBackend) -> Result<bool> {
        record(&self.log, "provider.backend_exists");
        self.backend_checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.backend_created.load(Ordering::SeqCst))
    }

    async fn configure_cluster_access(&self, cluster: &ClusterCoordinates) -> Result<()> {
        record(&self.log, format!("provider.cluster_access {}", cluster.name));
        if self.cluster_access_fails {
            return Err(CloudError::CommandFailed("cluster not reachable".to_string()));
        }
        Ok(())
    }
}

pub struct FakeCluster {
    pub log: CallLog,
    pub failing_stage: Option<ManifestStage>,
}

#[async_trait]
impl ClusterClient for FakeCluster {
    fn binary(&self) -> &str {
        "kubectl"
    }

    async fn apply_dir(&self, dir: &Path) -> Result<String> {
        let group = dir
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();
        record(&self.log, format!("kubectl.apply {}", group));
        if self.failing_stage.map(|s| s.dir_name()) == Some(group.as_str()) {
            return Err(CloudError::CommandFailed(format!(
                "error: unable to recognize \"{}/app.yaml\"",
                group
            )));
        }
        Ok(format!("{} configured", group))
    }

    async fn current_context(&self) -> Result<String> {
        record(&self.log, "kubectl.context");
        Ok("arn:aws:eks:us-east-1:123456789012:cluster/platform-staging".to_string())
    }
}

pub struct FakeConfirmation {
    pub answer: Option<String>,
    pub asked: AtomicBool,
}

#[async_trait]
impl Confirmation for FakeConfirmation {
    async fn ask(&self, _prompt: &str) -> Option<String> {
        self.asked.store(true, Ordering::SeqCst);
        self.answer.clone()
    }
}

/// A project directory plus a full set of fakes
pub struct Harness {
    pub dir: TempDir,
    pub config: InfraflowConfig,
    pub layout: ProjectLayout,
    pub log: CallLog,
    pub probe: FakeProbe,
    pub engine: FakeEngine,
    pub provider: FakeProvider,
    pub cluster: FakeCluster,
    pub confirmation: FakeConfirmation,
}

pub fn applied_outputs() -> ProvisioningOutputs {
    ProvisioningOutputs {
        cluster_name: Some("platform-staging".to_string()),
        cluster_region: Some("us-east-1".to_string()),
        domain_name: Some("staging.example.com".to_string()),
        database_endpoint: Some("db.internal:5432".to_string()),
        ..Default::default()
    }
}

impl Harness {
    /// Project with var files for `environments` and every manifest group
    pub fn new(environments: &[&str]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = InfraflowConfig {
            project: "platform".to_string(),
            ..Default::default()
        };
        let layout = ProjectLayout::new(dir.path(), &config);

        let env_dir = layout.provider_dir(Provider::Aws).join("environments");
        std::fs::create_dir_all(&env_dir).unwrap();
        for env in environments {
            std::fs::write(env_dir.join(format!("{}.tfvars", env)), "node_count = 2\n").unwrap();
        }
        for stage in ManifestStage::ALL {
            let group_dir = layout.manifest_dir(stage.dir_name());
            std::fs::create_dir_all(&group_dir).unwrap();
            std::fs::write(group_dir.join(format!("{}.yaml", stage.dir_name())), "kind: List\n").unwrap();
        }

        let log: CallLog = Arc::new(Mutex::new(Vec::new()));
        let backend_created = Arc::new(AtomicBool::new(false));

        Self {
            probe: FakeProbe {
                missing: HashSet::new(),
            },
            engine: FakeEngine {
                log: log.clone(),
                backend_created: backend_created.clone(),
                workspaces: Mutex::new(HashSet::new()),
                failures: Mutex::new(HashMap::new()),
                has_changes: true,
                outputs: applied_outputs(),
            },
            provider: FakeProvider {
                log: log.clone(),
                backend_created,
                authenticated: true,
                cluster_access_fails: false,
                backend_checks: AtomicUsize::new(0),
            },
            cluster: FakeCluster {
                log: log.clone(),
                failing_stage: None,
            },
            confirmation: FakeConfirmation {
                answer: None,
                asked: AtomicBool::new(false),
            },
            dir,
            config,
            layout,
            log,
        }
    }

    pub fn fail(&self, op: &'static str, failure: Failure) {
        self.engine.failures.lock().unwrap().insert(op, failure);
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.log.lock().unwrap().clear();
    }

    pub fn backend_created(&self) -> bool {
        self.provider.backend_created.load(Ordering::SeqCst)
    }

    pub async fn run(&self, environment: &str, action: &str) -> RunOutcome {
        let orchestrator = Orchestrator::new(
            &self.config,
            &self.layout,
            Capabilities {
                probe: &self.probe,
                engine: &self.engine,
                provider: &self.provider,
                cluster: &self.cluster,
                confirmation: &self.confirmation,
            },
        );
        orchestrator
            .run(RunRequest {
                environment: environment.parse().unwrap(),
                action: action.parse().unwrap(),
            })
            .await
    }
}
