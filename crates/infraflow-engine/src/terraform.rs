//! Terraform CLI wrapper
//!
//! Every call uses `-chdir=<dir>`, `-input=false` and `-no-color` so runs never
//! block on prompts and diagnostics stay free of escape codes.

use crate::command::{ToolOutput, run_tool};
use async_trait::async_trait;
use infraflow_cloud::{CloudError, Engine, PlanArtifact, ProvisioningOutputs, Result};
use std::path::Path;

const LOCK_ERROR_MARKER: &str = "Error acquiring the state lock";
const MISSING_WORKSPACE_MARKER: &str = "doesn't exist";

/// Terraform (or a compatible engine such as OpenTofu)
#[derive(Debug, Clone)]
pub struct Terraform {
    binary: String,
    stream_output: bool,
}

impl Terraform {
    pub fn new() -> Self {
        Self::with_binary("terraform")
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            stream_output: false,
        }
    }

    /// Show plan/apply/destroy progress on the terminal while they run
    pub fn streaming(mut self, stream_output: bool) -> Self {
        self.stream_output = stream_output;
        self
    }

    async fn run(&self, dir: &Path, args: Vec<String>, stream: bool) -> Result<ToolOutput> {
        let mut full = vec![format!("-chdir={}", dir.display())];
        full.extend(args);
        run_tool(&self.binary, &full, None, stream && self.stream_output).await
    }

    async fn run_checked(&self, dir: &Path, args: Vec<String>, stream: bool) -> Result<String> {
        let output = self.run(dir, args, stream).await?;
        if !output.success() {
            return Err(classify_failure(&output));
        }
        Ok(output.stdout)
    }
}

impl Default for Terraform {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a failed invocation to the error the orchestrator reacts to
fn classify_failure(output: &ToolOutput) -> CloudError {
    let diagnostic = output.diagnostic();
    if diagnostic.contains(LOCK_ERROR_MARKER) {
        CloudError::LockError(diagnostic)
    } else {
        CloudError::CommandFailed(diagnostic)
    }
}

fn var_file_arg(var_file: Option<&Path>) -> Option<String> {
    var_file.map(|path| format!("-var-file={}", path.display()))
}

#[async_trait]
impl Engine for Terraform {
    fn binary(&self) -> &str {
        &self.binary
    }

    async fn init(&self, dir: &Path, backend_config: &[(String, String)]) -> Result<()> {
        let mut args = vec![
            "init".to_string(),
            "-input=false".to_string(),
            "-no-color".to_string(),
        ];
        for (key, value) in backend_config {
            args.push(format!("-backend-config={}={}", key, value));
        }
        if !backend_config.is_empty() {
            args.push("-reconfigure".to_string());
        }

        self.run_checked(dir, args, false).await?;
        tracing::debug!(dir = %dir.display(), "Initialised");
        Ok(())
    }

    async fn validate(&self, dir: &Path) -> Result<()> {
        self.run_checked(dir, vec!["validate".to_string(), "-no-color".to_string()], false)
            .await?;
        Ok(())
    }

    async fn select_workspace(&self, dir: &Path, name: &str) -> Result<()> {
        let output = self
            .run(
                dir,
                vec![
                    "workspace".to_string(),
                    "select".to_string(),
                    "-no-color".to_string(),
                    name.to_string(),
                ],
                false,
            )
            .await?;

        if output.success() {
            return Ok(());
        }
        let diagnostic = output.diagnostic();
        if diagnostic.contains(MISSING_WORKSPACE_MARKER) && !diagnostic.contains(LOCK_ERROR_MARKER)
        {
            return Err(CloudError::WorkspaceNotFound(name.to_string()));
        }
        Err(classify_failure(&output))
    }

    async fn new_workspace(&self, dir: &Path, name: &str) -> Result<()> {
        self.run_checked(
            dir,
            vec![
                "workspace".to_string(),
                "new".to_string(),
                "-no-color".to_string(),
                name.to_string(),
            ],
            false,
        )
        .await?;
        Ok(())
    }

    async fn plan(
        &self,
        dir: &Path,
        var_file: Option<&Path>,
        out: &Path,
    ) -> Result<PlanArtifact> {
        let mut args = vec![
            "plan".to_string(),
            "-input=false".to_string(),
            "-no-color".to_string(),
            "-detailed-exitcode".to_string(),
            format!("-out={}", out.display()),
        ];
        args.extend(var_file_arg(var_file));

        // -detailed-exitcode: 0 = no changes, 2 = changes present, 1 = error
        let output = self.run(dir, args, true).await?;
        match output.code {
            Some(0) => Ok(PlanArtifact::new(out, false)),
            Some(2) => Ok(PlanArtifact::new(out, true)),
            _ => Err(classify_failure(&output)),
        }
    }

    async fn apply(&self, dir: &Path, plan: &Path) -> Result<()> {
        self.run_checked(
            dir,
            vec![
                "apply".to_string(),
                "-input=false".to_string(),
                "-no-color".to_string(),
                plan.display().to_string(),
            ],
            true,
        )
        .await?;
        Ok(())
    }

    async fn destroy(&self, dir: &Path, var_file: Option<&Path>) -> Result<()> {
        let mut args = vec![
            "destroy".to_string(),
            "-input=false".to_string(),
            "-no-color".to_string(),
            "-auto-approve".to_string(),
        ];
        args.extend(var_file_arg(var_file));

        self.run_checked(dir, args, true).await?;
        Ok(())
    }

    async fn outputs(&self, dir: &Path) -> Result<ProvisioningOutputs> {
        let stdout = self
            .run_checked(
                dir,
                vec![
                    "output".to_string(),
                    "-json".to_string(),
                    "-no-color".to_string(),
                ],
                false,
            )
            .await?;
        ProvisioningOutputs::from_json(&stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(stderr: &str) -> ToolOutput {
        ToolOutput {
            code: Some(1),
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }

    #[test]
    fn test_lock_error_classification() {
        let output = failed(
            "Error: Error acquiring the state lock\n\nLock Info:\n  ID: 1234\n  Who: ci@runner",
        );
        let err = classify_failure(&output);
        assert!(err.is_lock_error());
        assert!(err.to_string().contains("Who: ci@runner"));
    }

    #[test]
    fn test_other_failures_keep_diagnostic() {
        let output = failed("Error: Unsupported argument\n\n  on main.tf line 3");
        match classify_failure(&output) {
            CloudError::CommandFailed(diagnostic) => {
                assert_eq!(diagnostic, "Error: Unsupported argument\n\n  on main.tf line 3")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_var_file_arg() {
        assert_eq!(
            var_file_arg(Some(Path::new("/p/env/staging.tfvars"))).as_deref(),
            Some("-var-file=/p/env/staging.tfvars")
        );
        assert_eq!(var_file_arg(None), None);
    }

    #[test]
    fn test_custom_binary() {
        let engine = Terraform::with_binary("tofu");
        assert_eq!(Engine::binary(&engine), "tofu");
        assert_eq!(Engine::binary(&Terraform::default()), "terraform");
    }
}
