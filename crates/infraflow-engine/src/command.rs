//! Process execution helpers shared by every CLI adapter

use async_trait::async_trait;
use infraflow_cloud::{CloudError, Result, ToolProbe};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Captured result of one tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// The tool's own diagnostic: stderr, or stdout when stderr is empty
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Run `binary args...` and capture its output.
///
/// With `stream_stdout` the tool's stdout goes straight to the terminal (long
/// running engine operations), while stderr is always captured so failures can
/// be reported verbatim.
pub async fn run_tool(
    binary: &str,
    args: &[String],
    dir: Option<&Path>,
    stream_stdout: bool,
) -> Result<ToolOutput> {
    let mut cmd = Command::new(binary);
    cmd.args(args);
    if let Some(dir) = dir {
        cmd.current_dir(dir);
    }
    cmd.stdin(Stdio::null());
    cmd.stdout(if stream_stdout {
        Stdio::inherit()
    } else {
        Stdio::piped()
    });
    cmd.stderr(Stdio::piped());

    tracing::debug!("Running: {} {}", binary, args.join(" "));

    let output = cmd.output().await.map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => CloudError::ToolNotFound(binary.to_string()),
        _ => CloudError::Io(e),
    })?;

    Ok(ToolOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
}

/// Run a tool and fail with its diagnostic when it exits unsuccessfully
pub async fn run_checked(binary: &str, args: &[String], dir: Option<&Path>) -> Result<String> {
    let output = run_tool(binary, args, dir, false).await?;
    if !output.success() {
        return Err(CloudError::CommandFailed(output.diagnostic()));
    }
    Ok(output.stdout)
}

/// Convert borrowed arguments into the owned form [`run_tool`] takes
pub fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// [`ToolProbe`] backed by `which`
#[derive(Debug, Clone, Default)]
pub struct WhichProbe;

#[async_trait]
impl ToolProbe for WhichProbe {
    async fn is_available(&self, tool: &str) -> bool {
        let which = Command::new("which")
            .arg(tool)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        let found = matches!(which, Ok(status) if status.success());
        tracing::debug!(tool, found, "Probed tool");
        found
    }
}
