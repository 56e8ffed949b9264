//! External separation tool invocation
//!
//! Launches the tool as a subprocess against the workspace input with a
//! hard wall-clock budget. Exactly one attempt per job, no retries.

use crate::services::workspace::JobWorkspace;
use std::process::Stdio;
use std::time::Duration;
use stemsep_common::{JobError, JobProfile, OutputFormat, Result};
use tokio::process::Command;
use tracing::{debug, info};

/// Captured outcome of one tool invocation
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Captured standard output, verbatim
    pub stdout: String,
    /// Captured standard error, verbatim
    pub stderr: String,
    /// Full command line, for diagnostics
    pub command: String,
}

/// Build the tool argument vector for this profile and workspace
///
/// Fixed contract: two-stem vocal mode, optional mp3 flags, output
/// rooted at the workspace, input path as the sole positional argument.
fn build_argv(profile: &JobProfile, workspace: &JobWorkspace) -> Vec<String> {
    let mut argv = profile.tool_command.clone();
    argv.push("--two-stems=vocals".to_string());

    if profile.output_format == OutputFormat::Mp3 {
        argv.push("--mp3".to_string());
        argv.push("--mp3-bitrate".to_string());
        argv.push(profile.mp3_bitrate.to_string());
    }

    argv.push("--out".to_string());
    argv.push(workspace.root().display().to_string());
    argv.push(workspace.input_path().display().to_string());
    argv
}

/// Run the separation tool once within the profile's wall-clock budget
///
/// On timeout the child is killed rather than orphaned; the timed-out
/// future drops the `kill_on_drop` child and the budget is reported in
/// the error. A non-zero exit is `ExternalToolError` with captured
/// stderr.
pub async fn separate(workspace: &JobWorkspace, profile: &JobProfile) -> Result<Invocation> {
    let argv = build_argv(profile, workspace);
    let command_line = argv.join(" ");

    let (program, args) = argv
        .split_first()
        .ok_or_else(|| JobError::Internal("separation tool command is empty".to_string()))?;

    debug!(command = %command_line, budget_secs = profile.timeout_secs, "Invoking separation tool");

    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| JobError::ExternalTool {
            message: format!("failed to launch separation tool '{}': {}", program, e),
            stdout: String::new(),
            stderr: String::new(),
            command: command_line.clone(),
        })?;

    let budget = Duration::from_secs(profile.timeout_secs);
    let output = match tokio::time::timeout(budget, child.wait_with_output()).await {
        Ok(result) => result?,
        Err(_) => {
            // kill_on_drop terminates the child as the timed-out future
            // is dropped
            return Err(JobError::Timeout {
                budget_secs: profile.timeout_secs,
            });
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

    if !output.status.success() {
        return Err(JobError::ExternalTool {
            message: format!(
                "separation tool exited with {}: {}",
                output
                    .status
                    .code()
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "signal".to_string()),
                stderr.trim()
            ),
            stdout,
            stderr,
            command: command_line,
        });
    }

    info!("Separation tool completed");

    Ok(Invocation {
        stdout,
        stderr,
        command: command_line,
    })
}

/// Informational device hint for the result payload
///
/// Device selection belongs to the deployment environment; the pipeline
/// only reports it, never branches on it.
pub fn detect_device() -> String {
    match std::env::var("CUDA_VISIBLE_DEVICES") {
        Ok(v) if !v.trim().is_empty() => "gpu".to_string(),
        _ => "cpu".to_string(),
    }
}
