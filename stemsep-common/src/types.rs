//! Job request/response wire types
//!
//! These are the decoded, transport-agnostic shapes: the hosting runtime
//! hands the worker a `JobRequest` and receives a `JobResponse`. Exactly
//! one response variant is ever produced per job.

use crate::error::JobError;
use serde::{Deserialize, Serialize};

/// Default logical filename when the caller supplies none
pub const DEFAULT_FILENAME: &str = "audio.wav";

/// Inbound job description
#[derive(Debug, Clone, Deserialize)]
pub struct JobRequest {
    /// Base64-encoded audio bytes (required for separation jobs)
    #[serde(default)]
    pub audio_data: Option<String>,

    /// Logical filename for the clip, defaults to `audio.wav`
    #[serde(default)]
    pub filename: Option<String>,

    /// Opaque readiness-probe marker; when present the worker answers
    /// without touching audio, workspace, or subprocess
    #[serde(default)]
    pub test: Option<serde_json::Value>,
}

impl JobRequest {
    /// Logical filename, falling back to the default placeholder
    pub fn filename_or_default(&self) -> &str {
        match self.filename.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_FILENAME,
        }
    }
}

/// Outbound job result; exactly one variant per invocation
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum JobResponse {
    Ready(ReadyResponse),
    Success(SeparationSuccess),
    Failure(JobFailure),
}

impl JobResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, JobResponse::Ready(_) | JobResponse::Success(_))
    }
}

impl From<JobError> for JobResponse {
    fn from(err: JobError) -> Self {
        JobResponse::Failure(JobFailure::from(err))
    }
}

/// Readiness probe response (no audio processed)
#[derive(Debug, Clone, Serialize)]
pub struct ReadyResponse {
    pub success: bool,
    pub message: String,
    pub status: String,
}

impl ReadyResponse {
    pub fn new(probe: &serde_json::Value) -> Self {
        Self {
            success: true,
            message: format!("Separation worker ready. Test: {}", probe),
            status: "ready".to_string(),
        }
    }
}

/// Successful separation payload
#[derive(Debug, Clone, Serialize)]
pub struct SeparationSuccess {
    pub success: bool,

    /// Base64-encoded vocal stem
    pub vocals_data: String,

    /// Wall-clock seconds from job start to payload assembly
    pub processing_time: f64,

    /// Derived output filename, `<stem>_vocals.<ext>`
    pub filename: String,

    /// Sample rate of the returned audio, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_rate: Option<u32>,

    /// Duration in seconds of the returned audio, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,

    /// Decoded input size in bytes
    pub original_size: u64,

    /// Returned vocal stem size in bytes (pre-encoding)
    pub vocals_size: u64,

    /// Informational device hint from the environment
    pub device_used: String,
}

/// Failure payload with stage diagnostics
#[derive(Debug, Clone, Serialize)]
pub struct JobFailure {
    /// Human-readable message
    pub error: String,

    /// Stable taxonomy kind, see [`JobError::kind`]
    pub error_kind: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,

    /// Command line that was invoked, when a subprocess was involved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Recursive workspace listing, when artifact resolution failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_files: Option<Vec<String>>,
}

impl From<JobError> for JobFailure {
    fn from(err: JobError) -> Self {
        let error = err.to_string();
        let error_kind = err.kind().to_string();

        let mut failure = JobFailure {
            error,
            error_kind,
            stdout: None,
            stderr: None,
            command: None,
            created_files: None,
        };

        match err {
            JobError::ExternalTool {
                stdout,
                stderr,
                command,
                ..
            } => {
                failure.stdout = Some(stdout);
                failure.stderr = Some(stderr);
                failure.command = Some(command);
            }
            JobError::ArtifactNotFound {
                created_files,
                stdout,
                stderr,
            } => {
                failure.created_files = Some(created_files);
                failure.stdout = Some(stdout);
                failure.stderr = Some(stderr);
            }
            _ => {}
        }

        failure
    }
}
