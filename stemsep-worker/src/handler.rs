//! Job pipeline orchestration and error classification
//!
//! Runs the stages strictly in order and maps any stage failure into a
//! well-formed failure response. `process_job` never returns an error
//! and never leaves a workspace behind.

use crate::services::{input_decoder, output_resolver, result_encoder, separator, JobWorkspace};
use std::time::Instant;
use stemsep_common::{
    JobError, JobProfile, JobRequest, JobResponse, ReadyResponse, SeparationSuccess,
};
use tracing::{info, warn};
use uuid::Uuid;

/// Process one separation job end to end
///
/// The sole entry point of the pipeline: one decoded request in, one
/// structured response out. A `test` marker short-circuits to a
/// readiness response before any audio work.
pub async fn process_job(req: JobRequest, profile: &JobProfile) -> JobResponse {
    if let Some(probe) = &req.test {
        info!("Readiness probe received");
        return JobResponse::Ready(ReadyResponse::new(probe));
    }

    let job_id = Uuid::new_v4();
    let started = Instant::now();

    match run_pipeline(job_id, &req, profile, started).await {
        Ok(success) => {
            info!(
                %job_id,
                processing_time = success.processing_time,
                filename = %success.filename,
                "Job completed"
            );
            JobResponse::Success(success)
        }
        Err(err) => {
            warn!(%job_id, error_kind = err.kind(), error = %err, "Job failed");
            JobResponse::from(err)
        }
    }
}

/// The sequential pipeline; the workspace drops (and is deleted) when
/// this function returns, on success and on every error path
async fn run_pipeline(
    job_id: Uuid,
    req: &JobRequest,
    profile: &JobProfile,
    started: Instant,
) -> Result<SeparationSuccess, JobError> {
    let input = input_decoder::decode(req)?;
    info!(
        %job_id,
        filename = %input.filename,
        input_bytes = input.bytes.len(),
        "Processing separation job"
    );

    let workspace = JobWorkspace::create(profile.scratch_root.as_deref(), &input)?;

    let invocation = separator::separate(&workspace, profile).await?;

    let artifact = output_resolver::resolve(
        workspace.root(),
        input.stem(),
        &profile.output_candidates,
        &invocation,
    )?;

    result_encoder::encode(
        &artifact,
        &input,
        profile,
        started.elapsed(),
        separator::detect_device(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use stemsep_common::JobFailure;

    fn request(audio_data: Option<&str>) -> JobRequest {
        JobRequest {
            audio_data: audio_data.map(|s| s.to_string()),
            filename: None,
            test: None,
        }
    }

    #[tokio::test]
    async fn readiness_probe_short_circuits() {
        let req = JobRequest {
            audio_data: None,
            filename: None,
            test: Some(serde_json::json!("ping")),
        };

        let response = process_job(req, &JobProfile::default()).await;
        assert!(response.is_success());
        match response {
            JobResponse::Ready(ready) => {
                assert!(ready.success);
                assert_eq!(ready.status, "ready");
                assert!(ready.message.contains("ping"));
            }
            other => panic!("expected readiness response, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_audio_fails_before_any_side_effect() {
        // A tool command that would leave a marker if it ever ran
        let scratch = tempfile::TempDir::new().unwrap();
        let marker = scratch.path().join("tool-ran");
        let profile = JobProfile {
            tool_command: vec![
                "sh".to_string(),
                "-c".to_string(),
                format!("touch {}", marker.display()),
            ],
            scratch_root: Some(scratch.path().to_path_buf()),
            ..Default::default()
        };

        let response = process_job(request(None), &profile).await;
        let failure = match response {
            JobResponse::Failure(f) => f,
            other => panic!("expected failure, got {:?}", other),
        };

        assert_eq!(failure.error_kind, "InvalidInput");
        assert!(!marker.exists(), "tool must not run without input");
        // No workspace directory was ever created
        assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn malformed_base64_is_decode_error() {
        let response = process_job(request(Some("!!!not-base64!!!")), &JobProfile::default()).await;
        match response {
            JobResponse::Failure(JobFailure { error_kind, .. }) => {
                assert_eq!(error_kind, "DecodeError")
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }
}
