//! Success payload assembly
//!
//! Reads the resolved artifact, optionally normalizes it, and encodes
//! the result plus metadata into the caller-facing success shape.

use crate::services::input_decoder::DecodedInput;
use crate::services::normalizer;
use crate::services::output_resolver::ResolvedArtifact;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::time::Duration;
use stemsep_common::{JobError, JobProfile, Result, SeparationSuccess};
use tracing::info;

/// Assemble the success payload from the resolved artifact
pub fn encode(
    artifact: &ResolvedArtifact,
    input: &DecodedInput,
    profile: &JobProfile,
    elapsed: Duration,
    device_used: String,
) -> Result<SeparationSuccess> {
    let raw = std::fs::read(&artifact.path)?;

    let (vocals_bytes, sample_rate, duration, extension) = match profile.normalize_sample_rate {
        Some(rate) => {
            let normalized = normalizer::normalize(&raw, &artifact.extension, rate)
                .map_err(|e| JobError::Encoding(format!("{:#}", e)))?;
            (
                normalized.bytes,
                Some(normalized.sample_rate),
                Some(normalized.duration),
                "wav".to_string(),
            )
        }
        None => {
            let (sample_rate, duration) = probe_wav_metadata(&raw, &artifact.extension);
            (raw, sample_rate, duration, artifact.extension.clone())
        }
    };

    let vocals_size = vocals_bytes.len() as u64;
    let vocals_data = BASE64.encode(&vocals_bytes);
    let filename = format!("{}_vocals.{}", input.stem(), extension);

    info!(
        filename = %filename,
        vocals_size,
        processing_time = elapsed.as_secs_f64(),
        "Separation result encoded"
    );

    Ok(SeparationSuccess {
        success: true,
        vocals_data,
        processing_time: elapsed.as_secs_f64(),
        filename,
        sample_rate,
        duration,
        original_size: input.bytes.len() as u64,
        vocals_size,
        device_used,
    })
}

/// Best-effort metadata probe for pass-through artifacts
///
/// Only WAV headers are probed; other formats report no metadata rather
/// than failing an otherwise-successful job.
fn probe_wav_metadata(bytes: &[u8], extension: &str) -> (Option<u32>, Option<f64>) {
    if extension != "wav" {
        return (None, None);
    }

    match hound::WavReader::new(std::io::Cursor::new(bytes)) {
        Ok(reader) => {
            let spec = reader.spec();
            let frames = reader.duration();
            let duration = frames as f64 / spec.sample_rate as f64;
            (Some(spec.sample_rate), Some(duration))
        }
        Err(_) => (None, None),
    }
}
