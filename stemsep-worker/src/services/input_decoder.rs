//! Inbound payload validation and decoding
//!
//! Pure stage: no filesystem or process side effects. Produces the raw
//! audio bytes plus a sanitized logical filename for the workspace.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::Path;
use stemsep_common::types::DEFAULT_FILENAME;
use stemsep_common::{JobError, JobRequest, Result};

/// Decoded job input
#[derive(Debug, Clone)]
pub struct DecodedInput {
    /// Raw audio bytes
    pub bytes: Vec<u8>,
    /// Logical filename, final path component only
    pub filename: String,
}

impl DecodedInput {
    /// Filename stem used to derive output paths and the result filename
    pub fn stem(&self) -> &str {
        Path::new(&self.filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("audio")
    }
}

/// Validate and decode the inbound request
///
/// Missing `audio_data` is `InvalidInput`; malformed base64 is
/// `DecodeError`. An empty decoded payload is also `InvalidInput`: the
/// separation tool has nothing to work on.
pub fn decode(req: &JobRequest) -> Result<DecodedInput> {
    let audio_b64 = match req.audio_data.as_deref() {
        Some(data) if !data.trim().is_empty() => data.trim(),
        _ => {
            return Err(JobError::InvalidInput(
                "no audio data provided; send base64-encoded audio in the audio_data field"
                    .to_string(),
            ))
        }
    };

    let bytes = BASE64
        .decode(audio_b64)
        .map_err(|e| JobError::Decode(e.to_string()))?;

    if bytes.is_empty() {
        return Err(JobError::InvalidInput(
            "decoded audio payload is empty".to_string(),
        ));
    }

    Ok(DecodedInput {
        bytes,
        filename: sanitize_filename(req.filename_or_default()),
    })
}

/// Strip any directory components from a caller-supplied filename so the
/// input always lands directly inside the workspace
fn sanitize_filename(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty() && *s != "." && *s != "..")
        .unwrap_or(DEFAULT_FILENAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(audio_data: Option<&str>, filename: Option<&str>) -> JobRequest {
        JobRequest {
            audio_data: audio_data.map(|s| s.to_string()),
            filename: filename.map(|s| s.to_string()),
            test: None,
        }
    }

    #[test]
    fn round_trips_valid_base64() {
        let original = b"RIFF\x00\x01\x02\x03WAVE".to_vec();
        let encoded = BASE64.encode(&original);

        let decoded = decode(&request(Some(&encoded), Some("clip.wav"))).unwrap();
        assert_eq!(decoded.bytes, original);
        assert_eq!(decoded.filename, "clip.wav");
        assert_eq!(decoded.stem(), "clip");
    }

    #[test]
    fn missing_audio_data_is_invalid_input() {
        let err = decode(&request(None, None)).unwrap_err();
        assert_eq!(err.kind(), "InvalidInput");

        let err = decode(&request(Some("   "), None)).unwrap_err();
        assert_eq!(err.kind(), "InvalidInput");
    }

    #[test]
    fn malformed_base64_is_decode_error() {
        let err = decode(&request(Some("this is !!! not base64"), None)).unwrap_err();
        assert_eq!(err.kind(), "DecodeError");
    }

    #[test]
    fn empty_payload_is_invalid_input() {
        let err = decode(&request(Some(""), None)).unwrap_err();
        assert_eq!(err.kind(), "InvalidInput");
    }

    #[test]
    fn filename_defaults_and_sanitizes() {
        let encoded = BASE64.encode(b"data");

        let decoded = decode(&request(Some(&encoded), None)).unwrap();
        assert_eq!(decoded.filename, "audio.wav");

        let decoded = decode(&request(Some(&encoded), Some("../../etc/passwd"))).unwrap();
        assert_eq!(decoded.filename, "passwd");

        let decoded = decode(&request(Some(&encoded), Some("mix/take 3.wav"))).unwrap();
        assert_eq!(decoded.filename, "take 3.wav");
    }
}
