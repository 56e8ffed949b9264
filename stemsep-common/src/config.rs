//! Job profile configuration
//!
//! One parameterized profile covers every deployment variant (wav vs mp3
//! output, short vs long timeout, normalized vs pass-through output)
//! instead of duplicating the pipeline per variant.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Output format requested from the separation tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Wav,
    Mp3,
}

/// Known output layouts of the separation tool, probed in order.
///
/// Different tool builds nest output differently; first existing path
/// wins and the order is load-bearing. `{stem}` is replaced with the
/// input filename stem.
pub const DEFAULT_OUTPUT_CANDIDATES: &[&str] = &[
    "htdemucs/{stem}/vocals.wav",
    "htdemucs/{stem}/vocals.mp3",
    "separated/htdemucs/{stem}/vocals.mp3",
];

/// Default separation tool invocation
pub const DEFAULT_TOOL_COMMAND: &[&str] = &["python3", "-m", "demucs.separate"];

/// Default wall-clock budget for one separation attempt
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// Default mp3 bitrate in kbps
pub const DEFAULT_MP3_BITRATE: u32 = 192;

/// Deployment profile for one separation job
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobProfile {
    /// Format flags passed to the tool
    pub output_format: OutputFormat,

    /// Bitrate passed with `--mp3-bitrate` (mp3 output only)
    pub mp3_bitrate: u32,

    /// Hard wall-clock budget for the external tool, in seconds
    pub timeout_secs: u64,

    /// Separation tool argv prefix (program plus leading arguments)
    pub tool_command: Vec<String>,

    /// Ordered artifact path templates relative to the workspace root
    pub output_candidates: Vec<String>,

    /// When set, transcode the artifact to mono WAV at this sample rate
    /// before encoding. Off by default: native tool output passes through.
    pub normalize_sample_rate: Option<u32>,

    /// Parent directory for per-job workspaces; system temp when unset
    pub scratch_root: Option<PathBuf>,
}

impl Default for JobProfile {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::Wav,
            mp3_bitrate: DEFAULT_MP3_BITRATE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            tool_command: DEFAULT_TOOL_COMMAND.iter().map(|s| s.to_string()).collect(),
            output_candidates: DEFAULT_OUTPUT_CANDIDATES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            normalize_sample_rate: None,
            scratch_root: None,
        }
    }
}

impl JobProfile {
    /// Validate profile invariants; returns a human-readable reason on
    /// the first violation
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than zero".to_string());
        }
        if self.tool_command.is_empty() {
            return Err("tool_command must name a program".to_string());
        }
        if self.output_candidates.is_empty() {
            return Err("output_candidates must list at least one path template".to_string());
        }
        if self.mp3_bitrate == 0 {
            return Err("mp3_bitrate must be greater than zero".to_string());
        }
        Ok(())
    }
}
