//! Caller-facing error taxonomy for separation jobs
//!
//! Every pipeline failure maps to exactly one variant here, and every
//! variant carries a stable kind string so callers can branch on failure
//! class without parsing messages.

use thiserror::Error;

/// Common result type for job pipeline stages
pub type Result<T> = std::result::Result<T, JobError>;

/// Job pipeline errors
///
/// The diagnostic payloads (captured process output, workspace listing,
/// command line) travel with the variant that produced them so failure
/// responses can be assembled without re-running anything.
#[derive(Debug, Error)]
pub enum JobError {
    /// Required input missing or unusable before decoding
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Encoded audio payload could not be decoded to bytes
    #[error("Invalid base64 audio data: {0}")]
    Decode(String),

    /// Filesystem operation failed (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// External separation tool exceeded its wall-clock budget
    #[error("Separation timed out after {budget_secs}s; audio may be too large for this profile")]
    Timeout {
        /// Configured budget in seconds
        budget_secs: u64,
    },

    /// External separation tool exited unsuccessfully
    #[error("Separation tool failed: {message}")]
    ExternalTool {
        message: String,
        stdout: String,
        stderr: String,
        /// Full command line that was invoked
        command: String,
    },

    /// Tool exited cleanly but no vocals artifact exists at any known path
    #[error("Vocals artifact not created by separation tool")]
    ArtifactNotFound {
        /// Recursive listing of everything the tool actually wrote
        created_files: Vec<String>,
        stdout: String,
        stderr: String,
    },

    /// Output transcode/normalization failed
    #[error("Encoding failed: {0}")]
    Encoding(String),

    /// Unexpected failure not covered by the taxonomy
    #[error("Internal error: {0}")]
    Internal(String),
}

impl JobError {
    /// Stable error kind string for the failure response
    pub fn kind(&self) -> &'static str {
        match self {
            JobError::InvalidInput(_) => "InvalidInput",
            JobError::Decode(_) => "DecodeError",
            JobError::Io(_) => "IOError",
            JobError::Timeout { .. } => "TimeoutError",
            JobError::ExternalTool { .. } => "ExternalToolError",
            JobError::ArtifactNotFound { .. } => "ArtifactNotFound",
            JobError::Encoding(_) => "EncodingError",
            JobError::Internal(_) => "InternalError",
        }
    }
}
