//! Per-job disposable workspace
//!
//! The only stage that touches persistent storage. Each job gets a
//! uniquely-named scratch directory that is removed recursively when the
//! workspace is dropped, on every exit path.

use crate::services::input_decoder::DecodedInput;
use std::path::{Path, PathBuf};
use stemsep_common::Result;
use tempfile::TempDir;
use tracing::debug;

/// Prefix for workspace directory names
const WORKSPACE_PREFIX: &str = "stemsep-";

/// Isolated scratch directory for one job
///
/// Owns the directory for its whole lifetime; never shared or reused
/// across jobs. Dropping the workspace deletes everything under it.
#[derive(Debug)]
pub struct JobWorkspace {
    dir: TempDir,
    input_path: PathBuf,
}

impl JobWorkspace {
    /// Create the workspace and materialize the decoded input at
    /// `<workspace>/<filename>`
    pub fn create(scratch_root: Option<&Path>, input: &DecodedInput) -> Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(WORKSPACE_PREFIX);

        let dir = match scratch_root {
            Some(root) => builder.tempdir_in(root)?,
            None => builder.tempdir()?,
        };

        let input_path = dir.path().join(&input.filename);
        std::fs::write(&input_path, &input.bytes)?;

        debug!(
            workspace = %dir.path().display(),
            input_bytes = input.bytes.len(),
            "Workspace created"
        );

        Ok(Self { dir, input_path })
    }

    /// Workspace root; also the `--out` directory for the tool
    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Materialized input file path
    pub fn input_path(&self) -> &Path {
        &self.input_path
    }
}
