//! Artifact resolution across known tool output layouts
//!
//! Different builds of the separation tool nest their output under
//! different subdirectories and extensions. Candidates are probed in the
//! profile's fixed order and the first existing file wins; when nothing
//! matches, the error carries a full recursive listing of the workspace
//! so version drift can be diagnosed without re-running the job.

use crate::services::separator::Invocation;
use std::path::{Path, PathBuf};
use stemsep_common::{JobError, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Resolved tool output artifact
#[derive(Debug, Clone)]
pub struct ResolvedArtifact {
    pub path: PathBuf,
    pub byte_len: u64,
    /// Lowercased filename extension, e.g. "wav" or "mp3"
    pub extension: String,
}

/// Probe candidate templates in order and return the first existing file
///
/// `{stem}` in a template is replaced with the input filename stem. The
/// ordering is load-bearing: first match wins, deterministically.
pub fn resolve(
    root: &Path,
    stem: &str,
    candidates: &[String],
    invocation: &Invocation,
) -> Result<ResolvedArtifact> {
    for template in candidates {
        let relative = template.replace("{stem}", stem);
        let path = root.join(&relative);

        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => {
                debug!(artifact = %path.display(), bytes = meta.len(), "Artifact resolved");
                let extension = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("wav")
                    .to_ascii_lowercase();
                return Ok(ResolvedArtifact {
                    path,
                    byte_len: meta.len(),
                    extension,
                });
            }
            _ => debug!(candidate = %path.display(), "Candidate not present"),
        }
    }

    let created_files = list_workspace(root);
    warn!(
        candidates = candidates.len(),
        created_files = created_files.len(),
        "No vocals artifact at any known layout"
    );

    Err(JobError::ArtifactNotFound {
        created_files,
        stdout: invocation.stdout.clone(),
        stderr: invocation.stderr.clone(),
    })
}

/// Recursive listing of the workspace, paths relative to its root
fn list_workspace(root: &Path) -> Vec<String> {
    let mut entries: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap_or(e.path())
                .display()
                .to_string()
        })
        .collect();
    entries.sort();
    entries
}
