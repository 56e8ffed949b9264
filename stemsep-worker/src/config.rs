//! Profile resolution for the worker
//!
//! Priority order: explicit path argument, then `STEMSEP_CONFIG`
//! environment variable, then the platform config directory, then
//! compiled defaults. Individual `STEMSEP_*` environment variables
//! override whatever the file provided.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use stemsep_common::{JobProfile, OutputFormat};
use tracing::{info, warn};

/// Environment variable naming the profile TOML file
pub const CONFIG_ENV_VAR: &str = "STEMSEP_CONFIG";

/// Resolve the job profile for this worker process
pub fn resolve_profile(explicit_path: Option<&Path>) -> Result<JobProfile> {
    let mut profile = match locate_config_file(explicit_path) {
        Some(path) => {
            info!(config = %path.display(), "Loading profile from TOML");
            load_toml(&path)?
        }
        None => {
            info!("No profile file found, using compiled defaults");
            JobProfile::default()
        }
    };

    apply_overrides(&mut profile, |name| std::env::var(name).ok());

    profile
        .validate()
        .map_err(|reason| anyhow::anyhow!("Invalid job profile: {}", reason))?;

    Ok(profile)
}

/// Locate the profile file: explicit path → env var → platform default
fn locate_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    let default = dirs::config_dir()?.join("stemsep").join("config.toml");
    default.exists().then_some(default)
}

/// Parse a profile TOML file; unset keys fall back to defaults
fn load_toml(path: &Path) -> Result<JobProfile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read profile file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse profile file: {}", path.display()))
}

/// Apply `STEMSEP_*` environment overrides on top of the loaded profile
///
/// The lookup is injected so overrides can be tested without mutating
/// process environment.
fn apply_overrides<F>(profile: &mut JobProfile, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("STEMSEP_TIMEOUT_SECS") {
        match value.parse::<u64>() {
            Ok(secs) => {
                if secs != profile.timeout_secs {
                    info!(timeout_secs = secs, "Timeout overridden from environment");
                }
                profile.timeout_secs = secs;
            }
            Err(_) => warn!(value = %value, "Ignoring unparseable STEMSEP_TIMEOUT_SECS"),
        }
    }

    if let Some(value) = lookup("STEMSEP_OUTPUT_FORMAT") {
        match value.to_ascii_lowercase().as_str() {
            "wav" => profile.output_format = OutputFormat::Wav,
            "mp3" => profile.output_format = OutputFormat::Mp3,
            _ => warn!(value = %value, "Ignoring unknown STEMSEP_OUTPUT_FORMAT"),
        }
    }

    if let Some(value) = lookup("STEMSEP_MP3_BITRATE") {
        match value.parse::<u32>() {
            Ok(bitrate) => profile.mp3_bitrate = bitrate,
            Err(_) => warn!(value = %value, "Ignoring unparseable STEMSEP_MP3_BITRATE"),
        }
    }

    if let Some(value) = lookup("STEMSEP_NORMALIZE_SAMPLE_RATE") {
        match value.parse::<u32>() {
            Ok(rate) => profile.normalize_sample_rate = Some(rate),
            Err(_) => warn!(value = %value, "Ignoring unparseable STEMSEP_NORMALIZE_SAMPLE_RATE"),
        }
    }

    if let Some(value) = lookup("STEMSEP_SCRATCH_ROOT") {
        profile.scratch_root = Some(PathBuf::from(value));
    }
}
