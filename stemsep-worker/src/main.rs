//! stemsep-worker - Vocal separation job worker
//!
//! Single-invocation model: read one job description as JSON (file
//! argument or stdin), run the separation pipeline, print the JSON
//! result to stdout. Logs go to stderr so stdout stays a clean result
//! channel. The process always emits a well-formed result object.

use anyhow::Result;
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use stemsep_worker::{config, process_job, JobError, JobRequest, JobResponse};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stemsep-worker", version, about = "Vocal separation job worker")]
struct Args {
    /// Job description JSON file; reads stdin when omitted
    job: Option<PathBuf>,

    /// Profile TOML file (overrides STEMSEP_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    info!("Starting stemsep-worker");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let profile = config::resolve_profile(args.config.as_deref())?;
    info!(
        output_format = ?profile.output_format,
        timeout_secs = profile.timeout_secs,
        normalize = ?profile.normalize_sample_rate,
        "Profile resolved"
    );

    let response = match read_job(&args) {
        Ok(raw) => match serde_json::from_str::<JobRequest>(&raw) {
            Ok(request) => process_job(request, &profile).await,
            Err(e) => JobResponse::from(JobError::InvalidInput(format!(
                "malformed job description: {}",
                e
            ))),
        },
        Err(e) => JobResponse::from(JobError::Internal(format!(
            "failed to read job description: {}",
            e
        ))),
    };

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

/// Read the raw job description from the file argument or stdin
fn read_job(args: &Args) -> std::io::Result<String> {
    match &args.job {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}
