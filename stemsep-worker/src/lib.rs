//! stemsep-worker library interface
//!
//! Exposes the job pipeline for integration testing. The binary in
//! `main.rs` is a thin bootstrap around [`handler::process_job`].

pub mod config;
pub mod handler;
pub mod services;

pub use handler::process_job;
pub use stemsep_common::{JobError, JobProfile, JobRequest, JobResponse, OutputFormat};
