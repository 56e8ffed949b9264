//! # stemsep Common Library
//!
//! Shared code for the stemsep worker:
//! - Job request/response wire types
//! - Caller-facing error taxonomy
//! - Job profile configuration

pub mod config;
pub mod error;
pub mod types;

pub use config::{JobProfile, OutputFormat};
pub use error::{JobError, Result};
pub use types::{JobFailure, JobRequest, JobResponse, ReadyResponse, SeparationSuccess};
