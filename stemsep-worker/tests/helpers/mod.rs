//! Shared integration test helpers

pub mod audio_generator;
pub mod stub_tool;
