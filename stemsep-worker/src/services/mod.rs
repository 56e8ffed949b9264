//! Pipeline stage services
//!
//! One module per stage, run strictly in order by the handler:
//! input decode → workspace → separation → artifact resolution →
//! result encoding.

pub mod input_decoder;
pub mod normalizer;
pub mod output_resolver;
pub mod result_encoder;
pub mod separator;
pub mod workspace;

pub use input_decoder::DecodedInput;
pub use output_resolver::ResolvedArtifact;
pub use separator::Invocation;
pub use workspace::JobWorkspace;
