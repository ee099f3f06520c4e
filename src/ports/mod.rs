//! Port traits defining external boundaries.
//!
//! Each trait represents a boundary between the pipeline core and an
//! external system (filesystem, generation backend).
//! Implementations live in `src/adapters/`.

pub mod filesystem;
pub mod llm;

pub use filesystem::FileSystem;
pub use llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
