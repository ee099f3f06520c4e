//! Task files: the `.svi` format and the prompts built from it.

pub mod parser;
pub mod prompt;

pub use parser::{OptionMap, OptionValue, TaskFile};
pub use prompt::PromptBuilder;

/// File extension identifying task files.
pub const TASK_EXTENSION: &str = ".svi";
