//! Builds the generation request text for a parsed task file.

use std::fmt::Write as _;

use crate::error::SviError;
use crate::task::parser::TaskFile;

/// Language used when neither the task nor the project names one.
pub const FALLBACK_LANGUAGE: &str = "Node.js";

/// Renders [`TaskFile`]s into backend prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptBuilder {
    fallback_language: String,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self { fallback_language: FALLBACK_LANGUAGE.to_string() }
    }
}

impl PromptBuilder {
    /// Uses `language` when a task has no `ProgrammingLanguage` option.
    /// A blank value keeps [`FALLBACK_LANGUAGE`].
    #[must_use]
    pub fn with_fallback_language(language: &str) -> Self {
        let language = language.trim();
        if language.is_empty() {
            Self::default()
        } else {
            Self { fallback_language: language.to_string() }
        }
    }

    /// Builds the request text for `task`.
    ///
    /// # Errors
    ///
    /// Returns [`SviError::MissingPrompt`] when the task has no prompt body.
    pub fn build(&self, task: &TaskFile) -> Result<String, SviError> {
        let main_prompt = task
            .prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or(SviError::MissingPrompt)?;
        let language = task.programming_language().unwrap_or(self.fallback_language.as_str());

        let mut out = String::new();
        let _ = writeln!(out, "Write a code in programming language {language}.");
        out.push_str(
            "Please return only the code, without any explanations, installation manual,\n\
             or additional text.\n",
        );

        if !task.input_parameters.is_empty() || !task.output_spec.is_empty() {
            out.push_str("The code should fulfill the following requirements:\n");
            if !task.input_parameters.is_empty() {
                let _ = writeln!(out, "Input parameters: {}.", task.input_parameters.join(", "));
            }
            if !task.output_spec.is_empty() {
                let _ = writeln!(out, "Output parameters: {}.", task.output_spec.join(", "));
            }
        }

        let _ = write!(out, "\nThe main specification goes below:\n{main_prompt}\n");

        if !task.import_prompts.is_empty() {
            let _ = write!(out, "\nAdditional context:\n{}\n", task.import_prompts.join("\n"));
        }

        Ok(out.trim().to_string())
    }
}
