//! Service context bundling all port trait objects.

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::ports::filesystem::FileSystem;
use crate::ports::llm::LlmClient;

/// Bundles all port trait objects into a single context.
///
/// Each field provides access to one external boundary. Constructors
/// wire up different adapter implementations (live disk, in-memory for tests).
pub struct ServiceContext {
    /// Filesystem for file I/O.
    pub fs: Box<dyn FileSystem>,
    /// LLM client used as the generation backend.
    pub llm: Box<dyn LlmClient>,
}

impl ServiceContext {
    /// Creates a context from explicit adapters.
    #[must_use]
    pub fn new(fs: Box<dyn FileSystem>, llm: Box<dyn LlmClient>) -> Self {
        Self { fs, llm }
    }

    /// Creates a live context: real disk plus the given backend.
    #[must_use]
    pub fn live(llm: Box<dyn LlmClient>) -> Self {
        Self::new(Box::new(LiveFileSystem), llm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemFs, ScriptedLlm};
    use std::path::Path;

    #[test]
    fn new_context_routes_through_given_adapters() {
        let fs = MemFs::new();
        fs.insert("/p/a.svi", "# Prompt\nhi");
        let ctx = ServiceContext::new(Box::new(fs), Box::new(ScriptedLlm::new(vec![])));

        assert!(ctx.fs.is_file(Path::new("/p/a.svi")));
        assert_eq!(ctx.llm.model(), "scripted");
    }
}
