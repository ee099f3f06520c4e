//! In-memory port implementations shared by unit tests.

use std::collections::{BTreeMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::PortError;
use crate::ports::filesystem::FileSystem;
use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};

/// In-memory filesystem. Directories exist implicitly when a file lives under them.
#[derive(Clone, Default)]
pub struct MemFs {
    files: Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>,
    failing_writes: Arc<Mutex<Vec<PathBuf>>>,
    symlinks: Arc<Mutex<Vec<PathBuf>>>,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, contents: &str) {
        self.files.lock().unwrap().insert(path.into(), contents.as_bytes().to_vec());
    }

    pub fn remove(&self, path: impl AsRef<Path>) {
        self.files.lock().unwrap().remove(path.as_ref());
    }

    pub fn get(&self, path: impl AsRef<Path>) -> Option<String> {
        let files = self.files.lock().unwrap();
        files.get(path.as_ref()).map(|b| String::from_utf8_lossy(b).into_owned())
    }

    /// Marks `path` as a symbolic link. Its contents still resolve as usual.
    pub fn mark_symlink(&self, path: impl Into<PathBuf>) {
        self.symlinks.lock().unwrap().push(path.into());
    }

    /// Makes every subsequent write to `path` fail.
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.failing_writes.lock().unwrap().push(path.into());
    }
}

impl FileSystem for MemFs {
    fn read_to_string(&self, path: &Path) -> Result<String, PortError> {
        let bytes = self.read(path)?;
        Ok(String::from_utf8(bytes)?)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>, PortError> {
        let files = self.files.lock().unwrap();
        files.get(path).cloned().ok_or_else(|| format!("File not found: {}", path.display()).into())
    }

    fn write(&self, path: &Path, contents: &str) -> Result<(), PortError> {
        if self.failing_writes.lock().unwrap().iter().any(|p| p == path) {
            return Err(format!("write refused: {}", path.display()).into());
        }
        self.insert(path, contents);
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.keys().any(|k| k.starts_with(path) && k != path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }

    fn is_symlink(&self, path: &Path) -> bool {
        self.symlinks.lock().unwrap().iter().any(|p| p == path)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<String>, PortError> {
        if !self.is_dir(path) {
            return Err(format!("Not a directory: {}", path.display()).into());
        }
        let files = self.files.lock().unwrap();
        let mut names: Vec<String> = files
            .keys()
            .filter_map(|k| k.strip_prefix(path).ok())
            .filter_map(|rest| rest.components().next())
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}

/// LLM client that answers from a queue of canned replies and counts calls.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, String>>>,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Arc::new(AtomicUsize::new(0)),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Shared call counter, readable after the client is boxed.
    pub fn calls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }

    /// Shared log of prompts received.
    pub fn prompts(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.prompts)
    }
}

impl LlmClient for ScriptedLlm {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err("no scripted reply left".to_string()));
        Box::pin(async move {
            reply
                .map(|text| CompletionResponse { text, ..CompletionResponse::default() })
                .map_err(PortError::from)
        })
    }

    fn model(&self) -> &str {
        "scripted"
    }
}
