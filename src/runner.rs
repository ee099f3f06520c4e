//! Run orchestration: discover, check, generate, write, record.
//!
//! Task files are processed one at a time. Each goes through
//!
//! 1. parse
//! 2. activity check (`Active=false` skips)
//! 3. destination check
//! 4. cache check (skip when the fingerprint matches and the output exists)
//! 5. request build
//! 6. backend call
//! 7. code-fence stripping
//! 8. write
//! 9. cache update
//!
//! An error at any step fails only that task; the run carries on with the
//! next file. Only discovery failures abort the run.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::cache::ChangeCache;
use crate::config::RunConfig;
use crate::context::ServiceContext;
use crate::discover::discover;
use crate::error::SviError;
use crate::output::strip_code_fences;
use crate::paths;
use crate::ports::llm::CompletionRequest;
use crate::task::{PromptBuilder, TaskFile};

/// Token ceiling for one generation request.
pub const MAX_TOKENS: u32 = 8192;

/// Why a task was not sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// `Active=false` in the Options section.
    Inactive,
    /// Fingerprint unchanged and the destination file exists.
    UpToDate,
}

/// What happened to one discovered task file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Output was generated and written to the given path.
    Generated(PathBuf),
    /// The task was skipped without calling the backend.
    Skipped(SkipReason),
    /// Processing failed; the message describes the error.
    Failed(String),
}

/// Per-file outcomes of one run, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// `(task file, outcome)` pairs.
    pub outcomes: Vec<(PathBuf, TaskOutcome)>,
}

impl RunReport {
    /// Number of task files found.
    #[must_use]
    pub fn discovered(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of tasks whose output was written.
    #[must_use]
    pub fn generated(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Generated(_)))
    }

    /// Number of inactive or up-to-date tasks.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Skipped(_)))
    }

    /// Number of tasks that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, TaskOutcome::Failed(_)))
    }

    /// Outcome recorded for `path`, if it was discovered.
    #[must_use]
    pub fn outcome(&self, path: &Path) -> Option<&TaskOutcome> {
        self.outcomes.iter().find(|(p, _)| p == path).map(|(_, o)| o)
    }

    fn count(&self, pred: impl Fn(&TaskOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} discovered, {} generated, {} skipped, {} failed",
            self.discovered(),
            self.generated(),
            self.skipped(),
            self.failed()
        )
    }
}

/// Drives one run over the task files of a project.
pub struct Runner<'a> {
    ctx: &'a ServiceContext,
    config: &'a RunConfig,
    root: PathBuf,
    prompts: PromptBuilder,
}

impl<'a> Runner<'a> {
    /// Creates a runner for the project rooted at `root`.
    #[must_use]
    pub fn new(ctx: &'a ServiceContext, config: &'a RunConfig, root: &Path) -> Self {
        Self {
            ctx,
            config,
            root: root.to_path_buf(),
            prompts: PromptBuilder::with_fallback_language(&config.programming_language),
        }
    }

    /// Processes every discovered task file in order.
    ///
    /// # Errors
    ///
    /// Returns an error only when discovery fails; per-task failures are
    /// recorded in the report.
    pub async fn run(&self) -> Result<RunReport, SviError> {
        info!(root = %self.root.display(), "searching for task files");
        let files = discover(
            self.ctx.fs.as_ref(),
            &self.config.search_paths,
            &self.config.ignore_paths,
            &self.root,
        )?;

        let mut report = RunReport::default();
        if files.is_empty() {
            info!("no task files found, nothing to do");
            return Ok(report);
        }
        info!(count = files.len(), model = self.ctx.llm.model(), "found task files");

        for path in files {
            info!(file = %path.display(), "processing");
            let outcome = match self.process(&path).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    error!(file = %path.display(), error = %e, "task failed");
                    TaskOutcome::Failed(e.to_string())
                }
            };
            report.outcomes.push((path, outcome));
        }

        info!("{report}");
        Ok(report)
    }

    /// Runs the pipeline for a single task file.
    ///
    /// # Errors
    ///
    /// Returns the first error hit by any step.
    pub async fn process(&self, path: &Path) -> Result<TaskOutcome, SviError> {
        let fs = self.ctx.fs.as_ref();
        let (dir, file_name) = split_task_path(path)?;

        let task = TaskFile::parse_file(fs, path)?;
        debug!(file = %file_name, "parsed");

        if !task.is_active() {
            info!(file = %file_name, "skipping: Active = false");
            return Ok(TaskOutcome::Skipped(SkipReason::Inactive));
        }

        let destination = task.destination().ok_or(SviError::MissingDestination)?;
        let destination = paths::resolve(dir, destination);

        let mut cache = ChangeCache::open(fs, dir);
        if cache.is_valid(file_name) {
            if fs.is_file(&destination) {
                info!(file = %file_name, "up to date, skipping");
                return Ok(TaskOutcome::Skipped(SkipReason::UpToDate));
            }
            info!(
                file = %file_name,
                destination = %destination.display(),
                "destination missing, regenerating"
            );
        }

        let prompt = self.prompts.build(&task)?;
        debug!(file = %file_name, "prompt built");

        info!(file = %file_name, "asking backend");
        let response = self
            .ctx
            .llm
            .complete(&CompletionRequest::new(prompt, MAX_TOKENS))
            .await
            .map_err(SviError::BackendCall)?;
        debug!(
            file = %file_name,
            prompt_tokens = response.prompt_tokens,
            completion_tokens = response.completion_tokens,
            "backend replied"
        );

        if response.text.trim().is_empty() {
            return Err(SviError::EmptyGenerationResult);
        }
        let code = strip_code_fences(&response.text);
        if code.is_empty() {
            return Err(SviError::EmptyGenerationResult);
        }

        info!(destination = %destination.display(), "writing generated code");
        fs.write(&destination, &code).map_err(|e| SviError::io(&destination, e))?;

        cache.update(file_name)?;
        debug!(file = %file_name, "cache updated");

        Ok(TaskOutcome::Generated(destination))
    }
}

fn split_task_path(path: &Path) -> Result<(&Path, &str), SviError> {
    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let name = path.file_name().and_then(|n| n.to_str()).ok_or_else(|| SviError::Parse {
        path: path.to_path_buf(),
        message: "task file name is not valid UTF-8".into(),
    })?;
    Ok((dir, name))
}
