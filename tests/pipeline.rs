//! End-to-end runs of the generation pipeline against real directories.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use svi::adapters::live::filesystem::LiveFileSystem;
use svi::config::RunConfig;
use svi::context::ServiceContext;
use svi::discover::discover;
use svi::ports::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
use svi::runner::{Runner, SkipReason, TaskOutcome};

/// Backend that always answers with the same fenced snippet.
struct FixedLlm {
    calls: Arc<AtomicUsize>,
}

impl LlmClient for FixedLlm {
    fn complete(&self, _request: &CompletionRequest) -> CompletionFuture<'_> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Box::pin(async {
            Ok(CompletionResponse {
                text: "```go\nfmt.Println(\"hi\")\n```".into(),
                ..CompletionResponse::default()
            })
        })
    }

    fn model(&self) -> &str {
        "fixed"
    }
}

fn project(name: &str) -> PathBuf {
    let root = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(root.join("tasks/skip")).unwrap();
    std::fs::write(
        root.join("tasks/hello.svi"),
        "# Destination File\nout/hello.go\n# Options\nActive=True\nProgrammingLanguage=Go\n\
         # Prompt\nPrint hello world\n",
    )
    .unwrap();
    std::fs::write(
        root.join("tasks/off.svi"),
        "# Destination File\noff.go\n# Options\nActive=False\n# Prompt\nunused\n",
    )
    .unwrap();
    std::fs::write(
        root.join("tasks/skip/ignored.svi"),
        "# Destination File\nignored.go\n# Prompt\nunused\n",
    )
    .unwrap();
    root
}

fn config() -> RunConfig {
    RunConfig {
        programming_language: "Go".into(),
        search_paths: vec!["tasks".into()],
        ignore_paths: vec!["tasks/skip".into()],
    }
}

fn context(calls: &Arc<AtomicUsize>) -> ServiceContext {
    ServiceContext::new(Box::new(LiveFileSystem), Box::new(FixedLlm { calls: Arc::clone(calls) }))
}

fn outcome<'a>(report: &'a svi::runner::RunReport, path: &Path) -> &'a TaskOutcome {
    report.outcome(path).expect("task file was discovered")
}

#[tokio::test]
async fn regenerates_only_when_needed() {
    let root = project("svi_pipeline_idempotence");
    let calls = Arc::new(AtomicUsize::new(0));
    let ctx = context(&calls);
    let config = config();
    let runner = Runner::new(&ctx, &config, &root);
    let hello = root.join("tasks/hello.svi");
    let output = root.join("tasks/out/hello.go");

    let first = runner.run().await.unwrap();
    assert_eq!(first.discovered(), 2);
    assert_eq!(outcome(&first, &hello), &TaskOutcome::Generated(output.clone()));
    assert_eq!(
        outcome(&first, &root.join("tasks/off.svi")),
        &TaskOutcome::Skipped(SkipReason::Inactive)
    );
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "fmt.Println(\"hi\")");
    assert!(!root.join("tasks/skip/ignored.go").exists());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let cache = std::fs::read_to_string(root.join("tasks/.svicache")).unwrap();
    assert!(cache.starts_with("hello.svi "));
    assert!(!cache.contains("off.svi"));

    let second = runner.run().await.unwrap();
    assert_eq!(outcome(&second, &hello), &TaskOutcome::Skipped(SkipReason::UpToDate));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    std::fs::remove_file(&output).unwrap();
    let third = runner.run().await.unwrap();
    assert_eq!(outcome(&third, &hello), &TaskOutcome::Generated(output.clone()));
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let mut edited = std::fs::read(&hello).unwrap();
    edited.push(b'\n');
    std::fs::write(&hello, edited).unwrap();
    let fourth = runner.run().await.unwrap();
    assert_eq!(fourth.generated(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    let _ = std::fs::remove_dir_all(&root);
}

#[tokio::test]
async fn cache_survives_a_fresh_runner() {
    let root = project("svi_pipeline_fresh_runner");
    let calls = Arc::new(AtomicUsize::new(0));
    let config = config();

    let ctx = context(&calls);
    Runner::new(&ctx, &config, &root).run().await.unwrap();

    let ctx = context(&calls);
    let report = Runner::new(&ctx, &config, &root).run().await.unwrap();

    assert_eq!(report.generated(), 0);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    let _ = std::fs::remove_dir_all(&root);
}

#[cfg(unix)]
#[test]
fn discovery_does_not_loop_through_symlinked_directories() {
    let root = std::env::temp_dir().join("svi_pipeline_symlink_loop");
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(root.join("tasks")).unwrap();
    std::fs::write(root.join("tasks/a.svi"), "# Prompt\nx\n").unwrap();
    std::os::unix::fs::symlink(root.join("tasks"), root.join("tasks/loop")).unwrap();

    let found = discover(&LiveFileSystem, &["tasks".to_string()], &[], &root).unwrap();
    assert_eq!(found, vec![root.join("tasks/a.svi")]);

    let _ = std::fs::remove_dir_all(&root);
}
