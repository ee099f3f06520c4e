//! `svi run` command.

use std::env;
use std::path::Path;

use tracing::{debug, info};

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::adapters::live::{backend_for, DEFAULT_MODEL};
use crate::cli::RunArgs;
use crate::config::{find_project_root, RunConfig, CONFIG_FILE_NAME};
use crate::context::ServiceContext;
use crate::runner::Runner;

/// Execute the `run` command from `cwd`.
///
/// Loads the optional `.env` file, finds the project root holding
/// `svi.json`, builds the backend and processes every stale task file.
/// Individual task failures are logged and counted; they do not fail the
/// command.
///
/// # Errors
///
/// Returns an error string when the env file, the configuration or the
/// backend cannot be loaded, or when discovery fails.
pub fn run(cwd: &Path, args: &RunArgs) -> Result<(), String> {
    load_env(cwd, args.env_file.as_deref())?;

    let root = find_project_root(&LiveFileSystem, cwd).ok_or_else(|| {
        format!("Configuration file {CONFIG_FILE_NAME} not found in {} or any parent", cwd.display())
    })?;
    let config =
        RunConfig::load(&LiveFileSystem, &root.join(CONFIG_FILE_NAME)).map_err(|e| e.to_string())?;
    info!(root = %root.display(), "configuration loaded");
    debug!(
        language = %config.programming_language,
        search_paths = ?config.search_paths,
        ignore_paths = ?config.ignore_paths,
        "run configuration"
    );

    let model = args
        .model
        .clone()
        .or_else(|| env::var("SVI_MODEL").ok())
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());
    let llm = backend_for(&model, args.api_key.as_deref()).map_err(|e| e.to_string())?;
    let ctx = ServiceContext::live(llm);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))?;
    let report = runtime
        .block_on(Runner::new(&ctx, &config, &root).run())
        .map_err(|e| e.to_string())?;

    println!("{report}");
    Ok(())
}

/// Loads `env_file` (relative to `cwd`) or, without one, an optional `.env`.
fn load_env(cwd: &Path, env_file: Option<&Path>) -> Result<(), String> {
    match env_file {
        Some(path) => {
            let path = cwd.join(path);
            dotenvy::from_path(&path)
                .map_err(|e| format!("Failed to load env file {}: {e}", path.display()))?;
            debug!(path = %path.display(), "env file loaded");
        }
        None => {
            let path = cwd.join(".env");
            if dotenvy::from_path(&path).is_ok() {
                debug!(path = %path.display(), "env file loaded");
            }
        }
    }
    Ok(())
}
