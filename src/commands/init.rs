//! `svi init` command.

use std::fmt::Write as _;
use std::path::Path;

use tracing::{info, warn};

use crate::adapters::live::filesystem::LiveFileSystem;
use crate::config::{RunConfig, CONFIG_FILE_NAME};
use crate::ports::filesystem::FileSystem;
use crate::task::TASK_EXTENSION;

/// Execute the `init` command in `dir`.
///
/// Without `file`, writes a default `svi.json`. With `file`, writes a task
/// skeleton to `<file>.svi`. An existing file is never overwritten.
///
/// # Errors
///
/// Returns an error string if the file cannot be written.
pub fn run(dir: &Path, file: Option<&str>, lang: Option<&str>) -> Result<(), String> {
    init_with(&LiveFileSystem, dir, file, lang)
}

/// [`run`] against an explicit filesystem.
///
/// # Errors
///
/// Returns an error string if the file cannot be written.
pub fn init_with(
    fs: &dyn FileSystem,
    dir: &Path,
    file: Option<&str>,
    lang: Option<&str>,
) -> Result<(), String> {
    let (target, contents) = match file {
        None => (dir.join(CONFIG_FILE_NAME), default_config(lang)?),
        Some(name) => {
            let base = name.strip_suffix(TASK_EXTENSION).unwrap_or(name);
            (dir.join(format!("{base}{TASK_EXTENSION}")), task_skeleton(base, lang))
        }
    };

    if fs.exists(&target) {
        warn!(path = %target.display(), "file already exists, leaving it untouched");
        return Ok(());
    }

    fs.write(&target, &contents)
        .map_err(|e| format!("Failed to write {}: {e}", target.display()))?;
    info!(path = %target.display(), "created");
    Ok(())
}

fn default_config(lang: Option<&str>) -> Result<String, String> {
    let config = RunConfig {
        programming_language: lang.unwrap_or_default().to_string(),
        search_paths: vec![".".to_string()],
        ignore_paths: Vec::new(),
    };
    config.to_json().map(|json| json + "\n")
}

fn task_skeleton(base: &str, lang: Option<&str>) -> String {
    let stem = Path::new(base).file_name().and_then(|n| n.to_str()).unwrap_or(base);
    let mut out = String::new();
    let _ = writeln!(out, "# Destination File\n{stem}.generated\n");
    out.push_str("# Input parameters\n\n# Output\n\n# Options\nActive=True\n");
    if let Some(lang) = lang {
        let _ = writeln!(out, "ProgrammingLanguage={lang}");
    }
    out.push_str("\n# Prompt\nDescribe what the generated code should do.\n");
    out
}
