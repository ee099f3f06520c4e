//! Parser for the `.svi` section format.
//!
//! A task file is a sequence of `# Header` lines, each followed by a body:
//!
//! ```text
//! # Destination File
//! out/hello.go
//! # Options
//! Active=True
//! ProgrammingLanguage=Go
//! # Prompt
//! Print hello world
//! ```
//!
//! `//` line comments and `/* */` block comments are removed before the
//! sections are split.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::error::SviError;
use crate::ports::filesystem::FileSystem;

/// Option key that switches a task on or off.
pub const OPTION_ACTIVE: &str = "Active";
/// Option key naming the target programming language.
pub const OPTION_LANGUAGE: &str = "ProgrammingLanguage";

/// Value of a `key=value` line in the Options section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// `true` / `false`, case-insensitive.
    Bool(bool),
    /// Anything else, verbatim.
    Text(String),
}

impl OptionValue {
    /// Returns the boolean value, if this is one.
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Text(_) => None,
        }
    }

    /// Returns the text value, if this is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Bool(_) => None,
        }
    }

    fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("true") {
            Self::Bool(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Self::Bool(false)
        } else {
            Self::Text(raw.to_string())
        }
    }
}

/// Options in the order they appear. Keys are unique and case-sensitive;
/// a repeated key overwrites the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionMap {
    entries: Vec<(String, OptionValue)>,
}

impl OptionMap {
    /// Looks up an option by exact key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Sets an option, replacing an existing value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }
}

/// Parsed form of one task file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFile {
    /// Output path, relative to the task file's directory unless absolute.
    pub destination_file: Option<String>,
    /// Free-text descriptions of the input parameters.
    pub input_parameters: Vec<String>,
    /// Free-text descriptions of the output.
    pub output_spec: Vec<String>,
    /// `key=value` options (`Active`, `ProgrammingLanguage`, ...).
    pub options: OptionMap,
    /// Extra context blocks appended to the generation request.
    pub import_prompts: Vec<String>,
    /// The main instruction body.
    pub prompt: Option<String>,
    /// Headers that were not recognized, kept for diagnostics.
    pub unknown_sections: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Destination,
    Input,
    Output,
    Options,
    ImportPrompts,
    Prompt,
}

impl Section {
    fn from_header(header: &str) -> Option<Self> {
        match header.trim().to_ascii_lowercase().as_str() {
            "destination file" => Some(Self::Destination),
            "input parameters" => Some(Self::Input),
            "output" => Some(Self::Output),
            "options" => Some(Self::Options),
            "import prompts" => Some(Self::ImportPrompts),
            "prompt" => Some(Self::Prompt),
            _ => None,
        }
    }
}

fn block_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment regex"))
}

fn line_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"//[^\r\n]*").expect("valid line comment regex"))
}

/// Removes `/* ... */` and `// ...` comments.
#[must_use]
pub fn strip_comments(content: &str) -> String {
    let without_blocks = block_comment().replace_all(content, "");
    line_comment().replace_all(&without_blocks, "").into_owned()
}

/// Splits text into `(header, body)` pairs on lines starting with `#`.
/// Text before the first header is dropped.
fn split_sections(content: &str) -> Vec<(String, String)> {
    let mut sections: Vec<(String, Vec<&str>)> = Vec::new();
    for line in content.lines() {
        if let Some(header) = line.trim_start().strip_prefix('#') {
            sections.push((header.trim().to_string(), Vec::new()));
        } else if let Some((_, body)) = sections.last_mut() {
            body.push(line);
        }
    }
    sections.into_iter().map(|(header, body)| (header, body.join("\n"))).collect()
}

/// Splits on newlines or commas, trims, and drops empty entries.
fn parse_list(body: &str) -> Vec<String> {
    body.split(['\n', ','])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn parse_options(body: &str, options: &mut OptionMap) {
    for line in body.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }
        options.insert(key, OptionValue::parse(value));
    }
}

impl TaskFile {
    /// Parses task-file text. Never fails: unknown sections are recorded in
    /// [`TaskFile::unknown_sections`] and everything else is best-effort.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let cleaned = strip_comments(content);
        let mut task = Self::default();

        for (header, body) in split_sections(&cleaned) {
            let Some(section) = Section::from_header(&header) else {
                if !header.is_empty() {
                    warn!(section = %header, "ignoring unknown section");
                    task.unknown_sections.push(header);
                }
                continue;
            };

            match section {
                Section::Destination => {
                    if let Some(line) = body.lines().map(str::trim).find(|l| !l.is_empty()) {
                        task.destination_file = Some(line.to_string());
                    }
                }
                Section::Input => task.input_parameters.extend(parse_list(&body)),
                Section::Output => task.output_spec.extend(parse_list(&body)),
                Section::ImportPrompts => task.import_prompts.extend(parse_list(&body)),
                Section::Options => parse_options(&body, &mut task.options),
                Section::Prompt => {
                    let prompt = body.trim();
                    task.prompt = (!prompt.is_empty()).then(|| prompt.to_string());
                }
            }
        }

        task
    }

    /// Reads and parses a task file through the filesystem port.
    ///
    /// # Errors
    ///
    /// Returns [`SviError::NotFound`] when the path does not exist and
    /// [`SviError::Io`] when it cannot be read as text.
    pub fn parse_file(fs: &dyn FileSystem, path: &Path) -> Result<Self, SviError> {
        if !fs.is_file(path) {
            return Err(SviError::NotFound(path.to_path_buf()));
        }
        let content = fs.read_to_string(path).map_err(|e| SviError::io(path, e))?;
        Ok(Self::parse(&content))
    }

    /// A task is active unless its `Active` option is explicitly `false`.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.options.get(OPTION_ACTIVE).and_then(OptionValue::as_bool) != Some(false)
    }

    /// The trimmed destination, if present and non-blank.
    #[must_use]
    pub fn destination(&self) -> Option<&str> {
        self.destination_file.as_deref().map(str::trim).filter(|d| !d.is_empty())
    }

    /// The `ProgrammingLanguage` option, if set to non-empty text.
    #[must_use]
    pub fn programming_language(&self) -> Option<&str> {
        self.options
            .get(OPTION_LANGUAGE)
            .and_then(OptionValue::as_text)
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }
}
