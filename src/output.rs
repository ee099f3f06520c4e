//! Post-processing of backend responses before they are written.

use std::sync::OnceLock;

use regex::Regex;

fn opening_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"```[A-Za-z0-9_+#.\-]*[ \t]*\r?\n").expect("valid opening fence regex")
    })
}

/// Removes Markdown code fences (```` ```lang ```` openers and closing
/// ```` ``` ````) and trims the result.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    opening_fence().replace_all(text, "").replace("```", "").trim().to_string()
}
