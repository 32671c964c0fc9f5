//! Code block emission
//!
//! Both compilation paths (structured `codeBlock` nodes and Markdown fenced or
//! indented code) go through [`code_block_html`], so they escape and tag code
//! identically.

use super::escape::escape_html;

/// Language tag used when none is given or the given one is not recognized
pub const PLAIN_TEXT: &str = "plaintext";

/// Language tags a downstream highlighter is expected to understand
const KNOWN_LANGUAGES: &[&str] = &[
    "bash", "c", "clojure", "cpp", "cs", "csharp", "css", "diff", "erlang", "go", "haskell",
    "html", "java", "javascript", "js", "json", "kotlin", "latex", "lua", "makefile", "markdown",
    "md", "objectivec", "ocaml", "perl", "php", "plaintext", "py", "python", "r", "rb", "ruby",
    "rs", "rust", "scala", "sh", "shell", "sql", "swift", "tex", "text", "toml", "ts",
    "typescript", "xml", "yaml", "yml",
];

/// Normalize a language attribute into a recognized tag
///
/// Tags are compared case-insensitively; anything unknown becomes
/// [`PLAIN_TEXT`].
pub fn normalize_language(language: Option<&str>) -> String {
    let Some(language) = language else {
        return PLAIN_TEXT.to_string();
    };

    let tag = language.trim().to_ascii_lowercase();
    if KNOWN_LANGUAGES.contains(&tag.as_str()) {
        tag
    } else {
        if !tag.is_empty() {
            log::debug!("Unrecognized code language '{}', using plaintext", language);
        }
        PLAIN_TEXT.to_string()
    }
}

/// Emit a code block with escaped content and a `language-*` class
pub fn code_block_html(language: Option<&str>, code: &str) -> String {
    format!(
        "<pre><code class=\"language-{}\">{}</code></pre>\n",
        normalize_language(language),
        escape_html(code)
    )
}
