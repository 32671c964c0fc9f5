//! Syntax highlighting service
//!
//! The enhancer talks to highlighting through the [`Highlighter`] trait; the
//! bundled implementation uses syntect's default syntaxes and emits classed
//! `<span>`s, styled by the CSS from [`theme_css`].

use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use thiserror::Error;

/// Class style for syntect (prefix avoids CSS conflicts with page styles)
const CLASS_STYLE: ClassStyle = ClassStyle::SpacedPrefixed { prefix: "hl-" };

/// Errors reported by a highlighter
///
/// None of these are fatal to the enhancer: the affected block stays plain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HighlightError {
    #[error("language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("failed to highlight {language}: {message}")]
    HighlightFailed { language: String, message: String },

    #[error("unknown highlight theme: {0}")]
    UnknownTheme(String),
}

/// A syntax highlighter keyed by language tag
pub trait Highlighter: Send + Sync {
    /// Highlight raw `code`, returning markup safe to embed in a `<code>` element
    fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError>;
}

/// Highlighter backed by syntect's bundled syntax definitions
pub struct SyntectHighlighter {
    syntaxes: SyntaxSet,
}

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self {
            syntaxes: SyntaxSet::load_defaults_newlines(),
        }
    }
}

impl Default for SyntectHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str) -> Result<String, HighlightError> {
        let syntax = self
            .syntaxes
            .find_syntax_by_token(syntax_token(language))
            .ok_or_else(|| HighlightError::UnsupportedLanguage(language.to_string()))?;

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &self.syntaxes, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            generator
                .parse_html_for_line_which_includes_newline(line)
                .map_err(|e| HighlightError::HighlightFailed {
                    language: language.to_string(),
                    message: e.to_string(),
                })?;
        }

        Ok(generator.finalize())
    }
}

/// Map a code block language tag to the token syntect knows it by
fn syntax_token(language: &str) -> &str {
    match language {
        "typescript" | "ts" | "javascript" => "js",
        "python" => "py",
        "rust" => "rs",
        "ruby" => "rb",
        "shell" | "bash" => "sh",
        "csharp" => "cs",
        "markdown" => "md",
        "yml" => "yaml",
        "text" | "plaintext" => "txt",
        other => other,
    }
}

/// CSS for one of syntect's bundled themes, matching the emitted classes
pub fn theme_css(theme_name: &str) -> Result<String, HighlightError> {
    let themes = ThemeSet::load_defaults();
    let theme = themes
        .themes
        .get(theme_name)
        .ok_or_else(|| HighlightError::UnknownTheme(theme_name.to_string()))?;

    css_for_theme_with_class_style(theme, CLASS_STYLE).map_err(|e| {
        HighlightError::HighlightFailed {
            language: "css".to_string(),
            message: e.to_string(),
        }
    })
}
