//! Input format detection
//!
//! No format flag accompanies stored content. Content that looks like a JSON
//! object with a `"type"` key is tried as a document tree; everything else is
//! Markdown. Only invalid JSON (or JSON nested beyond
//! [`MAX_PARSE_DEPTH`](crate::document_tree::MAX_PARSE_DEPTH)) falls back: a
//! tree with malformed fields is repaired and rendered, not rejected.

use crate::document_tree::DocumentNode;
use serde::Serialize;

/// Which compilation path a piece of content took
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Structured,
    Markdown,
}

/// Content after format detection
#[derive(Debug)]
pub enum SniffedContent<'a> {
    /// A parsed document tree
    Structured(DocumentNode),
    /// Markdown source (the original, untrimmed input)
    Markdown(&'a str),
}

impl SniffedContent<'_> {
    pub fn format(&self) -> SourceFormat {
        match self {
            SniffedContent::Structured(_) => SourceFormat::Structured,
            SniffedContent::Markdown(_) => SourceFormat::Markdown,
        }
    }
}

/// Cheap check for content that may be a serialized document tree
pub fn looks_structured(content: &str) -> bool {
    let trimmed = content.trim();
    trimmed.starts_with('{') && trimmed.contains("\"type\"")
}

/// Detect the format of `content`, parsing it when it is a document tree
///
/// A JSON syntax error is not an error here: the content falls back to Markdown.
pub fn sniff(content: &str) -> SniffedContent<'_> {
    if !looks_structured(content) {
        return SniffedContent::Markdown(content);
    }

    match DocumentNode::from_json(content.trim()) {
        Ok(root) => SniffedContent::Structured(root),
        Err(e) => {
            log::debug!("Content is not a document tree ({}), rendering as Markdown", e);
            SniffedContent::Markdown(content)
        }
    }
}
