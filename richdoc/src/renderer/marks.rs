//! Inline mark composition

use super::escape::escape_html;
use crate::document_tree::{Mark, MarkKind};

/// Render a text leaf with its marks applied
///
/// The raw text is escaped first; each mark then wraps the result of the
/// previous one, so the first mark in the array ends up innermost.
pub fn apply_marks(raw_text: &str, marks: &[Mark]) -> String {
    let mut text = escape_html(raw_text);

    for mark in marks {
        text = match &mark.kind {
            MarkKind::Bold => format!("<strong>{}</strong>", text),
            MarkKind::Italic => format!("<em>{}</em>", text),
            MarkKind::Code => format!("<code>{}</code>", text),
            MarkKind::Link => format!(
                "{}{}</a>",
                link_open_tag(mark.href().unwrap_or(""), mark.title()),
                text
            ),
            MarkKind::Unknown(tag) => {
                log::debug!("Skipping unknown mark '{}'", tag);
                text
            }
        };
    }

    text
}

/// Opening `<a>` tag with cross-origin navigation defaults
///
/// The href is attribute-escaped but otherwise passed through unvalidated.
pub(crate) fn link_open_tag(href: &str, title: Option<&str>) -> String {
    match title {
        Some(title) if !title.is_empty() => format!(
            "<a href=\"{}\" title=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">",
            escape_html(href),
            escape_html(title)
        ),
        _ => format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">",
            escape_html(href)
        ),
    }
}
