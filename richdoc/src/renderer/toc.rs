//! Table of contents
//!
//! The outline is assembled from the heading records a render pass leaves in
//! its [`RenderContext`], so TOC links always match the rendered heading ids.

use super::compiler::MAX_NESTING_DEPTH;
use super::context::{HeadingRecord, RenderContext};
use super::escape::escape_html;
use crate::document_tree::{DocumentNode, NodeKind};
use crate::render_config::RendererConfig;
use serde::{Deserialize, Serialize};

/// One entry of the nested outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    pub id: String,
    pub text: String,
    pub level: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocEntry>,
}

impl TocEntry {
    fn from_record(record: &HeadingRecord) -> Self {
        Self {
            id: record.id.clone(),
            text: record.text.clone(),
            level: record.level,
            children: Vec::new(),
        }
    }

    /// This entry and all its descendants, depth-first
    pub fn flatten(&self) -> Vec<&TocEntry> {
        let mut entries = vec![self];
        for child in &self.children {
            entries.extend(child.flatten());
        }
        entries
    }
}

/// Build the table of contents of a document with the default id format
///
/// Runs an independent heading walk on a fresh context; the ids are the ones
/// a render of the same tree assigns.
pub fn build_toc(root: &DocumentNode) -> Vec<TocEntry> {
    let config = RendererConfig::default();
    let mut ctx = RenderContext::new(&config);
    collect_headings(root, &mut ctx);
    nest_headings(ctx.headings())
}

/// Allocate ids for every heading the compiler would render, in document order
///
/// Mirrors the compiler's traversal (same leaf kinds, same depth bound) using
/// an explicit stack instead of recursion.
pub fn collect_headings(root: &DocumentNode, ctx: &mut RenderContext<'_>) {
    let mut stack = vec![(root, 0usize)];

    while let Some((node, depth)) = stack.pop() {
        if depth > MAX_NESTING_DEPTH {
            continue;
        }
        if node.kind == NodeKind::Heading {
            ctx.assign_heading_id(&node.plain_text(), node.heading_level());
        }
        if !node.kind.is_leaf() {
            stack.extend(node.content.iter().rev().map(|child| (child, depth + 1)));
        }
    }
}

/// Nest flat heading records by level
///
/// A heading becomes a child of the most recent heading with a lower level;
/// otherwise it is a sibling at the root.
pub fn nest_headings(records: &[HeadingRecord]) -> Vec<TocEntry> {
    let mut roots: Vec<TocEntry> = Vec::new();
    let mut open: Vec<TocEntry> = Vec::new();

    for record in records {
        while open.last().is_some_and(|last| last.level >= record.level) {
            close_entry(&mut open, &mut roots);
        }
        open.push(TocEntry::from_record(record));
    }

    while !open.is_empty() {
        close_entry(&mut open, &mut roots);
    }

    roots
}

/// Pop the innermost open entry and attach it to its parent (or the root list)
fn close_entry(open: &mut Vec<TocEntry>, roots: &mut Vec<TocEntry>) {
    if let Some(entry) = open.pop() {
        match open.last_mut() {
            Some(parent) => parent.children.push(entry),
            None => roots.push(entry),
        }
    }
}

/// Render the outline as a `<nav>` of nested lists
pub fn render_toc_html(entries: &[TocEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut output = String::from("<nav class=\"table-of-contents\">\n");
    output.push_str("<h2 class=\"toc-title\">Table of Contents</h2>\n");
    write_toc_list(&mut output, entries, 0);
    output.push_str("</nav>\n");
    output
}

fn write_toc_list(output: &mut String, entries: &[TocEntry], depth: usize) {
    output.push_str(&format!("<ul class=\"toc-list toc-level-{}\">\n", depth));
    for entry in entries {
        output.push_str(&format!(
            "<li class=\"toc-item\"><a href=\"#{}\" class=\"toc-link\">{}</a>",
            escape_html(&entry.id),
            escape_html(&entry.text)
        ));
        if !entry.children.is_empty() {
            output.push('\n');
            write_toc_list(output, &entry.children, depth + 1);
        }
        output.push_str("</li>\n");
    }
    output.push_str("</ul>\n");
}
