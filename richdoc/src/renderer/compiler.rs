//! Structured document compiler
//!
//! Walks a [`DocumentNode`] tree in document order and writes HTML for each
//! node kind. Heading ids are allocated through the [`RenderContext`] so that
//! the table of contents built from the same context links to them exactly.

use super::code_block::code_block_html;
use super::context::RenderContext;
use super::escape::escape_html;
use super::marks::apply_marks;
use crate::document_tree::{DocumentNode, NodeKind};

/// Deepest node nesting compiled structurally
///
/// Subtrees below this depth degrade to their escaped plain text. Parsed trees
/// may nest up to [`MAX_PARSE_DEPTH`](crate::document_tree::MAX_PARSE_DEPTH),
/// so the degraded path is reachable from JSON input.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Placeholder body of an empty paragraph, so blank lines are preserved
pub const EMPTY_PARAGRAPH: &str = "<p>&nbsp;</p>\n";

/// Compile a node tree to HTML
///
/// # Parameters
/// * `node` - Root of the tree (normally a `document` node)
/// * `ctx` - Per-render context; headings are recorded into it
///
/// # Returns
/// * `String` - The compiled markup
pub fn compile(node: &DocumentNode, ctx: &mut RenderContext<'_>) -> String {
    let mut output = String::new();
    write_node(&mut output, node, ctx, 0);
    output
}

/// Write a single node to the output
fn write_node(output: &mut String, node: &DocumentNode, ctx: &mut RenderContext<'_>, depth: usize) {
    if depth > MAX_NESTING_DEPTH {
        log::debug!(
            "Nesting deeper than {} levels, rendering '{}' as plain text",
            MAX_NESTING_DEPTH,
            node.kind.tag()
        );
        output.push_str(&escape_html(&node.plain_text()));
        return;
    }

    match &node.kind {
        NodeKind::Document => {
            write_children(output, node, ctx, depth);
        }

        NodeKind::Paragraph => {
            let mut body = String::new();
            write_children(&mut body, node, ctx, depth);
            if body.is_empty() {
                output.push_str(EMPTY_PARAGRAPH);
            } else {
                output.push_str(&format!("<p>{}</p>\n", body));
            }
        }

        NodeKind::Heading => {
            write_heading(output, node, ctx, depth);
        }

        NodeKind::Text => {
            output.push_str(&apply_marks(
                node.text.as_deref().unwrap_or(""),
                &node.marks,
            ));
        }

        NodeKind::BulletList => {
            output.push_str("<ul>\n");
            write_children(output, node, ctx, depth);
            output.push_str("</ul>\n");
        }

        NodeKind::OrderedList => {
            match node.list_start() {
                Some(start) if start != 1 => {
                    output.push_str(&format!("<ol start=\"{}\">\n", start));
                }
                _ => output.push_str("<ol>\n"),
            }
            write_children(output, node, ctx, depth);
            output.push_str("</ol>\n");
        }

        NodeKind::ListItem => {
            output.push_str("<li>");
            write_children(output, node, ctx, depth);
            output.push_str("</li>\n");
        }

        NodeKind::CodeBlock => {
            output.push_str(&code_block_html(node.language(), &node.plain_text()));
        }

        NodeKind::Blockquote => {
            output.push_str("<blockquote>\n");
            write_children(output, node, ctx, depth);
            output.push_str("</blockquote>\n");
        }

        NodeKind::Image => {
            write_image(output, node);
        }

        NodeKind::HardBreak => {
            output.push_str("<br />");
        }

        NodeKind::Unknown(tag) => {
            log::debug!("Unknown node kind '{}', rendering its children", tag);
            write_children(output, node, ctx, depth);
        }
    }
}

/// Write every child of `node` in order
fn write_children(
    output: &mut String,
    node: &DocumentNode,
    ctx: &mut RenderContext<'_>,
    depth: usize,
) {
    for child in &node.content {
        write_node(output, child, ctx, depth + 1);
    }
}

/// Write a heading with its allocated id
fn write_heading(output: &mut String, node: &DocumentNode, ctx: &mut RenderContext<'_>, depth: usize) {
    let level = node.heading_level();
    let id = ctx.assign_heading_id(&node.plain_text(), level);

    let mut body = String::new();
    write_children(&mut body, node, ctx, depth);

    if ctx.config().headings.anchor_links {
        body.push_str(&anchor_link(&id));
    }

    output.push_str(&format!(
        "<h{} id=\"{}\">{}</h{}>\n",
        level,
        escape_html(&id),
        body,
        level
    ));
}

/// Self-link placed inside a heading when anchor links are enabled
pub(crate) fn anchor_link(id: &str) -> String {
    format!(
        "<a href=\"#{}\" class=\"heading-anchor\" aria-hidden=\"true\">#</a>",
        escape_html(id)
    )
}

/// Write an image reference; the source is not fetched or validated
fn write_image(output: &mut String, node: &DocumentNode) {
    let src = node.attr_str("src").unwrap_or("");
    let alt = node.attr_str("alt").unwrap_or("");

    match node.attr_str("title") {
        Some(title) if !title.is_empty() => {
            output.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\" title=\"{}\" />",
                escape_html(src),
                escape_html(alt),
                escape_html(title)
            ));
        }
        _ => {
            output.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\" />",
                escape_html(src),
                escape_html(alt)
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_tree::Mark;
    use crate::render_config::RendererConfig;
    use serde_json::Value;

    fn compile_default(node: &DocumentNode) -> String {
        let config = RendererConfig::default();
        let mut ctx = RenderContext::new(&config);
        compile(node, &mut ctx)
    }

    #[test]
    fn test_paragraph() {
        let doc = DocumentNode::document(vec![DocumentNode::paragraph(vec![
            DocumentNode::text("Hello "),
            DocumentNode::marked_text("world", vec![Mark::italic()]),
        ])]);
        assert_eq!(compile_default(&doc), "<p>Hello <em>world</em></p>\n");
    }

    #[test]
    fn test_empty_paragraph_placeholder() {
        let doc = DocumentNode::document(vec![
            DocumentNode::paragraph(vec![]),
            DocumentNode::paragraph(vec![DocumentNode::text("")]),
        ]);
        assert_eq!(compile_default(&doc), format!("{}{}", EMPTY_PARAGRAPH, EMPTY_PARAGRAPH));
    }

    #[test]
    fn test_heading_keeps_marks_and_gets_id() {
        let heading = DocumentNode::new(NodeKind::Heading)
            .with_attr("level", Value::from(2))
            .with_content(vec![
                DocumentNode::text("Getting "),
                DocumentNode::marked_text("Started", vec![Mark::bold()]),
            ]);
        assert_eq!(
            compile_default(&heading),
            "<h2 id=\"getting-started\">Getting <strong>Started</strong></h2>\n"
        );
    }

    #[test]
    fn test_heading_anchor_links() {
        let mut config = RendererConfig::default();
        config.headings.anchor_links = true;
        let mut ctx = RenderContext::new(&config);
        let html = compile(&DocumentNode::heading(1, "Intro"), &mut ctx);
        assert_eq!(
            html,
            "<h1 id=\"intro\">Intro<a href=\"#intro\" class=\"heading-anchor\" aria-hidden=\"true\">#</a></h1>\n"
        );
    }

    #[test]
    fn test_lists() {
        let list = DocumentNode::new(NodeKind::OrderedList)
            .with_attr("start", Value::from(3))
            .with_content(vec![DocumentNode::new(NodeKind::ListItem)
                .with_content(vec![DocumentNode::paragraph(vec![DocumentNode::text("three")])])]);
        assert_eq!(
            compile_default(&list),
            "<ol start=\"3\">\n<li><p>three</p>\n</li>\n</ol>\n"
        );

        let bullets = DocumentNode::new(NodeKind::BulletList)
            .with_content(vec![DocumentNode::new(NodeKind::ListItem)]);
        assert_eq!(compile_default(&bullets), "<ul>\n<li></li>\n</ul>\n");
    }

    #[test]
    fn test_code_block_escaped_and_tagged() {
        let html = compile_default(&DocumentNode::code_block(Some("json"), "{\"a\": \"<b>\"}"));
        assert_eq!(
            html,
            "<pre><code class=\"language-json\">{&quot;a&quot;: &quot;&lt;b&gt;&quot;}</code></pre>\n"
        );
        let plain = compile_default(&DocumentNode::code_block(None, "x"));
        assert!(plain.contains("class=\"language-plaintext\""));
    }

    #[test]
    fn test_blockquote_and_hard_break() {
        let quote = DocumentNode::new(NodeKind::Blockquote).with_content(vec![
            DocumentNode::paragraph(vec![
                DocumentNode::text("a"),
                DocumentNode::new(NodeKind::HardBreak),
                DocumentNode::text("b"),
            ]),
        ]);
        assert_eq!(
            compile_default(&quote),
            "<blockquote>\n<p>a<br />b</p>\n</blockquote>\n"
        );
    }

    #[test]
    fn test_image() {
        let image = DocumentNode::new(NodeKind::Image)
            .with_attr("src", Value::from("/img/a.png"))
            .with_attr("alt", Value::from("A \"chart\""));
        assert_eq!(
            compile_default(&image),
            "<img src=\"/img/a.png\" alt=\"A &quot;chart&quot;\" />"
        );

        let titled = image.with_attr("title", Value::from("Figure 1"));
        assert!(compile_default(&titled).contains("title=\"Figure 1\""));
    }

    #[test]
    fn test_unknown_kind_forwards_children() {
        let callout = DocumentNode::new(NodeKind::Unknown("callout".to_string()))
            .with_content(vec![DocumentNode::paragraph(vec![DocumentNode::text("note")])]);
        assert_eq!(compile_default(&callout), "<p>note</p>\n");

        let empty = DocumentNode::new(NodeKind::Unknown("divider".to_string()));
        assert_eq!(compile_default(&empty), "");
    }

    #[test]
    fn test_deep_nesting_degrades_to_text() {
        let mut node = DocumentNode::text("deep <text>");
        for _ in 0..(MAX_NESTING_DEPTH + 10) {
            node = DocumentNode::new(NodeKind::Blockquote).with_content(vec![node]);
        }
        let html = compile_default(&node);
        assert!(html.contains("deep &lt;text&gt;"));
        assert_eq!(html.matches("<blockquote>").count(), MAX_NESTING_DEPTH + 1);
    }

    #[test]
    fn test_parse_depth_covers_nesting_depth() {
        assert!(crate::document_tree::MAX_PARSE_DEPTH > MAX_NESTING_DEPTH);
    }
}
