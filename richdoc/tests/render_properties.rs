use richdoc::enhancer::{Enhancer, MountedContainer, SyntectHighlighter};
use richdoc::renderer::{build_toc, render, SourceFormat, TocEntry};
use richdoc::{DocumentNode, Mark, NodeKind, Renderer};
use serde_json::json;

fn doc_json(value: serde_json::Value) -> String {
    value.to_string()
}

fn all_ids(entries: &[TocEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(TocEntry::flatten)
        .map(|e| e.id.clone())
        .collect()
}

/// Heading ids in the order they appear in the markup
fn heading_ids(html: &str) -> Vec<String> {
    let pattern = regex::Regex::new(r#"<h[1-6] id="([^"]*)""#).unwrap();
    pattern
        .captures_iter(html)
        .map(|caps| caps[1].to_string())
        .collect()
}

const OUTLINE: &str = r#"{
  "type": "doc",
  "content": [
    {"type": "heading", "attrs": {"level": 1}, "content": [{"type": "text", "text": "Guide"}]},
    {"type": "paragraph", "content": [{"type": "text", "text": "Intro"}]},
    {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Setup"}]},
    {"type": "heading", "attrs": {"level": 3}, "content": [{"type": "text", "text": "Linux"}]},
    {"type": "blockquote", "content": [
      {"type": "heading", "attrs": {"level": 3}, "content": [{"type": "text", "text": "Setup"}]}
    ]},
    {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Usage"}]},
    {"type": "heading", "attrs": {"level": 1}, "content": [{"type": "text", "text": "Appendix"}]}
  ]
}"#;

#[test]
fn test_repeated_renders_are_identical() {
    let renderer = Renderer::default();
    let first = renderer.render(OUTLINE);
    for _ in 0..5 {
        assert_eq!(renderer.render(OUTLINE), first);
    }
    assert_eq!(render(OUTLINE), first);
}

#[test]
fn test_duplicate_heading_ids_are_unique() {
    let content = doc_json(json!({
        "type": "doc",
        "content": [
            {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "FAQ"}]},
            {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "FAQ"}]},
            {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "FAQ"}]}
        ]
    }));

    let ids = heading_ids(&render(&content).html);
    assert_eq!(ids, ["faq", "faq-2", "faq-3"]);
}

#[test]
fn test_toc_ids_match_heading_ids() {
    let rendered = render(OUTLINE);
    assert_eq!(all_ids(&rendered.toc), heading_ids(&rendered.html));

    let root = DocumentNode::from_json(OUTLINE).unwrap();
    assert_eq!(build_toc(&root), rendered.toc);
}

#[test]
fn test_toc_nests_by_level() {
    let toc = render(OUTLINE).toc;

    assert_eq!(toc.len(), 2);
    assert_eq!(toc[0].text, "Guide");
    assert_eq!(toc[0].children.len(), 2);
    assert_eq!(toc[0].children[0].id, "setup");
    assert_eq!(
        toc[0].children[0]
            .children
            .iter()
            .map(|e| e.id.as_str())
            .collect::<Vec<_>>(),
        ["linux", "setup-2"]
    );
    assert_eq!(toc[0].children[1].id, "usage");
    assert_eq!(toc[1].id, "appendix");
    assert!(toc[1].children.is_empty());
}

#[test]
fn test_markdown_toc_matches_headings() {
    let rendered = render("# A\n\ntext\n\n## B\n\n## B\n\n# C\n");
    assert_eq!(rendered.source, SourceFormat::Markdown);
    assert_eq!(all_ids(&rendered.toc), heading_ids(&rendered.html));
    assert_eq!(all_ids(&rendered.toc), ["a", "b", "b-2", "c"]);
}

#[test]
fn test_code_is_escaped_on_both_paths() {
    let code = "<script>alert(\"x\" && 'y')</script>";

    let structured = render(&doc_json(json!({
        "type": "doc",
        "content": [{
            "type": "codeBlock",
            "attrs": {"language": "html"},
            "content": [{"type": "text", "text": code}]
        }]
    })));
    let markdown = render(&format!("```html\n{}\n```\n", code));

    for html in [&structured.html, &markdown.html] {
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;alert(&quot;x&quot; &amp;&amp; &#39;y&#39;)&lt;/script&gt;"));
        assert!(html.starts_with("<pre><code class=\"language-html\">"));
    }
}

#[test]
fn test_text_and_attributes_are_escaped() {
    let rendered = render(&doc_json(json!({
        "type": "doc",
        "content": [
            {"type": "paragraph", "content": [{"type": "text", "text": "<b>not bold</b>"}]},
            {"type": "image", "attrs": {"src": "x\" onerror=\"alert(1)", "alt": "<alt>"}}
        ]
    })));

    assert!(rendered.html.contains("<p>&lt;b&gt;not bold&lt;/b&gt;</p>"));
    assert!(rendered.html.contains("src=\"x&quot; onerror=&quot;alert(1)\""));
    assert!(rendered.html.contains("alt=\"&lt;alt&gt;\""));
}

#[test]
fn test_total_on_edge_inputs() {
    for content in [
        "",
        "   \n\t",
        "{",
        "{\"type\"",
        "{\"type\": 42}",
        "{\"type\": \"doc\", \"content\": null}",
        "{\"type\": \"doc\", \"content\": [null]}",
        "{\"type\": \"heading\", \"attrs\": {\"level\": \"x\"}}",
        "[]",
        "```",
        "\u{0}\u{feff}",
    ] {
        let _ = render(content);
    }
}

/// `depth` nested nodes of `kind` around `inner`, wrapped in a document
fn nested_json(kind: &str, depth: usize, inner: serde_json::Value) -> String {
    let open = format!("{{\"type\":\"{}\",\"content\":[", kind);
    format!(
        "{{\"type\":\"doc\",\"content\":[{}{}{}]}}",
        open.repeat(depth),
        inner,
        "]}".repeat(depth)
    )
}

#[test]
fn test_deeply_nested_list_renders_structurally() {
    let mut node = json!({"type": "paragraph", "content": [{"type": "text", "text": "leaf"}]});
    for _ in 0..40 {
        node = json!({"type": "bulletList", "content": [{"type": "listItem", "content": [node]}]});
    }
    let content = doc_json(json!({"type": "doc", "content": [node]}));

    let rendered = render(&content);
    assert_eq!(rendered.source, SourceFormat::Structured);
    assert_eq!(rendered.html.matches("<ul>").count(), 40);
    assert!(rendered.html.contains("<li><p>leaf</p>\n</li>"));
}

#[test]
fn test_json_past_nesting_bound_degrades_to_text() {
    let paragraph = json!({"type": "paragraph", "content": [{"type": "text", "text": "deep <leaf>"}]});
    let rendered = render(&nested_json("blockquote", 130, paragraph));

    assert_eq!(rendered.source, SourceFormat::Structured);
    assert_eq!(rendered.html.matches("<blockquote>").count(), 128);
    assert!(rendered.html.contains("deep &lt;leaf&gt;"));
}

#[test]
fn test_json_past_parse_bound_falls_back() {
    let text = json!({"type": "text", "text": "deep"});
    let rendered = render(&nested_json("blockquote", 500, text));

    assert_eq!(rendered.source, SourceFormat::Markdown);
    assert!(rendered.html.contains("deep"));
}

#[test]
fn test_malformed_children_keep_the_document() {
    let content = doc_json(json!({
        "type": "doc",
        "content": [
            null,
            {"type": "heading", "attrs": {"level": 1}, "content": [{"type": "text", "text": "Overview"}]},
            {"content": [{"type": "paragraph", "content": [{"type": "text", "text": "untyped"}]}]},
            {"type": "paragraph", "content": "oops"}
        ]
    }));

    let rendered = render(&content);
    assert_eq!(rendered.source, SourceFormat::Structured);
    assert!(rendered.html.starts_with("<h1 id=\"overview\">Overview</h1>\n<p>untyped</p>\n"));
    assert_eq!(all_ids(&rendered.toc), ["overview"]);
}

#[test]
fn test_deeply_nested_tree_degrades_to_text() {
    let mut node = DocumentNode::paragraph(vec![DocumentNode::text("deep <leaf>")]);
    for _ in 0..1000 {
        node = DocumentNode::new(NodeKind::Blockquote).with_content(vec![node]);
    }
    let root = DocumentNode::document(vec![node]);

    let rendered = Renderer::default().render_node(&root);
    assert!(rendered.html.contains("deep &lt;leaf&gt;"));
    assert!(rendered.html.starts_with("<blockquote>\n"));
}

#[test]
fn test_marks_wrap_in_array_order() {
    let root = DocumentNode::document(vec![DocumentNode::paragraph(vec![
        DocumentNode::marked_text("x", vec![Mark::bold(), Mark::italic()]),
        DocumentNode::marked_text("y", vec![Mark::italic(), Mark::bold()]),
        DocumentNode::marked_text("z", vec![Mark::bold(), Mark::link("/z")]),
    ])]);

    let html = Renderer::default().render_node(&root).html;
    assert!(html.contains("<em><strong>x</strong></em>"));
    assert!(html.contains("<strong><em>y</em></strong>"));
    assert!(html.contains(
        "<a href=\"/z\" target=\"_blank\" rel=\"noopener noreferrer\"><strong>z</strong></a>"
    ));
}

#[test]
fn test_markdown_and_structured_code_match_after_enhancement() {
    let code = "{\"name\": \"richdoc\", \"tags\": [\"a\", \"<b>\"]}\n";

    let structured = render(&doc_json(json!({
        "type": "doc",
        "content": [{
            "type": "codeBlock",
            "attrs": {"language": "json"},
            "content": [{"type": "text", "text": code}]
        }]
    })));
    let markdown = render(&format!("```json\n{}```\n", code));
    assert_eq!(structured.source, SourceFormat::Structured);
    assert_eq!(markdown.source, SourceFormat::Markdown);
    assert_eq!(structured.html, markdown.html);

    let enhancer = Enhancer::new().with_highlighter(SyntectHighlighter::new());
    let mut from_structured = MountedContainer::mount(&structured.html);
    let mut from_markdown = MountedContainer::mount(&markdown.html);
    enhancer.enhance(&mut from_structured);
    enhancer.enhance(&mut from_markdown);

    let a: Vec<_> = from_structured.code_elements().cloned().collect();
    let b: Vec<_> = from_markdown.code_elements().cloned().collect();
    assert_eq!(a.len(), 1);
    assert_eq!(a, b);
    assert_eq!(a[0].language(), "json");
    assert!(a[0].is_highlighted());
    assert_eq!(a[0].source(), code);
}

#[test]
fn test_hello_world_scenario() {
    let content = doc_json(json!({
        "type": "doc",
        "content": [
            {"type": "heading", "attrs": {"level": 1}, "content": [{"type": "text", "text": "Hello World"}]},
            {"type": "heading", "attrs": {"level": 1}, "content": [{"type": "text", "text": "Hello World"}]}
        ]
    }));

    let rendered = render(&content);
    assert_eq!(heading_ids(&rendered.html), ["hello-world", "hello-world-2"]);
    assert_eq!(rendered.toc.len(), 2);
    assert!(rendered.toc.iter().all(|e| e.children.is_empty()));
    assert_eq!(rendered.toc[0].id, "hello-world");
    assert_eq!(rendered.toc[1].id, "hello-world-2");
}
