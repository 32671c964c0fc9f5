//! Document nodes
//!
//! A node is one element of the editor's JSON tree. Its shape on the wire is:
//!
//! ```json
//! {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Intro"}]}
//! ```

use super::mark::Mark;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Kind-specific node attributes (JSON `attrs`)
pub type Attributes = Map<String, Value>;

/// Deepest node nesting accepted by [`DocumentNode::from_json`]
///
/// Each node costs two JSON levels, its object and its `content` array.
pub const MAX_PARSE_DEPTH: usize = 136;

/// Kind of a document node
///
/// The set is closed; any other tag becomes `Unknown` and is rendered by
/// forwarding its children.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum NodeKind {
    Document,
    Paragraph,
    Heading,
    Text,
    BulletList,
    OrderedList,
    ListItem,
    CodeBlock,
    Blockquote,
    Image,
    HardBreak,
    Unknown(String),
}

impl NodeKind {
    /// The JSON tag written by the editor for this node kind
    pub fn tag(&self) -> &str {
        match self {
            NodeKind::Document => "doc",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::Text => "text",
            NodeKind::BulletList => "bulletList",
            NodeKind::OrderedList => "orderedList",
            NodeKind::ListItem => "listItem",
            NodeKind::CodeBlock => "codeBlock",
            NodeKind::Blockquote => "blockquote",
            NodeKind::Image => "image",
            NodeKind::HardBreak => "hardBreak",
            NodeKind::Unknown(tag) => tag,
        }
    }

    /// Whether the compiler descends into this kind's children as nodes
    ///
    /// Leaf kinds either have no children (`text`, `image`, `hardBreak`) or only
    /// consume their children's raw text (`codeBlock`).
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::Text | NodeKind::CodeBlock | NodeKind::Image | NodeKind::HardBreak
        )
    }
}

impl From<String> for NodeKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "doc" | "document" => NodeKind::Document,
            "paragraph" => NodeKind::Paragraph,
            "heading" => NodeKind::Heading,
            "text" => NodeKind::Text,
            "bulletList" => NodeKind::BulletList,
            "orderedList" => NodeKind::OrderedList,
            "listItem" => NodeKind::ListItem,
            "codeBlock" => NodeKind::CodeBlock,
            "blockquote" => NodeKind::Blockquote,
            "image" => NodeKind::Image,
            "hardBreak" => NodeKind::HardBreak,
            _ => NodeKind::Unknown(tag),
        }
    }
}

impl From<NodeKind> for String {
    fn from(kind: NodeKind) -> Self {
        kind.tag().to_string()
    }
}

/// One element of the structured document tree
///
/// Trees are read with [`DocumentNode::from_json`] or [`DocumentNode::from_value`],
/// which repair malformed fields instead of rejecting the document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentNode {
    /// Node kind (JSON `type`)
    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Kind-specific attributes (JSON `attrs`)
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub attrs: Attributes,

    /// Ordered children (JSON `content`)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<DocumentNode>,

    /// Text of a `text` leaf
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Stacked marks of a `text` leaf, in application order
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
}

impl DocumentNode {
    /// Create an empty node of the given kind
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attrs: Attributes::new(),
            content: Vec::new(),
            text: None,
            marks: Vec::new(),
        }
    }

    /// Create a `document` root with the given children
    pub fn document(content: Vec<DocumentNode>) -> Self {
        Self::new(NodeKind::Document).with_content(content)
    }

    /// Create a plain `text` leaf
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(NodeKind::Text)
        }
    }

    /// Create a `text` leaf carrying marks
    pub fn marked_text(text: impl Into<String>, marks: Vec<Mark>) -> Self {
        Self {
            marks,
            ..Self::text(text)
        }
    }

    /// Create a `heading` of `level` containing a single text leaf
    pub fn heading(level: u8, text: impl Into<String>) -> Self {
        Self::new(NodeKind::Heading)
            .with_attr("level", Value::from(level))
            .with_content(vec![Self::text(text)])
    }

    /// Create a `paragraph` with the given children
    pub fn paragraph(content: Vec<DocumentNode>) -> Self {
        Self::new(NodeKind::Paragraph).with_content(content)
    }

    /// Create a `codeBlock` with an optional language and a single text child
    pub fn code_block(language: Option<&str>, code: impl Into<String>) -> Self {
        let node = Self::new(NodeKind::CodeBlock).with_content(vec![Self::text(code)]);
        match language {
            Some(lang) => node.with_attr("language", Value::from(lang)),
            None => node,
        }
    }

    /// Replace the children of this node
    pub fn with_content(mut self, content: Vec<DocumentNode>) -> Self {
        self.content = content;
        self
    }

    /// Set one attribute
    pub fn with_attr(mut self, key: &str, value: Value) -> Self {
        self.attrs.insert(key.to_string(), value);
        self
    }

    /// Parse a node tree from its JSON form
    ///
    /// Only invalid JSON, or nesting beyond [`MAX_PARSE_DEPTH`] nodes, is an
    /// error. Everything that parses is converted with [`DocumentNode::from_value`].
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json_nesting_exceeds(json, 2 * MAX_PARSE_DEPTH + 1) {
            return Err(<serde_json::Error as serde::de::Error>::custom(format!(
                "document nested deeper than {} nodes",
                MAX_PARSE_DEPTH
            )));
        }

        // The nesting scan above bounds the recursion
        let mut deserializer = serde_json::Deserializer::from_str(json);
        deserializer.disable_recursion_limit();
        let value = Value::deserialize(&mut deserializer)?;
        deserializer.end()?;

        Ok(Self::from_value(&value))
    }

    /// Build a node from parsed JSON, treating malformed fields as absent
    ///
    /// - a value that is not an object becomes an empty `Unknown` node, which
    ///   renders as nothing
    /// - a missing or non-string `type` becomes `Unknown`, so the children are
    ///   still rendered
    /// - `attrs`, `content`, `text` and `marks` of the wrong shape are dropped
    /// - `null` and other non-object children are skipped
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::new(NodeKind::Unknown(String::new()));
        };

        let kind = match object.get("type").and_then(Value::as_str) {
            Some(tag) => NodeKind::from(tag.to_string()),
            None => NodeKind::Unknown(String::new()),
        };
        let content = object
            .get("content")
            .and_then(Value::as_array)
            .map(|children| {
                children
                    .iter()
                    .filter(|child| child.is_object())
                    .map(Self::from_value)
                    .collect()
            })
            .unwrap_or_default();
        let marks = object
            .get("marks")
            .and_then(Value::as_array)
            .map(|marks| marks.iter().filter_map(Mark::from_value).collect())
            .unwrap_or_default();

        Self {
            kind,
            attrs: object
                .get("attrs")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
            content,
            text: object.get("text").and_then(Value::as_str).map(str::to_string),
            marks,
        }
    }

    /// String attribute, if present
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    /// Unsigned integer attribute; numeric strings are accepted as well
    pub fn attr_u64(&self, key: &str) -> Option<u64> {
        match self.attrs.get(key)? {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Heading level from `attrs.level`, defaulting to 1 and clamped to 1..=6
    pub fn heading_level(&self) -> u8 {
        self.attr_u64("level").map_or(1, |level| level.clamp(1, 6) as u8)
    }

    /// Code block language from `attrs.language`
    pub fn language(&self) -> Option<&str> {
        self.attr_str("language")
    }

    /// Start number of an ordered list from `attrs.start`
    pub fn list_start(&self) -> Option<u64> {
        self.attr_u64("start")
    }

    /// Concatenated text of all descendant text leaves, marks stripped
    ///
    /// Walks with an explicit stack so arbitrarily deep trees cannot exhaust the
    /// call stack.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Some(ref leaf) = node.text {
                text.push_str(leaf);
            }
            // A text leaf's own text is all it contributes
            if node.kind != NodeKind::Text {
                stack.extend(node.content.iter().rev());
            }
        }
        text
    }
}

/// Whether `json` opens more than `limit` nested arrays or objects
///
/// Brackets inside string literals are ignored. Malformed input is left for the
/// parser to reject.
fn json_nesting_exceeds(json: &str, limit: usize) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for byte in json.bytes() {
        if in_string {
            match byte {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                if depth > limit {
                    return true;
                }
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_editor_document() {
        let json = r#"{
            "type": "doc",
            "content": [
                {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Intro"}]},
                {"type": "paragraph", "content": null},
                {"type": "callout", "content": [{"type": "text", "text": "x", "marks": [{"type": "bold"}]}]}
            ]
        }"#;
        let doc = DocumentNode::from_json(json).unwrap();
        assert_eq!(doc.kind, NodeKind::Document);
        assert_eq!(doc.content.len(), 3);
        assert_eq!(doc.content[0].heading_level(), 2);
        assert!(doc.content[1].content.is_empty());
        assert_eq!(doc.content[2].kind, NodeKind::Unknown("callout".to_string()));
        assert_eq!(doc.content[2].content[0].marks.len(), 1);
    }

    #[test]
    fn test_document_alias() {
        let doc = DocumentNode::from_json(r#"{"type":"document"}"#).unwrap();
        assert_eq!(doc.kind, NodeKind::Document);
    }

    #[test]
    fn test_heading_level_defaults_and_clamps() {
        let mut node = DocumentNode::new(NodeKind::Heading);
        assert_eq!(node.heading_level(), 1);
        node = node.with_attr("level", Value::from(9));
        assert_eq!(node.heading_level(), 6);
        node = node.with_attr("level", Value::from("3"));
        assert_eq!(node.heading_level(), 3);
        node = node.with_attr("level", Value::from(0));
        assert_eq!(node.heading_level(), 1);
    }

    #[test]
    fn test_plain_text_strips_marks() {
        let heading = DocumentNode::new(NodeKind::Heading).with_content(vec![
            DocumentNode::text("Hello "),
            DocumentNode::marked_text("World", vec![Mark::bold()]),
        ]);
        assert_eq!(heading.plain_text(), "Hello World");
    }

    #[test]
    fn test_malformed_fields_are_dropped() {
        let json = r#"{
            "type": "doc",
            "attrs": [1, 2],
            "content": [
                null,
                42,
                {"type": "heading", "attrs": {"level": 2}, "content": [{"type": "text", "text": "Kept"}]},
                {"content": [{"type": "text", "text": "orphan"}]},
                {"type": "paragraph", "content": "oops"},
                {"type": "text", "text": 7, "marks": [{"type": "bold"}, "italic", null]}
            ]
        }"#;
        let doc = DocumentNode::from_json(json).unwrap();

        assert!(doc.attrs.is_empty());
        assert_eq!(doc.content.len(), 4);
        assert_eq!(doc.content[0].plain_text(), "Kept");
        assert_eq!(doc.content[1].kind, NodeKind::Unknown(String::new()));
        assert_eq!(doc.content[1].plain_text(), "orphan");
        assert!(doc.content[2].content.is_empty());
        assert_eq!(doc.content[3].text, None);
        assert_eq!(doc.content[3].marks, vec![Mark::bold()]);
    }

    #[test]
    fn test_non_object_value_is_empty_unknown() {
        let node = DocumentNode::from_value(&Value::from("doc"));
        assert_eq!(node, DocumentNode::new(NodeKind::Unknown(String::new())));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(DocumentNode::from_json("{\"type\": \"doc\"").is_err());
        assert!(DocumentNode::from_json("{\"type\": \"doc\"} trailing").is_err());
    }

    #[test]
    fn test_parse_depth_bound() {
        let nested = |depth: usize| {
            let mut json = "{\"type\":\"doc\",\"content\":[".repeat(depth);
            json.push_str("{\"type\":\"text\",\"text\":\"[{\\\"\"}");
            json.push_str(&"]}".repeat(depth));
            json
        };

        let doc = DocumentNode::from_json(&nested(MAX_PARSE_DEPTH)).unwrap();
        assert_eq!(doc.plain_text(), "[{\"");
        assert!(DocumentNode::from_json(&nested(MAX_PARSE_DEPTH + 1)).is_err());
    }

    #[test]
    fn test_plain_text_ignores_children_of_text_leaves() {
        let leaf = DocumentNode::text("shown").with_content(vec![DocumentNode::text("hidden")]);
        let paragraph = DocumentNode::paragraph(vec![leaf, DocumentNode::text("!")]);
        assert_eq!(paragraph.plain_text(), "shown!");
    }

    #[test]
    fn test_serialize_skips_empty_fields() {
        let json = serde_json::to_string(&DocumentNode::text("hi")).unwrap();
        assert_eq!(json, r#"{"type":"text","text":"hi"}"#);
    }
}
