//! Inline marks attached to text leaves

use super::node::Attributes;
use serde::Serialize;
use serde_json::Value;

/// Kind of an inline mark
///
/// Unrecognized mark tags are kept as `Unknown` so that a document written by a
/// newer editor still loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum MarkKind {
    Bold,
    Italic,
    Code,
    Link,
    Unknown(String),
}

impl MarkKind {
    /// The JSON tag written by the editor for this mark kind
    pub fn tag(&self) -> &str {
        match self {
            MarkKind::Bold => "bold",
            MarkKind::Italic => "italic",
            MarkKind::Code => "code",
            MarkKind::Link => "link",
            MarkKind::Unknown(tag) => tag,
        }
    }
}

impl From<String> for MarkKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "bold" | "strong" => MarkKind::Bold,
            "italic" | "em" => MarkKind::Italic,
            "code" => MarkKind::Code,
            "link" => MarkKind::Link,
            _ => MarkKind::Unknown(tag),
        }
    }
}

impl From<MarkKind> for String {
    fn from(kind: MarkKind) -> Self {
        kind.tag().to_string()
    }
}

/// An inline formatting annotation on a text node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mark {
    /// Mark kind (JSON `type`)
    #[serde(rename = "type")]
    pub kind: MarkKind,

    /// Mark attributes; `href` and `title` for links
    #[serde(skip_serializing_if = "Attributes::is_empty")]
    pub attrs: Attributes,
}

impl Mark {
    /// Create a mark without attributes
    pub fn new(kind: MarkKind) -> Self {
        Self {
            kind,
            attrs: Attributes::new(),
        }
    }

    /// Read a mark from parsed JSON
    ///
    /// Returns `None` for anything that is not an object. A missing `type`
    /// yields an `Unknown` mark, which renders its text unwrapped.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let kind = match object.get("type").and_then(Value::as_str) {
            Some(tag) => MarkKind::from(tag.to_string()),
            None => MarkKind::Unknown(String::new()),
        };
        Some(Self {
            kind,
            attrs: object
                .get("attrs")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default(),
        })
    }

    pub fn bold() -> Self {
        Self::new(MarkKind::Bold)
    }

    pub fn italic() -> Self {
        Self::new(MarkKind::Italic)
    }

    pub fn code() -> Self {
        Self::new(MarkKind::Code)
    }

    /// Create a link mark pointing at `href`
    pub fn link(href: impl Into<String>) -> Self {
        let mut mark = Self::new(MarkKind::Link);
        mark.attrs
            .insert("href".to_string(), Value::String(href.into()));
        mark
    }

    /// Link target, if present and a string
    pub fn href(&self) -> Option<&str> {
        self.attrs.get("href").and_then(Value::as_str)
    }

    /// Link title, if present and a string
    pub fn title(&self) -> Option<&str> {
        self.attrs.get("title").and_then(Value::as_str)
    }
}
