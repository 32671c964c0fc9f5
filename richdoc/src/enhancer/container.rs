//! Mounted markup container
//!
//! A [`MountedContainer`] is the mutable view of emitted markup that the
//! enhancer works on: plain markup segments interleaved with the code and image
//! elements found in it. Serializing it back with [`MountedContainer::to_html`]
//! reproduces the mounted markup until an element is changed.

use crate::renderer::{escape_html, unescape_html, PLAIN_TEXT};
use regex::Regex;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Callback invoked with an image's `src` when it is clicked
pub type ImageClickHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Callback invoked with a code block's raw text when its copy control is used
pub type CodeCopyHandler = Arc<dyn Fn(&str) + Send + Sync>;

/// Class marking a code element whose body is highlighter output
pub const HIGHLIGHTED_CLASS: &str = "highlighted";

/// Attribute marking an image with a click handler attached
const ZOOMABLE_ATTR: &str = " data-zoomable=\"true\"";

/// Attribute marking a code block with a copy handler attached
const COPYABLE_ATTR: &str = " data-copyable=\"true\"";

static ELEMENT_PATTERN: OnceLock<Regex> = OnceLock::new();
static TAG_PATTERN: OnceLock<Regex> = OnceLock::new();
static ATTR_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Block code elements and image elements
fn element_pattern() -> &'static Regex {
    ELEMENT_PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?s)<pre(?: data-copyable="true")?><code class="(?P<class>[^"]*)">(?P<body>.*?)</code></pre>|<img\b(?P<attrs>[^>]*)>"#,
        )
        .expect("element pattern is valid")
    })
}

/// Any tag, used to strip injected highlight spans
fn tag_pattern() -> &'static Regex {
    TAG_PATTERN.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// A double-quoted attribute
fn attr_pattern() -> &'static Regex {
    ATTR_PATTERN.get_or_init(|| {
        Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)="([^"]*)""#).expect("attribute pattern is valid")
    })
}

/// A `<pre><code>` block
#[derive(Clone)]
pub struct CodeElement {
    language: String,
    source: String,
    highlighted: Option<String>,
    on_copy: Option<CodeCopyHandler>,
}

impl CodeElement {
    /// Parse from the code element's class attribute and inner markup
    fn from_markup(class: &str, body: &str) -> Self {
        let classes: Vec<&str> = class.split_whitespace().collect();
        let language = classes
            .iter()
            .find_map(|c| c.strip_prefix("language-"))
            .filter(|lang| !lang.is_empty())
            .unwrap_or(PLAIN_TEXT)
            .to_string();

        if classes.contains(&HIGHLIGHTED_CLASS) {
            let text = tag_pattern().replace_all(body, "");
            Self {
                language,
                source: unescape_html(&text),
                highlighted: Some(body.to_string()),
                on_copy: None,
            }
        } else {
            Self {
                language,
                source: unescape_html(body),
                highlighted: None,
                on_copy: None,
            }
        }
    }

    /// Language tag from the `language-*` class
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Raw (unescaped) code text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Highlighter markup currently shown, if any
    pub fn highlighted(&self) -> Option<&str> {
        self.highlighted.as_deref()
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted.is_some()
    }

    /// Drop injected highlighting, returning to escaped plain text
    pub fn clear_highlighting(&mut self) {
        self.highlighted = None;
    }

    pub fn set_highlighted(&mut self, markup: String) {
        self.highlighted = Some(markup);
    }

    pub fn has_copy_handler(&self) -> bool {
        self.on_copy.is_some()
    }

    /// Attach a copy handler, replacing any previous one
    pub fn set_copy_handler(&mut self, handler: CodeCopyHandler) {
        self.on_copy = Some(handler);
    }

    /// Use the copy control; the handler receives the raw code text.
    /// Returns whether a handler ran.
    pub fn copy(&self) -> bool {
        match self.on_copy {
            Some(ref handler) => {
                handler(&self.source);
                true
            }
            None => false,
        }
    }

    fn write_html(&self, output: &mut String) {
        let marker = if self.on_copy.is_some() { COPYABLE_ATTR } else { "" };
        match self.highlighted {
            Some(ref markup) => output.push_str(&format!(
                "<pre{}><code class=\"language-{} {}\">{}</code></pre>",
                marker, self.language, HIGHLIGHTED_CLASS, markup
            )),
            None => output.push_str(&format!(
                "<pre{}><code class=\"language-{}\">{}</code></pre>",
                marker,
                self.language,
                escape_html(&self.source)
            )),
        }
    }
}

/// Handlers compare by presence only
impl PartialEq for CodeElement {
    fn eq(&self, other: &Self) -> bool {
        self.language == other.language
            && self.source == other.source
            && self.highlighted == other.highlighted
            && self.on_copy.is_some() == other.on_copy.is_some()
    }
}

impl Eq for CodeElement {}

impl fmt::Debug for CodeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeElement")
            .field("language", &self.language)
            .field("source", &self.source)
            .field("highlighted", &self.highlighted)
            .field("has_copy_handler", &self.on_copy.is_some())
            .finish()
    }
}

/// An `<img>` element
#[derive(Clone)]
pub struct ImageElement {
    /// Attribute markup between `<img` and the closing `/>`
    attrs: String,
    src: String,
    on_click: Option<ImageClickHandler>,
}

impl ImageElement {
    /// Parse from the attribute markup of an `<img ...>` tag
    fn from_markup(attrs: &str) -> Self {
        let attrs = attrs.replace(ZOOMABLE_ATTR, "");
        let attrs = attrs.trim_end().trim_end_matches('/').trim_end().to_string();

        let src = attr_pattern()
            .captures_iter(&attrs)
            .find(|caps| caps[1].eq_ignore_ascii_case("src"))
            .map(|caps| unescape_html(&caps[2]))
            .unwrap_or_default();

        Self {
            attrs,
            src,
            on_click: None,
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn has_click_handler(&self) -> bool {
        self.on_click.is_some()
    }

    /// Attach a click handler, replacing any previous one
    pub fn set_click_handler(&mut self, handler: ImageClickHandler) {
        self.on_click = Some(handler);
    }

    /// Simulate a click; returns whether a handler ran
    pub fn click(&self) -> bool {
        match self.on_click {
            Some(ref handler) => {
                handler(&self.src);
                true
            }
            None => false,
        }
    }

    fn write_html(&self, output: &mut String) {
        output.push_str("<img");
        output.push_str(&self.attrs);
        if self.on_click.is_some() {
            output.push_str(ZOOMABLE_ATTR);
        }
        output.push_str(" />");
    }
}

impl fmt::Debug for ImageElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageElement")
            .field("src", &self.src)
            .field("has_click_handler", &self.on_click.is_some())
            .finish()
    }
}

/// One piece of mounted markup
#[derive(Debug, Clone)]
enum Segment {
    Markup(String),
    Code(CodeElement),
    Image(ImageElement),
}

/// Markup mounted for post-render enhancement
#[derive(Debug, Clone, Default)]
pub struct MountedContainer {
    segments: Vec<Segment>,
}

impl MountedContainer {
    /// Mount emitted markup, locating its code blocks and images
    pub fn mount(html: &str) -> Self {
        let mut segments = Vec::new();
        let mut last_end = 0;

        for caps in element_pattern().captures_iter(html) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if whole.start() > last_end {
                segments.push(Segment::Markup(html[last_end..whole.start()].to_string()));
            }

            match caps.name("attrs") {
                Some(attrs) => segments.push(Segment::Image(ImageElement::from_markup(attrs.as_str()))),
                None => {
                    let class = caps.name("class").map_or("", |m| m.as_str());
                    let body = caps.name("body").map_or("", |m| m.as_str());
                    segments.push(Segment::Code(CodeElement::from_markup(class, body)));
                }
            }

            last_end = whole.end();
        }

        if last_end < html.len() {
            segments.push(Segment::Markup(html[last_end..].to_string()));
        }

        Self { segments }
    }

    pub fn code_elements(&self) -> impl Iterator<Item = &CodeElement> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Code(code) => Some(code),
            _ => None,
        })
    }

    pub fn code_elements_mut(&mut self) -> impl Iterator<Item = &mut CodeElement> {
        self.segments.iter_mut().filter_map(|segment| match segment {
            Segment::Code(code) => Some(code),
            _ => None,
        })
    }

    pub fn images(&self) -> impl Iterator<Item = &ImageElement> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Image(image) => Some(image),
            _ => None,
        })
    }

    pub fn images_mut(&mut self) -> impl Iterator<Item = &mut ImageElement> {
        self.segments.iter_mut().filter_map(|segment| match segment {
            Segment::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Click the `index`-th image; returns whether a handler ran
    pub fn click_image(&self, index: usize) -> bool {
        self.images().nth(index).is_some_and(ImageElement::click)
    }

    /// Copy the `index`-th code block; returns whether a handler ran
    pub fn copy_code(&self, index: usize) -> bool {
        self.code_elements().nth(index).is_some_and(CodeElement::copy)
    }

    /// Serialize the container back to markup
    pub fn to_html(&self) -> String {
        let mut output = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Markup(markup) => output.push_str(markup),
                Segment::Code(code) => code.write_html(&mut output),
                Segment::Image(image) => image.write_html(&mut output),
            }
        }
        output
    }
}
