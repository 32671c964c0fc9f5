//! Rich-document rendering engine
//!
//! Compiles stored content into HTML:
//! 1. **Sniffing**: decide between the structured document tree and Markdown
//! 2. **Compilation**: node compiler or Markdown fallback, sharing one
//!    [`RenderContext`] for heading ids
//! 3. **Outline**: the table of contents is nested from the headings the
//!    compilation pass recorded
//!
//! Rendering never fails: every input string produces a [`RenderedDocument`].

use crate::document_tree::DocumentNode;
use crate::render_config::RendererConfig;
use std::fmt;
use std::sync::Arc;

// Submodules
mod code_block;
mod compiler;
mod context;
mod escape;
mod markdown;
mod marks;
mod slug;
mod sniff;
mod toc;

// Re-export public types
pub use code_block::{code_block_html, normalize_language, PLAIN_TEXT};
pub use compiler::{compile, EMPTY_PARAGRAPH, MAX_NESTING_DEPTH};
pub use context::{HeadingCounter, HeadingIdGenerator, HeadingRecord, RenderContext};
pub use escape::{escape_html, unescape_html};
pub use markdown::compile_markdown;
pub use marks::apply_marks;
pub use slug::{allocate, heading_id, slugify, FALLBACK_SLUG};
pub use sniff::{looks_structured, sniff, SniffedContent, SourceFormat};
pub use toc::{build_toc, collect_headings, nest_headings, render_toc_html, TocEntry};

/// Output of one render call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// Compiled markup, ready to mount
    pub html: String,

    /// Outline of the rendered headings, ids matching the markup
    pub toc: Vec<TocEntry>,

    /// Which compilation path produced the markup
    pub source: SourceFormat,
}

/// Configured renderer
///
/// Holds no per-render state; each call builds a fresh [`RenderContext`], so
/// one renderer can serve any number of renders, including in parallel.
#[derive(Clone, Default)]
pub struct Renderer {
    config: RendererConfig,
    id_generator: Option<Arc<dyn HeadingIdGenerator>>,
}

impl Renderer {
    /// Create a renderer with the given configuration
    pub fn new(config: RendererConfig) -> Self {
        Self {
            config,
            id_generator: None,
        }
    }

    /// Let the embedding page control the heading id format
    ///
    /// The generator receives the heading text and its occurrence count within
    /// the render (1 for the first occurrence).
    pub fn with_heading_id_generator<G>(mut self, generator: G) -> Self
    where
        G: HeadingIdGenerator + 'static,
    {
        self.id_generator = Some(Arc::new(generator));
        self
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Render raw stored content, sniffing its format
    pub fn render(&self, content: &str) -> RenderedDocument {
        let mut ctx = self.context();

        let (html, source) = match sniff(content) {
            SniffedContent::Structured(root) => {
                (compile(&root, &mut ctx), SourceFormat::Structured)
            }
            SniffedContent::Markdown(source) => {
                (compile_markdown(source, &mut ctx), SourceFormat::Markdown)
            }
        };

        RenderedDocument {
            html,
            toc: nest_headings(ctx.headings()),
            source,
        }
    }

    /// Render an already parsed document tree
    pub fn render_node(&self, root: &DocumentNode) -> RenderedDocument {
        let mut ctx = self.context();
        let html = compile(root, &mut ctx);

        RenderedDocument {
            html,
            toc: nest_headings(ctx.headings()),
            source: SourceFormat::Structured,
        }
    }

    /// Table of contents of a document tree, without compiling its markup
    pub fn toc(&self, root: &DocumentNode) -> Vec<TocEntry> {
        let mut ctx = self.context();
        collect_headings(root, &mut ctx);
        nest_headings(ctx.headings())
    }

    /// Fresh per-render context
    fn context(&self) -> RenderContext<'_> {
        let ctx = RenderContext::new(&self.config);
        match self.id_generator {
            Some(ref generator) => ctx.with_id_generator(generator.as_ref()),
            None => ctx,
        }
    }
}

impl fmt::Debug for Renderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Renderer")
            .field("config", &self.config)
            .field("custom_heading_ids", &self.id_generator.is_some())
            .finish()
    }
}

/// Render content with the default configuration
pub fn render(content: &str) -> RenderedDocument {
    Renderer::default().render(content)
}
