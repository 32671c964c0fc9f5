//! richdoc - rich-document rendering engine
//!
//! Turns stored document content into HTML. Content is either a serialized
//! document tree (JSON with a `"type"` key) or Markdown; the format is sniffed
//! and malformed trees fall back to Markdown, so rendering never fails.
//!
//! ```
//! let doc = richdoc::render("# Hello World");
//! assert_eq!(doc.html, "<h1 id=\"hello-world\">Hello World</h1>\n");
//! assert_eq!(doc.toc[0].id, "hello-world");
//! ```

#![deny(unsafe_code)]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::all))]
#![cfg_attr(all(not(debug_assertions), not(test)), deny(clippy::pedantic))]
// Allow some pedantic lints that are too strict for this project
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::enum_variant_names)]

pub mod document_tree;
pub mod enhancer;
pub mod html_exporter;
pub mod pipeline;
pub mod render_config;
pub mod renderer;

pub use document_tree::{DocumentNode, Mark, MarkKind, NodeKind};
pub use enhancer::{enhance_html, Enhancer, MountedContainer};
pub use render_config::RendererConfig;
pub use renderer::{render, RenderedDocument, Renderer, TocEntry};
