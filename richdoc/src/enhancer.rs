//! Post-render enhancement
//!
//! Runs over markup after it is mounted:
//! - code elements are highlighted by a [`Highlighter`], clearing any earlier
//!   highlighting first so repeated passes never stack
//! - images get a click handler, replacing any handler from an earlier pass
//! - code elements get a copy handler that receives their raw text, also
//!   replacing any earlier one
//!
//! Highlighting failures are not fatal; the affected block stays plain.

use std::fmt;
use std::sync::Arc;

mod container;
mod highlight;

pub use container::{
    CodeCopyHandler, CodeElement, ImageClickHandler, ImageElement, MountedContainer,
    HIGHLIGHTED_CLASS,
};
pub use highlight::{theme_css, HighlightError, Highlighter, SyntectHighlighter};

use crate::renderer::PLAIN_TEXT;

/// What one enhancement pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnhanceReport {
    /// Code elements now carrying highlighter markup
    pub highlighted: usize,

    /// Code elements left as escaped plain text
    pub plain: usize,

    /// Images with a click handler attached
    pub images_wired: usize,

    /// Code elements with a copy handler attached
    pub code_copy_wired: usize,
}

/// Post-render enhancer
#[derive(Clone, Default)]
pub struct Enhancer {
    highlighter: Option<Arc<dyn Highlighter>>,
    on_image_click: Option<ImageClickHandler>,
    on_code_copy: Option<CodeCopyHandler>,
}

impl Enhancer {
    /// An enhancer that does nothing until configured
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_highlighter<H>(self, highlighter: H) -> Self
    where
        H: Highlighter + 'static,
    {
        self.with_shared_highlighter(Arc::new(highlighter))
    }

    /// Use a highlighter shared with other enhancers
    pub fn with_shared_highlighter(mut self, highlighter: Arc<dyn Highlighter>) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    /// Call `handler` with the image source whenever an image is clicked
    pub fn on_image_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_image_click = Some(Arc::new(handler));
        self
    }

    /// Call `handler` with a code block's raw text when its copy control is used
    pub fn on_code_copy<F>(mut self, handler: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_code_copy = Some(Arc::new(handler));
        self
    }

    /// Enhance a mounted container in place
    ///
    /// Safe to call any number of times on the same container: each pass
    /// leaves it in the same state as a single pass would.
    pub fn enhance(&self, container: &mut MountedContainer) -> EnhanceReport {
        let mut report = EnhanceReport::default();

        for code in container.code_elements_mut() {
            code.clear_highlighting();
            if let Some(ref handler) = self.on_code_copy {
                code.set_copy_handler(Arc::clone(handler));
                report.code_copy_wired += 1;
            }

            let Some(ref highlighter) = self.highlighter else {
                report.plain += 1;
                continue;
            };
            if code.language() == PLAIN_TEXT {
                report.plain += 1;
                continue;
            }

            match highlighter.highlight(code.source(), code.language()) {
                Ok(markup) => {
                    code.set_highlighted(markup);
                    report.highlighted += 1;
                }
                Err(e) => {
                    log::debug!("Leaving {} block unhighlighted: {}", code.language(), e);
                    report.plain += 1;
                }
            }
        }

        if let Some(ref handler) = self.on_image_click {
            for image in container.images_mut() {
                image.set_click_handler(Arc::clone(handler));
                report.images_wired += 1;
            }
        }

        log::debug!(
            "Enhanced container: {} highlighted, {} plain, {} images, {} copyable",
            report.highlighted,
            report.plain,
            report.images_wired,
            report.code_copy_wired
        );

        report
    }
}

impl fmt::Debug for Enhancer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Enhancer")
            .field("highlighter", &self.highlighter.is_some())
            .field("on_image_click", &self.on_image_click.is_some())
            .field("on_code_copy", &self.on_code_copy.is_some())
            .finish()
    }
}

/// Mount `html`, enhance it and serialize the result
pub fn enhance_html(html: &str, enhancer: &Enhancer) -> String {
    let mut container = MountedContainer::mount(html);
    enhancer.enhance(&mut container);
    container.to_html()
}
