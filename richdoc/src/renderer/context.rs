//! Per-render state
//!
//! Everything a compilation pass mutates lives in a [`RenderContext`] that is
//! created at the start of the pass and dropped at its end. Nothing is shared
//! between renders, so identical input always yields identical ids.

use super::slug;
use crate::render_config::RendererConfig;
use std::collections::HashMap;

/// Caller-supplied heading id format
///
/// Receives the heading's plain text and its 1-indexed occurrence count within
/// the current render. Implemented for any matching closure.
pub trait HeadingIdGenerator: Send + Sync {
    fn generate(&self, text: &str, occurrence: usize) -> String;
}

impl<F> HeadingIdGenerator for F
where
    F: Fn(&str, usize) -> String + Send + Sync,
{
    fn generate(&self, text: &str, occurrence: usize) -> String {
        self(text, occurrence)
    }
}

/// Occurrence count per heading text, scoped to one render
#[derive(Debug, Clone, Default)]
pub struct HeadingCounter {
    counts: HashMap<String, usize>,
}

impl HeadingCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more occurrence of `text` and return the new count
    pub fn record(&mut self, text: &str) -> usize {
        let count = self.counts.entry(text.to_string()).or_insert(0);
        *count += 1;
        *count
    }

    /// Occurrences of `text` recorded so far
    pub fn count(&self, text: &str) -> usize {
        self.counts.get(text).copied().unwrap_or(0)
    }
}

/// A heading as it was assigned an id during a render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingRecord {
    pub id: String,
    pub text: String,
    pub level: u8,
}

/// Mutable state threaded through one compilation pass
pub struct RenderContext<'a> {
    config: &'a RendererConfig,
    counter: HeadingCounter,
    id_generator: Option<&'a dyn HeadingIdGenerator>,
    headings: Vec<HeadingRecord>,
}

impl<'a> RenderContext<'a> {
    /// Create a fresh context with an empty heading counter
    pub fn new(config: &'a RendererConfig) -> Self {
        Self {
            config,
            counter: HeadingCounter::new(),
            id_generator: None,
            headings: Vec::new(),
        }
    }

    /// Use a caller-supplied id format instead of the default slug
    pub fn with_id_generator(mut self, generator: &'a dyn HeadingIdGenerator) -> Self {
        self.id_generator = Some(generator);
        self
    }

    pub fn config(&self) -> &RendererConfig {
        self.config
    }

    /// Allocate an id for a heading and record it for the table of contents
    ///
    /// Must be called exactly once per rendered heading, in document order.
    pub fn assign_heading_id(&mut self, text: &str, level: u8) -> String {
        let id = match self.id_generator {
            Some(generator) => {
                let occurrence = self.counter.record(text);
                generator.generate(text, occurrence)
            }
            None => slug::allocate(text, &mut self.counter),
        };

        self.headings.push(HeadingRecord {
            id: id.clone(),
            text: text.to_string(),
            level,
        });

        id
    }

    /// Headings recorded so far, in document order
    pub fn headings(&self) -> &[HeadingRecord] {
        &self.headings
    }
}
