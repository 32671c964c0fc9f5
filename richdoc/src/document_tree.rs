//! Structured document tree
//!
//! This module defines the JSON document model produced by the block editor:
//! nodes carrying kind-specific attributes, ordered children, and (on text
//! leaves) stacked inline marks.

// Submodules
mod mark;
mod node;

// Re-export public types
pub use mark::{Mark, MarkKind};
pub use node::{Attributes, DocumentNode, NodeKind, MAX_PARSE_DEPTH};
