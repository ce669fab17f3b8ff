//! SVG document model
//!
//! This module provides an owned XML tree for Inkscape SVG files, a
//! quick-xml based parser, a serializer and helpers for the CSS `style`
//! attribute.

pub mod parser;
pub mod style;
pub mod types;
pub mod writer;

// Re-export main public API
pub use parser::{load_document, parse_document};
pub use style::{is_displayed, set_displayed};
pub use types::*;
pub use writer::{save_document, write_document};
