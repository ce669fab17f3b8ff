//! # layer-export
//!
//! Export the layers of an Inkscape SVG drawing to PNG, one image per layer.
//!
//! Every layer whose label contains "base" (case-insensitive) is the base
//! layer. Each other layer is rendered on top of the base layer with all
//! remaining layers removed from the document.
//!
//! ## Example
//!
//! ```rust,ignore
//! use layer_export::{ExportOptions, Exporter, InkscapeRasterizer};
//!
//! let mut options = ExportOptions::new("drawing.svg", "out");
//! options.dpi = 150;
//! let exporter = Exporter::new(options, Box::new(InkscapeRasterizer::default())).unwrap();
//! let summary = exporter.run().unwrap();
//! for layer in summary.exported {
//!     println!("{} -> {}", layer.label, layer.png.display());
//! }
//! ```
//!
//! ## Example - Layer Filtering
//!
//! ```rust,ignore
//! use layer_export::{classify, filter_for_layer, parse_document, write_document};
//!
//! let doc = parse_document(&std::fs::read_to_string("drawing.svg").unwrap()).unwrap();
//! let layers = classify(&doc).unwrap();
//! let outline = filter_for_layer(&doc, &layers.base.label, "Outline");
//! std::fs::write("outline.svg", write_document(&outline)).unwrap();
//! ```

pub mod error;
pub mod export;
pub mod layers;
pub mod svg;

// Re-export commonly used items
pub use error::{ExportError, Result};
pub use export::{
    ExportOptions, ExportSummary, ExportedLayer, Exporter, InkscapeCli, InkscapeRasterizer,
    Progress, Rasterizer, ResvgRasterizer, output_file_name,
};
pub use layers::{Classification, LayerGroup, classify, filter_for_layer, filter_layers};
pub use svg::{Document, load_document, parse_document, write_document};
