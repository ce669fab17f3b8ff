//! Layer selection
//!
//! Finds Inkscape layer groups in a document, picks the base layer and
//! builds one filtered document per renderable layer.

use crate::error::{ExportError, Result};
use crate::svg::{Document, Element, Node, is_displayed, set_displayed};
use tracing::{debug, warn};

/// An `svg:g` marked as an Inkscape layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerGroup {
    pub label: String,
    pub id: Option<String>,
    /// Label contains "base" (case-insensitive)
    pub is_base: bool,
    pub visible: bool,
}

impl LayerGroup {
    /// Build a layer from a labelled layer group, `None` for anything else
    pub fn from_element(el: &Element) -> Option<Self> {
        let (group_mode, label) = el.layer_markers()?;
        if group_mode != "layer" {
            return None;
        }
        let label = label?;

        Some(Self {
            label: label.to_string(),
            id: el.attribute("id").map(str::to_string),
            is_base: is_base_label(label),
            visible: is_displayed(el),
        })
    }
}

pub fn is_base_label(label: &str) -> bool {
    label.to_lowercase().contains("base")
}

/// Base layer plus the renderable layers in document order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub base: LayerGroup,
    pub others: Vec<LayerGroup>,
}

impl Classification {
    pub fn labels(&self) -> Vec<&str> {
        self.others.iter().map(|l| l.label.as_str()).collect()
    }
}

/// All labelled layer groups in document order.
///
/// Sublayers are not supported, so the content of a layer is not searched.
pub fn find_layers(doc: &Document) -> Vec<LayerGroup> {
    fn walk(el: &Element, out: &mut Vec<LayerGroup>) {
        for child in el.child_elements() {
            if child.is_layer() {
                match LayerGroup::from_element(child) {
                    Some(layer) => out.push(layer),
                    None => debug!("skipping layer group without label"),
                }
            } else {
                walk(child, out);
            }
        }
    }

    let mut out = Vec::new();
    walk(&doc.root, &mut out);
    out
}

/// Split the layers of a document into the base layer and the others
pub fn classify(doc: &Document) -> Result<Classification> {
    let mut base: Option<LayerGroup> = None;
    let mut others = Vec::new();

    for layer in find_layers(doc) {
        if layer.is_base {
            if let Some(prev) = &base {
                warn!(
                    "multiple base layers, '{}' replaces '{}'",
                    layer.label, prev.label
                );
            }
            debug!("base layer: {}", layer.label);
            base = Some(layer);
        } else {
            debug!("renderable layer: {}", layer.label);
            others.push(layer);
        }
    }

    let base = base.ok_or(ExportError::MissingBaseLayer)?;
    Ok(Classification { base, others })
}

/// Copy of `doc` keeping only the layers labelled in `keep`, all displayed.
///
/// Every other layer group, labelled or not, is dropped from its parent.
/// Non-layer content is copied unchanged.
pub fn filter_layers(doc: &Document, keep: &[&str]) -> Document {
    fn filter_children(el: &Element, keep: &[&str]) -> Element {
        let mut out = Element {
            name: el.name.clone(),
            attributes: el.attributes.clone(),
            children: Vec::with_capacity(el.children.len()),
        };

        for child in &el.children {
            let child_el = match child {
                Node::Element(child_el) => child_el,
                // text around a removed layer would otherwise end up as two siblings
                Node::Text(text) => {
                    match out.children.last_mut() {
                        Some(Node::Text(prev)) => prev.push_str(text),
                        _ => out.children.push(child.clone()),
                    }
                    continue;
                }
                _ => {
                    out.children.push(child.clone());
                    continue;
                }
            };

            if !child_el.is_layer() {
                out.children.push(Node::Element(filter_children(child_el, keep)));
                continue;
            }

            match child_el.layer_markers() {
                Some((_, Some(label))) if keep.contains(&label) => {
                    let mut layer = child_el.clone();
                    set_displayed(&mut layer);
                    out.children.push(Node::Element(layer));
                }
                Some((_, label)) => {
                    debug!("removing layer {}", label.unwrap_or("<unlabelled>"));
                }
                None => {}
            }
        }

        out
    }

    Document {
        prolog: doc.prolog.clone(),
        root: filter_children(&doc.root, keep),
        epilog: doc.epilog.clone(),
    }
}

/// Document showing only the base layer and `target`.
///
/// Layers are matched by label, so every layer carrying `target` is kept.
pub fn filter_for_layer(doc: &Document, base: &str, target: &str) -> Document {
    filter_layers(doc, &[base, target])
}
