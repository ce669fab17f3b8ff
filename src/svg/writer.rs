use super::types::{Document, Element, Node};
use crate::error::{ExportError, Result};
use quick_xml::escape::escape;
use std::borrow::Cow;
use std::path::Path;

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(el) => write_element(el, out),
        Node::Text(text) => out.push_str(text),
        Node::CData(data) => {
            out.push_str("<![CDATA[");
            out.push_str(data);
            out.push_str("]]>");
        }
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        Node::ProcessingInstruction(pi) => {
            out.push_str("<?");
            out.push_str(pi);
            out.push_str("?>");
        }
        Node::DocType(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype);
            out.push('>');
        }
    }
}

fn write_element(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    for attr in &el.attributes {
        let value = if attr.verbatim {
            Cow::Borrowed(attr.value.as_str())
        } else {
            escape(attr.value.as_str())
        };
        out.push_str(&format!(" {}=\"{}\"", attr.name, value));
    }

    if el.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for child in &el.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

/// Serialize a document back to XML text
pub fn write_document(doc: &Document) -> String {
    let mut out = String::new();
    for node in &doc.prolog {
        write_node(node, &mut out);
    }
    write_element(&doc.root, &mut out);
    for node in &doc.epilog {
        write_node(node, &mut out);
    }
    out
}

/// Serialize a document to a file (UTF-8)
pub fn save_document(doc: &Document, path: &Path) -> Result<()> {
    std::fs::write(path, write_document(doc)).map_err(|e| ExportError::io(path, e))
}
