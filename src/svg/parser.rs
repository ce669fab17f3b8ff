use super::types::{Attribute, Document, Element, Node};
use crate::error::{ExportError, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

/// Accumulates parser events into an owned tree
#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Element>,
    prolog: Vec<Node>,
    root: Option<Element>,
    epilog: Vec<Node>,
}

impl TreeBuilder {
    fn open(&mut self, el: Element) {
        self.stack.push(el);
    }

    fn close(&mut self) -> Result<()> {
        let el = self
            .stack
            .pop()
            .ok_or_else(|| ExportError::malformed("closing tag without matching opening tag"))?;
        self.attach_element(el)
    }

    fn attach_element(&mut self, el: Element) -> Result<()> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(Node::Element(el));
        } else if self.root.is_some() {
            return Err(ExportError::malformed(format!(
                "second root element <{}>",
                el.name
            )));
        } else {
            self.root = Some(el);
        }
        Ok(())
    }

    fn push(&mut self, node: Node) {
        let target = match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None if self.root.is_none() => &mut self.prolog,
            None => &mut self.epilog,
        };
        target.push(node);
    }

    /// Append raw character data, merging with a preceding text node
    fn push_text(&mut self, text: &str) {
        let target = match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None if self.root.is_none() => &mut self.prolog,
            None => &mut self.epilog,
        };
        match target.last_mut() {
            Some(Node::Text(prev)) => prev.push_str(text),
            _ => target.push(Node::Text(text.to_string())),
        }
    }

    fn finish(self) -> Result<Document> {
        if let Some(open) = self.stack.last() {
            return Err(ExportError::malformed(format!(
                "unclosed element <{}>",
                open.name
            )));
        }
        let root = self
            .root
            .ok_or_else(|| ExportError::malformed("document has no root element"))?;
        Ok(Document {
            prolog: self.prolog,
            root,
            epilog: self.epilog,
        })
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| ExportError::xml(format!("invalid UTF-8: {}", e)))
}

fn element_from_start(e: &BytesStart) -> Result<Element> {
    let name_bytes = e.name();
    let mut el = Element::new(utf8(name_bytes.as_ref())?);

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ExportError::xml(format!("bad attribute: {:?}", e)))?;
        let key = utf8(attr.key.as_ref())?;
        let raw = utf8(&attr.value)?;
        // Entities declared in an internal DTD are not known to the unescaper
        let attribute = match quick_xml::escape::unescape(raw) {
            Ok(value) => Attribute::new(key, value),
            Err(_) => Attribute::verbatim(key, raw),
        };
        el.attributes.push(attribute);
    }

    Ok(el)
}

/// Parse an SVG (or any XML) string into a `Document`
pub fn parse_document(xml: &str) -> Result<Document> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut builder = TreeBuilder::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => builder.open(element_from_start(e)?),
            Ok(Event::Empty(ref e)) => builder.attach_element(element_from_start(e)?)?,
            Ok(Event::End(_)) => builder.close()?,
            Ok(Event::Text(ref e)) => builder.push_text(&String::from_utf8_lossy(e.as_ref())),
            Ok(Event::GeneralRef(ref e)) => {
                builder.push_text(&format!("&{};", String::from_utf8_lossy(e.as_ref())))
            }
            Ok(Event::CData(ref e)) => {
                builder.push(Node::CData(String::from_utf8_lossy(e.as_ref()).into_owned()))
            }
            Ok(Event::Comment(ref e)) => {
                builder.push(Node::Comment(String::from_utf8_lossy(e.as_ref()).into_owned()))
            }
            Ok(Event::PI(ref e)) => builder.push(Node::ProcessingInstruction(
                String::from_utf8_lossy(e.as_ref()).into_owned(),
            )),
            Ok(Event::DocType(ref e)) => {
                builder.push(Node::DocType(String::from_utf8_lossy(e.as_ref()).into_owned()))
            }
            Ok(Event::Decl(ref e)) => {
                let version = e
                    .version()
                    .map_err(|e| ExportError::xml(format!("bad XML declaration: {:?}", e)))?;
                let mut decl = format!("xml version=\"{}\"", utf8(&version)?);
                if let Some(encoding) = e.encoding() {
                    let encoding = encoding
                        .map_err(|e| ExportError::xml(format!("bad encoding: {:?}", e)))?;
                    decl.push_str(&format!(" encoding=\"{}\"", utf8(&encoding)?));
                }
                if let Some(standalone) = e.standalone() {
                    let standalone = standalone
                        .map_err(|e| ExportError::xml(format!("bad standalone: {:?}", e)))?;
                    decl.push_str(&format!(" standalone=\"{}\"", utf8(&standalone)?));
                }
                builder.push(Node::ProcessingInstruction(decl));
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExportError::xml(format!(
                    "{:?} at position {}",
                    e,
                    reader.buffer_position()
                )));
            }
        }
        buf.clear();
    }

    builder.finish()
}

/// Read and parse a document from disk
pub fn load_document(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path).map_err(|e| ExportError::io(path, e))?;
    parse_document(&content)
}
