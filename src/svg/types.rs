/// Qualified name of the Inkscape group-mode attribute
pub const GROUP_MODE_ATTR: &str = "inkscape:groupmode";
/// Qualified name of the Inkscape label attribute
pub const LABEL_ATTR: &str = "inkscape:label";

/// Single attribute, value stored unescaped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    /// `value` is still in source form and must be written without escaping
    pub verbatim: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            verbatim: false,
        }
    }

    /// Attribute whose value could not be unescaped, e.g. one referencing an
    /// entity from an internal DTD subset
    pub fn verbatim(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            verbatim: true,
            ..Self::new(name, raw)
        }
    }
}

/// Any node that can appear in the tree.
///
/// Character data is kept in its raw (still escaped) form so that entity
/// references survive a parse/write cycle untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    /// Raw content between `<?` and `?>`, XML declaration included
    ProcessingInstruction(String),
    /// Raw content after `<!DOCTYPE `
    DocType(String),
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

/// Element with ordered attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Name without namespace prefix (`svg:g` -> `g`)
    pub fn local_name(&self) -> &str {
        match self.name.rsplit_once(':') {
            Some((_, local)) => local,
            None => &self.name,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => {
                attr.value = value;
                attr.verbatim = false;
            }
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Layer metadata of a group element: `(groupmode, label)`.
    ///
    /// `None` for anything that is not a `g` or has no group-mode attribute.
    pub fn layer_markers(&self) -> Option<(&str, Option<&str>)> {
        if self.local_name() != "g" {
            return None;
        }
        let group_mode = self.attribute(GROUP_MODE_ATTR)?;
        Some((group_mode, self.attribute(LABEL_ATTR)))
    }

    /// True for a group marked with `inkscape:groupmode="layer"`
    pub fn is_layer(&self) -> bool {
        matches!(self.layer_markers(), Some(("layer", _)))
    }
}

/// Parsed XML document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Declaration, comments, doctype and whitespace before the root
    pub prolog: Vec<Node>,
    pub root: Element,
    /// Anything after the root element
    pub epilog: Vec<Node>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    /// All elements in document order, root first
    pub fn descendants(&self) -> Vec<&Element> {
        fn walk<'a>(el: &'a Element, out: &mut Vec<&'a Element>) {
            out.push(el);
            for child in el.child_elements() {
                walk(child, out);
            }
        }

        let mut out = Vec::new();
        walk(&self.root, &mut out);
        out
    }
}
