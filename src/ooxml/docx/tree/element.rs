/// Opaque markup carried through the content tree.
///
/// Everything the tree does not model with a dedicated node type (bookmarks,
/// drawings, math, style definitions, ...) is kept as an [`Element`] so that
/// it round-trips unchanged. Names are stored qualified, exactly as written
/// in the source (`w:bookmarkStart`, `m:oMath`).
use std::fmt;

/// A single `name="value"` attribute, value unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Qualified attribute name (`w:id`, `xmlns:w`, `xml:space`)
    pub name: String,
    /// Unescaped attribute value
    pub value: String,
}

impl Attribute {
    /// Create a new attribute.
    #[inline]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Look up an attribute value by qualified name.
#[inline]
pub fn find_attr<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|a| a.name == name)
        .map(|a| a.value.as_str())
}

/// The start tag of a structural element whose children are modeled
/// separately (`w:document`, `w:body`, `w:footnote`, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Qualified element name
    pub name: String,
    /// Attributes in source order
    pub attributes: Vec<Attribute>,
}

impl Tag {
    /// Create a tag without attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Get an attribute value.
    #[inline]
    pub fn attr(&self, name: &str) -> Option<&str> {
        find_attr(&self.attributes, name)
    }
}

/// A child of an opaque element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element
    Element(Element),
    /// Character data, unescaped
    Text(String),
}

/// An opaque XML element with its full subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified element name
    pub name: String,
    /// Attributes in source order
    pub attributes: Vec<Attribute>,
    /// Child nodes in source order
    pub children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: append an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Builder: append a child element.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Builder: append a text node.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Get an attribute value.
    #[inline]
    pub fn attr(&self, name: &str) -> Option<&str> {
        find_attr(&self.attributes, name)
    }

    /// Set or replace an attribute value.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value.into(),
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    /// Split off the start tag.
    pub fn tag(&self) -> Tag {
        Tag {
            name: self.name.clone(),
            attributes: self.attributes.clone(),
        }
    }

    /// Local part of the element name (`p` for `w:p`).
    #[inline]
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Iterate over child elements, skipping text.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            Node::Text(_) => None,
        })
    }

    /// First child element with the given qualified name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|e| e.name == name)
    }

    /// Concatenated character data of the whole subtree.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Whether this element or any descendant satisfies `pred`.
    pub fn any(&self, pred: &impl Fn(&Element) -> bool) -> bool {
        pred(self) || self.child_elements().any(|c| c.any(pred))
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for node in &element.children {
        match node {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => collect_text(e, out),
        }
    }
}

/// Local part of a qualified name.
#[inline]
pub fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.name)
    }
}
