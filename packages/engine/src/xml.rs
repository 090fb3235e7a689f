//! Owned XML element tree and the tree-access primitives used by the
//! identity machinery.
//!
//! Documents are parsed with `roxmltree` and converted into an owned
//! [`Element`] tree so that metadata can be mutated in place. Navigation
//! matches on local tag names (namespace prefixes are resolved and dropped
//! at parse time), and every accessor returns an `Option` or `Result`
//! rather than panicking on absent structure.
//!
//! The mutation surface is deliberately small: get/set attribute,
//! insert-or-fetch a child with deterministic sibling placement, and remove
//! a child. That is all the propagation machinery needs.

use crate::error::Result;

/// A node in the element tree: an element or a run of character data.
///
/// Comments and processing instructions are dropped at parse time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A child element.
    Element(Element),
    /// A text node, stored verbatim (including whitespace).
    Text(String),
}

/// Where to place a child element that has to be created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement<'a> {
    /// Insert as the first child.
    First,
    /// Insert immediately after the first sibling with this tag name, or at
    /// the end if no such sibling exists.
    After(&'a str),
    /// Append as the last child.
    Last,
}

/// An XML element with ordered attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Parse an XML string into an element tree.
    ///
    /// # Errors
    ///
    /// Returns `AknError::XmlParse` if the input is not well-formed XML.
    pub fn parse(xml: &str) -> Result<Self> {
        let (root, _) = parse_document(xml)?;
        Ok(root)
    }

    /// The element's tag name, without namespace prefix.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing an existing value or appending a new
    /// attribute while preserving attribute order.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// Iterate over the element's attributes in document order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All child nodes, including text.
    pub fn nodes(&self) -> &[Node] {
        &self.children
    }

    /// Iterate over child elements, skipping text nodes.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// The trimmed text content directly inside this element, if any.
    pub fn text(&self) -> Option<&str> {
        self.children.iter().find_map(|node| match node {
            Node::Text(text) => {
                let trimmed = text.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            Node::Element(_) => None,
        })
    }

    /// Find the first child element with the given tag name.
    pub fn find(&self, tag: &str) -> Option<&Element> {
        self.children().find(|el| el.tag == tag)
    }

    /// Find the first child element with the given tag name, mutably.
    pub fn find_mut(&mut self, tag: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(el) if el.tag == tag => Some(el),
            _ => None,
        })
    }

    /// Iterate over all child elements with the given tag name.
    pub fn find_all<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children().filter(move |el| el.tag == tag)
    }

    /// Find a descendant element matching a slash-separated path of tag
    /// names, eg. `meta/identification/FRBRWork`.
    pub fn at_path(&self, path: &str) -> Option<&Element> {
        let mut current = self;
        for part in path.split('/') {
            current = current.find(part)?;
        }
        Some(current)
    }

    /// Find a descendant element matching a slash-separated path of tag
    /// names, mutably.
    pub fn at_path_mut(&mut self, path: &str) -> Option<&mut Element> {
        let mut current = self;
        for part in path.split('/') {
            current = current.find_mut(part)?;
        }
        Some(current)
    }

    /// Append a child element.
    pub fn push_child(&mut self, child: Element) -> &mut Element {
        self.children.push(Node::Element(child));
        match self.children.last_mut() {
            Some(Node::Element(el)) => el,
            _ => unreachable!("push_child appended an element"),
        }
    }

    /// Append a text node.
    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(Node::Text(text.into()));
    }

    /// Get an existing child element by tag name, or create it at the given
    /// placement.
    pub fn ensure_child(&mut self, tag: &str, placement: Placement<'_>) -> &mut Element {
        let index = match self.position_of(tag) {
            Some(index) => index,
            None => {
                let at = match placement {
                    Placement::First => 0,
                    Placement::After(sibling) => self
                        .position_of(sibling)
                        .map_or(self.children.len(), |i| i + 1),
                    Placement::Last => self.children.len(),
                };
                self.children.insert(at, Node::Element(Element::new(tag)));
                at
            }
        };

        match &mut self.children[index] {
            Node::Element(el) => el,
            Node::Text(_) => unreachable!("index points at an element"),
        }
    }

    /// Insert a child element as the first child.
    pub fn insert_child_first(&mut self, child: Element) {
        self.children.insert(0, Node::Element(child));
    }

    /// Remove an attribute.
    ///
    /// Returns `true` if the attribute was present.
    pub fn remove_attr(&mut self, name: &str) -> bool {
        match self.attrs.iter().position(|(k, _)| k == name) {
            Some(index) => {
                self.attrs.remove(index);
                true
            }
            None => false,
        }
    }

    /// Keep only the child elements for which the predicate holds. Text
    /// nodes are untouched.
    pub fn retain_children<F: FnMut(&Element) -> bool>(&mut self, mut keep: F) {
        self.children.retain(|node| match node {
            Node::Element(el) => keep(el),
            Node::Text(_) => true,
        });
    }

    /// Remove the first child element with the given tag name.
    ///
    /// Returns `true` if an element was removed.
    pub fn remove_child(&mut self, tag: &str) -> bool {
        match self.position_of(tag) {
            Some(index) => {
                self.children.remove(index);
                true
            }
            None => false,
        }
    }

    /// Navigate to a descendant element by node-index path.
    ///
    /// Paths are produced by the component resolver and index into the raw
    /// node list (text nodes included).
    pub fn node_at_path(&self, path: &[usize]) -> Option<&Element> {
        let mut current = self;
        for &index in path {
            current = match current.children.get(index)? {
                Node::Element(el) => el,
                Node::Text(_) => return None,
            };
        }
        Some(current)
    }

    /// Navigate to a descendant element by node-index path, mutably.
    pub fn node_at_path_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = self;
        for &index in path {
            current = match current.children.get_mut(index)? {
                Node::Element(el) => el,
                Node::Text(_) => return None,
            };
        }
        Some(current)
    }

    /// Index of the first child element with the given tag name, in the raw
    /// node list.
    fn position_of(&self, tag: &str) -> Option<usize> {
        self.children.iter().position(|node| match node {
            Node::Element(el) => el.tag == tag,
            Node::Text(_) => false,
        })
    }

    /// Serialize the element tree to an XML string.
    ///
    /// The serializer is deterministic: identical trees produce identical
    /// strings.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            escape_into(value, true, out);
            out.push('"');
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            match child {
                Node::Element(el) => el.write(out),
                Node::Text(text) => escape_into(text, false, out),
            }
        }
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

/// Parse an XML string, returning the root element and the namespace URIs
/// declared on it, in declaration order.
///
/// # Errors
///
/// Returns `AknError::XmlParse` if the input is not well-formed XML.
pub fn parse_document(xml: &str) -> Result<(Element, Vec<String>)> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();

    let namespaces = root
        .namespaces()
        .map(|ns| ns.uri().to_string())
        .collect::<Vec<_>>();

    Ok((convert(root), namespaces))
}

fn convert(node: roxmltree::Node<'_, '_>) -> Element {
    let mut element = Element::new(node.tag_name().name());

    for attr in node.attributes() {
        element.attrs.push((attr.name().to_string(), attr.value().to_string()));
    }

    for child in node.children() {
        if child.is_element() {
            element.children.push(Node::Element(convert(child)));
        } else if child.is_text() {
            if let Some(text) = child.text() {
                element.children.push(Node::Text(text.to_string()));
            }
        }
    }

    element
}

fn escape_into(value: &str, in_attr: bool, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if in_attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
