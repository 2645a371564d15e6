//! Page node representation.

use super::types::{ComputedStyle, Rect};
use super::NodeId;

/// One node in the page arena.
#[derive(Debug)]
pub struct Node {
    /// Parent node, `None` for the document body.
    pub parent: Option<NodeId>,
    /// Ordered children.
    pub children: Vec<NodeId>,
    /// Node-specific data.
    pub data: NodeData,
}

impl Node {
    pub(super) fn element(tag: &str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(ElementData::new(tag)),
        }
    }

    pub(super) fn text(content: &str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Text(content.to_string()),
        }
    }

    /// Get element data if this is an element.
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            NodeData::Text(_) => None,
        }
    }

    /// Get mutable element data.
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            NodeData::Text(_) => None,
        }
    }

    /// Get text content if this is a text node.
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            NodeData::Element(_) => None,
        }
    }
}

/// Node-specific data.
#[derive(Debug)]
pub enum NodeData {
    /// Element with tag, attributes, and host-supplied style and geometry.
    Element(ElementData),
    /// Text content.
    Text(String),
}

/// Element-specific data.
#[derive(Debug)]
pub struct ElementData {
    /// Tag name (lowercase).
    pub tag: String,
    /// Attributes in document order.
    pub attrs: Vec<Attribute>,
    /// Computed style resolved by the host engine. `None` means the engine
    /// could not resolve a style; the element classifies as not visible.
    pub style: Option<ComputedStyle>,
    /// Bounding rect in document coordinates, from the host's layout.
    pub rect: Rect,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_lowercase(),
            attrs: Vec::new(),
            style: Some(ComputedStyle::default()),
            rect: Rect::default(),
        }
    }

    /// Get an attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Check attribute presence regardless of value.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|a| a.name == name)
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        for attr in self.attrs.iter_mut() {
            if attr.name == name {
                attr.value = value.to_string();
                return;
            }
        }
        self.attrs.push(Attribute {
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    /// Remove an attribute if present.
    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|a| a.name != name);
    }

    /// Class list parsed from the `class` attribute.
    pub fn classes(&self) -> Vec<String> {
        self.attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

/// Attribute name/value pair.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}
