//! Arena-based page DOM with generation-tagged slots.
//!
//! The arena is the crate's stand-in for the live document: the embedding
//! host mirrors its engine's DOM into it and keeps style/geometry current.
//! Slots are reused after removal, but each reuse bumps the slot generation,
//! so a [`NodeHandle`] taken before a removal can never silently alias a new
//! element occupying the same slot. This is how the registry holds elements
//! weakly without preventing reclamation.

use crate::sanitize::sanitize_text;

use super::node::{Node, NodeData};
use super::types::{ComputedStyle, PageEvent, Rect, ViewportInfo};
use super::NodeId;

/// Non-owning handle to an element: resolves only while the slot generation
/// matches and the node is still attached to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeHandle {
    pub node: NodeId,
    pub generation: u32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// The page document: node arena, viewport state, and dispatched-event log.
#[derive(Debug)]
pub struct PageDom {
    slots: Vec<Slot>,
    free: Vec<u32>,
    body: NodeId,
    viewport: ViewportInfo,
    events: Vec<PageEvent>,
    title: String,
}

impl PageDom {
    /// Create a document with an empty `<body>` sized to the viewport.
    pub fn new(viewport: ViewportInfo) -> Self {
        let mut dom = Self {
            slots: Vec::new(),
            free: Vec::new(),
            body: NodeId(0),
            viewport,
            events: Vec::new(),
            title: String::new(),
        };
        dom.body = dom.alloc(Node::element("body"));
        dom.set_rect(
            dom.body,
            Rect::new(0.0, 0.0, dom.viewport.width as f64, dom.viewport.height as f64),
        );
        dom
    }

    /// The document body, root of every traversal.
    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn viewport(&self) -> &ViewportInfo {
        &self.viewport
    }

    /// Page title, sanitized on read since it is page-authored text.
    pub fn title(&self) -> String {
        sanitize_text(&self.title)
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    // ------------------------------------------------------------------
    // Construction and mutation
    // ------------------------------------------------------------------

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(idx) = self.free.pop() {
            let slot = &mut self.slots[idx as usize];
            slot.node = Some(node);
            NodeId(idx)
        } else {
            self.slots.push(Slot {
                generation: 0,
                node: Some(node),
            });
            NodeId((self.slots.len() - 1) as u32)
        }
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(tag))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(content))
    }

    /// Append a child to a parent's ordered child list.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
    }

    /// Create an element and append it in one step.
    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.create_element(tag);
        self.append_child(parent, id);
        id
    }

    /// Create a text node and append it in one step.
    pub fn append_text(&mut self, parent: NodeId, content: &str) -> NodeId {
        let id = self.create_text(content);
        self.append_child(parent, id);
        id
    }

    /// Remove a subtree from the document and vacate its slots. Every handle
    /// into the subtree goes stale; slots become reusable under a new
    /// generation. The body cannot be removed.
    pub fn remove(&mut self, node: NodeId) {
        if node == self.body {
            return;
        }
        if let Some(parent) = self.get(node).and_then(|n| n.parent) {
            if let Some(p) = self.get_mut(parent) {
                p.children.retain(|c| *c != node);
            }
        }
        self.vacate(node);
    }

    fn vacate(&mut self, node: NodeId) {
        let children = self
            .get(node)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.vacate(child);
        }
        if let Some(slot) = self.slots.get_mut(node.0 as usize) {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(node.0);
            }
        }
    }

    /// Discard all content and start over with a fresh body, modeling a
    /// navigation. Handles from the previous document never resolve again.
    pub fn reset(&mut self, viewport: ViewportInfo) {
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.node.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(idx as u32);
            }
        }
        self.events.clear();
        self.title.clear();
        self.viewport = viewport;
        self.body = self.alloc(Node::element("body"));
        self.set_rect(
            self.body,
            Rect::new(0.0, 0.0, self.viewport.width as f64, self.viewport.height as f64),
        );
    }

    // ------------------------------------------------------------------
    // Lookup and liveness
    // ------------------------------------------------------------------

    /// Get a node by id, if its slot is occupied.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.0 as usize)?.node.as_ref()
    }

    /// Get a mutable node by id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.0 as usize)?.node.as_mut()
    }

    /// Take a weak handle to a node at its current generation.
    pub fn handle(&self, id: NodeId) -> NodeHandle {
        NodeHandle {
            node: id,
            generation: self
                .slots
                .get(id.0 as usize)
                .map(|s| s.generation)
                .unwrap_or(0),
        }
    }

    /// Dereference a weak handle. Returns the node id only if the slot still
    /// holds the same element and it is attached to the document.
    pub fn resolve(&self, handle: NodeHandle) -> Option<NodeId> {
        let slot = self.slots.get(handle.node.0 as usize)?;
        if slot.generation != handle.generation || slot.node.is_none() {
            return None;
        }
        self.is_attached(handle.node).then_some(handle.node)
    }

    /// Whether a node is reachable from the document body.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.body {
                return true;
            }
            match self.get(current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Ordered children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    // ------------------------------------------------------------------
    // Element accessors
    // ------------------------------------------------------------------

    /// Tag name of an element node.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id)?.as_element().map(|e| e.tag.as_str())
    }

    /// Attribute value on an element node.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.attr(name)
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.get(id)
            .and_then(|n| n.as_element())
            .is_some_and(|e| e.has_attr(name))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(el) = self.get_mut(id).and_then(|n| n.as_element_mut()) {
            el.set_attr(name, value);
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(el) = self.get_mut(id).and_then(|n| n.as_element_mut()) {
            el.remove_attr(name);
        }
    }

    pub fn style(&self, id: NodeId) -> Option<&ComputedStyle> {
        self.get(id)?.as_element()?.style.as_ref()
    }

    pub fn set_style(&mut self, id: NodeId, style: ComputedStyle) {
        if let Some(el) = self.get_mut(id).and_then(|n| n.as_element_mut()) {
            el.style = Some(style);
        }
    }

    /// Drop the style oracle for an element; it then classifies as not
    /// visible.
    pub fn clear_style(&mut self, id: NodeId) {
        if let Some(el) = self.get_mut(id).and_then(|n| n.as_element_mut()) {
            el.style = None;
        }
    }

    pub fn rect(&self, id: NodeId) -> Rect {
        self.get(id)
            .and_then(|n| n.as_element())
            .map(|e| e.rect)
            .unwrap_or_default()
    }

    pub fn set_rect(&mut self, id: NodeId, rect: Rect) {
        if let Some(el) = self.get_mut(id).and_then(|n| n.as_element_mut()) {
            el.rect = rect;
        }
    }

    /// Concatenated content of the node's direct text children only.
    pub fn direct_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            if let Some(text) = self.get(*child).and_then(|n| n.as_text()) {
                out.push_str(text);
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// First element in pre-order whose `id` attribute matches.
    pub fn get_element_by_id(&self, id_value: &str) -> Option<NodeId> {
        self.find_first(self.body, &|dom, node| dom.attr(node, "id") == Some(id_value))
    }

    /// First element in pre-order whose `<label for=…>` targets the id.
    pub fn find_label_for(&self, target_id: &str) -> Option<NodeId> {
        self.find_first(self.body, &|dom, node| {
            dom.tag(node) == Some("label") && dom.attr(node, "for") == Some(target_id)
        })
    }

    /// First element in pre-order matching a minimal selector grammar:
    /// `tag`, `#id`, `.class`, `tag#id`, or `tag.class`.
    pub fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.find_first(self.body, &|dom, node| dom.matches_selector(node, selector))
    }

    /// Test a single element against the minimal selector grammar.
    pub fn matches_selector(&self, id: NodeId, selector: &str) -> bool {
        let Some(el) = self.get(id).and_then(|n| n.as_element()) else {
            return false;
        };
        let sel = selector.trim();
        if sel.is_empty() {
            return false;
        }
        if let Some(id_value) = sel.strip_prefix('#') {
            return el.attr("id") == Some(id_value);
        }
        if let Some(class) = sel.strip_prefix('.') {
            return el.classes().iter().any(|c| c == class);
        }
        if let Some(pos) = sel.find('#') {
            return el.tag == sel[..pos] && el.attr("id") == Some(&sel[pos + 1..]);
        }
        if let Some(pos) = sel.find('.') {
            return el.tag == sel[..pos] && el.classes().iter().any(|c| c == &sel[pos + 1..]);
        }
        el.tag == sel
    }

    fn find_first(
        &self,
        start: NodeId,
        pred: &dyn Fn(&Self, NodeId) -> bool,
    ) -> Option<NodeId> {
        if self.get(start)?.as_element().is_some() && pred(self, start) {
            return Some(start);
        }
        for child in self.children(start) {
            if let Some(found) = self.find_first(*child, pred) {
                return Some(found);
            }
        }
        None
    }

    // ------------------------------------------------------------------
    // Viewport and events
    // ------------------------------------------------------------------

    /// Scroll the viewport so the element's center is as close to the
    /// viewport center as the document origin allows.
    pub fn scroll_into_view(&mut self, id: NodeId) {
        let (cx, cy) = self.rect(id).center();
        self.viewport.scroll_x = (cx - self.viewport.width as f64 / 2.0).max(0.0);
        self.viewport.scroll_y = (cy - self.viewport.height as f64 / 2.0).max(0.0);
    }

    /// Record an event dispatched at a node.
    pub fn dispatch_event(&mut self, target: NodeId, kind: &str) {
        self.events.push(PageEvent {
            target,
            kind: kind.to_string(),
        });
    }

    /// Event kinds dispatched at a node, in order.
    pub fn events_for(&self, target: NodeId) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.target == target)
            .map(|e| e.kind.as_str())
            .collect()
    }

    /// Drain the event log for the host to replay into its engine.
    pub fn drain_events(&mut self) -> Vec<PageEvent> {
        std::mem::take(&mut self.events)
    }
}

impl Default for PageDom {
    fn default() -> Self {
        Self::new(ViewportInfo::default())
    }
}

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;
