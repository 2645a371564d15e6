//! Page model: arena DOM, geometry, style, and event plumbing.
//!
//! The rendering engine itself is out of scope; the embedding host mirrors
//! its engine's document into a [`PageDom`] and keeps the computed-style and
//! geometry oracles current. Everything above this module (classifier,
//! serializer, executor) reads the page exclusively through this API.

mod dom;
mod node;
mod types;

pub use dom::{NodeHandle, PageDom};
pub use node::{Attribute, ElementData, Node, NodeData};
pub use types::{ComputedStyle, PageEvent, Rect, ViewportInfo};

/// Node identifier (index into the page arena).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);
