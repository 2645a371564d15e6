//! Reference registry: opaque string ids weakly bound to page elements.
//!
//! Exactly one registry exists per page-context lifetime. Ids stay stable
//! across repeated serializations of an unchanged page, and no element ever
//! holds two live ids at once. Cleanup is lazy: an entry is purged the first
//! time a lookup discovers its element is gone, plus an optional bulk sweep
//! after each serialization pass.

use std::collections::HashMap;

use tracing::debug;

use crate::page::{NodeHandle, NodeId, PageDom};

/// Table of reference-id → weak element handle, plus the monotonic counter
/// ids are minted from. The counter only resets on a full [`reset`].
///
/// [`reset`]: ElementRegistry::reset
#[derive(Debug, Default)]
pub struct ElementRegistry {
    entries: HashMap<String, NodeHandle>,
    counter: u64,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the existing id for this element, or mint a new one. Stable
    /// across repeated passes while the element stays alive.
    pub fn resolve_or_assign(&mut self, dom: &PageDom, node: NodeId) -> String {
        let handle = dom.handle(node);
        for (id, existing) in &self.entries {
            if *existing == handle {
                return id.clone();
            }
        }
        self.counter += 1;
        let id = format!("e{}", self.counter);
        self.entries.insert(id.clone(), handle);
        id
    }

    /// Dereference a reference id. Returns `None` for unknown ids, and for
    /// stale ones, purging the stale entry on the way out.
    pub fn lookup(&mut self, dom: &PageDom, id: &str) -> Option<NodeId> {
        let handle = *self.entries.get(id)?;
        match dom.resolve(handle) {
            Some(node) => Some(node),
            None => {
                debug!(reference = id, "purging stale registry entry");
                self.entries.remove(id);
                None
            }
        }
    }

    /// Bulk-remove entries whose handle no longer resolves. Memory hygiene
    /// only; lazy invalidation in [`lookup`] already keeps answers correct.
    ///
    /// [`lookup`]: ElementRegistry::lookup
    pub fn sweep_stale(&mut self, dom: &PageDom) {
        let before = self.entries.len();
        self.entries.retain(|_, handle| dom.resolve(*handle).is_some());
        let swept = before - self.entries.len();
        if swept > 0 {
            debug!(swept, "swept stale registry entries");
        }
    }

    /// Number of live entries currently tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Clear all entries and restart the counter. Only for a full page
    /// navigation; ids are never reused within one page load.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.counter = 0;
    }
}
