//! Tree walker and text serializer.
//!
//! Walks the visible document depth-first, decides inclusion through the
//! classifier, binds included elements to stable reference ids through the
//! registry, and renders a compact indented text tree for the model.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify;
use crate::config::ContextConfig;
use crate::page::{NodeId, PageDom, ViewportInfo};
use crate::registry::ElementRegistry;
use crate::sanitize::truncate_chars;

/// Tags carrying no user-visible content, pruned outright.
const SKIP_TAGS: &[&str] = &["script", "style", "meta", "link", "title", "noscript"];

/// Raw attributes worth echoing on a line for disambiguation.
const LINE_ATTRS: &[&str] = &["id", "href", "type", "placeholder"];

/// Request-time policy selecting which elements qualify for inclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Interactive, semantically meaningful, or named elements within the
    /// viewport.
    #[default]
    Default,
    /// Interactive elements only.
    Interactive,
    /// Every visible element, on-screen or not.
    All,
}

impl FilterMode {
    /// Parse a wire filter string; anything unrecognized is the default
    /// profile.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some("interactive") => FilterMode::Interactive,
            Some("all") => FilterMode::All,
            _ => FilterMode::Default,
        }
    }
}

/// The externally visible result of one serialization pass. Produced fresh
/// per request; each snapshot fully supersedes the previous one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeSnapshot {
    /// Indented text rendering of the accessibility tree.
    pub tree: String,
    /// Number of elements included in the tree.
    pub element_count: usize,
    /// Viewport state at serialization time.
    pub viewport: ViewportInfo,
}

struct Line {
    role: String,
    name: String,
    rendered: String,
}

/// Serialize the document body into an accessibility-tree snapshot.
pub fn serialize(
    dom: &PageDom,
    registry: &mut ElementRegistry,
    filter: FilterMode,
    cfg: &ContextConfig,
) -> TreeSnapshot {
    serialize_subtree(dom, registry, dom.body(), filter, cfg)
}

/// Serialize a subtree rooted at an arbitrary element.
pub fn serialize_subtree(
    dom: &PageDom,
    registry: &mut ElementRegistry,
    root: NodeId,
    filter: FilterMode,
    cfg: &ContextConfig,
) -> TreeSnapshot {
    let mut lines = Vec::new();
    walk(dom, registry, cfg, filter, root, 0, 0, &mut lines);

    // Unnamed generic lines are structural noise.
    lines.retain(|line| !(line.role == "generic" && line.name.is_empty()));

    registry.sweep_stale(dom);

    let element_count = lines.len();
    debug!(element_count, ?filter, "serialized accessibility tree");
    TreeSnapshot {
        tree: lines
            .iter()
            .map(|l| l.rendered.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        element_count,
        viewport: dom.viewport().clone(),
    }
}

#[allow(clippy::too_many_arguments)]
fn walk(
    dom: &PageDom,
    registry: &mut ElementRegistry,
    cfg: &ContextConfig,
    filter: FilterMode,
    node: NodeId,
    depth: usize,
    indent: usize,
    lines: &mut Vec<Line>,
) {
    if depth >= cfg.max_depth {
        return;
    }
    let Some(tag) = dom.tag(node).map(str::to_string) else {
        return; // text nodes and vacated slots
    };
    if SKIP_TAGS.contains(&tag.as_str()) {
        return;
    }
    if dom.attr(node, "aria-hidden") == Some("true") {
        return;
    }

    if !classify::is_visible(dom, node) {
        // Invisible subtrees are pruned except under the "all" profile,
        // where deeper visible nodes may still matter.
        if filter == FilterMode::All {
            for &child in dom.children(node) {
                walk(dom, registry, cfg, filter, child, depth + 1, indent, lines);
            }
        }
        return;
    }

    let in_viewport =
        filter == FilterMode::All || dom.rect(node).is_visible_in_viewport(dom.viewport());
    let interactive = classify::is_interactive(dom, node);
    let name = classify::accessible_name(dom, node, cfg);

    let include = in_viewport
        && match filter {
            FilterMode::Interactive => interactive,
            FilterMode::All => true,
            FilterMode::Default => {
                interactive
                    || classify::is_semantic_tag(&tag)
                    || dom.has_attr(node, "role")
                    || !name.is_empty()
            }
        };

    if include {
        let reference = registry.resolve_or_assign(dom, node);
        lines.push(render_line(dom, node, indent, &name, &reference, cfg));
    }

    // Excluded wrappers do not add visual indentation.
    let child_indent = if include { indent + 1 } else { indent };
    for &child in dom.children(node) {
        walk(dom, registry, cfg, filter, child, depth + 1, child_indent, lines);
    }
}

fn render_line(
    dom: &PageDom,
    node: NodeId,
    indent: usize,
    name: &str,
    reference: &str,
    cfg: &ContextConfig,
) -> Line {
    let role = classify::role(dom, node);
    let mut parts = vec![role.clone()];

    if !name.is_empty() {
        let shown = truncate_chars(name, cfg.name_cap).replace('"', "\\\"");
        parts.push(format!("\"{}\"", shown));
    }
    parts.push(format!("[{}]", reference));

    for key in LINE_ATTRS {
        if let Some(value) = dom.attr(node, key) {
            parts.push(format!("{}={}", key, value));
        }
    }

    Line {
        role,
        name: name.to_string(),
        rendered: format!("{}{}", "  ".repeat(indent), parts.join(" ")),
    }
}

#[cfg(test)]
#[path = "serializer_tests.rs"]
mod tests;
