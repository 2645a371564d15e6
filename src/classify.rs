//! Visibility, interactivity, role, and accessible-name classification.
//!
//! Pure functions over one node plus the host-supplied computed styles. All
//! of them are total: a detached, malformed, or style-less node degrades to
//! the most conservative answer (not visible, not interactive, empty name)
//! rather than failing.

use crate::config::ContextConfig;
use crate::page::{NodeId, PageDom};
use crate::sanitize::{collapse_whitespace, ellipsize, sanitize_text, truncate_chars};

/// Tags that are interactive by nature, regardless of attributes.
const INTERACTIVE_TAGS: &[&str] = &[
    "a", "button", "input", "select", "textarea", "details", "summary",
];

/// Explicit ARIA roles that make any element interactive.
const INTERACTIVE_ROLES: &[&str] = &[
    "button",
    "link",
    "checkbox",
    "radio",
    "tab",
    "menuitem",
    "option",
    "switch",
    "textbox",
    "searchbox",
    "combobox",
    "listbox",
    "slider",
    "spinbutton",
];

/// Heading and landmark tags that are worth serializing even when inert.
const SEMANTIC_TAGS: &[&str] = &[
    "h1", "h2", "h3", "h4", "h5", "h6", "nav", "main", "header", "footer", "aside", "form",
];

/// Whether the element renders at all: not `display:none`, not
/// `visibility:hidden`, opacity above zero, and a non-degenerate rect.
/// A node with no computed style (or a non-element node) is not visible.
pub fn is_visible(dom: &PageDom, node: NodeId) -> bool {
    let Some(style) = dom.style(node) else {
        return false;
    };
    if style.display == "none" || style.visibility == "hidden" || style.opacity == 0.0 {
        return false;
    }
    let rect = dom.rect(node);
    !(rect.width == 0.0 && rect.height == 0.0)
}

/// Whether the element accepts user interaction. Pure attribute and tag
/// inspection, no layout queries.
pub fn is_interactive(dom: &PageDom, node: NodeId) -> bool {
    let Some(tag) = dom.tag(node) else {
        return false;
    };
    if INTERACTIVE_TAGS.contains(&tag) {
        return true;
    }
    if let Some(role) = dom.attr(node, "role") {
        if INTERACTIVE_ROLES.contains(&role) {
            return true;
        }
    }
    if dom.has_attr(node, "onclick") || dom.has_attr(node, "tabindex") {
        return true;
    }
    dom.attr(node, "contenteditable") == Some("true")
}

/// Whether the tag alone makes the element semantically meaningful
/// (headings and landmarks).
pub fn is_semantic_tag(tag: &str) -> bool {
    SEMANTIC_TAGS.contains(&tag)
}

/// Semantic role of the element. An explicit `role` attribute wins;
/// otherwise a fixed tag table applies and unknown tags fall back to
/// `"generic"`.
pub fn role(dom: &PageDom, node: NodeId) -> String {
    if let Some(explicit) = dom.attr(node, "role") {
        if !explicit.is_empty() {
            return explicit.to_string();
        }
    }
    let Some(tag) = dom.tag(node) else {
        return "generic".to_string();
    };
    match tag {
        "a" => "link",
        "button" | "summary" => "button",
        "input" => return input_role(dom.attr(node, "type").unwrap_or("text")).to_string(),
        "select" => "combobox",
        "textarea" => "textbox",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
        "img" => "image",
        "nav" => "navigation",
        "main" => "main",
        "header" => "banner",
        "footer" => "contentinfo",
        "aside" => "complementary",
        "form" => "form",
        "ul" | "ol" => "list",
        "li" => "listitem",
        "table" => "table",
        "option" => "option",
        "label" => "label",
        "p" => "paragraph",
        _ => "generic",
    }
    .to_string()
}

/// Role derived from an `<input>` `type` attribute.
fn input_role(input_type: &str) -> &'static str {
    match input_type {
        "checkbox" => "checkbox",
        "radio" => "radio",
        "button" | "submit" | "reset" => "button",
        "range" => "slider",
        "number" => "spinbutton",
        "search" => "searchbox",
        _ => "textbox",
    }
}

/// Synthesize the short human-readable label a screen reader would announce,
/// via a priority-ordered probe over attributes and content. Every extracted
/// string passes through the sanitizer before being returned.
pub fn accessible_name(dom: &PageDom, node: NodeId, cfg: &ContextConfig) -> String {
    let Some(tag) = dom.tag(node).map(str::to_string) else {
        return String::new();
    };

    for key in ["aria-label", "placeholder", "title", "alt"] {
        if let Some(value) = dom.attr(node, key) {
            let value = collapse_whitespace(value);
            if !value.is_empty() {
                return sanitize_text(&value);
            }
        }
    }

    // Associated <label for=id> text.
    if let Some(id_value) = dom.attr(node, "id").map(str::to_string) {
        if let Some(label) = dom.find_label_for(&id_value) {
            let text = collapse_whitespace(&dom.direct_text(label));
            if !text.is_empty() {
                return sanitize_text(&text);
            }
        }
    }

    // Submit-like inputs announce their value.
    if tag == "input" {
        if matches!(
            dom.attr(node, "type"),
            Some("submit") | Some("button") | Some("reset")
        ) {
            if let Some(value) = dom.attr(node, "value") {
                let value = collapse_whitespace(value);
                if !value.is_empty() {
                    return sanitize_text(&value);
                }
            }
        }
        return String::new();
    }

    // Direct text content of the node itself, not descendants.
    let direct = collapse_whitespace(&dom.direct_text(node));

    if matches!(tag.as_str(), "button" | "a" | "summary") && !direct.is_empty() {
        return sanitize_text(&direct);
    }

    if matches!(tag.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6") && !direct.is_empty() {
        return sanitize_text(truncate_chars(&direct, 100));
    }

    if tag == "img" {
        if let Some(src) = dom.attr(node, "src") {
            let filename = src.rsplit('/').next().unwrap_or(src);
            if !filename.is_empty() {
                return sanitize_text(&format!("Image: {}", filename));
            }
        }
        return String::new();
    }

    if direct.chars().count() >= 3 {
        return sanitize_text(&ellipsize(&direct, cfg.generic_text_cap));
    }

    String::new()
}
