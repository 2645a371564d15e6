//! Action execution against referenced elements.
//!
//! Every action resolves its target through the registry first and treats a
//! failed resolution as the expected case, not the exceptional one: the page
//! owns its DOM and may have mutated it since the last serialization.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::classify;
use crate::config::ContextConfig;
use crate::error::ActionError;
use crate::page::{NodeId, PageDom, Rect};
use crate::registry::ElementRegistry;
use crate::sanitize::{collapse_whitespace, sanitize_text, truncate_chars};

/// Center point in document coordinates.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Short element descriptor for verification before acting.
#[derive(Debug, Clone, Serialize)]
pub struct ElementDescriptor {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub classes: Vec<String>,
}

/// Result of an `inspect` action.
#[derive(Debug, Clone, Serialize)]
pub struct InspectResult {
    pub center: Point,
    pub rect: Rect,
    pub descriptor: ElementDescriptor,
}

/// Result of a `click` action.
#[derive(Debug, Clone, Serialize)]
pub struct ClickResult {
    pub message: String,
}

/// Result of a `formInput` action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInputResult {
    /// Which control branch handled the input.
    pub control: &'static str,
    pub value: String,
}

/// Result of a `scroll` action.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollResult {
    pub scrolled_to: Point,
}

/// Result of a `getText` action.
#[derive(Debug, Clone, Serialize)]
pub struct PageTextResult {
    pub text: String,
    pub truncated: bool,
    pub length: usize,
}

/// Closed set of form-control kinds the input action dispatches over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormControl {
    Select,
    Checkbox,
    Radio,
    TextLike,
}

impl FormControl {
    /// Classify an element into a control kind, if it accepts form input.
    fn classify(tag: &str, input_type: Option<&str>) -> Option<Self> {
        match tag {
            "select" => Some(FormControl::Select),
            "textarea" => Some(FormControl::TextLike),
            "input" => match input_type.unwrap_or("text") {
                "checkbox" => Some(FormControl::Checkbox),
                "radio" => Some(FormControl::Radio),
                _ => Some(FormControl::TextLike),
            },
            _ => None,
        }
    }
}

/// Executes actions against elements named by reference id. Borrows the
/// page state for the duration of one request.
pub struct Executor<'a> {
    dom: &'a mut PageDom,
    registry: &'a mut ElementRegistry,
    cfg: &'a ContextConfig,
}

impl<'a> Executor<'a> {
    pub fn new(
        dom: &'a mut PageDom,
        registry: &'a mut ElementRegistry,
        cfg: &'a ContextConfig,
    ) -> Self {
        Self { dom, registry, cfg }
    }

    /// Resolve a reference id or report it stale.
    fn resolve(&mut self, reference: &str) -> Result<NodeId, ActionError> {
        self.registry
            .lookup(self.dom, reference)
            .ok_or_else(|| ActionError::StaleReference(reference.to_string()))
    }

    /// Scroll the element into view and report its geometry and a short
    /// descriptor so the caller can verify the target before acting.
    pub fn inspect(&mut self, reference: &str) -> Result<InspectResult, ActionError> {
        let node = self.resolve(reference)?;
        self.dom.scroll_into_view(node);

        let rect = self.dom.rect(node);
        let (x, y) = rect.center();
        let descriptor = self.describe(node);
        debug!(reference, tag = %descriptor.tag, "inspected element");
        Ok(InspectResult {
            center: Point { x, y },
            rect,
            descriptor,
        })
    }

    /// Scroll the element into view and dispatch a click. Succeeds whenever
    /// the reference resolves, regardless of what the page does with it.
    pub fn click(&mut self, reference: &str) -> Result<ClickResult, ActionError> {
        let node = self.resolve(reference)?;
        self.dom.scroll_into_view(node);
        self.dom.dispatch_event(node, "click");

        let tag = self.dom.tag(node).unwrap_or("element").to_string();
        debug!(reference, %tag, "clicked element");
        Ok(ClickResult {
            message: format!("clicked <{}> [{}]", tag, reference),
        })
    }

    /// Apply a form value, branching on the concrete control kind. Every
    /// successful branch dispatches `input` and `change` so page-side
    /// reactive logic observes the mutation the way it would a user edit.
    pub fn form_input(
        &mut self,
        reference: &str,
        value: &Value,
    ) -> Result<FormInputResult, ActionError> {
        let node = self.resolve(reference)?;
        let tag = self
            .dom
            .tag(node)
            .unwrap_or_default()
            .to_string();
        let input_type = self.dom.attr(node, "type").map(str::to_string);

        let control = FormControl::classify(&tag, input_type.as_deref())
            .ok_or_else(|| ActionError::UnsupportedElement(tag.clone()))?;

        let applied = match control {
            FormControl::Select => self.apply_select(node, &value_as_string(value))?,
            FormControl::Checkbox => {
                let checked = value_as_bool(value);
                if checked {
                    self.dom.set_attr(node, "checked", "true");
                } else {
                    self.dom.remove_attr(node, "checked");
                }
                checked.to_string()
            }
            FormControl::Radio => {
                self.dom.set_attr(node, "checked", "true");
                "true".to_string()
            }
            FormControl::TextLike => {
                let text = value_as_string(value);
                self.dom.set_attr(node, "value", &text);
                text
            }
        };

        self.dom.dispatch_event(node, "input");
        self.dom.dispatch_event(node, "change");
        debug!(reference, ?control, value = %applied, "applied form input");

        Ok(FormInputResult {
            control: match control {
                FormControl::Select => "select",
                FormControl::Checkbox => "checkbox",
                FormControl::Radio => "radio",
                FormControl::TextLike => "text",
            },
            value: applied,
        })
    }

    /// Select the option matching the wanted value or visible text. Fails
    /// with the enumerated option texts when nothing matches.
    fn apply_select(&mut self, select: NodeId, wanted: &str) -> Result<String, ActionError> {
        let mut matched: Option<(NodeId, String)> = None;
        let mut available = Vec::new();

        for &child in self.dom.children(select) {
            if self.dom.tag(child) != Some("option") {
                continue;
            }
            let text = collapse_whitespace(&self.dom.direct_text(child));
            let option_value = self
                .dom
                .attr(child, "value")
                .map(str::to_string)
                .unwrap_or_else(|| text.clone());
            if matched.is_none() && (option_value == wanted || text == wanted) {
                matched = Some((child, option_value.clone()));
            }
            available.push(text);
        }

        let (option, option_value) = matched.ok_or_else(|| ActionError::OptionNotFound {
            value: wanted.to_string(),
            available,
        })?;

        let options: Vec<NodeId> = self
            .dom
            .children(select)
            .iter()
            .copied()
            .filter(|&c| self.dom.tag(c) == Some("option"))
            .collect();
        for opt in options {
            if opt == option {
                self.dom.set_attr(opt, "selected", "true");
            } else {
                self.dom.remove_attr(opt, "selected");
            }
        }
        self.dom.set_attr(select, "value", &option_value);
        Ok(option_value)
    }

    /// Scroll the element into centered view.
    pub fn scroll_to(&mut self, reference: &str) -> Result<ScrollResult, ActionError> {
        let node = self.resolve(reference)?;
        self.dom.scroll_into_view(node);
        let viewport = self.dom.viewport();
        debug!(reference, "scrolled element into view");
        Ok(ScrollResult {
            scrolled_to: Point {
                x: viewport.scroll_x,
                y: viewport.scroll_y,
            },
        })
    }

    /// Collect visible text under a selector's subtree (or the whole body),
    /// rejecting text inside hidden, non-content, or assistive-technology-
    /// hidden ancestors. The result is whitespace-collapsed, sanitized, and
    /// capped at `max_length`.
    pub fn get_page_text(
        &mut self,
        selector: Option<&str>,
        max_length: Option<usize>,
    ) -> Result<PageTextResult, ActionError> {
        let root = match selector {
            Some(sel) => self
                .dom
                .query_selector(sel)
                .ok_or_else(|| ActionError::SelectorNotFound(sel.to_string()))?,
            None => self.dom.body(),
        };
        let max = max_length.unwrap_or(self.cfg.page_text_default_max);

        let mut pieces = Vec::new();
        collect_text(self.dom, root, &mut pieces);

        let text = sanitize_text(&collapse_whitespace(&pieces.join(" ")));
        let truncated = text.chars().count() > max;
        let text = if truncated {
            truncate_chars(&text, max).to_string()
        } else {
            text
        };
        let length = text.chars().count();
        debug!(?selector, length, truncated, "extracted page text");
        Ok(PageTextResult {
            text,
            truncated,
            length,
        })
    }

    fn describe(&self, node: NodeId) -> ElementDescriptor {
        let element = self.dom.get(node).and_then(|n| n.as_element());
        ElementDescriptor {
            tag: element.map(|e| e.tag.clone()).unwrap_or_default(),
            id: element.and_then(|e| e.attr("id")).map(str::to_string),
            classes: element.map(|e| e.classes()).unwrap_or_default(),
        }
    }
}

/// Non-content tags whose text never reaches the model.
const TEXT_SKIP_TAGS: &[&str] = &["script", "style", "meta", "link", "title", "noscript"];

fn collect_text(dom: &PageDom, node: NodeId, out: &mut Vec<String>) {
    let Some(n) = dom.get(node) else { return };
    if let Some(el) = n.as_element() {
        // Hidden or non-content ancestors veto their whole subtree.
        if TEXT_SKIP_TAGS.contains(&el.tag.as_str())
            || el.attr("aria-hidden") == Some("true")
            || !classify::is_visible(dom, node)
        {
            return;
        }
    }
    if let Some(text) = n.as_text() {
        if !text.trim().is_empty() {
            out.push(text.to_string());
        }
        return;
    }
    for &child in dom.children(node) {
        collect_text(dom, child, out);
    }
}

fn value_as_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn value_as_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(s.to_lowercase().as_str(), "true" | "1" | "on" | "yes"),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
