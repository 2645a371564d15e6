//! Action error taxonomy.

use thiserror::Error;

/// Errors produced while executing an action against a referenced element.
///
/// Every variant is recovered at the router boundary and turned into a
/// structured `{success: false, error}` response; nothing propagates past it.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The reference id no longer resolves to an attached, live element.
    ///
    /// This is the single most common failure mode: the page may mutate
    /// between a serialization response and the action that follows it.
    /// Callers should re-serialize and pick a new reference.
    #[error("no element found for reference {0}; it may have been removed from the page")]
    StaleReference(String),

    /// No `<option>` of the select matched the requested value or text.
    #[error("no option matching {value:?}; available options: {}", available.join(", "))]
    OptionNotFound {
        value: String,
        available: Vec<String>,
    },

    /// The action does not apply to this element kind.
    #[error("form input is not supported on <{0}> elements")]
    UnsupportedElement(String),

    /// A supplied selector matched nothing in the document.
    #[error("no element matches selector {0:?}")]
    SelectorNotFound(String),

    /// Unexpected internal failure, surfaced with its message.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ActionError {
    /// Whether the caller can expect a retry to succeed after re-inspecting
    /// the page (re-serialize for stale references, re-enumerate options for
    /// select mismatches).
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            ActionError::StaleReference(_) | ActionError::OptionNotFound { .. }
        )
    }
}
