//! Per-page-context configuration.

/// Tunables for serialization and action execution within one page context.
#[derive(Debug, Clone)]
pub struct ContextConfig {
    /// Maximum traversal depth for the serializer. Bounds recursion on
    /// pathological or cyclic-looking markup.
    pub max_depth: usize,
    /// Character cap for accessible names in tree output lines.
    pub name_cap: usize,
    /// Character cap for free text lifted from generic elements.
    pub generic_text_cap: usize,
    /// Default cap for `getText` when the request does not supply one.
    pub page_text_default_max: usize,
    /// Sleep between attempts while waiting for a selector to appear.
    pub poll_interval_ms: u64,
    /// Default timeout for `waitFor` requests.
    pub wait_timeout_ms: u64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_depth: 15,
            name_cap: 100,
            generic_text_cap: 50,
            page_text_default_max: 10_000,
            poll_interval_ms: 100,
            wait_timeout_ms: 5_000,
        }
    }
}
