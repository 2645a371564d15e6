//! Page-context message router.
//!
//! The single entry point the external controller reaches over the messaging
//! transport. Exactly one router is registered per page-context lifetime;
//! every inbound request produces exactly one response, even on internal
//! failure. Requests are handled strictly in arrival order, but there is no
//! cross-request atomicity: the page may mutate its DOM between a serialize
//! response and the click that follows it, which is why every action
//! re-checks reference staleness at use time.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::config::ContextConfig;
use crate::error::ActionError;
use crate::executor::Executor;
use crate::page::{PageDom, ViewportInfo};
use crate::registry::ElementRegistry;
use crate::serializer::{serialize, FilterMode};

/// Fixed marker every request envelope must carry in its `type` field.
pub const MESSAGE_MARKER: &str = "domlens";

/// Mutable state of one page context: the mirrored document and the single
/// reference registry bound to it.
#[derive(Debug)]
pub struct PageState {
    pub dom: PageDom,
    pub registry: ElementRegistry,
}

/// One page context. Constructed once per page load; [`navigate`] models a
/// full navigation, after which no prior reference resolves.
///
/// [`navigate`]: PageContext::navigate
pub struct PageContext {
    state: Mutex<PageState>,
    cfg: ContextConfig,
}

impl PageContext {
    pub fn new(dom: PageDom, cfg: ContextConfig) -> Self {
        Self {
            state: Mutex::new(PageState {
                dom,
                registry: ElementRegistry::new(),
            }),
            cfg,
        }
    }

    pub fn config(&self) -> &ContextConfig {
        &self.cfg
    }

    /// Run a closure against the locked page state. The lock is never held
    /// across a suspension point.
    pub fn with_state<R>(&self, f: impl FnOnce(&mut PageState) -> R) -> R {
        let mut state = self.state.lock();
        f(&mut state)
    }

    /// Model a full page navigation: fresh document, empty registry.
    pub fn navigate(&self, viewport: ViewportInfo) {
        let mut state = self.state.lock();
        state.dom.reset(viewport);
        state.registry.reset();
    }
}

/// Inbound handler seam the transport collaborator registers once per
/// page-context lifetime. The transport owns delivery and keeps the response
/// channel open until the returned future completes.
#[async_trait]
pub trait Endpoint: Send + Sync {
    async fn handle(&self, request: Value) -> Value;
}

/// Dispatches controller requests to the serializer and executor.
pub struct PageRouter {
    ctx: Arc<PageContext>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "action")]
enum Request {
    #[serde(rename = "serialize")]
    Serialize { filter: Option<String> },
    #[serde(rename = "inspect")]
    Inspect {
        #[serde(rename = "ref")]
        reference: String,
    },
    #[serde(rename = "click")]
    Click {
        #[serde(rename = "ref")]
        reference: String,
    },
    #[serde(rename = "formInput")]
    FormInput {
        #[serde(rename = "ref")]
        reference: String,
        value: Value,
    },
    #[serde(rename = "scroll")]
    Scroll {
        #[serde(rename = "ref")]
        reference: String,
    },
    #[serde(rename = "getText")]
    GetText {
        selector: Option<String>,
        #[serde(rename = "maxLength")]
        max_length: Option<usize>,
    },
    #[serde(rename = "waitFor")]
    WaitFor {
        selector: String,
        #[serde(rename = "timeoutMs")]
        timeout_ms: Option<u64>,
    },
}

impl PageRouter {
    pub fn new(ctx: Arc<PageContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<PageContext> {
        &self.ctx
    }

    async fn dispatch(&self, request: Request) -> Value {
        match request {
            Request::Serialize { filter } => {
                let filter = FilterMode::parse(filter.as_deref());
                let snapshot = self.ctx.with_state(|state| {
                    serialize(&state.dom, &mut state.registry, filter, self.ctx.config())
                });
                success_value(snapshot)
            }
            Request::Inspect { reference } => self.run_action(|ex| ex.inspect(&reference)),
            Request::Click { reference } => self.run_action(|ex| ex.click(&reference)),
            Request::FormInput { reference, value } => {
                self.run_action(|ex| ex.form_input(&reference, &value))
            }
            Request::Scroll { reference } => self.run_action(|ex| ex.scroll_to(&reference)),
            Request::GetText {
                selector,
                max_length,
            } => self.run_action(|ex| ex.get_page_text(selector.as_deref(), max_length)),
            Request::WaitFor {
                selector,
                timeout_ms,
            } => self.wait_for(&selector, timeout_ms).await,
        }
    }

    fn run_action<T: Serialize>(
        &self,
        f: impl FnOnce(&mut Executor<'_>) -> Result<T, ActionError>,
    ) -> Value {
        let outcome = self.ctx.with_state(|state| {
            let PageState { dom, registry } = state;
            let mut executor = Executor::new(dom, registry, self.ctx.config());
            f(&mut executor)
        });
        match outcome {
            Ok(result) => success_value(result),
            Err(err) => {
                debug!(error = %err, retryable = err.retryable(), "action failed");
                failure(&err.to_string())
            }
        }
    }

    /// Bounded polling loop waiting for a selector to appear. Sleeps between
    /// attempts so the host keeps processing; never holds the state lock
    /// across a sleep.
    async fn wait_for(&self, selector: &str, timeout_ms: Option<u64>) -> Value {
        let timeout = timeout_ms.unwrap_or(self.ctx.config().wait_timeout_ms);
        let poll = Duration::from_millis(self.ctx.config().poll_interval_ms.max(1));
        let deadline = Instant::now() + Duration::from_millis(timeout);
        loop {
            let found = self.ctx.with_state(|state| {
                let PageState { dom, registry } = state;
                dom.query_selector(selector)
                    .map(|node| registry.resolve_or_assign(dom, node))
            });
            if let Some(reference) = found {
                debug!(selector, reference, "selector appeared");
                return json!({ "success": true, "found": true, "ref": reference });
            }
            if Instant::now() >= deadline {
                debug!(selector, timeout, "selector did not appear before deadline");
                return json!({ "success": true, "found": false });
            }
            sleep(poll).await;
        }
    }
}

#[async_trait]
impl Endpoint for PageRouter {
    /// Handle one controller request. Always produces exactly one response;
    /// malformed or unknown requests become structured failures rather than
    /// dropped messages.
    async fn handle(&self, request: Value) -> Value {
        if request.get("type").and_then(Value::as_str) != Some(MESSAGE_MARKER) {
            return failure("unrecognized message type");
        }
        match serde_json::from_value::<Request>(request.clone()) {
            Ok(parsed) => self.dispatch(parsed).await,
            Err(err) => {
                let action = request
                    .get("action")
                    .and_then(Value::as_str)
                    .unwrap_or("<missing>");
                warn!(action, error = %err, "rejected request");
                if matches!(
                    action,
                    "serialize" | "inspect" | "click" | "formInput" | "scroll" | "getText"
                        | "waitFor"
                ) {
                    failure(&format!("invalid request: {}", err))
                } else {
                    failure(&format!("unknown action {:?}", action))
                }
            }
        }
    }
}

fn success_value<T: Serialize>(result: T) -> Value {
    match serde_json::to_value(result) {
        Ok(Value::Object(mut map)) => {
            map.insert("success".to_string(), json!(true));
            Value::Object(map)
        }
        Ok(other) => json!({ "success": true, "result": other }),
        Err(err) => failure(&format!("internal error: {}", err)),
    }
}

fn failure(message: &str) -> Value {
    json!({ "success": false, "error": message })
}
