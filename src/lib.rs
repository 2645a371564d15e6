//! Accessibility-tree serialization and element-reference brokering for
//! LLM-driven web agents.
//!
//! Mirrors a page's document into an arena, serializes it as an indented
//! accessibility tree with stable reference ids, and executes actions
//! (click, form input, scroll, text extraction) against those ids on behalf
//! of an external controller.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────┐   JSON request    ┌────────────┐
//! │ Controller │ ────────────────► │ PageRouter │
//! │ (LLM loop) │ ◄──────────────── │            │
//! └────────────┘   JSON response   └─────┬──────┘
//!                                        │
//!                      ┌─────────────────┼─────────────────┐
//!                      ▼                 ▼                 ▼
//!                ┌────────────┐   ┌────────────┐   ┌────────────┐
//!                │ serializer │   │  Executor  │   │  registry  │
//!                └─────┬──────┘   └─────┬──────┘   └─────┬──────┘
//!                      └────────────────┴────────────────┘
//!                                       ▼
//!                                 ┌────────────┐
//!                                 │  PageDom   │
//!                                 └────────────┘
//! ```
//!
//! ## Reference ids
//!
//! Every interactive element in a serialized tree carries a reference id
//! such as `[e12]`. Ids are minted once per element and reused across
//! serializations while the element stays attached. Acting on a reference
//! whose element has left the document fails with a retryable stale-reference
//! error; the controller is expected to re-serialize and retry.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use serde_json::json;
//! use domlens::{
//!     ContextConfig, Endpoint, PageContext, PageDom, PageRouter, ViewportInfo,
//!     MESSAGE_MARKER,
//! };
//!
//! # async fn run() {
//! let dom = PageDom::new(ViewportInfo::default());
//! let ctx = Arc::new(PageContext::new(dom, ContextConfig::default()));
//! let router = PageRouter::new(ctx);
//!
//! let snapshot = router
//!     .handle(json!({ "type": MESSAGE_MARKER, "action": "serialize" }))
//!     .await;
//! println!("{}", snapshot["tree"]);
//! # }
//! ```

pub mod classify;
pub mod config;
pub mod error;
pub mod executor;
pub mod page;
pub mod registry;
pub mod router;
pub mod sanitize;
pub mod serializer;

pub use config::ContextConfig;
pub use error::ActionError;
pub use executor::{
    ClickResult, Executor, FormInputResult, InspectResult, PageTextResult, ScrollResult,
};
pub use page::{
    ComputedStyle, NodeHandle, NodeId, PageDom, PageEvent, Rect, ViewportInfo,
};
pub use registry::ElementRegistry;
pub use router::{Endpoint, PageContext, PageRouter, PageState, MESSAGE_MARKER};
pub use sanitize::{sanitize_text, FILTERED_MARKER};
pub use serializer::{serialize, serialize_subtree, FilterMode, TreeSnapshot};
