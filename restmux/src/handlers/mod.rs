//! Request handlers for REST resources
//!
//! A [`RequestHandler`] answers GET/POST/PUT/DELETE for one resource and
//! reports health probes. The crate ships three implementations:
//!
//! - [`GenericCrudHandler`]: full collection semantics over an
//!   [`ItemProvider`](crate::repository::ItemProvider), with content
//!   negotiation and the sort/filter/page list view ([`ListParams`])
//! - [`SingleItemHandler`]: one value behind an [`ItemResource`]
//! - [`CountersHandler`]: read-only dispatcher counters
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use http::{Method, StatusCode};
//! use restmux::context::{InboundRequest, RequestContext};
//! use restmux::handlers::{GenericCrudHandler, RequestHandler};
//! use restmux::repository::MemoryProvider;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
//! struct Task {
//!     id: u32,
//!     title: String,
//! }
//!
//! let provider = MemoryProvider::new(|t: &Task| t.id).with_items([
//!     Task { id: 2, title: "write docs".into() },
//!     Task { id: 1, title: "ship".into() },
//! ]);
//! let handler = GenericCrudHandler::new(Arc::new(provider));
//!
//! let ctx = RequestContext::from_request(&InboundRequest::new(Method::GET, "/tasks?_sortDir=desc"));
//! let response = handler.handle_get(&ctx).unwrap();
//! assert_eq!(response.status(), StatusCode::OK);
//! assert_eq!(response.headers()["x-total-count"], "2");
//! ```

mod crud;
mod query;
mod single;
mod stats;
mod traits;

pub use crud::{key_from_segment, GenericCrudHandler, KeyLookup};
pub use query::{
    page_items, sort_items, ListParams, SortOrder, DEFAULT_PER_PAGE, FILTERS, PAGE, PER_PAGE,
    SORT_DIR, SORT_FIELD,
};
pub use single::{ItemResource, SingleItemHandler};
pub use stats::CountersHandler;
pub use traits::{RequestHandler, HEALTH_CHECK_SEGMENT};
