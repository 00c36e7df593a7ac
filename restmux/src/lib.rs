//! # restmux
//!
//! Request dispatch and content negotiation for exposing collections as REST
//! resources.
//!
//! ## Features
//!
//! - **Dispatcher**: API key gate, handler resolution, method routing, health
//!   probes, CORS, keep-alive and request-id echo, with every failure turned
//!   into a response
//! - **Generic CRUD handler**: GET/POST/PUT/DELETE over any [`ItemProvider`]
//!   with sorting, filtering and pagination of list views
//! - **Content negotiation**: JSON by default, MessagePack and custom codecs
//!   selected by `Accept` and `Content-Type`
//! - **Counters**: lock-free request, response and status counters
//! - **Transport**: axum server with tracing, panic recovery, timeouts and
//!   graceful shutdown
//!
//! [`ItemProvider`]: crate::repository::ItemProvider
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use restmux::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
//! struct Note {
//!     id: u64,
//!     text: String,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = Config::load()?;
//!     init_tracing(&config)?;
//!
//!     let notes = MemoryProvider::new(|n: &Note| n.id);
//!     let resolver = PathResolver::new().route(
//!         "notes",
//!         Arc::new(GenericCrudHandler::new(Arc::new(notes)).with_dispatch_config(&config.dispatch)),
//!     );
//!     let dispatcher = Dispatcher::builder(resolver).config(&config).build()?;
//!
//!     Server::new(config).serve(Arc::new(dispatcher)).await
//! }
//! ```

pub mod codec;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod observability;
pub mod repository;
pub mod responses;
pub mod server;
pub mod state;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::codec::{
        ContentNegotiator, ContentSerializer, ContentType, JsonSerializer, MsgPackSerializer,
    };
    pub use crate::config::{ApiKeysConfig, Config, DispatchConfig, ServiceConfig};
    pub use crate::context::{InboundRequest, RequestContext};
    pub use crate::dispatch::{
        AllowAll, ApiKeyGate, Dispatcher, HandlerResolver, PathResolver, Reply, StaticKeys,
    };
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{
        CountersHandler, GenericCrudHandler, ItemResource, KeyLookup, ListParams, RequestHandler,
        SingleItemHandler, SortOrder,
    };
    pub use crate::observability::init_tracing;
    pub use crate::repository::{
        ItemProvider, MemoryProvider, PropertyFilter, ProviderError, ProviderResult,
        SubListResponse, UpdateResult,
    };
    pub use crate::responses::RestResponse;
    pub use crate::server::Server;
    pub use crate::state::{CounterSnapshot, ServiceState};
}
