//! Item providers: the data-access side of a REST resource
//!
//! - [`ItemProvider`]: fetch one, fetch many under a [`PropertyFilter`],
//!   insert, update, delete
//! - [`UpdateResult`] and [`SubListResponse`]: structured provider answers
//! - [`ProviderError`]: a provider that could not answer at all
//! - [`MemoryProvider`]: concurrent in-memory implementation
//!
//! # Example
//!
//! ```rust
//! use http::Method;
//! use restmux::context::{InboundRequest, RequestContext};
//! use restmux::repository::{ItemProvider, MemoryProvider, PropertyFilter};
//! use serde::Serialize;
//!
//! #[derive(Clone, Serialize)]
//! struct City {
//!     name: String,
//!     country: String,
//! }
//!
//! let provider = MemoryProvider::new(|c: &City| c.name.clone()).with_items([
//!     City { name: "Lyon".into(), country: "FR".into() },
//!     City { name: "Turin".into(), country: "IT".into() },
//! ]);
//!
//! let ctx = RequestContext::from_request(&InboundRequest::new(Method::GET, "/cities"));
//! let filter = PropertyFilter::parse_json(r#"{"Country": "FR"}"#);
//! let found = provider.get_many(&filter, &ctx).unwrap().unwrap();
//! assert_eq!(found.total_count, 1);
//! ```

mod error;
mod filter;
mod memory;
mod traits;

pub use error::{ProviderError, ProviderErrorKind, ProviderOperation};
pub use filter::PropertyFilter;
pub use memory::MemoryProvider;
pub use traits::{ItemProvider, ProviderResult, SubListResponse, UpdateResult};
