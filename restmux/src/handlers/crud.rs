//! Generic CRUD handler
//!
//! Composes content negotiation, the list view and an [`ItemProvider`] into
//! full REST semantics for any resource type:
//!
//! | Request                  | Outcome                                                     |
//! |--------------------------|-------------------------------------------------------------|
//! | `GET /res`               | 200 sorted/paged list + `X-Total-Count`, 404 if no collection |
//! | `GET /res/{key}`         | 200 item, 404 unknown key, 400 malformed key                 |
//! | `POST /res`              | 204, 400 when the body does not decode                       |
//! | `PUT /res/{key}`         | 204, 404 unknown key, 400 missing key or bad body            |
//! | `DELETE /res/{key}`      | 204, 404 unknown key, 400 missing key                        |
//!
//! A provider that accepts a write for an existing key but reports
//! `successful = false` has broken its contract. The handler panics with the
//! provider's message; the dispatcher contains the panic to the request.

use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use http::{header, HeaderValue, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use super::query::{ListParams, DEFAULT_PER_PAGE};
use super::traits::RequestHandler;
use crate::codec::{ContentNegotiator, ContentSerializer};
use crate::config::DispatchConfig;
use crate::context::RequestContext;
use crate::error::Result;
use crate::repository::{ItemProvider, UpdateResult};
use crate::responses::{self, create_response, RestResponse, X_TOTAL_COUNT};

/// Outcome of reading an item key from a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyLookup<K> {
    /// The request addresses the collection
    Absent,
    /// The request addresses one item
    Present(K),
    /// A key segment is present but does not parse
    Malformed(String),
}

/// Parse the path segment at `index` as a key
pub fn key_from_segment<K: FromStr>(ctx: &RequestContext, index: usize) -> KeyLookup<K> {
    match ctx.segment(index) {
        None => KeyLookup::Absent,
        Some(raw) => match raw.parse() {
            Ok(key) => KeyLookup::Present(key),
            Err(_) => KeyLookup::Malformed(raw.to_string()),
        },
    }
}

type Comparator<V> = Arc<dyn Fn(&V, &V) -> Ordering + Send + Sync>;
type KeyExtractor<K> = Arc<dyn Fn(&RequestContext) -> KeyLookup<K> + Send + Sync>;

/// [`RequestHandler`] over an [`ItemProvider`]
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use restmux::codec::{ContentSerializer, MsgPackSerializer};
/// use restmux::handlers::GenericCrudHandler;
/// use restmux::repository::MemoryProvider;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
/// struct Note {
///     id: u64,
///     body: String,
/// }
///
/// let provider = Arc::new(MemoryProvider::new(|n: &Note| n.id));
/// let handler = GenericCrudHandler::new(provider)
///     .with_serializers(vec![
///         Arc::new(MsgPackSerializer::new()) as Arc<dyn ContentSerializer<Note>>,
///     ])
///     .with_default_per_page(10);
/// assert_eq!(handler.default_per_page(), 10);
/// ```
pub struct GenericCrudHandler<K, V, P> {
    provider: Arc<P>,
    negotiator: ContentNegotiator<V>,
    compare: Comparator<V>,
    key_of: KeyExtractor<K>,
    default_per_page: usize,
    _key: PhantomData<fn() -> K>,
}

impl<K, V, P> GenericCrudHandler<K, V, P>
where
    K: FromStr + 'static,
    V: Ord + Serialize + DeserializeOwned + 'static,
    P: ItemProvider<K, V>,
{
    /// Handler sorting by the natural order of `V`
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_comparator(provider, |a: &V, b: &V| a.cmp(b))
    }
}

impl<K, V, P> GenericCrudHandler<K, V, P>
where
    K: FromStr + 'static,
    V: Serialize + DeserializeOwned + 'static,
    P: ItemProvider<K, V>,
{
    /// Handler sorting with an explicit comparator
    pub fn with_comparator<F>(provider: Arc<P>, compare: F) -> Self
    where
        F: Fn(&V, &V) -> Ordering + Send + Sync + 'static,
    {
        Self {
            provider,
            negotiator: ContentNegotiator::new(Vec::new()),
            compare: Arc::new(compare),
            key_of: Arc::new(|ctx: &RequestContext| key_from_segment(ctx, 1)),
            default_per_page: DEFAULT_PER_PAGE,
            _key: PhantomData,
        }
    }

    /// Register serializers in addition to the JSON default
    #[must_use]
    pub fn with_serializers(mut self, serializers: Vec<Arc<dyn ContentSerializer<V>>>) -> Self {
        self.negotiator = ContentNegotiator::new(serializers);
        self
    }
}

impl<K, V, P> GenericCrudHandler<K, V, P>
where
    K: 'static,
    V: 'static,
    P: ItemProvider<K, V>,
{
    /// Page size used when `_perPage` is absent or invalid; zero is ignored
    #[must_use]
    pub fn with_default_per_page(mut self, per_page: usize) -> Self {
        if per_page > 0 {
            self.default_per_page = per_page;
        } else {
            tracing::warn!("Ignoring non-positive default page size");
        }
        self
    }

    /// Apply dispatcher settings that concern list handling
    #[must_use]
    pub fn with_dispatch_config(self, config: &DispatchConfig) -> Self {
        self.with_default_per_page(config.default_per_page)
    }

    /// Read the key from the path segment at `index` instead of 1
    #[must_use]
    pub fn with_key_segment(mut self, index: usize) -> Self
    where
        K: FromStr,
    {
        self.key_of = Arc::new(move |ctx: &RequestContext| key_from_segment(ctx, index));
        self
    }

    /// Read the key with a custom extractor
    #[must_use]
    pub fn with_key_extractor<F>(mut self, extract: F) -> Self
    where
        F: Fn(&RequestContext) -> KeyLookup<K> + Send + Sync + 'static,
    {
        self.key_of = Arc::new(extract);
        self
    }

    /// Configured default page size
    pub fn default_per_page(&self) -> usize {
        self.default_per_page
    }

    /// Serializer registry
    pub fn negotiator(&self) -> &ContentNegotiator<V> {
        &self.negotiator
    }

    /// Underlying provider
    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    fn decode_body(&self, ctx: &RequestContext) -> Option<V> {
        let serializer = self
            .negotiator
            .resolve(ctx.header(header::CONTENT_TYPE.as_str()));
        match serializer.deserialize_one(ctx.body()) {
            Ok(item) => item,
            Err(e) => {
                tracing::info!(error = %e, "Rejecting request body");
                None
            }
        }
    }

    fn list(
        &self,
        ctx: &RequestContext,
        serializer: &Arc<dyn ContentSerializer<V>>,
    ) -> Result<RestResponse> {
        let params = ListParams::from_context(ctx, self.default_per_page);
        let Some(found) = self.provider.get_many(&params.filter, ctx)? else {
            return Ok(responses::not_found());
        };

        let total_count = found.total_count;
        let page = params.apply(found.items, self.compare.as_ref());
        let mut response = create_response(
            serializer.serialize_many(&page)?,
            StatusCode::OK,
            serializer.content_type(),
        );
        response
            .headers_mut()
            .insert(X_TOTAL_COUNT, HeaderValue::from(total_count));
        Ok(response)
    }

    fn assert_applied(&self, operation: &str, result: &UpdateResult<K>) {
        if !result.successful {
            panic!(
                "{} provider reported an unsuccessful {}: {}",
                self.provider.item_type(),
                operation,
                result.message
            );
        }
    }
}

impl<K, V, P> RequestHandler for GenericCrudHandler<K, V, P>
where
    K: 'static,
    V: 'static,
    P: ItemProvider<K, V>,
{
    fn handle_get(&self, ctx: &RequestContext) -> Result<RestResponse> {
        let serializer = self.negotiator.resolve(ctx.header(header::ACCEPT.as_str()));

        match (self.key_of)(ctx) {
            KeyLookup::Absent => self.list(ctx, serializer),
            KeyLookup::Present(key) => match self.provider.get_one(&key, ctx)? {
                Some(item) => Ok(create_response(
                    serializer.serialize_one(&item)?,
                    StatusCode::OK,
                    serializer.content_type(),
                )),
                None => Ok(responses::not_found()),
            },
            KeyLookup::Malformed(raw) => {
                tracing::debug!(key = %raw, "Malformed item key");
                Ok(responses::bad_request())
            }
        }
    }

    fn handle_post(&self, ctx: &RequestContext) -> Result<RestResponse> {
        let Some(item) = self.decode_body(ctx) else {
            return Ok(responses::bad_request());
        };

        let result = self.provider.insert(item, ctx)?;
        self.assert_applied("insert", &result);
        Ok(responses::no_content())
    }

    fn handle_put(&self, ctx: &RequestContext) -> Result<RestResponse> {
        let KeyLookup::Present(key) = (self.key_of)(ctx) else {
            return Ok(responses::bad_request());
        };
        let Some(item) = self.decode_body(ctx) else {
            return Ok(responses::bad_request());
        };

        let result = self.provider.update(&key, item, ctx)?;
        if !result.key_exists {
            return Ok(responses::not_found());
        }
        self.assert_applied("update", &result);
        Ok(responses::no_content())
    }

    fn handle_delete(&self, ctx: &RequestContext) -> Result<RestResponse> {
        let KeyLookup::Present(key) = (self.key_of)(ctx) else {
            return Ok(responses::bad_request());
        };

        let result = self.provider.delete(&key, ctx)?;
        if !result.key_exists {
            return Ok(responses::not_found());
        }
        self.assert_applied("delete", &result);
        Ok(responses::no_content())
    }

    fn health_check(&self, ctx: &RequestContext) -> Result<()> {
        self.provider.health_check(ctx)?;
        Ok(())
    }
}

impl<K, V, P> fmt::Debug for GenericCrudHandler<K, V, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericCrudHandler")
            .field("default_per_page", &self.default_per_page)
            .field(
                "content_types",
                &self.negotiator.registered().collect::<Vec<_>>(),
            )
            .finish()
    }
}
