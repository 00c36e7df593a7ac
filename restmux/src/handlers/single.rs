//! Handler for a resource holding exactly one value
//!
//! Typical uses are settings documents or status objects: GET returns the
//! current value, POST and PUT hand a decoded body to the resource, DELETE
//! is accepted and ignored.

use std::sync::Arc;

use http::{header, StatusCode};
use serde::{de::DeserializeOwned, Serialize};

use super::traits::RequestHandler;
use crate::codec::{ContentNegotiator, ContentSerializer};
use crate::context::RequestContext;
use crate::error::Result;
use crate::responses::{self, create_response, RestResponse};

/// Hooks a single-value resource provides
pub trait ItemResource<V>: Send + Sync {
    /// Value answered on GET; `None` answers 404
    fn current(&self, ctx: &RequestContext) -> Result<Option<V>>;

    /// Consume a decoded POST body
    fn accept_post(&self, item: V, ctx: &RequestContext) -> Result<RestResponse>;

    /// Consume a decoded PUT body
    fn accept_put(&self, item: V, ctx: &RequestContext) -> Result<RestResponse>;

    /// Resource-specific health check
    fn health_check(&self, _ctx: &RequestContext) -> Result<()> {
        Ok(())
    }
}

/// [`RequestHandler`] over an [`ItemResource`]
pub struct SingleItemHandler<V, R> {
    resource: Arc<R>,
    negotiator: ContentNegotiator<V>,
}

impl<V, R> SingleItemHandler<V, R>
where
    V: Serialize + DeserializeOwned + 'static,
    R: ItemResource<V>,
{
    /// Handler negotiating JSON only
    pub fn new(resource: Arc<R>) -> Self {
        Self {
            resource,
            negotiator: ContentNegotiator::new(Vec::new()),
        }
    }

    /// Register serializers in addition to the JSON default
    #[must_use]
    pub fn with_serializers(mut self, serializers: Vec<Arc<dyn ContentSerializer<V>>>) -> Self {
        self.negotiator = ContentNegotiator::new(serializers);
        self
    }
}

impl<V, R> SingleItemHandler<V, R>
where
    R: ItemResource<V>,
{
    /// Underlying resource
    pub fn resource(&self) -> &Arc<R> {
        &self.resource
    }

    fn decode_body(&self, ctx: &RequestContext) -> Option<V> {
        let serializer = self
            .negotiator
            .resolve(ctx.header(header::CONTENT_TYPE.as_str()));
        serializer
            .deserialize_one(ctx.body())
            .unwrap_or_else(|e| {
                tracing::info!(error = %e, "Rejecting request body");
                None
            })
    }
}

impl<V, R> RequestHandler for SingleItemHandler<V, R>
where
    V: 'static,
    R: ItemResource<V>,
{
    fn handle_get(&self, ctx: &RequestContext) -> Result<RestResponse> {
        let serializer = self.negotiator.resolve(ctx.header(header::ACCEPT.as_str()));
        match self.resource.current(ctx)? {
            Some(item) => Ok(create_response(
                serializer.serialize_one(&item)?,
                StatusCode::OK,
                serializer.content_type(),
            )),
            None => Ok(responses::not_found()),
        }
    }

    fn handle_post(&self, ctx: &RequestContext) -> Result<RestResponse> {
        match self.decode_body(ctx) {
            Some(item) => self.resource.accept_post(item, ctx),
            None => Ok(responses::bad_request()),
        }
    }

    fn handle_put(&self, ctx: &RequestContext) -> Result<RestResponse> {
        match self.decode_body(ctx) {
            Some(item) => self.resource.accept_put(item, ctx),
            None => Ok(responses::bad_request()),
        }
    }

    fn handle_delete(&self, _ctx: &RequestContext) -> Result<RestResponse> {
        Ok(responses::no_content())
    }

    fn health_check(&self, ctx: &RequestContext) -> Result<()> {
        self.resource.health_check(ctx)
    }
}
