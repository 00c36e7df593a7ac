//! Handler resolution
//!
//! Resolution is read-only after construction, so concurrent lookups need no
//! locking. `None` means no handler answers the request, which the dispatcher
//! turns into a 404.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::context::RequestContext;
use crate::handlers::RequestHandler;

/// Selects the handler answering a request
pub trait HandlerResolver: Send + Sync {
    /// Handler for `ctx`, if any
    fn resolve(&self, ctx: &RequestContext) -> Option<Arc<dyn RequestHandler>>;
}

impl<F> HandlerResolver for F
where
    F: Fn(&RequestContext) -> Option<Arc<dyn RequestHandler>> + Send + Sync,
{
    fn resolve(&self, ctx: &RequestContext) -> Option<Arc<dyn RequestHandler>> {
        self(ctx)
    }
}

/// Routes on the first path segment
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use restmux::dispatch::PathResolver;
/// use restmux::handlers::CountersHandler;
/// use restmux::state::ServiceState;
///
/// let counters = Arc::new(CountersHandler::new(Arc::new(ServiceState::new())));
/// let resolver = PathResolver::new().route("Counters", counters);
/// assert!(resolver.has_route("counters"));
/// ```
#[derive(Clone, Default)]
pub struct PathResolver {
    routes: HashMap<String, Arc<dyn RequestHandler>>,
    fallback: Option<Arc<dyn RequestHandler>>,
}

impl PathResolver {
    /// Resolver with no routes
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests whose first segment is `segment` (case-insensitive)
    #[must_use]
    pub fn route(mut self, segment: &str, handler: Arc<dyn RequestHandler>) -> Self {
        let segment = segment.trim().trim_matches('/').to_lowercase();
        if self.routes.insert(segment.clone(), handler).is_some() {
            tracing::warn!(segment = %segment, "Replacing handler for route");
        }
        self
    }

    /// Answer requests no route matches, including the root path
    #[must_use]
    pub fn fallback(mut self, handler: Arc<dyn RequestHandler>) -> Self {
        self.fallback = Some(handler);
        self
    }

    /// Whether `segment` has a handler
    pub fn has_route(&self, segment: &str) -> bool {
        self.routes.contains_key(&segment.to_lowercase())
    }
}

impl HandlerResolver for PathResolver {
    fn resolve(&self, ctx: &RequestContext) -> Option<Arc<dyn RequestHandler>> {
        ctx.segment(0)
            .and_then(|first| self.routes.get(first))
            .or(self.fallback.as_ref())
            .cloned()
    }
}

impl fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut routes: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        routes.sort_unstable();
        f.debug_struct("PathResolver")
            .field("routes", &routes)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::InboundRequest;
    use crate::error::Result;
    use crate::responses::{self, RestResponse};
    use http::Method;

    struct Named(&'static str);

    impl RequestHandler for Named {
        fn handle_get(&self, _ctx: &RequestContext) -> Result<RestResponse> {
            Ok(responses::create_response(
                self.0,
                http::StatusCode::OK,
                crate::codec::ContentType::TextPlain,
            ))
        }
        fn handle_post(&self, _ctx: &RequestContext) -> Result<RestResponse> {
            Ok(responses::no_content())
        }
        fn handle_put(&self, _ctx: &RequestContext) -> Result<RestResponse> {
            Ok(responses::no_content())
        }
        fn handle_delete(&self, _ctx: &RequestContext) -> Result<RestResponse> {
            Ok(responses::no_content())
        }
    }

    fn name_of(resolver: &dyn HandlerResolver, uri: &str) -> Option<String> {
        let ctx = RequestContext::from_request(&InboundRequest::new(Method::GET, uri));
        resolver.resolve(&ctx).map(|handler| {
            let response = handler.handle_get(&ctx).unwrap();
            String::from_utf8(response.body().to_vec()).unwrap()
        })
    }

    #[test]
    fn test_routes_by_first_segment() {
        let resolver = PathResolver::new()
            .route("notes", Arc::new(Named("notes")))
            .route("/Tags/", Arc::new(Named("tags")));

        assert_eq!(name_of(&resolver, "/notes/3").as_deref(), Some("notes"));
        assert_eq!(name_of(&resolver, "/NOTES").as_deref(), Some("notes"));
        assert_eq!(name_of(&resolver, "/tags?x=1").as_deref(), Some("tags"));
        assert_eq!(name_of(&resolver, "/users"), None);
        assert_eq!(name_of(&resolver, "/"), None);
    }

    #[test]
    fn test_fallback() {
        let resolver = PathResolver::new()
            .route("notes", Arc::new(Named("notes")))
            .fallback(Arc::new(Named("fallback")));

        assert_eq!(name_of(&resolver, "/users").as_deref(), Some("fallback"));
        assert_eq!(name_of(&resolver, "/").as_deref(), Some("fallback"));
    }

    #[test]
    fn test_closure_resolver() {
        let notes: Arc<dyn RequestHandler> = Arc::new(Named("closure"));
        let resolver = move |ctx: &RequestContext| {
            (ctx.path().len() == 2).then(|| Arc::clone(&notes))
        };
        assert_eq!(name_of(&resolver, "/a/b").as_deref(), Some("closure"));
        assert_eq!(name_of(&resolver, "/a"), None);
    }
}
