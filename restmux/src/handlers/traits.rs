//! The per-resource request handler contract
//!
//! The dispatcher selects a [`RequestHandler`] per request and routes by
//! method. Handlers are synchronous and shared across worker threads.
//!
//! Returning `Err` from any method is a server-side failure: the dispatcher
//! logs it and answers with an opaque 500. Client errors (400, 404) are
//! ordinary responses built with [`crate::responses`].

use crate::context::RequestContext;
use crate::error::Result;
use crate::responses::{self, RestResponse};

/// Path segment selecting the health probe
pub const HEALTH_CHECK_SEGMENT: &str = "health-check";

/// Per-resource handler
///
/// # Example
///
/// ```rust
/// use restmux::context::RequestContext;
/// use restmux::error::Result;
/// use restmux::handlers::RequestHandler;
/// use restmux::responses::{self, RestResponse};
///
/// struct Teapot;
///
/// impl RequestHandler for Teapot {
///     fn handle_get(&self, _ctx: &RequestContext) -> Result<RestResponse> {
///         Ok(responses::not_implemented())
///     }
///     fn handle_post(&self, _ctx: &RequestContext) -> Result<RestResponse> {
///         Ok(responses::method_not_allowed())
///     }
///     fn handle_put(&self, _ctx: &RequestContext) -> Result<RestResponse> {
///         Ok(responses::method_not_allowed())
///     }
///     fn handle_delete(&self, _ctx: &RequestContext) -> Result<RestResponse> {
///         Ok(responses::method_not_allowed())
///     }
/// }
/// ```
pub trait RequestHandler: Send + Sync {
    /// Answer a GET
    fn handle_get(&self, ctx: &RequestContext) -> Result<RestResponse>;

    /// Answer a POST
    fn handle_post(&self, ctx: &RequestContext) -> Result<RestResponse>;

    /// Answer a PUT
    fn handle_put(&self, ctx: &RequestContext) -> Result<RestResponse>;

    /// Answer a DELETE
    fn handle_delete(&self, ctx: &RequestContext) -> Result<RestResponse>;

    /// Whether this request is a health probe
    ///
    /// True when any path segment is `health-check`.
    fn is_health_check(&self, ctx: &RequestContext) -> bool {
        ctx.path().iter().any(|s| s == HEALTH_CHECK_SEGMENT)
    }

    /// Answer a health probe: 200 `HEALTHY`, or 500 when the check fails
    fn is_healthy(&self, ctx: &RequestContext) -> RestResponse {
        match self.health_check(ctx) {
            Ok(()) => responses::healthy(),
            Err(e) => {
                tracing::error!(code = e.code(), error = %e, "Health check failed");
                responses::internal_error()
            }
        }
    }

    /// Resource-specific health check
    fn health_check(&self, _ctx: &RequestContext) -> Result<()> {
        Ok(())
    }
}
