//! Inbound request pipeline
//!
//! [`Dispatcher::dispatch`] turns one [`InboundRequest`] into exactly one
//! response:
//!
//! 1. count the request and its method
//! 2. build the [`RequestContext`] and run the [`ApiKeyGate`] (403 on rejection)
//! 3. resolve the [`RequestHandler`] (404 when none answers)
//! 4. route by method; GET health probes go to
//!    [`RequestHandler::is_healthy`], unsupported methods get 405
//! 5. finalize headers (keep-alive, CORS, request-id echo) and count the
//!    response status
//!
//! Handler errors and panics in steps 2 to 4 become a logged 500. A panic
//! in step 1 or 5 is counted as a hidden error and the response assembled so
//! far is still sent.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use http::{Method, StatusCode};
//! use restmux::context::InboundRequest;
//! use restmux::dispatch::{Dispatcher, PathResolver};
//! use restmux::handlers::CountersHandler;
//! use restmux::state::ServiceState;
//!
//! let state = Arc::new(ServiceState::new());
//! let resolver = PathResolver::new()
//!     .route("counters", Arc::new(CountersHandler::new(Arc::clone(&state))));
//! let dispatcher = Dispatcher::builder(resolver)
//!     .state(Arc::clone(&state))
//!     .build()
//!     .unwrap();
//!
//! let reply = dispatcher.dispatch(&InboundRequest::new(Method::GET, "/counters"));
//! assert_eq!(reply.response.status(), StatusCode::OK);
//! assert_eq!(state.get("requests"), 1);
//! ```

mod gate;
mod resolver;

pub use gate::{AllowAll, ApiKeyGate, StaticKeys};
pub use resolver::{HandlerResolver, PathResolver};

use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use http::header::{self, HeaderName, HeaderValue};
use http::{Method, StatusCode};

use crate::config::Config;
use crate::context::{InboundRequest, RequestContext};
use crate::error::{Error, Result};
use crate::handlers::RequestHandler;
use crate::responses::{self, RestResponse, X_API_KEY, X_REQUEST_ID};
use crate::state::ServiceState;

/// Outcome of one dispatch
#[derive(Debug)]
pub struct Reply {
    /// Interim `100 Continue`, present when the client asked for it
    pub continue_response: Option<RestResponse>,
    /// Final response
    pub response: RestResponse,
}

/// Routes requests to handlers and keeps the counter table
pub struct Dispatcher {
    resolver: Arc<dyn HandlerResolver>,
    gate: Arc<dyn ApiKeyGate>,
    state: Arc<ServiceState>,
    cors_enabled: bool,
    api_key_header: HeaderName,
    request_id_header: HeaderName,
}

impl Dispatcher {
    /// Start configuring a dispatcher around `resolver`
    pub fn builder(resolver: impl HandlerResolver + 'static) -> DispatcherBuilder {
        DispatcherBuilder::new(Arc::new(resolver))
    }

    /// Shared counter table
    pub fn state(&self) -> &Arc<ServiceState> {
        &self.state
    }

    /// Header consulted by the gate
    pub fn api_key_header(&self) -> &HeaderName {
        &self.api_key_header
    }

    /// Header echoed from request to response
    pub fn request_id_header(&self) -> &HeaderName {
        &self.request_id_header
    }

    /// Produce the response for `request`
    ///
    /// Never panics and never fails: every outcome is a response.
    pub fn dispatch(&self, request: &InboundRequest) -> Reply {
        self.process(request, |status| self.state.record_response(status))
    }

    /// Answer `request` with a response produced before dispatch
    ///
    /// For transports that refuse a request outright, such as a body over
    /// the size limit. The request and response are counted and the response
    /// gets the same header finalization as a dispatched one.
    pub fn reject(&self, request: &InboundRequest, response: RestResponse) -> RestResponse {
        self.contain(request, "count request", || self.state.record_request(&request.method));
        self.complete(request, response, |status| self.state.record_response(status))
            .response
    }

    fn process(&self, request: &InboundRequest, count_response: impl FnOnce(StatusCode)) -> Reply {
        self.contain(request, "count request", || self.state.record_request(&request.method));

        let response = self
            .respond(request)
            .unwrap_or_else(responses::not_found);
        self.complete(request, response, count_response)
    }

    /// Header finalization and response bookkeeping
    ///
    /// A failure here still sends the response assembled so far.
    fn complete(
        &self,
        request: &InboundRequest,
        mut response: RestResponse,
        count_response: impl FnOnce(StatusCode),
    ) -> Reply {
        self.contain(request, "finalize headers", || self.finalize(request, &mut response));
        let continue_response = request
            .expects_continue()
            .then(responses::continue_interim);

        let status = response.status();
        self.contain(request, "count response", || count_response(status));
        tracing::debug!(
            method = %request.method,
            path = %request.uri,
            status = status.as_u16(),
            "Request dispatched"
        );

        Reply {
            continue_response,
            response,
        }
    }

    /// Run one outer pipeline stage, counting a panic as a hidden error
    fn contain<T>(
        &self,
        request: &InboundRequest,
        stage: &'static str,
        run: impl FnOnce() -> T,
    ) -> Option<T> {
        match catch_unwind(AssertUnwindSafe(run)) {
            Ok(value) => Some(value),
            Err(payload) => {
                tracing::error!(
                    stage,
                    method = %request.method,
                    path = %request.uri,
                    error = %panic_message(payload.as_ref()),
                    "Hidden error in request pipeline"
                );
                self.state.record_hidden_error();
                None
            }
        }
    }

    /// Steps 2 to 4; `None` means nothing answered the request
    fn respond(&self, request: &InboundRequest) -> Option<RestResponse> {
        match catch_unwind(AssertUnwindSafe(|| self.route(request))) {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                tracing::error!(
                    code = e.code(),
                    method = %request.method,
                    path = %request.uri,
                    error = %e,
                    "Handler failed"
                );
                Some(responses::internal_error())
            }
            Err(payload) => {
                tracing::error!(
                    method = %request.method,
                    path = %request.uri,
                    error = %panic_message(payload.as_ref()),
                    "Handler panicked"
                );
                Some(responses::internal_error())
            }
        }
    }

    fn route(&self, request: &InboundRequest) -> Result<Option<RestResponse>> {
        let ctx = RequestContext::from_request(request);

        if !self.gate.allow(ctx.header(self.api_key_header.as_str())) {
            tracing::info!(path = %request.uri, "API key rejected");
            return Ok(Some(responses::forbidden()));
        }

        let Some(handler) = self.resolver.resolve(&ctx) else {
            tracing::debug!(path = %request.uri, "No handler resolved");
            return Ok(None);
        };

        let response = match *ctx.method() {
            Method::GET if handler.is_health_check(&ctx) => handler.is_healthy(&ctx),
            Method::GET => handler.handle_get(&ctx)?,
            Method::POST => handler.handle_post(&ctx)?,
            Method::PUT => handler.handle_put(&ctx)?,
            Method::DELETE => handler.handle_delete(&ctx)?,
            _ => responses::method_not_allowed(),
        };
        Ok(Some(response))
    }

    fn finalize(&self, request: &InboundRequest, response: &mut RestResponse) {
        let headers = response.headers_mut();
        if request.keep_alive() {
            headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
        }
        if self.cors_enabled {
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_ORIGIN,
                HeaderValue::from_static("*"),
            );
        }
        if let Some(id) = request.headers.get(&self.request_id_header) {
            headers.insert(self.request_id_header.clone(), id.clone());
        }
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("cors_enabled", &self.cors_enabled)
            .field("api_key_header", &self.api_key_header)
            .field("request_id_header", &self.request_id_header)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Dispatcher`]
pub struct DispatcherBuilder {
    resolver: Arc<dyn HandlerResolver>,
    gate: Arc<dyn ApiKeyGate>,
    state: Option<Arc<ServiceState>>,
    cors_enabled: bool,
    api_key_header: String,
    request_id_header: String,
}

impl DispatcherBuilder {
    fn new(resolver: Arc<dyn HandlerResolver>) -> Self {
        Self {
            resolver,
            gate: Arc::new(AllowAll),
            state: None,
            cors_enabled: false,
            api_key_header: X_API_KEY.as_str().to_string(),
            request_id_header: X_REQUEST_ID.as_str().to_string(),
        }
    }

    /// Take CORS mode, header names and the key gate from `config`
    #[must_use]
    pub fn config(mut self, config: &Config) -> Self {
        self.cors_enabled = config.dispatch.cors_enabled;
        self.api_key_header = config.dispatch.api_key_header.clone();
        self.request_id_header = config.dispatch.request_id_header.clone();
        self.gate = StaticKeys::from_config(&config.api_keys);
        self
    }

    /// Admission check run before handler resolution
    #[must_use]
    pub fn gate(mut self, gate: impl ApiKeyGate + 'static) -> Self {
        self.gate = Arc::new(gate);
        self
    }

    /// Share an existing counter table
    #[must_use]
    pub fn state(mut self, state: Arc<ServiceState>) -> Self {
        self.state = Some(state);
        self
    }

    /// Add `Access-Control-Allow-Origin: *` to every response
    #[must_use]
    pub fn cors(mut self, enabled: bool) -> Self {
        self.cors_enabled = enabled;
        self
    }

    #[must_use]
    pub fn api_key_header(mut self, name: impl Into<String>) -> Self {
        self.api_key_header = name.into();
        self
    }

    #[must_use]
    pub fn request_id_header(mut self, name: impl Into<String>) -> Self {
        self.request_id_header = name.into();
        self
    }

    /// Finish the dispatcher
    ///
    /// Fails when a configured header name is not a valid HTTP header name.
    pub fn build(self) -> Result<Dispatcher> {
        Ok(Dispatcher {
            resolver: self.resolver,
            gate: self.gate,
            state: self.state.unwrap_or_default(),
            cors_enabled: self.cors_enabled,
            api_key_header: parse_header_name(&self.api_key_header)?,
            request_id_header: parse_header_name(&self.request_id_header)?,
        })
    }
}

fn parse_header_name(name: &str) -> Result<HeaderName> {
    HeaderName::from_bytes(name.trim().as_bytes())
        .map_err(|e| Error::Internal(format!("invalid header name {name:?}: {e}")))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::ContentType;
    use crate::context::InboundRequest;
    use crate::handlers::CountersHandler;
    use http::Version;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct Probe {
        calls: AtomicUsize,
        fail: bool,
        panic: bool,
        unhealthy: bool,
    }

    impl Probe {
        fn hit(&self) -> Result<RestResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.panic {
                panic!("probe exploded");
            }
            if self.fail {
                return Err(Error::Internal("probe failed".into()));
            }
            Ok(responses::create_response(
                "ok",
                StatusCode::OK,
                ContentType::TextPlain,
            ))
        }
    }

    impl RequestHandler for Probe {
        fn handle_get(&self, _ctx: &RequestContext) -> Result<RestResponse> {
            self.hit()
        }
        fn handle_post(&self, _ctx: &RequestContext) -> Result<RestResponse> {
            self.hit()
        }
        fn handle_put(&self, _ctx: &RequestContext) -> Result<RestResponse> {
            self.hit()
        }
        fn handle_delete(&self, _ctx: &RequestContext) -> Result<RestResponse> {
            self.hit()
        }
        fn health_check(&self, _ctx: &RequestContext) -> Result<()> {
            if self.unhealthy {
                return Err(Error::Unhealthy("probe down".into()));
            }
            Ok(())
        }
    }

    fn dispatcher_for(probe: Arc<Probe>) -> DispatcherBuilder {
        let resolver = PathResolver::new().route("probe", probe);
        Dispatcher::builder(resolver)
    }

    fn get(uri: &str) -> InboundRequest {
        InboundRequest::new(Method::GET, uri)
    }

    #[test]
    fn test_routes_each_method() {
        let probe = Arc::new(Probe::default());
        let dispatcher = dispatcher_for(Arc::clone(&probe)).build().unwrap();

        for method in [Method::GET, Method::POST, Method::PUT, Method::DELETE] {
            let reply = dispatcher.dispatch(&InboundRequest::new(method, "/probe"));
            assert_eq!(reply.response.status(), StatusCode::OK);
        }
        assert_eq!(probe.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_unsupported_method_is_405() {
        let probe = Arc::new(Probe::default());
        let dispatcher = dispatcher_for(Arc::clone(&probe)).build().unwrap();

        let reply = dispatcher.dispatch(&InboundRequest::new(Method::PATCH, "/probe"));
        assert_eq!(reply.response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            reply.response.headers()[header::ALLOW],
            "GET, POST, PUT, DELETE"
        );
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);
        assert_eq!(dispatcher.state().get("PATCH"), 1);
        assert_eq!(dispatcher.state().get("405"), 1);
    }

    #[test]
    fn test_unresolved_is_404() {
        let dispatcher = dispatcher_for(Arc::new(Probe::default())).build().unwrap();
        let reply = dispatcher.dispatch(&get("/nothing/here"));
        assert_eq!(reply.response.status(), StatusCode::NOT_FOUND);
        assert_eq!(reply.response.body().as_ref(), b"NOT FOUND");
    }

    #[test]
    fn test_gate_rejects_before_handler() {
        let probe = Arc::new(Probe::default());
        let dispatcher = dispatcher_for(Arc::clone(&probe))
            .gate(|key: Option<&str>| key == Some("good"))
            .build()
            .unwrap();

        let rejected = dispatcher.dispatch(&get("/probe").with_header("x-api-key", "bad"));
        assert_eq!(rejected.response.status(), StatusCode::FORBIDDEN);
        let missing = dispatcher.dispatch(&get("/probe"));
        assert_eq!(missing.response.status(), StatusCode::FORBIDDEN);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);

        let admitted = dispatcher.dispatch(&get("/probe").with_header("X-API-KEY", "good"));
        assert_eq!(admitted.response.status(), StatusCode::OK);
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_gate_uses_configured_header() {
        let probe = Arc::new(Probe::default());
        let mut config = Config::default();
        config.api_keys.enabled = true;
        config.api_keys.keys = vec!["k".into()];
        config.dispatch.api_key_header = "x-token".into();
        let dispatcher = dispatcher_for(probe).config(&config).build().unwrap();

        let reply = dispatcher.dispatch(&get("/probe").with_header("x-api-key", "k"));
        assert_eq!(reply.response.status(), StatusCode::FORBIDDEN);
        let reply = dispatcher.dispatch(&get("/probe").with_header("x-token", "k"));
        assert_eq!(reply.response.status(), StatusCode::OK);
    }

    #[test]
    fn test_health_probe_short_circuits_get() {
        let probe = Arc::new(Probe::default());
        let dispatcher = dispatcher_for(Arc::clone(&probe)).build().unwrap();

        let reply = dispatcher.dispatch(&get("/probe/health-check"));
        assert_eq!(reply.response.status(), StatusCode::OK);
        assert_eq!(reply.response.body().as_ref(), b"HEALTHY");
        assert_eq!(probe.calls.load(Ordering::SeqCst), 0);

        let unhealthy = Arc::new(Probe {
            unhealthy: true,
            ..Default::default()
        });
        let dispatcher = dispatcher_for(unhealthy).build().unwrap();
        let reply = dispatcher.dispatch(&get("/probe/health-check"));
        assert_eq!(reply.response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_health_segment_on_write_goes_to_handler() {
        let probe = Arc::new(Probe::default());
        let dispatcher = dispatcher_for(Arc::clone(&probe)).build().unwrap();
        dispatcher.dispatch(&InboundRequest::new(Method::DELETE, "/probe/health-check"));
        assert_eq!(probe.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_error_is_opaque_500() {
        let dispatcher = dispatcher_for(Arc::new(Probe {
            fail: true,
            ..Default::default()
        }))
        .build()
        .unwrap();

        let reply = dispatcher.dispatch(&get("/probe"));
        assert_eq!(reply.response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(reply.response.body().as_ref(), b"INTERNAL ERROR");
        assert_eq!(dispatcher.state().get("500"), 1);
        assert_eq!(dispatcher.state().get("hidden_errors"), 0);
    }

    #[test]
    fn test_handler_panic_is_500() {
        let dispatcher = dispatcher_for(Arc::new(Probe {
            panic: true,
            ..Default::default()
        }))
        .build()
        .unwrap();

        let reply = dispatcher.dispatch(&get("/probe"));
        assert_eq!(reply.response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(dispatcher.state().get("responses"), 1);

        // the dispatcher keeps serving after a panic
        let reply = dispatcher.dispatch(&get("/missing"));
        assert_eq!(reply.response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_resolver_panic_is_500() {
        let resolver = |_ctx: &RequestContext| -> Option<Arc<dyn RequestHandler>> {
            panic!("routing table corrupt")
        };
        let dispatcher = Dispatcher::builder(resolver).build().unwrap();
        let reply = dispatcher.dispatch(&get("/anything"));
        assert_eq!(reply.response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_bookkeeping_failure_keeps_assembled_response() {
        let dispatcher = dispatcher_for(Arc::new(Probe::default()))
            .cors(true)
            .build()
            .unwrap();

        let request = get("/probe").with_header("x-request-id", "r-9");
        let reply = dispatcher.process(&request, |_| panic!("counter table unavailable"));

        assert_eq!(reply.response.status(), StatusCode::OK);
        assert_eq!(reply.response.body().as_ref(), b"ok");
        assert_eq!(
            reply.response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
        assert_eq!(reply.response.headers()["x-request-id"], "r-9");
        assert_eq!(dispatcher.state().get("hidden_errors"), 1);
        assert_eq!(dispatcher.state().get("responses"), 0);
    }

    #[test]
    fn test_contain_counts_hidden_errors() {
        let dispatcher = dispatcher_for(Arc::new(Probe::default())).build().unwrap();
        let request = get("/probe");

        assert_eq!(dispatcher.contain(&request, "stage", || 7), Some(7));
        assert_eq!(
            dispatcher.contain(&request, "stage", || -> u8 { panic!("stage broke") }),
            None
        );
        assert_eq!(dispatcher.state().get("hidden_errors"), 1);
    }

    #[test]
    fn test_reject_is_finalized_and_counted() {
        let dispatcher = dispatcher_for(Arc::new(Probe::default()))
            .cors(true)
            .build()
            .unwrap();

        let request =
            InboundRequest::new(Method::POST, "/probe").with_header("x-request-id", "big-1");
        let response = dispatcher.reject(&request, responses::bad_request());

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(response.headers()[header::CONNECTION], "keep-alive");
        assert_eq!(response.headers()["x-request-id"], "big-1");
        assert_eq!(dispatcher.state().get("POST"), 1);
        assert_eq!(dispatcher.state().get("400"), 1);
    }

    #[test]
    fn test_request_id_is_echoed() {
        let dispatcher = dispatcher_for(Arc::new(Probe::default())).build().unwrap();

        let reply = dispatcher.dispatch(&get("/probe").with_header("X-Request-ID", "abc-123"));
        assert_eq!(reply.response.headers()["x-request-id"], "abc-123");

        let reply = dispatcher.dispatch(&get("/missing").with_header("x-request-id", "def"));
        assert_eq!(reply.response.headers()["x-request-id"], "def");

        let reply = dispatcher.dispatch(&get("/probe"));
        assert!(reply.response.headers().get("x-request-id").is_none());
    }

    #[test]
    fn test_keep_alive_mirrors_request() {
        let dispatcher = dispatcher_for(Arc::new(Probe::default())).build().unwrap();

        let reply = dispatcher.dispatch(&get("/probe"));
        assert_eq!(reply.response.headers()[header::CONNECTION], "keep-alive");

        let reply = dispatcher.dispatch(&get("/probe").with_header("connection", "close"));
        assert!(reply.response.headers().get(header::CONNECTION).is_none());

        let reply = dispatcher.dispatch(&get("/probe").with_version(Version::HTTP_10));
        assert!(reply.response.headers().get(header::CONNECTION).is_none());

        let reply = dispatcher.dispatch(
            &get("/probe")
                .with_version(Version::HTTP_10)
                .with_header("connection", "Keep-Alive"),
        );
        assert_eq!(reply.response.headers()[header::CONNECTION], "keep-alive");
    }

    #[test]
    fn test_cors_header() {
        let plain = dispatcher_for(Arc::new(Probe::default())).build().unwrap();
        let reply = plain.dispatch(&get("/probe"));
        assert!(reply
            .response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());

        let cors = dispatcher_for(Arc::new(Probe::default()))
            .cors(true)
            .build()
            .unwrap();
        let reply = cors.dispatch(&get("/missing"));
        assert_eq!(
            reply.response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "*"
        );
    }

    #[test]
    fn test_continue_interim() {
        let dispatcher = dispatcher_for(Arc::new(Probe::default())).build().unwrap();

        let reply = dispatcher.dispatch(
            &InboundRequest::new(Method::POST, "/probe").with_header("expect", "100-continue"),
        );
        let interim = reply.continue_response.unwrap();
        assert_eq!(interim.status(), StatusCode::CONTINUE);
        assert_eq!(reply.response.status(), StatusCode::OK);

        let reply = dispatcher.dispatch(&InboundRequest::new(Method::POST, "/probe"));
        assert!(reply.continue_response.is_none());
    }

    #[test]
    fn test_counters() {
        let state = Arc::new(ServiceState::new());
        let resolver = PathResolver::new()
            .route("probe", Arc::new(Probe::default()))
            .route("counters", Arc::new(CountersHandler::new(Arc::clone(&state))));
        let dispatcher = Dispatcher::builder(resolver)
            .state(Arc::clone(&state))
            .build()
            .unwrap();

        dispatcher.dispatch(&get("/probe"));
        dispatcher.dispatch(&InboundRequest::new(Method::POST, "/probe"));
        dispatcher.dispatch(&get("/missing"));

        assert_eq!(state.get("requests"), 3);
        assert_eq!(state.get("responses"), 3);
        assert_eq!(state.get("GET"), 2);
        assert_eq!(state.get("POST"), 1);
        assert_eq!(state.get("200"), 2);
        assert_eq!(state.get("404"), 1);
        assert!(state.last_request_at().is_some());
    }

    #[test]
    fn test_concurrent_dispatch() {
        let dispatcher = Arc::new(dispatcher_for(Arc::new(Probe::default())).build().unwrap());
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let dispatcher = Arc::clone(&dispatcher);
                std::thread::spawn(move || {
                    for _ in 0..250 {
                        dispatcher.dispatch(&get("/probe"));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(dispatcher.state().get("requests"), 2000);
        assert_eq!(dispatcher.state().get("200"), 2000);
    }

    #[test]
    fn test_invalid_header_name_fails_build() {
        let result = dispatcher_for(Arc::new(Probe::default()))
            .api_key_header("bad header")
            .build();
        assert!(result.is_err());
    }
}
