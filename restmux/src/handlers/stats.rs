//! Read-only view of the dispatcher counters

use std::sync::Arc;

use http::StatusCode;

use super::traits::RequestHandler;
use crate::codec::{CodecError, ContentType};
use crate::context::RequestContext;
use crate::error::Result;
use crate::responses::{self, create_response, RestResponse};
use crate::state::ServiceState;

/// Answers GET with a JSON [`CounterSnapshot`](crate::state::CounterSnapshot)
#[derive(Debug, Clone)]
pub struct CountersHandler {
    state: Arc<ServiceState>,
}

impl CountersHandler {
    /// Expose `state`
    pub fn new(state: Arc<ServiceState>) -> Self {
        Self { state }
    }
}

impl RequestHandler for CountersHandler {
    fn handle_get(&self, _ctx: &RequestContext) -> Result<RestResponse> {
        let body = serde_json::to_vec(&self.state.snapshot())
            .map_err(|e| CodecError::encode(ContentType::ApplicationJson.as_str(), e.to_string()))?;
        Ok(create_response(body, StatusCode::OK, ContentType::ApplicationJson))
    }

    fn handle_post(&self, _ctx: &RequestContext) -> Result<RestResponse> {
        Ok(responses::method_not_allowed())
    }

    fn handle_put(&self, _ctx: &RequestContext) -> Result<RestResponse> {
        Ok(responses::method_not_allowed())
    }

    fn handle_delete(&self, _ctx: &RequestContext) -> Result<RestResponse> {
        Ok(responses::method_not_allowed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::InboundRequest;
    use crate::state::CounterSnapshot;
    use http::Method;

    fn ctx(method: Method) -> RequestContext {
        RequestContext::from_request(&InboundRequest::new(method, "/counters"))
    }

    #[test]
    fn test_get_returns_snapshot() {
        let state = Arc::new(ServiceState::new());
        state.record_request(&Method::GET);
        state.record_response(StatusCode::OK);

        let response = CountersHandler::new(Arc::clone(&state))
            .handle_get(&ctx(Method::GET))
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let snapshot: CounterSnapshot = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(snapshot.counters["requests"], 1);
        assert_eq!(snapshot.counters["200"], 1);
        assert!(snapshot.last_request_at.is_some());
    }

    #[test]
    fn test_writes_are_not_allowed() {
        let handler = CountersHandler::new(Arc::new(ServiceState::new()));
        assert_eq!(
            handler.handle_post(&ctx(Method::POST)).unwrap().status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            handler.handle_put(&ctx(Method::PUT)).unwrap().status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            handler.handle_delete(&ctx(Method::DELETE)).unwrap().status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
