//! Request id and sensitive header layers
//!
//! The id layer only fills in a missing header; ids sent by the client are
//! kept so the dispatcher can echo them.

use http::{HeaderName, HeaderValue, Request};
use tower_http::{
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    sensitive_headers::SetSensitiveRequestHeadersLayer,
};
use uuid::Uuid;

use crate::responses::X_API_KEY;

/// Headers masked in trace output
pub const SENSITIVE_HEADERS: [HeaderName; 4] = [
    http::header::AUTHORIZATION,
    http::header::COOKIE,
    http::header::SET_COOKIE,
    X_API_KEY,
];

/// Generates v4 UUID request ids
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeUuidRequestId;

impl MakeRequestId for MakeUuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Fill `header` with a fresh id when the request has none
pub fn request_id_layer(header: HeaderName) -> SetRequestIdLayer<MakeUuidRequestId> {
    SetRequestIdLayer::new(header, MakeUuidRequestId)
}

/// Copy `header` from request to response
pub fn request_id_propagation_layer(header: HeaderName) -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(header)
}

/// Mask [`SENSITIVE_HEADERS`] plus the configured key header
pub fn sensitive_headers_layer(api_key_header: &HeaderName) -> SetSensitiveRequestHeadersLayer {
    let mut headers = SENSITIVE_HEADERS.to_vec();
    if !headers.contains(api_key_header) {
        headers.push(api_key_header.clone());
    }
    SetSensitiveRequestHeadersLayer::new(headers)
}
