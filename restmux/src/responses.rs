//! Canned responses and extended header names
//!
//! Every response produced by the crate carries a `Content-Type` and an exact
//! `Content-Length`. Status-only responses use a short upper-case
//! `text/plain` body so that no internal state ever reaches the client.

use bytes::Bytes;
use http::{header, HeaderName, HeaderValue, StatusCode};

use crate::codec::ContentType;

/// Response type produced by handlers and the dispatcher
pub type RestResponse = http::Response<Bytes>;

/// Total number of items behind a list response
pub const X_TOTAL_COUNT: HeaderName = HeaderName::from_static("x-total-count");

/// API key consulted by the gate
pub const X_API_KEY: HeaderName = HeaderName::from_static("x-api-key");

/// Request id echoed back to the client
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Body of a successful health probe
pub const HEALTHY_BODY: &str = "HEALTHY";

/// Build a response with the given body, status and content type.
///
/// `Content-Length` always matches the body length.
pub fn create_response(
    body: impl Into<Bytes>,
    status: StatusCode,
    content_type: ContentType,
) -> RestResponse {
    let body = body.into();
    let length = body.len();
    let mut response = http::Response::new(body);
    *response.status_mut() = status;
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(content_type.as_str()),
    );
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(length));
    response
}

fn text(body: &'static str, status: StatusCode) -> RestResponse {
    create_response(Bytes::from_static(body.as_bytes()), status, ContentType::TextPlain)
}

/// 204 with an empty body
pub fn no_content() -> RestResponse {
    text("", StatusCode::NO_CONTENT)
}

/// 400
pub fn bad_request() -> RestResponse {
    text("BAD REQUEST", StatusCode::BAD_REQUEST)
}

/// 403
pub fn forbidden() -> RestResponse {
    text("FORBIDDEN", StatusCode::FORBIDDEN)
}

/// 404
pub fn not_found() -> RestResponse {
    text("NOT FOUND", StatusCode::NOT_FOUND)
}

/// Methods a [`RequestHandler`](crate::handlers::RequestHandler) can answer
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";

/// 405 listing [`ALLOWED_METHODS`] in `Allow`
pub fn method_not_allowed() -> RestResponse {
    let mut response = text("NOT ALLOWED", StatusCode::METHOD_NOT_ALLOWED);
    response
        .headers_mut()
        .insert(header::ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
    response
}

/// 500 with an opaque body
pub fn internal_error() -> RestResponse {
    text("INTERNAL ERROR", StatusCode::INTERNAL_SERVER_ERROR)
}

/// 501
pub fn not_implemented() -> RestResponse {
    text("NOT IMPLEMENTED", StatusCode::NOT_IMPLEMENTED)
}

/// 200 answering a health probe
pub fn healthy() -> RestResponse {
    text(HEALTHY_BODY, StatusCode::OK)
}

/// Interim `100 Continue`
pub fn continue_interim() -> RestResponse {
    let mut response = http::Response::new(Bytes::new());
    *response.status_mut() = StatusCode::CONTINUE;
    response
}
