//! Inbound requests and the normalized request context

use std::collections::HashMap;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::{header, HeaderMap, HeaderValue, Method, Version};

/// Transport-neutral request as handed over by the HTTP layer
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use restmux::context::InboundRequest;
///
/// let request = InboundRequest::new(Method::GET, "/notes/7?_sortDir=desc")
///     .with_header("x-request-id", "abc-123");
///
/// assert!(request.keep_alive());
/// assert!(!request.expects_continue());
/// ```
#[derive(Debug, Clone)]
pub struct InboundRequest {
    /// Request method
    pub method: Method,
    /// Request target (path plus optional query string)
    pub uri: String,
    /// Protocol version
    pub version: Version,
    /// Request headers
    pub headers: HeaderMap,
    /// Fully buffered body, empty when absent
    pub body: Bytes,
}

impl InboundRequest {
    /// HTTP/1.1 request with no headers and an empty body
    pub fn new(method: Method, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            version: Version::HTTP_11,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    /// Build from `http` request parts and a buffered body
    pub fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        let uri = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());
        Self {
            method: parts.method,
            uri,
            version: parts.version,
            headers: parts.headers,
            body,
        }
    }

    /// Append a header; invalid names or values are skipped
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match (
            header::HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                self.headers.append(name, value);
            }
            _ => tracing::warn!(header = name, "Skipping invalid header"),
        }
        self
    }

    /// Replace the body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Replace the protocol version
    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Whether the connection should stay open after the response
    ///
    /// HTTP/1.1 defaults to persistent unless `Connection: close`; HTTP/1.0
    /// only persists with `Connection: keep-alive`. HTTP/2 and later manage
    /// connections themselves and never carry the header.
    pub fn keep_alive(&self) -> bool {
        let has_token = |token: &str| {
            self.headers
                .get_all(header::CONNECTION)
                .iter()
                .filter_map(|v| v.to_str().ok())
                .flat_map(|v| v.split(','))
                .any(|t| t.trim().eq_ignore_ascii_case(token))
        };
        match self.version {
            Version::HTTP_11 => !has_token("close"),
            Version::HTTP_10 => has_token("keep-alive"),
            _ => false,
        }
    }

    /// Whether the client sent `Expect: 100-continue`
    pub fn expects_continue(&self) -> bool {
        self.headers
            .get(header::EXPECT)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("100-continue"))
    }
}

/// Normalized, immutable view of one request
///
/// Path segments are lower-cased and trimmed with empty segments dropped;
/// query parameter names are lower-cased with every value kept. Header
/// lookups are case-insensitive.
#[derive(Debug, Clone)]
pub struct RequestContext {
    method: Method,
    path: Vec<String>,
    query: HashMap<String, Vec<String>>,
    headers: HeaderMap,
    body: Bytes,
    received_at: DateTime<Utc>,
}

impl RequestContext {
    /// Build the context for an inbound request, stamped with the current time
    pub fn from_request(request: &InboundRequest) -> Self {
        Self::from_request_at(request, Utc::now())
    }

    /// Build the context with an explicit arrival time
    pub fn from_request_at(request: &InboundRequest, received_at: DateTime<Utc>) -> Self {
        let (path, query) = match request.uri.split_once('?') {
            Some((path, query)) => (path, query),
            None => (request.uri.as_str(), ""),
        };

        Self {
            method: request.method.clone(),
            path: split_path(path),
            query: parse_query(query),
            headers: request.headers.clone(),
            body: request.body.clone(),
            received_at,
        }
    }

    /// Request method
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Lower-cased path segments; empty for the root
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Segment at `index`, if present
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.path.get(index).map(String::as_str)
    }

    /// All query parameters by lower-cased name
    pub fn query_params(&self) -> &HashMap<String, Vec<String>> {
        &self.query
    }

    /// First value of a query parameter; `name` is matched case-insensitively
    pub fn query_first(&self, name: &str) -> Option<&str> {
        self.query_all(name).first().map(String::as_str)
    }

    /// Every value of a query parameter
    pub fn query_all(&self, name: &str) -> &[String] {
        self.query
            .get(&name.to_ascii_lowercase())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Request headers
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header as text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Request body; empty when none was sent
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Arrival timestamp
    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }
}

fn split_path(path: &str) -> Vec<String> {
    path.split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn parse_query(query: &str) -> HashMap<String, Vec<String>> {
    let mut params: HashMap<String, Vec<String>> = HashMap::new();
    for (name, value) in url::form_urlencoded::parse(query.as_bytes()) {
        params
            .entry(name.to_lowercase())
            .or_default()
            .push(value.into_owned());
    }
    params
}
