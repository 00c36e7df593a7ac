//! Content types, serializers and content negotiation
//!
//! A [`ContentSerializer`] encodes and decodes one resource value type for a
//! single MIME type. The [`ContentNegotiator`] owns an immutable registry of
//! serializers built at handler construction and always falls back to its
//! default (JSON) serializer.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use restmux::codec::{ContentNegotiator, ContentSerializer, ContentType, MsgPackSerializer};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Note {
//!     id: u64,
//!     body: String,
//! }
//!
//! let negotiator = ContentNegotiator::<Note>::new(vec![
//!     Arc::new(MsgPackSerializer::new()) as Arc<dyn ContentSerializer<Note>>,
//! ]);
//!
//! let serializer = negotiator.resolve(Some("application/x-msgpack"));
//! assert_eq!(serializer.content_type(), ContentType::ApplicationMsgPack);
//!
//! let fallback = negotiator.resolve(Some("text/html"));
//! assert_eq!(fallback.content_type(), ContentType::ApplicationJson);
//! ```

mod content_type;
mod json;
mod msgpack;
mod negotiator;

use std::fmt;

use bytes::Bytes;
use thiserror::Error;

pub use content_type::ContentType;
pub use json::JsonSerializer;
pub use msgpack::MsgPackSerializer;
pub use negotiator::ContentNegotiator;

/// Direction of a failed codec operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecOperation {
    /// Value to bytes
    Encode,
    /// Bytes to value
    Decode,
}

impl fmt::Display for CodecOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Encode => write!(f, "encode"),
            Self::Decode => write!(f, "decode"),
        }
    }
}

/// Failure at the underlying codec boundary
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Codec {operation} error for {content_type}: {message}")]
pub struct CodecError {
    /// Encode or decode
    pub operation: CodecOperation,
    /// MIME type of the failing codec
    pub content_type: &'static str,
    /// Underlying codec message
    pub message: String,
}

impl CodecError {
    /// Encoding failure
    pub fn encode(content_type: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation: CodecOperation::Encode,
            content_type,
            message: message.into(),
        }
    }

    /// Decoding failure
    pub fn decode(content_type: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation: CodecOperation::Decode,
            content_type,
            message: message.into(),
        }
    }
}

/// Per-content-type encode/decode of a resource value type.
///
/// Implementations never return partial results: every call either yields a
/// complete value or a [`CodecError`].
pub trait ContentSerializer<V>: Send + Sync {
    /// MIME type this serializer produces and accepts
    fn content_type(&self) -> ContentType;

    /// Encode a single item
    fn serialize_one(&self, item: &V) -> Result<Bytes, CodecError>;

    /// Encode a list of items; an empty list encodes as an empty list value
    fn serialize_many(&self, items: &[V]) -> Result<Bytes, CodecError>;

    /// Decode a single item; empty input yields `Ok(None)`
    fn deserialize_one(&self, bytes: &[u8]) -> Result<Option<V>, CodecError>;

    /// Decode a list of items; empty input yields an empty list
    fn deserialize_many(&self, bytes: &[u8]) -> Result<Vec<V>, CodecError>;
}
