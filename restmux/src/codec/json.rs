//! JSON serializer (the default codec)

use std::marker::PhantomData;

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};

use super::{CodecError, ContentSerializer, ContentType};

const MIME: &str = ContentType::ApplicationJson.as_str();

/// `application/json` codec backed by `serde_json`
pub struct JsonSerializer<V> {
    _marker: PhantomData<fn() -> V>,
}

impl<V> JsonSerializer<V> {
    /// Create a JSON serializer
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<V> Default for JsonSerializer<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for JsonSerializer<V> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for JsonSerializer<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonSerializer").finish()
    }
}

impl<V> ContentSerializer<V> for JsonSerializer<V>
where
    V: Serialize + DeserializeOwned,
{
    fn content_type(&self) -> ContentType {
        ContentType::ApplicationJson
    }

    fn serialize_one(&self, item: &V) -> Result<Bytes, CodecError> {
        serde_json::to_vec(item)
            .map(Bytes::from)
            .map_err(|e| CodecError::encode(MIME, e.to_string()))
    }

    fn serialize_many(&self, items: &[V]) -> Result<Bytes, CodecError> {
        serde_json::to_vec(items)
            .map(Bytes::from)
            .map_err(|e| CodecError::encode(MIME, e.to_string()))
    }

    fn deserialize_one(&self, bytes: &[u8]) -> Result<Option<V>, CodecError> {
        if bytes.is_empty() {
            return Ok(None);
        }
        serde_json::from_slice(bytes)
            .map(Some)
            .map_err(|e| CodecError::decode(MIME, e.to_string()))
    }

    fn deserialize_many(&self, bytes: &[u8]) -> Result<Vec<V>, CodecError> {
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_slice(bytes).map_err(|e| CodecError::decode(MIME, e.to_string()))
    }
}
