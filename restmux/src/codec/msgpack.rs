//! MessagePack serializer
//!
//! Structs are written as maps keyed by field name so that payloads stay
//! compatible with clients that decode into dynamic maps.

use std::marker::PhantomData;

use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};

use super::{CodecError, ContentSerializer, ContentType};

const MIME: &str = ContentType::ApplicationMsgPack.as_str();

/// `application/x-msgpack` codec backed by `rmp-serde`
pub struct MsgPackSerializer<V> {
    _marker: PhantomData<fn() -> V>,
}

impl<V> MsgPackSerializer<V> {
    /// Create a MessagePack serializer
    #[must_use]
    pub fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<V> Default for MsgPackSerializer<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> std::fmt::Debug for MsgPackSerializer<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MsgPackSerializer").finish()
    }
}

impl<V> ContentSerializer<V> for MsgPackSerializer<V>
where
    V: Serialize + DeserializeOwned,
{
    fn content_type(&self) -> ContentType {
        ContentType::ApplicationMsgPack
    }

    fn serialize_one(&self, item: &V) -> Result<Bytes, CodecError> {
        rmp_serde::to_vec_named(item)
            .map(Bytes::from)
            .map_err(|e| CodecError::encode(MIME, e.to_string()))
    }

    fn serialize_many(&self, items: &[V]) -> Result<Bytes, CodecError> {
        rmp_serde::to_vec_named(items)
            .map(Bytes::from)
            .map_err(|e| CodecError::encode(MIME, e.to_string()))
    }

    fn deserialize_one(&self, bytes: &[u8]) -> Result<Option<V>, CodecError> {
        if bytes.is_empty() {
            return Ok(None);
        }
        rmp_serde::from_slice(bytes)
            .map(Some)
            .map_err(|e| CodecError::decode(MIME, e.to_string()))
    }

    fn deserialize_many(&self, bytes: &[u8]) -> Result<Vec<V>, CodecError> {
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        rmp_serde::from_slice(bytes).map_err(|e| CodecError::decode(MIME, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Reading {
        sensor: String,
        value: f64,
        taken_at: DateTime<Utc>,
    }

    fn reading() -> Reading {
        Reading {
            sensor: "north".to_string(),
            value: 21.5,
            taken_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_one_round_trips_with_timestamps() {
        let codec = MsgPackSerializer::<Reading>::new();
        let bytes = codec.serialize_one(&reading()).unwrap();
        assert_eq!(codec.deserialize_one(&bytes).unwrap(), Some(reading()));
    }

    #[test]
    fn test_encodes_named_fields() {
        let codec = MsgPackSerializer::<Reading>::new();
        let bytes = codec.serialize_one(&reading()).unwrap();
        // fixmap with three entries
        assert_eq!(bytes[0], 0x83);
    }

    #[test]
    fn test_many_round_trips() {
        let codec = MsgPackSerializer::<Reading>::new();
        let items = vec![reading(), reading()];
        let bytes = codec.serialize_many(&items).unwrap();
        assert_eq!(codec.deserialize_many(&bytes).unwrap(), items);
    }

    #[test]
    fn test_empty_and_garbage_input() {
        let codec = MsgPackSerializer::<Reading>::new();
        assert_eq!(codec.deserialize_one(&[]).unwrap(), None);
        assert!(codec.deserialize_one(&[0xc1]).is_err());
    }
}
