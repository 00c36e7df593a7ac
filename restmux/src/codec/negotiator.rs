//! Content negotiation
//!
//! The registry is built once and never mutated, so lookups need no locking.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};

use super::{ContentSerializer, ContentType, JsonSerializer};

/// Maps a MIME string to a registered serializer, falling back to JSON
pub struct ContentNegotiator<V> {
    default: Arc<dyn ContentSerializer<V>>,
    registry: HashMap<ContentType, Arc<dyn ContentSerializer<V>>>,
}

impl<V> ContentNegotiator<V>
where
    V: Serialize + DeserializeOwned + 'static,
{
    /// Build a negotiator with the JSON serializer as default.
    ///
    /// Entries declaring the default's content type are skipped (the default
    /// wins ties), as are entries declaring [`ContentType::Unknown`]. When two
    /// entries declare the same type, the later one is kept.
    pub fn new(serializers: Vec<Arc<dyn ContentSerializer<V>>>) -> Self {
        Self::with_default(Arc::new(JsonSerializer::new()), serializers)
    }
}

impl<V> ContentNegotiator<V> {
    /// Build a negotiator around an explicit default serializer
    pub fn with_default(
        default: Arc<dyn ContentSerializer<V>>,
        serializers: Vec<Arc<dyn ContentSerializer<V>>>,
    ) -> Self {
        let default_type = default.content_type();
        let mut registry = HashMap::new();

        for serializer in serializers {
            let content_type = serializer.content_type();
            if content_type == default_type {
                continue;
            }
            if content_type == ContentType::Unknown {
                tracing::warn!("Ignoring serializer registered without a content type");
                continue;
            }
            registry.insert(content_type, serializer);
        }

        Self { default, registry }
    }

    /// Resolve an `Accept` or `Content-Type` header value to a serializer
    pub fn resolve(&self, header_value: Option<&str>) -> &Arc<dyn ContentSerializer<V>> {
        self.resolve_type(ContentType::from_header(header_value))
    }

    /// Resolve an already canonicalised content type
    pub fn resolve_type(&self, content_type: ContentType) -> &Arc<dyn ContentSerializer<V>> {
        self.registry.get(&content_type).unwrap_or(&self.default)
    }

    /// The fallback serializer
    pub fn default_serializer(&self) -> &Arc<dyn ContentSerializer<V>> {
        &self.default
    }

    /// Content types with a non-default serializer
    pub fn registered(&self) -> impl Iterator<Item = ContentType> + '_ {
        self.registry.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CodecError, MsgPackSerializer};
    use bytes::Bytes;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: u32,
    }

    /// Serializer that claims a content type but never works
    struct Claiming(ContentType);

    impl ContentSerializer<Item> for Claiming {
        fn content_type(&self) -> ContentType {
            self.0
        }
        fn serialize_one(&self, _item: &Item) -> Result<Bytes, CodecError> {
            Err(CodecError::encode("test", "claiming"))
        }
        fn serialize_many(&self, _items: &[Item]) -> Result<Bytes, CodecError> {
            Err(CodecError::encode("test", "claiming"))
        }
        fn deserialize_one(&self, _bytes: &[u8]) -> Result<Option<Item>, CodecError> {
            Err(CodecError::decode("test", "claiming"))
        }
        fn deserialize_many(&self, _bytes: &[u8]) -> Result<Vec<Item>, CodecError> {
            Err(CodecError::decode("test", "claiming"))
        }
    }

    fn msgpack() -> Arc<dyn ContentSerializer<Item>> {
        Arc::new(MsgPackSerializer::new())
    }

    #[test]
    fn test_registered_type_resolves() {
        let negotiator = ContentNegotiator::new(vec![msgpack()]);
        for header in ["application/x-msgpack", " Application/X-MsgPack "] {
            assert_eq!(
                negotiator.resolve(Some(header)).content_type(),
                ContentType::ApplicationMsgPack
            );
        }
    }

    #[test]
    fn test_unregistered_or_malformed_falls_back_to_json() {
        let negotiator = ContentNegotiator::new(vec![msgpack()]);
        for header in [None, Some(""), Some("text/plain"), Some("garbage;;"), Some("*/*")] {
            assert_eq!(
                negotiator.resolve(header).content_type(),
                ContentType::ApplicationJson
            );
        }
    }

    #[test]
    fn test_default_wins_ties() {
        let negotiator =
            ContentNegotiator::new(vec![Arc::new(Claiming(ContentType::ApplicationJson))]);
        let serializer = negotiator.resolve(Some("application/json"));
        assert!(serializer.serialize_one(&Item { id: 1 }).is_ok());
        assert_eq!(negotiator.registered().count(), 0);
    }

    #[test]
    fn test_unknown_registration_is_ignored() {
        let negotiator = ContentNegotiator::new(vec![Arc::new(Claiming(ContentType::Unknown))]);
        let serializer = negotiator.resolve(Some("text/html"));
        assert!(serializer.serialize_one(&Item { id: 1 }).is_ok());
    }
}
