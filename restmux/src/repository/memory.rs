//! In-memory item provider
//!
//! Backed by a `DashMap`, so concurrent requests only contend on the shard
//! holding the addressed key.

use std::fmt;
use std::hash::Hash;

use dashmap::{mapref::entry::Entry, DashMap};
use serde::Serialize;

use super::filter::PropertyFilter;
use super::traits::{ItemProvider, ProviderResult, SubListResponse, UpdateResult};
use crate::context::RequestContext;

type KeyFn<K, V> = Box<dyn Fn(&V) -> K + Send + Sync>;

/// Concurrent map exposing its items through [`ItemProvider`]
///
/// The key of an inserted item is derived from the item itself. Updates
/// store the item under the key addressed by the request.
///
/// Inserting an item whose key is already stored reports
/// `key_exists = true, successful = false`, which
/// [`GenericCrudHandler`](crate::handlers::GenericCrudHandler) treats as a
/// broken provider: a client POSTing a duplicate key gets a 500 and the
/// handler logs a panic. Resources whose clients pick their own keys should
/// put a provider in front that answers duplicates before the write, or let
/// the provider assign keys.
///
/// # Example
///
/// ```rust
/// use restmux::repository::MemoryProvider;
/// use serde::Serialize;
///
/// #[derive(Clone, Serialize)]
/// struct Note {
///     id: u64,
///     body: String,
/// }
///
/// let provider = MemoryProvider::new(|note: &Note| note.id).with_items([
///     Note { id: 1, body: "first".into() },
///     Note { id: 2, body: "second".into() },
/// ]);
/// assert_eq!(provider.len(), 2);
/// ```
pub struct MemoryProvider<K, V>
where
    K: Eq + Hash,
{
    items: DashMap<K, V>,
    key_of: KeyFn<K, V>,
}

impl<K, V> MemoryProvider<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Empty provider keyed by `key_of`
    pub fn new<F>(key_of: F) -> Self
    where
        F: Fn(&V) -> K + Send + Sync + 'static,
    {
        Self {
            items: DashMap::new(),
            key_of: Box::new(key_of),
        }
    }

    /// Seed the provider; later items replace earlier ones with the same key
    #[must_use]
    pub fn with_items(self, items: impl IntoIterator<Item = V>) -> Self {
        for item in items {
            self.items.insert((self.key_of)(&item), item);
        }
        self
    }

    /// Number of stored items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<K, V> fmt::Debug for MemoryProvider<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryProvider")
            .field("len", &self.items.len())
            .finish()
    }
}

impl<K, V> ItemProvider<K, V> for MemoryProvider<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug + Send + Sync,
    V: Clone + Serialize + Send + Sync,
{
    fn get_one(&self, key: &K, _ctx: &RequestContext) -> ProviderResult<Option<V>> {
        Ok(self.items.get(key).map(|entry| entry.value().clone()))
    }

    fn get_many(
        &self,
        filter: &PropertyFilter,
        _ctx: &RequestContext,
    ) -> ProviderResult<Option<SubListResponse<V>>> {
        let items: Vec<V> = self
            .items
            .iter()
            .filter(|entry| filter.matches_json(entry.value()))
            .map(|entry| entry.value().clone())
            .collect();
        Ok(Some(SubListResponse::from_items(items)))
    }

    fn insert(&self, item: V, _ctx: &RequestContext) -> ProviderResult<UpdateResult<K>> {
        let key = (self.key_of)(&item);
        match self.items.entry(key.clone()) {
            Entry::Occupied(_) => {
                tracing::debug!(key = ?key, "Insert refused, key already present");
                Ok(UpdateResult::failed(Some(key), true, "key already exists"))
            }
            Entry::Vacant(slot) => {
                slot.insert(item);
                Ok(UpdateResult::inserted(key))
            }
        }
    }

    fn update(&self, key: &K, item: V, _ctx: &RequestContext) -> ProviderResult<UpdateResult<K>> {
        match self.items.get_mut(key) {
            Some(mut existing) => {
                *existing = item;
                Ok(UpdateResult::updated(key.clone()))
            }
            None => Ok(UpdateResult::missing(Some(key.clone()))),
        }
    }

    fn delete(&self, key: &K, _ctx: &RequestContext) -> ProviderResult<UpdateResult<K>> {
        match self.items.remove(key) {
            Some((key, _)) => Ok(UpdateResult::deleted(key)),
            None => Ok(UpdateResult::missing(Some(key.clone()))),
        }
    }
}
