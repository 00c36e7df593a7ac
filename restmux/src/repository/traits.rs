//! Item provider contract
//!
//! An [`ItemProvider`] is the data-access capability a resource owner hands
//! to the generic CRUD handler. Calls are synchronous; a provider that blocks
//! only delays its own request.
//!
//! Absence is data, not an error: `get_one` answers `Ok(None)` for an unknown
//! key, and writes answer with an [`UpdateResult`] whose `key_exists` flag
//! drives the 404 branch. `Err` is reserved for a provider that cannot answer.

use super::error::ProviderError;
use super::filter::PropertyFilter;
use crate::context::RequestContext;

/// Result type for provider operations
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Outcome of a provider write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateResult<K> {
    /// Key of the written item, when known
    pub key: Option<K>,
    /// Whether the addressed key existed before the write
    pub key_exists: bool,
    /// Whether the write was applied
    pub successful: bool,
    /// Free-form detail, used when the write fails
    pub message: String,
}

impl<K> UpdateResult<K> {
    /// Build a result from its parts
    pub fn new(key: Option<K>, key_exists: bool, successful: bool, message: impl Into<String>) -> Self {
        Self {
            key,
            key_exists,
            successful,
            message: message.into(),
        }
    }

    /// A new item was stored under `key`
    pub fn inserted(key: K) -> Self {
        Self::new(Some(key), false, true, "inserted")
    }

    /// An existing item was replaced
    pub fn updated(key: K) -> Self {
        Self::new(Some(key), true, true, "updated")
    }

    /// An existing item was removed
    pub fn deleted(key: K) -> Self {
        Self::new(Some(key), true, true, "deleted")
    }

    /// The addressed key does not exist
    pub fn missing(key: Option<K>) -> Self {
        Self::new(key, false, false, "key not found")
    }

    /// The write was refused
    pub fn failed(key: Option<K>, key_exists: bool, message: impl Into<String>) -> Self {
        Self::new(key, key_exists, false, message)
    }
}

/// A page of items plus the count it was cut from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubListResponse<V> {
    /// Items matching the filter, before paging
    pub total_count: usize,
    /// Items handed to the list view
    pub items: Vec<V>,
}

impl<V> SubListResponse<V> {
    /// Total equals the number of items
    pub fn from_items(items: Vec<V>) -> Self {
        Self {
            total_count: items.len(),
            items,
        }
    }

    /// Total reported separately from the items returned
    pub fn with_total(total_count: usize, items: Vec<V>) -> Self {
        Self { total_count, items }
    }
}

/// Data-access contract consumed by the generic CRUD handler
///
/// # Example
///
/// ```rust
/// use std::sync::RwLock;
/// use restmux::context::RequestContext;
/// use restmux::repository::{
///     ItemProvider, PropertyFilter, ProviderResult, SubListResponse, UpdateResult,
/// };
///
/// struct Greeting(RwLock<Option<String>>);
///
/// impl ItemProvider<u32, String> for Greeting {
///     fn get_one(&self, key: &u32, _ctx: &RequestContext) -> ProviderResult<Option<String>> {
///         Ok(if *key == 1 { self.0.read().unwrap().clone() } else { None })
///     }
///
///     fn get_many(
///         &self,
///         _filter: &PropertyFilter,
///         _ctx: &RequestContext,
///     ) -> ProviderResult<Option<SubListResponse<String>>> {
///         let items = self.0.read().unwrap().iter().cloned().collect();
///         Ok(Some(SubListResponse::from_items(items)))
///     }
///
///     fn insert(&self, item: String, _ctx: &RequestContext) -> ProviderResult<UpdateResult<u32>> {
///         *self.0.write().unwrap() = Some(item);
///         Ok(UpdateResult::inserted(1))
///     }
///
///     fn update(
///         &self,
///         key: &u32,
///         item: String,
///         ctx: &RequestContext,
///     ) -> ProviderResult<UpdateResult<u32>> {
///         if *key != 1 {
///             return Ok(UpdateResult::missing(Some(*key)));
///         }
///         self.insert(item, ctx).map(|_| UpdateResult::updated(1))
///     }
///
///     fn delete(&self, key: &u32, _ctx: &RequestContext) -> ProviderResult<UpdateResult<u32>> {
///         match (*key, self.0.write().unwrap().take()) {
///             (1, Some(_)) => Ok(UpdateResult::deleted(1)),
///             _ => Ok(UpdateResult::missing(Some(*key))),
///         }
///     }
/// }
/// ```
pub trait ItemProvider<K, V>: Send + Sync {
    /// Fetch one item; `Ok(None)` when the key is unknown
    fn get_one(&self, key: &K, ctx: &RequestContext) -> ProviderResult<Option<V>>;

    /// Fetch the candidates matching `filter`
    ///
    /// `Ok(None)` means the collection itself does not exist (404), which is
    /// distinct from an empty list (200).
    fn get_many(
        &self,
        filter: &PropertyFilter,
        ctx: &RequestContext,
    ) -> ProviderResult<Option<SubListResponse<V>>>;

    /// Store a new item
    fn insert(&self, item: V, ctx: &RequestContext) -> ProviderResult<UpdateResult<K>>;

    /// Replace the item stored under `key`
    fn update(&self, key: &K, item: V, ctx: &RequestContext) -> ProviderResult<UpdateResult<K>>;

    /// Remove the item stored under `key`
    fn delete(&self, key: &K, ctx: &RequestContext) -> ProviderResult<UpdateResult<K>>;

    /// Descriptor of the value type, used in logs
    fn item_type(&self) -> &str {
        std::any::type_name::<V>()
    }

    /// Resource-specific readiness check
    fn health_check(&self, _ctx: &RequestContext) -> ProviderResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_result_constructors() {
        let inserted = UpdateResult::inserted(3);
        assert_eq!(inserted.key, Some(3));
        assert!(inserted.successful && !inserted.key_exists);

        let updated = UpdateResult::updated(3);
        assert!(updated.successful && updated.key_exists);

        let missing = UpdateResult::<u32>::missing(None);
        assert!(!missing.successful && !missing.key_exists);

        let failed = UpdateResult::failed(Some(3), true, "disk full");
        assert!(!failed.successful && failed.key_exists);
        assert_eq!(failed.message, "disk full");
    }

    #[test]
    fn test_sub_list_totals() {
        let all = SubListResponse::from_items(vec![1, 2, 3]);
        assert_eq!(all.total_count, 3);

        let page = SubListResponse::with_total(10, vec![1, 2]);
        assert_eq!(page.total_count, 10);
        assert_eq!(page.items.len(), 2);
    }
}
