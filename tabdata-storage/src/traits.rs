//! Storage backend and payload plug-in traits.
//!
//! The cache engine is generic over two seams: the [`StorageBackend`] that
//! persists raw bytes, and the [`PayloadType`] contract each concrete
//! record implements to plug into the engine. The engine never interprets
//! stored bytes or fetch responses itself.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tabdata_core::{FetchError, StorageError, StorageResult, Tab, TabId};

/// Key/value storage for tab-scoped payload bytes.
///
/// Keys are the encoded form of [`crate::StorageKey`]; values are opaque
/// byte sequences. Implementations are shared mutable state scoped to one
/// browsing profile. Callers serialize access per key; backends make no
/// ordering promises between concurrent operations on the same key.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Persist `bytes` under `(tab_id, data_type_tag)`, replacing any
    /// previous value wholesale.
    async fn save(&self, tab_id: TabId, data_type_tag: &'static str, bytes: Vec<u8>)
        -> StorageResult<()>;

    /// Restore the bytes stored under `(tab_id, data_type_tag)`, or `None`
    /// if nothing is stored.
    async fn restore(&self, tab_id: TabId, data_type_tag: &'static str)
        -> StorageResult<Option<Vec<u8>>>;

    /// Synchronous restore variant.
    ///
    /// Backends that cannot serve reads without blocking on I/O must leave
    /// this at the default, which fails with an explicit
    /// [`StorageError::SyncUnsupported`] rather than silently returning
    /// wrong data.
    fn restore_blocking(
        &self,
        _tab_id: TabId,
        _data_type_tag: &'static str,
    ) -> StorageResult<Option<Vec<u8>>> {
        Err(StorageError::SyncUnsupported)
    }

    /// Delete the value stored under `(tab_id, data_type_tag)`, if any.
    async fn delete(&self, tab_id: TabId, data_type_tag: &'static str) -> StorageResult<()>;
}

/// Contract implemented by each concrete record type plugged into the
/// cache engine.
///
/// # Implementation Requirements
///
/// - `data_type_tag()` must be a dedicated constant, disjoint from every
///   other payload type's tag: it namespaces the shared backend.
/// - `from_bytes` must treat corrupt or empty input as `None` (a cache
///   miss), never panic.
/// - `from_response` owns both parsing of the raw fetch payload and any
///   transition logic against the previously cached record.
pub trait PayloadType: Clone + Send + Sync + 'static {
    /// Dedicated constant tag identifying this payload type.
    fn data_type_tag() -> &'static str;

    /// Maximum age for which this record is served without refetching.
    /// Carried per record, so a persisted value keeps the TTL it was
    /// written with.
    fn time_to_live(&self) -> Duration;

    /// When this record was last successfully populated.
    fn last_updated_at(&self) -> DateTime<Utc>;

    /// Serialize to the persisted byte form.
    fn to_bytes(&self) -> StorageResult<Vec<u8>>;

    /// Deserialize from the persisted byte form. `None` means cache miss.
    fn from_bytes(bytes: &[u8]) -> Option<Self>;

    /// Build a record from a raw fetch response, applying transition rules
    /// against the previously cached record. `None` means the response was
    /// unparseable; the engine then preserves any stored value untouched.
    fn from_response(
        bytes: &[u8],
        previous: Option<&Self>,
        now: DateTime<Utc>,
    ) -> Option<Self>;

    /// Whether this payload type may be populated for incognito tabs.
    /// Defaults to false; incognito tabs then short-circuit to "no data".
    fn supports_incognito() -> bool {
        false
    }

    /// Whether a record is still fresh at `now`.
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.last_updated_at()) < self.time_to_live()
    }
}

/// Asynchronous population routine, typically a network fetch.
///
/// The engine treats the response as opaque bytes and hands it to the
/// payload type's parser. One fetcher is supplied per payload type.
#[async_trait]
pub trait ResponseFetcher: Send + Sync {
    async fn fetch(&self, tab: &Tab) -> Result<Vec<u8>, FetchError>;
}

/// Post-population hook invoked after a record is persisted and
/// registered, with the value it replaced (if any) still available.
///
/// This is the seam through which payload-specific consumers (such as the
/// price-drop notification service) observe transitions without the engine
/// knowing their semantics.
pub trait PayloadUpdateListener<T: PayloadType>: Send + Sync {
    fn on_payload_updated(&self, tab: &Tab, previous: Option<&T>, current: &T);
}
