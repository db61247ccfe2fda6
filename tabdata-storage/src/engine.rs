//! The cache-or-refetch engine.
//!
//! [`TabDataCache`] associates one payload type with the tabs of a profile,
//! serving cached records while they are fresh and invoking the payload's
//! population routine when they are stale or absent.
//!
//! # Coalescing
//!
//! Each tab key owns an async mutex held for the whole acquire. A second
//! caller that arrives while a population is in flight waits on that lock
//! and then finds the freshly registered live instance, so exactly one
//! fetch runs per key and both callers observe its result. Follow-up
//! fetches are never queued.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use tabdata_core::{Tab, TabId};

use crate::traits::{PayloadType, PayloadUpdateListener, ResponseFetcher, StorageBackend};

/// Tab-scoped cache for one payload type within one profile.
pub struct TabDataCache<T: PayloadType, F: ResponseFetcher> {
    backend: Arc<dyn StorageBackend>,
    fetcher: Arc<F>,
    listener: Option<Arc<dyn PayloadUpdateListener<T>>>,
    /// Already-deserialized records, kept to avoid repeat deserialization
    /// within a session. Entries may be stale; freshness is re-checked on
    /// every read.
    live: Mutex<HashMap<TabId, Arc<T>>>,
    /// Per-tab locks serializing all operations on one cache key.
    tab_locks: Mutex<HashMap<TabId, Arc<Mutex<()>>>>,
}

impl<T: PayloadType, F: ResponseFetcher> TabDataCache<T, F> {
    pub fn new(backend: Arc<dyn StorageBackend>, fetcher: Arc<F>) -> Self {
        Self {
            backend,
            fetcher,
            listener: None,
            live: Mutex::new(HashMap::new()),
            tab_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Attach a post-population listener (e.g. the price-drop notification
    /// service).
    pub fn with_listener(mut self, listener: Arc<dyn PayloadUpdateListener<T>>) -> Self {
        self.listener = Some(listener);
        self
    }

    /// Acquire the cached-or-fresh record for `tab`.
    ///
    /// Returns `None` for ineligible tabs (destroyed, or incognito when the
    /// payload type disallows it), on population failure, and when the tab
    /// is destroyed while an operation is in flight. A failed population
    /// never disturbs a previously stored record.
    pub async fn acquire(&self, tab: &Tab) -> Option<Arc<T>> {
        if !self.is_eligible(tab) {
            return None;
        }

        let tab_lock = self.tab_lock(tab.id()).await;
        let _guard = tab_lock.lock().await;

        // The tab may have been destroyed while we waited for the key lock.
        if tab.is_destroyed() {
            return None;
        }

        let now = Utc::now();

        // Live instance, still fresh: no storage or network access.
        let previous = self.live.lock().await.get(&tab.id()).cloned();
        if let Some(record) = &previous {
            if record.is_fresh(now) {
                return Some(Arc::clone(record));
            }
        }

        // No usable live instance: restore from the backend. A decode
        // failure is a cache miss, not an error.
        let previous = match previous {
            Some(stale) => Some(stale),
            None => self.restore_from_backend(tab).await,
        };

        if tab.is_destroyed() {
            return None;
        }

        if let Some(record) = &previous {
            if record.is_fresh(now) {
                self.register_live(tab.id(), Arc::clone(record)).await;
                return Some(Arc::clone(record));
            }
        }

        self.populate(tab, previous).await
    }

    /// Peek at the live instance for a tab without triggering any restore
    /// or population. The returned record may be stale.
    pub async fn cached(&self, tab_id: TabId) -> Option<Arc<T>> {
        self.live.lock().await.get(&tab_id).cloned()
    }

    /// Drop a tab's record: live instance and stored bytes. Used when a
    /// tab closes and its data should not outlive it.
    ///
    /// Takes the tab's key lock first, so a population already in flight
    /// completes (and its save lands) before the delete runs; the key never
    /// sees two concurrent writes, and a removed record cannot be
    /// resurrected by a late save.
    pub async fn remove(&self, tab_id: TabId) {
        let tab_lock = self.tab_lock(tab_id).await;
        {
            let _guard = tab_lock.lock().await;
            self.live.lock().await.remove(&tab_id);
            if let Err(e) = self.backend.delete(tab_id, T::data_type_tag()).await {
                tracing::warn!(tab_id, error = %e, "Failed to delete stored tab data");
            }
        }
        self.tab_locks.lock().await.remove(&tab_id);
    }

    /// Drop all live instances, keeping stored bytes intact.
    pub async fn clear_live(&self) {
        self.live.lock().await.clear();
    }

    fn is_eligible(&self, tab: &Tab) -> bool {
        if tab.is_destroyed() {
            return false;
        }
        if tab.is_incognito() && !T::supports_incognito() {
            return false;
        }
        true
    }

    async fn tab_lock(&self, tab_id: TabId) -> Arc<Mutex<()>> {
        Arc::clone(
            self.tab_locks
                .lock()
                .await
                .entry(tab_id)
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    async fn restore_from_backend(&self, tab: &Tab) -> Option<Arc<T>> {
        match self.backend.restore(tab.id(), T::data_type_tag()).await {
            Ok(Some(bytes)) => match T::from_bytes(&bytes) {
                Some(record) => Some(Arc::new(record)),
                None => {
                    tracing::debug!(
                        tab_id = tab.id(),
                        tag = T::data_type_tag(),
                        "Stored record undecodable, treating as miss"
                    );
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(tab_id = tab.id(), error = %e, "Restore failed, treating as miss");
                None
            }
        }
    }

    /// Run the population routine and persist its result. Caller holds the
    /// tab's key lock.
    async fn populate(&self, tab: &Tab, previous: Option<Arc<T>>) -> Option<Arc<T>> {
        let response = match self.fetcher.fetch(tab).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(tab_id = tab.id(), error = %e, "Population fetch failed");
                return None;
            }
        };

        // Destroyed while the fetch was in flight: suppress the result and
        // write nothing.
        if tab.is_destroyed() {
            tracing::debug!(tab_id = tab.id(), "Tab destroyed mid-fetch, discarding result");
            return None;
        }

        let now = Utc::now();
        let record = match T::from_response(&response, previous.as_deref(), now) {
            Some(record) => Arc::new(record),
            None => {
                tracing::warn!(
                    tab_id = tab.id(),
                    tag = T::data_type_tag(),
                    "Unparseable population response, preserving stored record"
                );
                return None;
            }
        };

        match record.to_bytes() {
            Ok(bytes) => {
                if let Err(e) = self.backend.save(tab.id(), T::data_type_tag(), bytes).await {
                    tracing::warn!(tab_id = tab.id(), error = %e, "Failed to persist record");
                }
            }
            Err(e) => {
                tracing::warn!(tab_id = tab.id(), error = %e, "Failed to serialize record");
            }
        }

        if tab.is_destroyed() {
            return None;
        }

        self.register_live(tab.id(), Arc::clone(&record)).await;

        if let Some(listener) = &self.listener {
            listener.on_payload_updated(tab, previous.as_deref(), &record);
        }

        Some(record)
    }

    async fn register_live(&self, tab_id: TabId, record: Arc<T>) {
        self.live.lock().await.insert(tab_id, record);
    }
}
