//! TABDATA Storage - Backends and Cache Engine
//!
//! The storage layer for the tab-scoped persisted data cache:
//!
//! - [`StorageBackend`]: durable (LMDB) and volatile (in-memory) key/value
//!   stores keyed by `(tab id, data type tag)`
//! - [`TabDataCache`]: the generic cache-or-refetch engine applying the
//!   per-payload TTL policy
//! - [`PayloadType`]: the plug-in contract implemented by concrete records
//!   (price tracking, coupons)
//! - [`PriceDropNotificationService`]: the profile-scoped registry of tabs
//!   with an eligible price drop
//! - [`ServiceRegistry`]: explicit profile-keyed ownership of the above
//!
//! # Concurrency
//!
//! Shared cache state is guarded by async mutexes instead of the original
//! single-main-thread funneling: operations on the same cache key are
//! strictly sequential (one population in flight per key), while different
//! keys may interleave freely.

pub mod codec;
pub mod engine;
pub mod in_memory;
pub mod key;
pub mod lmdb_backend;
pub mod observer;
pub mod payloads;
pub mod registry;
pub mod traits;

pub use engine::TabDataCache;
pub use in_memory::InMemoryStorageBackend;
pub use key::StorageKey;
pub use lmdb_backend::{BackendStats, LmdbStorageBackend};
pub use observer::PriceDropNotificationService;
pub use registry::{ProfileServices, ServiceRegistry};
pub use traits::{PayloadType, PayloadUpdateListener, ResponseFetcher, StorageBackend};
