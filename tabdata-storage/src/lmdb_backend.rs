//! LMDB-backed durable storage.
//!
//! Uses the heed crate (Rust bindings for LMDB) to give each browsing
//! profile a memory-mapped key-value store that survives process restarts.
//! Values are opaque byte sequences; the store enforces no schema.
//!
//! # Lifecycle
//!
//! A backend is explicitly opened per profile with [`LmdbStorageBackend::open`]
//! and torn down with [`LmdbStorageBackend::close`], which consumes the
//! value. Use after teardown is therefore a compile error, not a runtime
//! assertion. Off-the-record profiles are refused at open: durable storage
//! is never used for private browsing.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use heed::types::{Bytes, Str};
use heed::{Database, Env, EnvOpenOptions};
use tabdata_core::{Profile, StorageError, StorageResult, TabId};

use crate::key::StorageKey;
use crate::traits::StorageBackend;

fn txn_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::Backend {
        reason: e.to_string(),
    }
}

/// Hit/miss counters for one profile's durable store.
#[derive(Debug, Default)]
pub struct BackendStats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl BackendStats {
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

/// Durable per-profile storage backend on LMDB.
pub struct LmdbStorageBackend {
    env: Env,
    db: Database<Str, Bytes>,
    stats: BackendStats,
}

impl LmdbStorageBackend {
    /// Open (or create) the profile's durable store.
    ///
    /// # Arguments
    ///
    /// * `profile` - The owning profile; must not be off-the-record
    /// * `path` - Directory where the LMDB files live
    /// * `max_size_mb` - Maximum size of the database in megabytes
    ///
    /// # Errors
    ///
    /// Fails for off-the-record profiles, or when the directory cannot be
    /// created or the LMDB environment cannot be opened.
    pub fn open<P: AsRef<Path>>(
        profile: &Profile,
        path: P,
        max_size_mb: usize,
    ) -> StorageResult<Self> {
        if profile.is_off_the_record() {
            return Err(StorageError::OffTheRecordProfile {
                profile_id: profile.id().to_string(),
            });
        }

        std::fs::create_dir_all(&path)?;

        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(max_size_mb * 1024 * 1024)
                .max_dbs(1)
                .open(path.as_ref())
        }
        .map_err(txn_err)?;

        let mut wtxn = env.write_txn().map_err(txn_err)?;
        let db: Database<Str, Bytes> = env.create_database(&mut wtxn, None).map_err(txn_err)?;
        wtxn.commit().map_err(txn_err)?;

        Ok(Self {
            env,
            db,
            stats: BackendStats::default(),
        })
    }

    /// Tear down the backend. Consuming `self` makes any later operation a
    /// compile error.
    pub fn close(self) {
        drop(self.env);
    }

    pub fn stats(&self) -> &BackendStats {
        &self.stats
    }

    /// Number of entries currently stored.
    pub fn entry_count(&self) -> StorageResult<u64> {
        let rtxn = self.env.read_txn().map_err(txn_err)?;
        self.db.len(&rtxn).map_err(txn_err)
    }
}

#[async_trait]
impl StorageBackend for LmdbStorageBackend {
    async fn save(
        &self,
        tab_id: TabId,
        data_type_tag: &'static str,
        bytes: Vec<u8>,
    ) -> StorageResult<()> {
        let key = StorageKey::new(tab_id, data_type_tag).encode();

        let mut wtxn = self.env.write_txn().map_err(txn_err)?;
        self.db.put(&mut wtxn, &key, &bytes).map_err(txn_err)?;
        wtxn.commit().map_err(txn_err)?;

        tracing::debug!(key = %key, len = bytes.len(), "Saved tab data record");
        Ok(())
    }

    async fn restore(
        &self,
        tab_id: TabId,
        data_type_tag: &'static str,
    ) -> StorageResult<Option<Vec<u8>>> {
        let key = StorageKey::new(tab_id, data_type_tag).encode();

        let rtxn = self.env.read_txn().map_err(txn_err)?;
        match self.db.get(&rtxn, &key).map_err(txn_err)? {
            Some(bytes) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                Ok(Some(bytes.to_vec()))
            }
            None => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
        }
    }

    // restore_blocking deliberately left at the trait default: LMDB reads
    // are served through the async path only, and the sync variant fails
    // with SyncUnsupported.

    async fn delete(&self, tab_id: TabId, data_type_tag: &'static str) -> StorageResult<()> {
        let key = StorageKey::new(tab_id, data_type_tag).encode();

        let mut wtxn = self.env.write_txn().map_err(txn_err)?;
        self.db.delete(&mut wtxn, &key).map_err(txn_err)?;
        wtxn.commit().map_err(txn_err)?;
        Ok(())
    }
}
