//! Profile-keyed service ownership.
//!
//! Storage backends and the price-drop service are shared mutable state
//! scoped to one browsing profile. Instead of per-profile singletons, a
//! [`ServiceRegistry`] owned by the application context maps profiles to
//! their services with explicit init and teardown.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use tabdata_core::{Profile, ProfileId, StorageResult};

use crate::in_memory::InMemoryStorageBackend;
use crate::lmdb_backend::LmdbStorageBackend;
use crate::observer::PriceDropNotificationService;

/// The cache services belonging to one profile.
///
/// Off-the-record profiles carry no durable backend; their tabs use the
/// volatile backend only. A missing durable backend is never silently
/// replaced by the volatile one for a regular profile, since that would
/// blur the durability contract the payload was configured with.
pub struct ProfileServices {
    profile: Profile,
    durable: Option<Arc<LmdbStorageBackend>>,
    volatile: Arc<InMemoryStorageBackend>,
    price_drops: Arc<PriceDropNotificationService>,
}

impl ProfileServices {
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// The profile's durable backend, absent for off-the-record profiles
    /// and for profiles initialized without a storage directory.
    pub fn durable(&self) -> Option<Arc<LmdbStorageBackend>> {
        self.durable.clone()
    }

    pub fn volatile(&self) -> Arc<InMemoryStorageBackend> {
        Arc::clone(&self.volatile)
    }

    pub fn price_drops(&self) -> Arc<PriceDropNotificationService> {
        Arc::clone(&self.price_drops)
    }
}

/// Application-owned map from profiles to their cache services.
#[derive(Default)]
pub struct ServiceRegistry {
    profiles: RwLock<HashMap<ProfileId, Arc<ProfileServices>>>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initialize services for a profile, idempotently.
    ///
    /// `storage_dir` is where the durable LMDB store lives; pass `None`
    /// for a profile that should run without durable caching. For
    /// off-the-record profiles the durable backend is never created,
    /// regardless of `storage_dir`.
    ///
    /// A durable-store open failure is propagated: the profile then has no
    /// services registered and the caller decides whether to retry or to
    /// re-init without durable caching.
    pub fn init_profile(
        &self,
        profile: &Profile,
        storage_dir: Option<&Path>,
        max_size_mb: usize,
    ) -> StorageResult<Arc<ProfileServices>> {
        if let Some(existing) = self.get(profile.id()) {
            return Ok(existing);
        }

        let durable = match (profile.is_off_the_record(), storage_dir) {
            (false, Some(dir)) => Some(Arc::new(LmdbStorageBackend::open(
                profile,
                dir,
                max_size_mb,
            )?)),
            _ => None,
        };

        let services = Arc::new(ProfileServices {
            profile: profile.clone(),
            durable,
            volatile: Arc::new(InMemoryStorageBackend::new()),
            price_drops: Arc::new(PriceDropNotificationService::new()),
        });

        self.profiles
            .write()
            .expect("profile registry lock poisoned")
            .insert(profile.id(), Arc::clone(&services));

        tracing::debug!(profile_id = %profile.id(), "Initialized profile cache services");
        Ok(services)
    }

    pub fn get(&self, profile_id: ProfileId) -> Option<Arc<ProfileServices>> {
        self.profiles
            .read()
            .expect("profile registry lock poisoned")
            .get(&profile_id)
            .cloned()
    }

    /// Tear down a profile's services. The durable environment closes when
    /// the last outstanding handle drops.
    pub fn teardown_profile(&self, profile_id: ProfileId) {
        let removed = self
            .profiles
            .write()
            .expect("profile registry lock poisoned")
            .remove(&profile_id);
        if removed.is_some() {
            tracing::debug!(profile_id = %profile_id, "Tore down profile cache services");
        }
    }
}
