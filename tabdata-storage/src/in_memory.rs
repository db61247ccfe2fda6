//! Volatile in-memory storage backend.
//!
//! Process-lifetime map used for incognito tabs and ephemeral payload
//! types. Nothing survives a restart. Unlike the durable backend, this one
//! can serve reads synchronously, so `restore_blocking` is implemented.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tabdata_core::{StorageError, StorageResult, TabId};

use crate::key::StorageKey;
use crate::traits::StorageBackend;

/// In-memory storage backend.
#[derive(Debug, Default)]
pub struct InMemoryStorageBackend {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemoryStorageBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StorageBackend for InMemoryStorageBackend {
    async fn save(
        &self,
        tab_id: TabId,
        data_type_tag: &'static str,
        bytes: Vec<u8>,
    ) -> StorageResult<()> {
        let key = StorageKey::new(tab_id, data_type_tag).encode();
        self.entries
            .write()
            .map_err(|_| StorageError::Backend {
                reason: "storage lock poisoned".into(),
            })?
            .insert(key, bytes);
        Ok(())
    }

    async fn restore(
        &self,
        tab_id: TabId,
        data_type_tag: &'static str,
    ) -> StorageResult<Option<Vec<u8>>> {
        self.restore_blocking(tab_id, data_type_tag)
    }

    fn restore_blocking(
        &self,
        tab_id: TabId,
        data_type_tag: &'static str,
    ) -> StorageResult<Option<Vec<u8>>> {
        let key = StorageKey::new(tab_id, data_type_tag).encode();
        Ok(self
            .entries
            .read()
            .map_err(|_| StorageError::Backend {
                reason: "storage lock poisoned".into(),
            })?
            .get(&key)
            .cloned())
    }

    async fn delete(&self, tab_id: TabId, data_type_tag: &'static str) -> StorageResult<()> {
        let key = StorageKey::new(tab_id, data_type_tag).encode();
        self.entries
            .write()
            .map_err(|_| StorageError::Backend {
                reason: "storage lock poisoned".into(),
            })?
            .remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_restore_delete() {
        let backend = InMemoryStorageBackend::new();

        backend.save(1, "COPTD", b"coupon".to_vec()).await.unwrap();
        assert_eq!(
            backend.restore(1, "COPTD").await.unwrap().as_deref(),
            Some(b"coupon".as_ref())
        );

        backend.delete(1, "COPTD").await.unwrap();
        assert!(backend.restore(1, "COPTD").await.unwrap().is_none());
    }

    #[test]
    fn test_blocking_restore_is_supported() {
        let backend = InMemoryStorageBackend::new();
        assert_eq!(backend.restore_blocking(1, "COPTD").unwrap(), None);
    }

    #[tokio::test]
    async fn test_keys_are_tab_scoped() {
        let backend = InMemoryStorageBackend::new();

        backend.save(1, "COPTD", b"one".to_vec()).await.unwrap();
        backend.save(2, "COPTD", b"two".to_vec()).await.unwrap();

        assert_eq!(
            backend.restore(1, "COPTD").await.unwrap().as_deref(),
            Some(b"one".as_ref())
        );
        assert_eq!(
            backend.restore(2, "COPTD").await.unwrap().as_deref(),
            Some(b"two".as_ref())
        );
        assert_eq!(backend.len(), 2);
    }
}
