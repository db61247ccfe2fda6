//! Error types for tabdata operations.
//!
//! The cache's external contract is best effort: ineligible tabs,
//! undecodable records, and failed populations all surface to callers as an
//! absence of data, never as errors. The enums here cover the storage and
//! fetch layers underneath, where the failure reason still matters for
//! logging and for the few fatal lifecycle cases.

use thiserror::Error;

/// Storage layer errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("Backend operation failed: {reason}")]
    Backend { reason: String },

    #[error("Serialization failed for {data_type_tag}: {reason}")]
    Serialization {
        data_type_tag: &'static str,
        reason: String,
    },

    #[error("Synchronous restore is not supported by this backend")]
    SyncUnsupported,

    #[error("Durable storage refused for off-the-record profile {profile_id}")]
    OffTheRecordProfile { profile_id: String },

    #[error("I/O error: {reason}")]
    Io { reason: String },
}

/// Population (network fetch) errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("Fetch failed for tab {tab_id}: {reason}")]
    RequestFailed { tab_id: u32, reason: String },

    #[error("Fetch cancelled: tab {tab_id} was destroyed")]
    TabDestroyed { tab_id: u32 },
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io {
            reason: e.to_string(),
        }
    }
}
