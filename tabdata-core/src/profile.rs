//! Browsing profile handle.
//!
//! Storage backends and notification services are scoped to a profile and
//! must never be shared across profiles. Off-the-record (incognito)
//! profiles never receive durable storage.

use uuid::Uuid;

/// Unique profile identifier (UUIDv7, timestamp-sortable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileId(Uuid);

impl ProfileId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ProfileId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ProfileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A browsing profile, owned by the surrounding browser application.
#[derive(Debug, Clone)]
pub struct Profile {
    id: ProfileId,
    off_the_record: bool,
}

impl Profile {
    /// Create a regular profile.
    pub fn new() -> Self {
        Self {
            id: ProfileId::new(),
            off_the_record: false,
        }
    }

    /// Create an off-the-record (incognito) profile.
    pub fn new_off_the_record() -> Self {
        Self {
            id: ProfileId::new(),
            off_the_record: true,
        }
    }

    pub fn id(&self) -> ProfileId {
        self.id
    }

    pub fn is_off_the_record(&self) -> bool {
        self.off_the_record
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_ids_are_unique() {
        assert_ne!(Profile::new().id(), Profile::new().id());
    }

    #[test]
    fn test_off_the_record_flag() {
        assert!(Profile::new_off_the_record().is_off_the_record());
        assert!(!Profile::new().is_off_the_record());
    }
}
