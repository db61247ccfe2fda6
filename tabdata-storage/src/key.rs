//! Tab-scoped storage key.
//!
//! Every stored value is addressed by a `(tab id, data type tag)` pair, and
//! at most one value exists per key at any time. Keys can only be built
//! through [`StorageKey::new`], so a payload type cannot accidentally read
//! another type's namespace: the tag is part of the key by construction.

use tabdata_core::TabId;

/// Separator between the tab id and the data type tag in the encoded form.
const SEPARATOR: char = '-';

/// A storage key scoped to one tab and one payload type.
///
/// # Encoded Format
///
/// `"{tab_id}-{data_type_tag}"`, e.g. `"42-SPTD"`. The decimal tab id never
/// contains the separator, so splitting on the first `-` is unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey {
    tab_id: TabId,
    data_type_tag: &'static str,
}

impl StorageKey {
    pub fn new(tab_id: TabId, data_type_tag: &'static str) -> Self {
        Self {
            tab_id,
            data_type_tag,
        }
    }

    pub fn tab_id(&self) -> TabId {
        self.tab_id
    }

    pub fn data_type_tag(&self) -> &'static str {
        self.data_type_tag
    }

    /// Encode to the backend's UTF-8 key string.
    pub fn encode(&self) -> String {
        format!("{}{}{}", self.tab_id, SEPARATOR, self.data_type_tag)
    }

    /// Split an encoded key back into its components.
    ///
    /// Returns `None` for malformed keys. The tag comes back as an owned
    /// string since arbitrary stored keys are not tied to compile-time tag
    /// constants.
    pub fn decode(encoded: &str) -> Option<(TabId, String)> {
        let (id, tag) = encoded.split_once(SEPARATOR)?;
        if tag.is_empty() {
            return None;
        }
        let tab_id = id.parse::<TabId>().ok()?;
        Some((tab_id, tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_format() {
        let key = StorageKey::new(42, "SPTD");
        assert_eq!(key.encode(), "42-SPTD");
    }

    #[test]
    fn test_decode_round_trip() {
        let key = StorageKey::new(7, "COPTD");
        let (tab_id, tag) = StorageKey::decode(&key.encode()).expect("decode should succeed");
        assert_eq!(tab_id, 7);
        assert_eq!(tag, "COPTD");
    }

    #[test]
    fn test_decode_rejects_malformed_keys() {
        assert!(StorageKey::decode("").is_none());
        assert!(StorageKey::decode("42").is_none());
        assert!(StorageKey::decode("42-").is_none());
        assert!(StorageKey::decode("notanumber-SPTD").is_none());
    }

    #[test]
    fn test_distinct_tags_produce_distinct_keys() {
        assert_ne!(
            StorageKey::new(1, "SPTD").encode(),
            StorageKey::new(1, "COPTD").encode()
        );
    }
}
