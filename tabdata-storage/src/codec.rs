//! Persisted record framing.
//!
//! Stored values use the format `[last_updated_at millis: 8 bytes LE][json
//! body]`. Embedding the freshness timestamp in the serialized form makes
//! every payload self-describing across process restarts: the backend
//! stores opaque bytes and the payload type recovers both the domain
//! fields and the timestamp on its own.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use tabdata_core::{StorageError, StorageResult};

/// Byte length of the timestamp prefix.
const TIMESTAMP_LEN: usize = 8;

/// Encode a record body with its freshness timestamp prefix.
pub fn encode_record<T: Serialize>(
    last_updated_at: DateTime<Utc>,
    body: &T,
    data_type_tag: &'static str,
) -> StorageResult<Vec<u8>> {
    let body_bytes = serde_json::to_vec(body).map_err(|e| StorageError::Serialization {
        data_type_tag,
        reason: e.to_string(),
    })?;

    let mut bytes = Vec::with_capacity(TIMESTAMP_LEN + body_bytes.len());
    bytes.extend_from_slice(&last_updated_at.timestamp_millis().to_le_bytes());
    bytes.extend_from_slice(&body_bytes);
    Ok(bytes)
}

/// Decode a stored value back into its timestamp and body.
///
/// Any malformed input (short buffer, out-of-range timestamp, undecodable
/// body) yields `None`: a corrupt record is a cache miss, never a crash.
pub fn decode_record<T: DeserializeOwned>(bytes: &[u8]) -> Option<(DateTime<Utc>, T)> {
    if bytes.len() < TIMESTAMP_LEN {
        return None;
    }

    let timestamp_bytes: [u8; TIMESTAMP_LEN] = bytes[0..TIMESTAMP_LEN].try_into().ok()?;
    let last_updated_at = DateTime::from_timestamp_millis(i64::from_le_bytes(timestamp_bytes))?;

    let body: T = serde_json::from_slice(&bytes[TIMESTAMP_LEN..]).ok()?;
    Some((last_updated_at, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Body {
        value: i64,
        label: Option<String>,
    }

    #[test]
    fn test_round_trip() {
        let ts = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let body = Body {
            value: 42,
            label: Some("widget".into()),
        };

        let bytes = encode_record(ts, &body, "TEST").expect("encode should succeed");
        let (decoded_ts, decoded): (_, Body) =
            decode_record(&bytes).expect("decode should succeed");

        assert_eq!(decoded_ts, ts);
        assert_eq!(decoded, body);
    }

    #[test]
    fn test_corrupt_input_is_a_miss() {
        assert!(decode_record::<Body>(&[]).is_none());
        assert!(decode_record::<Body>(&[1, 2, 3]).is_none());

        // Valid prefix, garbage body.
        let mut bytes = 0i64.to_le_bytes().to_vec();
        bytes.extend_from_slice(b"not json");
        assert!(decode_record::<Body>(&bytes).is_none());
    }

    #[test]
    fn test_timestamp_prefix_is_little_endian_millis() {
        let ts = DateTime::from_timestamp_millis(1_000).unwrap();
        let bytes = encode_record(ts, &Body { value: 0, label: None }, "TEST").unwrap();
        assert_eq!(&bytes[0..8], &1_000i64.to_le_bytes());
    }
}
