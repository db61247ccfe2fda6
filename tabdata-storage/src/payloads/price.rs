//! Price-tracking payload plug-in.
//!
//! Owns the `"SPTD"` key namespace, the persisted byte form, and the
//! parsing of price fetch responses, applying the price-transition rules
//! from `tabdata_core::price` against the previously cached record.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use tabdata_core::{PriceTrackingRecord, StorageResult};

use crate::codec;
use crate::traits::PayloadType;

/// Dedicated tag for price-tracking data.
pub const PRICE_DATA_TYPE_TAG: &str = "SPTD";

/// Shape of the raw population response for price data.
///
/// The upstream wire format is the fetcher's concern; by the time bytes
/// reach this parser they are expected to be this JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceFetchResponse {
    pub price_micros: i64,
    #[serde(default)]
    pub product_image_url: Option<String>,
    #[serde(default)]
    pub product_title: Option<String>,
}

impl PayloadType for PriceTrackingRecord {
    fn data_type_tag() -> &'static str {
        PRICE_DATA_TYPE_TAG
    }

    fn time_to_live(&self) -> Duration {
        Duration::milliseconds(self.time_to_live_ms)
    }

    fn last_updated_at(&self) -> DateTime<Utc> {
        self.last_updated_at
    }

    fn to_bytes(&self) -> StorageResult<Vec<u8>> {
        codec::encode_record(self.last_updated_at, self, PRICE_DATA_TYPE_TAG)
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (last_updated_at, mut record): (_, PriceTrackingRecord) =
            codec::decode_record(bytes)?;
        record.last_updated_at = last_updated_at;
        Some(record)
    }

    fn from_response(
        bytes: &[u8],
        previous: Option<&Self>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let response: PriceFetchResponse = serde_json::from_slice(bytes).ok()?;
        Some(PriceTrackingRecord::from_transition(
            response.price_micros,
            response.product_image_url,
            response.product_title,
            previous,
            now,
        ))
    }
}
