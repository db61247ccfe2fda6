//! Coupon payload plug-in.
//!
//! Owns the `"COPTD"` key namespace. Unlike price tracking there is no
//! transition logic: every successful fetch replaces the record wholesale.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use tabdata_core::coupon::COUPON_TTL_MS;
use tabdata_core::{CouponRecord, StorageResult};

use crate::codec;
use crate::traits::PayloadType;

/// Dedicated tag for coupon data.
pub const COUPON_DATA_TYPE_TAG: &str = "COPTD";

/// Shape of the raw population response for coupon data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CouponFetchResponse {
    #[serde(default)]
    pub coupon_name: Option<String>,
    #[serde(default)]
    pub promo_code: Option<String>,
}

impl PayloadType for CouponRecord {
    fn data_type_tag() -> &'static str {
        COUPON_DATA_TYPE_TAG
    }

    fn time_to_live(&self) -> Duration {
        Duration::milliseconds(COUPON_TTL_MS)
    }

    fn last_updated_at(&self) -> DateTime<Utc> {
        self.last_updated_at
    }

    fn to_bytes(&self) -> StorageResult<Vec<u8>> {
        codec::encode_record(self.last_updated_at, self, COUPON_DATA_TYPE_TAG)
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        let (last_updated_at, mut record): (_, CouponRecord) = codec::decode_record(bytes)?;
        record.last_updated_at = last_updated_at;
        Some(record)
    }

    fn from_response(
        bytes: &[u8],
        _previous: Option<&Self>,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let response: CouponFetchResponse = serde_json::from_slice(bytes).ok()?;
        Some(CouponRecord::new(
            response.coupon_name,
            response.promo_code,
            now,
        ))
    }
}
