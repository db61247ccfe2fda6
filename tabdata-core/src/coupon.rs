//! Coupon payload record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DurationMs, Timestamp};

/// Default time-to-live for coupon data: one hour.
pub const COUPON_TTL_MS: DurationMs = 60 * 60 * 1000;

fn epoch() -> Timestamp {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Persisted coupon data for a single tab.
///
/// Each successful fetch replaces the record wholesale; there is no
/// transition tracking. "Has a coupon" is a derived property over both
/// fields, not a storage-layer concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponRecord {
    pub coupon_name: Option<String>,
    pub promo_code: Option<String>,
    /// When this record was last successfully populated. Persisted as the
    /// codec's timestamp prefix, not as part of the JSON body.
    #[serde(skip, default = "epoch")]
    pub last_updated_at: Timestamp,
}

impl CouponRecord {
    pub fn new(
        coupon_name: Option<String>,
        promo_code: Option<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            coupon_name,
            promo_code,
            last_updated_at: now,
        }
    }

    /// True iff both the coupon name and the promo code are present and
    /// non-empty.
    pub fn has_coupon(&self) -> bool {
        matches!(&self.coupon_name, Some(n) if !n.is_empty())
            && matches!(&self.promo_code, Some(c) if !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_coupon_requires_both_fields() {
        let now = Utc::now();
        assert!(!CouponRecord::new(None, None, now).has_coupon());
        assert!(!CouponRecord::new(Some("10% off".into()), None, now).has_coupon());
        assert!(!CouponRecord::new(None, Some("SAVE10".into()), now).has_coupon());
        assert!(
            CouponRecord::new(Some("10% off".into()), Some("SAVE10".into()), now).has_coupon()
        );
    }

    #[test]
    fn test_empty_strings_do_not_count() {
        let now = Utc::now();
        assert!(!CouponRecord::new(Some(String::new()), Some("SAVE10".into()), now).has_coupon());
        assert!(!CouponRecord::new(Some("10% off".into()), Some(String::new()), now).has_coupon());
    }
}
