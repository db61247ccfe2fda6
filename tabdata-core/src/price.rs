//! Price-tracking payload record and price-drop derivation.
//!
//! A record holds the most recently fetched price for a tab's product page
//! together with the previous price observed before the last change. The
//! price-drop test is a derived property, recomputed on demand and never
//! stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{DurationMs, Timestamp};

/// Sentinel for "no price known" in micro-units.
pub const NO_PRICE_KNOWN: i64 = -1;

/// Sentinel for "no price transition observed yet", in epoch millis.
pub const NO_TRANSITIONS_OCCURRED: i64 = -1;

/// Micro-units per currency unit.
const MICROS_PER_UNIT: i64 = 1_000_000;

/// Default time-to-live for price data: one hour.
pub const PRICE_TTL_MS: DurationMs = 60 * 60 * 1000;

fn epoch() -> Timestamp {
    DateTime::<Utc>::UNIX_EPOCH
}

/// Persisted price data for a single tab.
///
/// `price_micros` and `previous_price_micros` use [`NO_PRICE_KNOWN`] when
/// unknown. `last_price_change_at_ms` stays [`NO_TRANSITIONS_OCCURRED`]
/// until the first observed change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTrackingRecord {
    pub price_micros: i64,
    pub previous_price_micros: i64,
    pub last_price_change_at_ms: i64,
    pub time_to_live_ms: DurationMs,
    pub product_image_url: Option<String>,
    pub product_title: Option<String>,
    /// When this record was last successfully populated. Persisted as the
    /// codec's timestamp prefix, not as part of the JSON body.
    #[serde(skip, default = "epoch")]
    pub last_updated_at: Timestamp,
}

impl PriceTrackingRecord {
    /// Build a record from a freshly fetched price, applying the transition
    /// rules against the previously cached record:
    ///
    /// - both prices known and different: record the old price as previous
    ///   and stamp the change time
    /// - otherwise, with a previous record: carry its transition state
    ///   forward unchanged
    /// - no previous record: no transition has occurred
    pub fn from_transition(
        price_micros: i64,
        product_image_url: Option<String>,
        product_title: Option<String>,
        previous: Option<&PriceTrackingRecord>,
        now: Timestamp,
    ) -> Self {
        let (previous_price_micros, last_price_change_at_ms) = match previous {
            Some(prev)
                if prev.price_micros != NO_PRICE_KNOWN
                    && price_micros != NO_PRICE_KNOWN
                    && price_micros != prev.price_micros =>
            {
                (prev.price_micros, now.timestamp_millis())
            }
            Some(prev) => (prev.previous_price_micros, prev.last_price_change_at_ms),
            None => (NO_PRICE_KNOWN, NO_TRANSITIONS_OCCURRED),
        };

        Self {
            price_micros,
            previous_price_micros,
            last_price_change_at_ms,
            time_to_live_ms: PRICE_TTL_MS,
            product_image_url,
            product_title,
            last_updated_at: now,
        }
    }

    /// Whether a price drop exists: both prices known and the current price
    /// is strictly below the previous one.
    pub fn has_price_drop(&self) -> bool {
        self.price_micros != NO_PRICE_KNOWN
            && self.previous_price_micros != NO_PRICE_KNOWN
            && self.price_micros < self.previous_price_micros
    }

    /// Derive the formatted price drop, if one exists.
    pub fn price_drop(&self) -> Option<PriceDrop> {
        if !self.has_price_drop() {
            return None;
        }
        Some(PriceDrop {
            integer_price: format_micros(self.price_micros),
            previous_integer_price: format_micros(self.previous_price_micros),
        })
    }

    /// Whether both the product image URL and title are present and
    /// non-empty. A drop without them is not surfaced to notification
    /// consumers.
    pub fn has_product_metadata(&self) -> bool {
        matches!(&self.product_image_url, Some(u) if !u.is_empty())
            && matches!(&self.product_title, Some(t) if !t.is_empty())
    }
}

/// A detected price drop, formatted for display.
///
/// Prices are rounded half-up to whole currency units. Negative or zero
/// micro amounts are undefined input for this formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceDrop {
    pub integer_price: String,
    pub previous_integer_price: String,
}

/// Locale-invariant currency-unit rounding of a micro amount, half-up.
fn format_micros(micros: i64) -> String {
    format!("${}", (micros + MICROS_PER_UNIT / 2) / MICROS_PER_UNIT)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(price: i64, previous: i64) -> PriceTrackingRecord {
        PriceTrackingRecord {
            price_micros: price,
            previous_price_micros: previous,
            last_price_change_at_ms: NO_TRANSITIONS_OCCURRED,
            time_to_live_ms: PRICE_TTL_MS,
            product_image_url: None,
            product_title: None,
            last_updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_first_population_has_no_transition() {
        let rec =
            PriceTrackingRecord::from_transition(100_000_000, None, None, None, Utc::now());
        assert_eq!(rec.price_micros, 100_000_000);
        assert_eq!(rec.previous_price_micros, NO_PRICE_KNOWN);
        assert_eq!(rec.last_price_change_at_ms, NO_TRANSITIONS_OCCURRED);
        assert!(!rec.has_price_drop());
    }

    #[test]
    fn test_price_change_records_previous_and_timestamp() {
        let now = Utc::now();
        let first =
            PriceTrackingRecord::from_transition(100_000_000, None, None, None, now);
        let second =
            PriceTrackingRecord::from_transition(70_000_000, None, None, Some(&first), now);

        assert_eq!(second.price_micros, 70_000_000);
        assert_eq!(second.previous_price_micros, 100_000_000);
        assert_eq!(second.last_price_change_at_ms, now.timestamp_millis());
        assert!(second.has_price_drop());
    }

    #[test]
    fn test_unchanged_price_carries_transition_state_forward() {
        let now = Utc::now();
        let first =
            PriceTrackingRecord::from_transition(100_000_000, None, None, None, now);
        let second =
            PriceTrackingRecord::from_transition(70_000_000, None, None, Some(&first), now);
        let later = now + chrono::Duration::minutes(30);
        let third =
            PriceTrackingRecord::from_transition(70_000_000, None, None, Some(&second), later);

        assert_eq!(third.previous_price_micros, 100_000_000);
        assert_eq!(third.last_price_change_at_ms, now.timestamp_millis());
        assert!(third.has_price_drop());
    }

    #[test]
    fn test_unknown_price_does_not_count_as_transition() {
        let now = Utc::now();
        let first =
            PriceTrackingRecord::from_transition(100_000_000, None, None, None, now);
        let second = PriceTrackingRecord::from_transition(
            NO_PRICE_KNOWN,
            None,
            None,
            Some(&first),
            now,
        );

        assert_eq!(second.previous_price_micros, NO_PRICE_KNOWN);
        assert_eq!(second.last_price_change_at_ms, NO_TRANSITIONS_OCCURRED);
        assert!(!second.has_price_drop());
    }

    #[test]
    fn test_price_increase_is_not_a_drop() {
        let now = Utc::now();
        let first = PriceTrackingRecord::from_transition(70_000_000, None, None, None, now);
        let second =
            PriceTrackingRecord::from_transition(100_000_000, None, None, Some(&first), now);

        assert_eq!(second.previous_price_micros, 70_000_000);
        assert!(!second.has_price_drop());
        assert!(second.price_drop().is_none());
    }

    #[test]
    fn test_price_drop_formatting_rounds_half_up() {
        let rec = record(70_000_000, 100_000_000);
        let drop = rec.price_drop().expect("drop should exist");
        assert_eq!(drop.integer_price, "$70");
        assert_eq!(drop.previous_integer_price, "$100");

        // 69.5 units rounds up to 70, 69.49… rounds down to 69.
        let drop = record(69_500_000, 100_000_000).price_drop().unwrap();
        assert_eq!(drop.integer_price, "$70");
        let drop = record(69_499_999, 100_000_000).price_drop().unwrap();
        assert_eq!(drop.integer_price, "$69");
    }

    #[test]
    fn test_no_drop_when_either_price_unknown() {
        assert!(record(NO_PRICE_KNOWN, 100_000_000).price_drop().is_none());
        assert!(record(70_000_000, NO_PRICE_KNOWN).price_drop().is_none());
    }

    #[test]
    fn test_product_metadata_completeness() {
        let mut rec = record(70_000_000, 100_000_000);
        assert!(!rec.has_product_metadata());

        rec.product_image_url = Some("https://img.example/p.png".into());
        assert!(!rec.has_product_metadata());

        rec.product_title = Some(String::new());
        assert!(!rec.has_product_metadata());

        rec.product_title = Some("Widget".into());
        assert!(rec.has_product_metadata());
    }
}
