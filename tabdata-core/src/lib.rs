//! TABDATA Core - Data Types
//!
//! Pure data structures and derived-value algorithms for the tab-scoped
//! persistent data cache. No I/O lives here; the storage backends and the
//! cache engine are in `tabdata-storage`.

pub mod coupon;
pub mod error;
pub mod price;
pub mod profile;
pub mod tab;

pub use coupon::CouponRecord;
pub use error::{FetchError, StorageError, StorageResult};
pub use price::{
    PriceDrop, PriceTrackingRecord, NO_PRICE_KNOWN, NO_TRANSITIONS_OCCURRED, PRICE_TTL_MS,
};
pub use profile::{Profile, ProfileId};
pub use tab::{Tab, TabId};

use chrono::{DateTime, Utc};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;

/// Duration in milliseconds for TTL values.
pub type DurationMs = i64;
