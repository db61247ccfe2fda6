//! Concrete payload types plugged into the cache engine.

pub mod coupon;
pub mod price;

pub use coupon::CouponFetchResponse;
pub use price::PriceFetchResponse;
