//! Price-drop notification registry.
//!
//! One instance per browsing profile, holding the set of tabs currently
//! believed to have an eligible price drop. Population updates the set
//! through the engine's listener seam; UI surfaces read it. The registry
//! never triggers a fetch itself.

use std::collections::HashSet;
use std::sync::RwLock;

use tabdata_core::{PriceTrackingRecord, Tab, TabId};

use crate::traits::PayloadUpdateListener;

/// Profile-scoped set of tabs with an eligible price drop.
#[derive(Debug, Default)]
pub struct PriceDropNotificationService {
    tabs: RwLock<HashSet<TabId>>,
}

impl PriceDropNotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotently add or remove a tab from the price-drop set.
    pub fn notify(&self, tab: &Tab, has_drop: bool) {
        if let Ok(mut tabs) = self.tabs.write() {
            if has_drop {
                tabs.insert(tab.id());
            } else {
                tabs.remove(&tab.id());
            }
        }
    }

    /// Snapshot of the tabs currently believed to have a price drop.
    pub fn tabs_with_price_drop(&self) -> HashSet<TabId> {
        self.tabs.read().map(|t| t.clone()).unwrap_or_default()
    }

    /// Whether a record qualifies for external notification: a detected
    /// price drop plus complete product metadata (image URL and title).
    pub fn is_eligible(record: &PriceTrackingRecord) -> bool {
        record.has_price_drop() && record.has_product_metadata()
    }
}

impl PayloadUpdateListener<PriceTrackingRecord> for PriceDropNotificationService {
    fn on_payload_updated(
        &self,
        tab: &Tab,
        _previous: Option<&PriceTrackingRecord>,
        current: &PriceTrackingRecord,
    ) {
        self.notify(tab, Self::is_eligible(current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tabdata_core::{NO_TRANSITIONS_OCCURRED, PRICE_TTL_MS};

    fn record_with_drop(image: Option<&str>, title: Option<&str>) -> PriceTrackingRecord {
        PriceTrackingRecord {
            price_micros: 70_000_000,
            previous_price_micros: 100_000_000,
            last_price_change_at_ms: NO_TRANSITIONS_OCCURRED,
            time_to_live_ms: PRICE_TTL_MS,
            product_image_url: image.map(String::from),
            product_title: title.map(String::from),
            last_updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_notify_is_idempotent() {
        let service = PriceDropNotificationService::new();
        let tab = Tab::new(1, "https://shop.example");

        service.notify(&tab, true);
        service.notify(&tab, true);
        assert_eq!(service.tabs_with_price_drop().len(), 1);

        service.notify(&tab, false);
        service.notify(&tab, false);
        assert!(service.tabs_with_price_drop().is_empty());
    }

    #[test]
    fn test_eligibility_requires_drop_and_metadata() {
        assert!(PriceDropNotificationService::is_eligible(&record_with_drop(
            Some("https://img.example/p.png"),
            Some("Widget"),
        )));
        assert!(!PriceDropNotificationService::is_eligible(&record_with_drop(
            None,
            Some("Widget"),
        )));
        assert!(!PriceDropNotificationService::is_eligible(&record_with_drop(
            Some("https://img.example/p.png"),
            None,
        )));

        let mut no_drop = record_with_drop(Some("https://img.example/p.png"), Some("Widget"));
        no_drop.price_micros = no_drop.previous_price_micros;
        assert!(!PriceDropNotificationService::is_eligible(&no_drop));
    }

    #[test]
    fn test_listener_updates_the_set() {
        let service = PriceDropNotificationService::new();
        let tab = Tab::new(4, "https://shop.example");

        let eligible = record_with_drop(Some("https://img.example/p.png"), Some("Widget"));
        service.on_payload_updated(&tab, None, &eligible);
        assert!(service.tabs_with_price_drop().contains(&4));

        // A repopulation without a drop clears the tab again.
        let mut recovered = eligible.clone();
        recovered.price_micros = recovered.previous_price_micros;
        service.on_payload_updated(&tab, Some(&eligible), &recovered);
        assert!(!service.tabs_with_price_drop().contains(&4));
    }
}
