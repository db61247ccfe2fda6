//! Tab handle consumed by the cache.
//!
//! The browser owns tab lifecycle; the cache never creates or destroys a
//! tab, it only reads its state. Clones share the destroyed flag, so a
//! handle captured before an await observes a destruction that happened
//! while the operation was in flight.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Stable numeric tab identifier, assigned by the browser.
pub type TabId = u32;

/// Shared handle to a browsing session unit.
#[derive(Debug, Clone)]
pub struct Tab {
    id: TabId,
    incognito: bool,
    url: String,
    destroyed: Arc<AtomicBool>,
}

impl Tab {
    /// Create a regular (non-incognito) tab handle.
    pub fn new(id: TabId, url: impl Into<String>) -> Self {
        Self {
            id,
            incognito: false,
            url: url.into(),
            destroyed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create an incognito tab handle.
    pub fn new_incognito(id: TabId, url: impl Into<String>) -> Self {
        Self {
            incognito: true,
            ..Self::new(id, url)
        }
    }

    pub fn id(&self) -> TabId {
        self.id
    }

    pub fn is_incognito(&self) -> bool {
        self.incognito
    }

    /// Whether the owning browser has destroyed this tab.
    ///
    /// Must be re-checked at every asynchronous resumption point before
    /// touching cache state.
    pub fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::Acquire)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Mark the tab as destroyed. Called by the owning browser.
    pub fn destroy(&self) {
        self.destroyed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroyed_flag_shared_across_clones() {
        let tab = Tab::new(7, "https://example.com/product");
        let clone = tab.clone();
        assert!(!clone.is_destroyed());

        tab.destroy();
        assert!(clone.is_destroyed());
    }

    #[test]
    fn test_incognito_constructor() {
        let tab = Tab::new_incognito(3, "https://example.com");
        assert!(tab.is_incognito());
        assert_eq!(tab.id(), 3);
        assert!(!Tab::new(3, "https://example.com").is_incognito());
    }
}
