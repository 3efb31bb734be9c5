//! Run-scoped visited set with atomic check-and-insert

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

/// Thread-safe set of URLs that have been claimed for fetching
///
/// The only mutating operation is [`VisitedSet::try_mark`], which checks and
/// inserts under one lock acquisition. URLs are never removed.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    /// Creates an empty visited set
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for the caller
    ///
    /// Returns `true` if the URL was not yet present (it is now, and the
    /// caller should fetch it). Returns `false` if another task already
    /// claimed it.
    ///
    /// # Example
    ///
    /// ```
    /// use depth_crawl::state::VisitedSet;
    ///
    /// let visited = VisitedSet::new();
    /// assert!(visited.try_mark("https://example.com/"));
    /// assert!(!visited.try_mark("https://example.com/"));
    /// ```
    pub fn try_mark(&self, url: &str) -> bool {
        let mut urls = self.lock();
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    /// Returns true if `url` has been claimed
    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    /// Number of claimed URLs
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns a sorted copy of every claimed URL
    pub fn snapshot(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.lock().iter().cloned().collect();
        urls.sort();
        urls
    }

    // A panic while holding the lock cannot leave the set half-updated, so a
    // poisoned guard is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.urls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
