//! Negative cache: short-term memory of identities recently confirmed
//! absent, so repeated lookups do not hammer the provider backend.

use identra_core::LookupKind;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct NcacheKey {
    kind: LookupKind,
    /// `None` marks a global entry, valid across all domains.
    domain: Option<String>,
    value: String,
}

/// Process-wide table of confirmed-absent identifiers with a TTL.
///
/// An unexpired entry means "known absent"; absence of an entry means
/// "unknown, must check". Expired entries are evicted lazily on check.
/// Mutations take a plain mutex; the critical sections never await.
#[derive(Debug)]
pub struct NegativeCache {
    ttl: Duration,
    entries: Mutex<HashMap<NcacheKey, Instant>>,
}

impl NegativeCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Records a confirmed-absent identifier with the default TTL.
    pub fn add(&self, kind: LookupKind, domain: Option<&str>, value: &str) {
        self.add_with_ttl(kind, domain, value, self.ttl);
    }

    /// Records a confirmed-absent identifier with an explicit TTL.
    pub fn add_with_ttl(&self, kind: LookupKind, domain: Option<&str>, value: &str, ttl: Duration) {
        if ttl.is_zero() {
            return;
        }
        let key = NcacheKey {
            kind,
            domain: domain.map(str::to_string),
            value: value.to_string(),
        };
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key, Instant::now() + ttl);
    }

    /// Whether the identifier is currently marked absent.
    pub fn check(&self, kind: LookupKind, domain: Option<&str>, value: &str) -> bool {
        let key = NcacheKey {
            kind,
            domain: domain.map(str::to_string),
            value: value.to_string(),
        };
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        match entries.get(&key) {
            Some(expiry) if *expiry > Instant::now() => true,
            Some(_) => {
                entries.remove(&key);
                false
            }
            None => false,
        }
    }

    /// Drops every entry, expired or not.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }

    /// Current entry count, counting not-yet-evicted expired entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOMAIN: &str = "corp.example.com";

    fn cache() -> NegativeCache {
        NegativeCache::new(Duration::from_secs(15))
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_then_check() {
        let ncache = cache();
        assert!(!ncache.check(LookupKind::UserByName, Some(DOMAIN), "ghost"));

        ncache.add(LookupKind::UserByName, Some(DOMAIN), "ghost");
        assert!(ncache.check(LookupKind::UserByName, Some(DOMAIN), "ghost"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires() {
        let ncache = cache();
        ncache.add(LookupKind::UserByName, Some(DOMAIN), "ghost");

        tokio::time::advance(Duration::from_secs(16)).await;
        assert!(!ncache.check(LookupKind::UserByName, Some(DOMAIN), "ghost"));
        // lazily evicted by the failed check
        assert!(ncache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_scopes_are_distinct() {
        let ncache = cache();
        ncache.add(LookupKind::UserById, None, "4242");

        assert!(ncache.check(LookupKind::UserById, None, "4242"));
        assert!(!ncache.check(LookupKind::UserById, Some(DOMAIN), "4242"));
        assert!(!ncache.check(LookupKind::GroupById, None, "4242"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_explicit_ttl() {
        let ncache = cache();
        ncache.add_with_ttl(
            LookupKind::UserByName,
            Some(DOMAIN),
            "ghost",
            Duration::from_secs(60),
        );

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(ncache.check(LookupKind::UserByName, Some(DOMAIN), "ghost"));

        tokio::time::advance(Duration::from_secs(31)).await;
        assert!(!ncache.check(LookupKind::UserByName, Some(DOMAIN), "ghost"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_never_stored() {
        let ncache = NegativeCache::new(Duration::ZERO);
        ncache.add(LookupKind::UserByName, Some(DOMAIN), "ghost");
        assert!(ncache.is_empty());
        assert!(!ncache.check(LookupKind::UserByName, Some(DOMAIN), "ghost"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear() {
        let ncache = cache();
        ncache.add(LookupKind::UserByName, Some(DOMAIN), "ghost");
        ncache.add(LookupKind::GroupByName, Some(DOMAIN), "phantom");
        assert_eq!(ncache.len(), 2);

        ncache.clear();
        assert!(ncache.is_empty());
    }
}
