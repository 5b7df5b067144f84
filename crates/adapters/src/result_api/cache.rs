//! Short-lived cache of raw upstream payloads

use loterias_domain::{Clock, LotteryId};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use time::OffsetDateTime;

/// Cache key: a lottery plus a contest number, or "latest"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub lottery: LotteryId,
    pub contest: Option<u32>,
}

impl CacheKey {
    pub fn new(lottery: LotteryId, contest: Option<u32>) -> Self {
        Self { lottery, contest }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.contest {
            Some(contest) => write!(f, "{}:{}", self.lottery, contest),
            None => write!(f, "{}:latest", self.lottery),
        }
    }
}

struct CacheEntry {
    payload: Value,
    expires_at: OffsetDateTime,
}

/// In-memory payload cache with a fixed TTL and an injected clock.
///
/// Concurrent misses on one key may both fetch; the last insert wins.
pub struct ResponseCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<CacheKey, CacheEntry>>,
}

impl ResponseCache {
    /// A zero `ttl` disables caching
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Unexpired payload for `key`
    pub fn get(&self, key: &CacheKey) -> Option<Value> {
        let now = self.clock.now();
        let entries = self.entries.read().ok()?;
        entries
            .get(key)
            .filter(|entry| entry.expires_at > now)
            .map(|entry| entry.payload.clone())
    }

    /// Store `payload` until `now + ttl`; expired entries are dropped on the way
    pub fn insert(&self, key: CacheKey, payload: Value) {
        if self.ttl.is_zero() {
            return;
        }
        let now = self.clock.now();
        let expires_at = now + self.ttl;
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|_, entry| entry.expires_at > now);
            entries.insert(
                key,
                CacheEntry {
                    payload,
                    expires_at,
                },
            );
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Clock that only moves when told to
#[cfg(test)]
pub(crate) struct ManualClock {
    now: std::sync::Mutex<OffsetDateTime>,
}

#[cfg(test)]
impl ManualClock {
    pub(crate) fn new() -> Self {
        Self {
            now: std::sync::Mutex::new(OffsetDateTime::UNIX_EPOCH),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_expires_after_ttl() {
        let clock = Arc::new(ManualClock::new());
        let cache = ResponseCache::new(Duration::from_secs(60), clock.clone());
        let key = CacheKey::new(LotteryId::MegaSena, None);

        cache.insert(key, json!({"concurso": 1}));
        clock.advance(Duration::from_secs(59));
        assert_eq!(cache.get(&key), Some(json!({"concurso": 1})));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get(&key), None);
    }

    #[test]
    fn test_expired_entries_are_evicted_on_insert() {
        let clock = Arc::new(ManualClock::new());
        let cache = ResponseCache::new(Duration::from_secs(60), clock.clone());

        for contest in 1..=5 {
            cache.insert(CacheKey::new(LotteryId::MegaSena, Some(contest)), json!({}));
        }
        assert_eq!(cache.len(), 5);

        clock.advance(Duration::from_secs(61));
        cache.insert(CacheKey::new(LotteryId::Quina, None), json!({"concurso": 6400}));

        assert_eq!(cache.len(), 1);
        assert!(cache.get(&CacheKey::new(LotteryId::Quina, None)).is_some());
    }

    #[test]
    fn test_keys_distinguish_latest_and_contest() {
        let cache = ResponseCache::new(Duration::from_secs(60), Arc::new(ManualClock::new()));
        cache.insert(CacheKey::new(LotteryId::Quina, Some(10)), json!({"concurso": 10}));

        assert!(cache.get(&CacheKey::new(LotteryId::Quina, None)).is_none());
        assert!(cache.get(&CacheKey::new(LotteryId::MegaSena, Some(10))).is_none());
        assert_eq!(CacheKey::new(LotteryId::Quina, None).to_string(), "quina:latest");
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = ResponseCache::new(Duration::ZERO, Arc::new(ManualClock::new()));
        let key = CacheKey::new(LotteryId::Lotofacil, None);
        cache.insert(key, json!({}));
        assert!(cache.get(&key).is_none());
    }
}
