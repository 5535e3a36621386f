//! Fixed-duration memoization of collaborator responses.
//!
//! Entries are keyed by the query parameters that produced them and expire purely by age.
//! When the cache is full, the entry that was set longest ago is evicted. Nothing here is
//! persisted; the cache lives as long as the process, and [`ResponseCaches::shared`] hands the
//! same caches to every run in the process that talks to the same endpoint.

use super::{RawVideoSearchHit, RawVideoStatistics, RemoteApiError, SearchOrder, SearchTarget, StatisticsById, VideoSource};
use chrono::{DateTime, TimeDelta, Utc};
use core::fmt::{Debug, Formatter};
use core::hash::Hash;
use core::time::Duration;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

const LOG_TARGET: &str = "     cache";

/// Default number of entries kept per cache.
pub const DEFAULT_CAPACITY: usize = 256;

struct Entry<V> {
    value: V,
    set_at: DateTime<Utc>,
    sequence: u64,
}

struct State<K, V> {
    entries: HashMap<K, Entry<V>>,
    next_sequence: u64,
}

/// An expiry map with a fixed time-to-live.
pub struct ResponseCache<K, V> {
    ttl: Duration,
    capacity: usize,
    state: Mutex<State<K, V>>,
}

impl<K, V> Debug for ResponseCache<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("ttl", &self.ttl)
            .field("capacity", &self.capacity)
            .field("len", &self.lock().entries.len())
            .finish()
    }
}

impl<K: Eq + Hash + Clone, V: Clone> ResponseCache<K, V> {
    #[must_use]
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            ttl,
            capacity: capacity.max(1),
            state: Mutex::new(State {
                entries: HashMap::new(),
                next_sequence: 0,
            }),
        }
    }

    /// Return a copy of the value for `key` if it was set less than one TTL before `now`.
    ///
    /// Expired entries are dropped on the way out.
    pub fn get(&self, key: &K, now: DateTime<Utc>) -> Option<V> {
        let mut state = self.lock();
        let entry = state.entries.get(key)?;

        let age = now.signed_duration_since(entry.set_at);

        // Clock skew: an entry from the future counts as fresh
        if age < TimeDelta::zero() {
            return Some(entry.value.clone());
        }

        let age = age.to_std().unwrap_or(Duration::MAX);
        if age < self.ttl {
            log::debug!(target: LOG_TARGET, "Cache hit (age: {}s)", age.as_secs());
            return Some(entry.value.clone());
        }

        log::debug!(target: LOG_TARGET, "Cache entry expired (age: {}s, TTL: {}s)", age.as_secs(), self.ttl.as_secs());
        let _ = state.entries.remove(key);
        None
    }

    /// Store `value` under `key`, evicting the least-recently-set entry when full.
    pub fn insert(&self, key: K, value: V, now: DateTime<Utc>) {
        let mut state = self.lock();

        if !state.entries.contains_key(&key)
            && state.entries.len() >= self.capacity
            && let Some(oldest) = state.entries.iter().min_by_key(|(_, e)| e.sequence).map(|(k, _)| k.clone())
        {
            let _ = state.entries.remove(&oldest);
            log::debug!(target: LOG_TARGET, "Evicted least-recently-set entry");
        }

        let sequence = state.next_sequence;
        state.next_sequence += 1;

        let _ = state.entries.insert(key, Entry { value, set_at: now, sequence });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> ResponseCache<K, V> {
    fn lock(&self) -> MutexGuard<'_, State<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

type SearchKey = (SearchTarget, u32, SearchOrder);

type Registry = HashMap<(String, Duration), Arc<ResponseCaches>>;

static SHARED: LazyLock<Mutex<Registry>> = LazyLock::new(|| Mutex::new(HashMap::new()));

/// Search and statistics caches, shareable between [`CachingSource`]s.
pub struct ResponseCaches {
    searches: ResponseCache<SearchKey, Vec<RawVideoSearchHit>>,
    statistics: ResponseCache<String, RawVideoStatistics>,
}

impl Debug for ResponseCaches {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResponseCaches")
            .field("searches", &self.searches)
            .field("statistics", &self.statistics)
            .finish()
    }
}

impl ResponseCaches {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            searches: ResponseCache::new(ttl, DEFAULT_CAPACITY),
            statistics: ResponseCache::new(ttl, DEFAULT_CAPACITY * 50),
        }
    }

    /// The process-wide caches for responses from `endpoint` kept for `ttl`.
    ///
    /// Every call with the same endpoint and TTL returns the same caches, so a later run
    /// reuses what an earlier one fetched.
    #[must_use]
    pub fn shared(endpoint: &str, ttl: Duration) -> Arc<Self> {
        let mut registry = SHARED.lock().unwrap_or_else(PoisonError::into_inner);
        let caches = registry.entry((endpoint.to_string(), ttl)).or_insert_with(|| {
            log::debug!(target: LOG_TARGET, "Creating response caches for {endpoint}");
            Arc::new(Self::new(ttl))
        });
        Arc::clone(caches)
    }
}

/// A [`VideoSource`] that memoizes another source's responses.
pub struct CachingSource<S> {
    inner: S,
    caches: Arc<ResponseCaches>,
    clock: fn() -> DateTime<Utc>,
}

impl<S: Debug> Debug for CachingSource<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CachingSource")
            .field("inner", &self.inner)
            .field("caches", &self.caches)
            .finish_non_exhaustive()
    }
}

impl<S: VideoSource> CachingSource<S> {
    /// Wrap `inner` with caches that other sources may also use.
    #[must_use]
    pub fn with_caches(inner: S, caches: Arc<ResponseCaches>) -> Self {
        Self {
            inner,
            caches,
            clock: Utc::now,
        }
    }

    #[cfg(test)]
    #[must_use]
    pub fn with_clock(inner: S, ttl: Duration, clock: fn() -> DateTime<Utc>) -> Self {
        Self {
            inner,
            caches: Arc::new(ResponseCaches::new(ttl)),
            clock,
        }
    }

    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: VideoSource> VideoSource for CachingSource<S> {
    async fn search_videos(
        &self,
        target: &SearchTarget,
        max_results: u32,
        order: SearchOrder,
    ) -> Result<Vec<RawVideoSearchHit>, RemoteApiError> {
        let key = (target.clone(), max_results, order);
        if let Some(hits) = self.caches.searches.get(&key, (self.clock)()) {
            log::info!(target: LOG_TARGET, "Using cached search results for {target}");
            return Ok(hits);
        }

        let hits = self.inner.search_videos(target, max_results, order).await?;
        self.caches.searches.insert(key, hits.clone(), (self.clock)());
        Ok(hits)
    }

    async fn get_statistics(&self, ids: &[String]) -> Result<StatisticsById, RemoteApiError> {
        let now = (self.clock)();
        let mut result = StatisticsById::with_capacity(ids.len());
        let mut missing = Vec::new();

        for id in ids {
            match self.caches.statistics.get(id, now) {
                Some(stats) => {
                    let _ = result.insert(id.clone(), stats);
                }
                None => missing.push(id.clone()),
            }
        }

        if !missing.is_empty() {
            let fetched = self.inner.get_statistics(&missing).await?;
            let now = (self.clock)();
            for (id, stats) in fetched {
                self.caches.statistics.insert(id.clone(), stats.clone(), now);
                let _ = result.insert(id, stats);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use core::sync::atomic::{AtomicU32, Ordering};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn test_get_fresh_entry() {
        let cache = ResponseCache::new(Duration::from_secs(1800), 4);
        cache.insert("k", 1, at(10, 0));
        assert_eq!(cache.get(&"k", at(10, 29)), Some(1));
    }

    #[test]
    fn test_get_expired_entry() {
        let cache = ResponseCache::new(Duration::from_secs(1800), 4);
        cache.insert("k", 1, at(10, 0));
        assert_eq!(cache.get(&"k", at(10, 30)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_future_entry_is_fresh() {
        let cache = ResponseCache::new(Duration::from_secs(60), 4);
        cache.insert("k", 1, at(12, 0));
        assert_eq!(cache.get(&"k", at(10, 0)), Some(1));
    }

    #[test]
    fn test_get_missing_key() {
        let cache: ResponseCache<&str, i32> = ResponseCache::new(Duration::from_secs(60), 4);
        assert_eq!(cache.get(&"nope", at(10, 0)), None);
    }

    #[test]
    fn test_evicts_least_recently_set() {
        let cache = ResponseCache::new(Duration::from_secs(3600), 2);
        cache.insert("a", 1, at(10, 0));
        cache.insert("b", 2, at(10, 1));

        // Re-setting "a" makes "b" the oldest
        cache.insert("a", 3, at(10, 2));
        cache.insert("c", 4, at(10, 3));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a", at(10, 4)), Some(3));
        assert_eq!(cache.get(&"b", at(10, 4)), None);
        assert_eq!(cache.get(&"c", at(10, 4)), Some(4));
    }

    #[test]
    fn test_overwrite_does_not_evict() {
        let cache = ResponseCache::new(Duration::from_secs(3600), 2);
        cache.insert("a", 1, at(10, 0));
        cache.insert("b", 2, at(10, 0));
        cache.insert("b", 5, at(10, 1));

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"a", at(10, 2)), Some(1));
        assert_eq!(cache.get(&"b", at(10, 2)), Some(5));
    }

    #[derive(Debug, Default)]
    struct CountingSource {
        searches: AtomicU32,
        lookups: AtomicU32,
    }

    impl VideoSource for CountingSource {
        async fn search_videos(
            &self,
            target: &SearchTarget,
            _max_results: u32,
            _order: SearchOrder,
        ) -> Result<Vec<RawVideoSearchHit>, RemoteApiError> {
            let _ = self.searches.fetch_add(1, Ordering::Relaxed);
            Ok(vec![RawVideoSearchHit {
                id: format!("{}-1", target.value()),
                title: "title".into(),
                channel: "channel".into(),
                published_at: "2024-01-01T00:00:00Z".into(),
                thumbnail_url: None,
            }])
        }

        async fn get_statistics(&self, ids: &[String]) -> Result<StatisticsById, RemoteApiError> {
            let _ = self.lookups.fetch_add(u32::try_from(ids.len()).unwrap_or(u32::MAX), Ordering::Relaxed);
            Ok(ids
                .iter()
                .map(|id| {
                    (
                        id.clone(),
                        RawVideoStatistics {
                            id: id.clone(),
                            view_count: Some(10),
                            ..RawVideoStatistics::default()
                        },
                    )
                })
                .collect())
        }
    }

    #[tokio::test]
    async fn test_caching_source_memoizes_searches_by_parameters() {
        let source = CachingSource::with_clock(CountingSource::default(), Duration::from_secs(1800), || at(10, 0));
        let rust = SearchTarget::Keyword("rust".into());

        let _ = source.search_videos(&rust, 30, SearchOrder::Relevance).await.unwrap();
        let _ = source.search_videos(&rust, 30, SearchOrder::Relevance).await.unwrap();
        assert_eq!(source.inner().searches.load(Ordering::Relaxed), 1);

        let _ = source.search_videos(&rust, 30, SearchOrder::Popular).await.unwrap();
        assert_eq!(source.inner().searches.load(Ordering::Relaxed), 2);
    }

    #[tokio::test]
    async fn test_caching_source_fetches_only_missing_statistics() {
        let source = CachingSource::with_clock(CountingSource::default(), Duration::from_secs(1800), || at(10, 0));

        let first = source.get_statistics(&["a".to_string(), "b".to_string()]).await.unwrap();
        assert_eq!(first.len(), 2);

        let second = source.get_statistics(&["b".to_string(), "c".to_string()]).await.unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second["c"].view_count, Some(10));

        assert_eq!(source.inner().lookups.load(Ordering::Relaxed), 3);
    }

    #[tokio::test]
    async fn test_sources_sharing_caches_reuse_responses() {
        let caches = Arc::new(ResponseCaches::new(Duration::from_secs(1800)));
        let first = CachingSource::with_caches(CountingSource::default(), Arc::clone(&caches));
        let second = CachingSource::with_caches(CountingSource::default(), caches);
        let rust = SearchTarget::Keyword("rust".into());

        let hits = first.search_videos(&rust, 30, SearchOrder::Relevance).await.unwrap();
        let _ = first.get_statistics(&["a".to_string()]).await.unwrap();

        assert_eq!(second.search_videos(&rust, 30, SearchOrder::Relevance).await.unwrap(), hits);
        let _ = second.get_statistics(&["a".to_string()]).await.unwrap();

        assert_eq!(second.inner().searches.load(Ordering::Relaxed), 0);
        assert_eq!(second.inner().lookups.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_shared_caches_are_per_endpoint_and_ttl() {
        let ttl = Duration::from_secs(1800);
        let a = ResponseCaches::shared("http://cache-test-a.invalid", ttl);
        let again = ResponseCaches::shared("http://cache-test-a.invalid", ttl);
        let other_endpoint = ResponseCaches::shared("http://cache-test-b.invalid", ttl);
        let other_ttl = ResponseCaches::shared("http://cache-test-a.invalid", Duration::from_secs(60));

        assert!(Arc::ptr_eq(&a, &again));
        assert!(!Arc::ptr_eq(&a, &other_endpoint));
        assert!(!Arc::ptr_eq(&a, &other_ttl));
    }
}
