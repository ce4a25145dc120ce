//! Read-through cache orchestration
//!
//! `lookup -> hit? return : query store -> populate -> return`. The cache is
//! an optimization only: every cache failure degrades to a store query, and
//! a failed write never fails the request. Entries are not invalidated when
//! the underlying records change, so readers may see a listing that is stale
//! by up to one TTL.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::PageResult;
use crate::domain::DomainError;
use crate::domain::cache::Cache;
use crate::domain::store::DEFAULT_STORE_DEADLINE;

/// Outcome of a cache read
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup<T> {
    Hit(T),
    /// Absent, expired, unreadable, or undecodable
    Miss,
}

/// TTL chosen from the shape of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    /// Used when nothing matched the query
    pub empty: Duration,
    /// Used when at least one record matched
    pub populated: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            empty: Duration::from_secs(60),
            populated: Duration::from_secs(300),
        }
    }
}

impl TtlPolicy {
    pub fn new(empty: Duration, populated: Duration) -> Self {
        Self { empty, populated }
    }

    pub fn ttl_for<T>(&self, page: &PageResult<T>) -> Duration {
        if page.total_count == 0 {
            self.empty
        } else {
            self.populated
        }
    }
}

/// Cache-aside reader shared by the listing and single-item lookups
///
/// Holds no state besides its collaborators; concurrent misses on the same
/// key each query the store and the last write wins.
#[derive(Debug, Clone)]
pub struct ReadThroughCache {
    cache: Option<Arc<dyn Cache>>,
    policy: TtlPolicy,
    deadline: Duration,
}

impl ReadThroughCache {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self::from_option(Some(cache))
    }

    /// A reader that always goes to the store
    pub fn disabled() -> Self {
        Self::from_option(None)
    }

    pub fn from_option(cache: Option<Arc<dyn Cache>>) -> Self {
        Self {
            cache,
            policy: TtlPolicy::default(),
            deadline: DEFAULT_STORE_DEADLINE,
        }
    }

    pub fn with_policy(mut self, policy: TtlPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Deadline applied separately to the cache read, the store query and the cache write
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn policy(&self) -> TtlPolicy {
        self.policy
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Returns the page cached under `key`, or runs `query` and caches its result
    pub async fn get_page<T, F, Fut>(&self, key: &str, query: F) -> Result<PageResult<T>, DomainError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PageResult<T>, DomainError>>,
    {
        let policy = self.policy;
        self.get_or_load(key, query, |page| Some(policy.ttl_for(page)))
            .await
    }

    /// Returns the value cached under `key`, or runs `query` and caches a
    /// found value for `ttl`. Absent values are not cached.
    pub async fn get_with_ttl<T, F, Fut>(
        &self,
        key: &str,
        ttl: Duration,
        query: F,
    ) -> Result<Option<T>, DomainError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<T>, DomainError>>,
    {
        self.get_or_load(key, query, |value| value.as_ref().map(|_| ttl))
            .await
    }

    async fn get_or_load<V, F, Fut, P>(&self, key: &str, query: F, ttl_for: P) -> Result<V, DomainError>
    where
        V: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, DomainError>>,
        P: FnOnce(&V) -> Option<Duration>,
    {
        let namespace = namespace_of(key);

        if let CacheLookup::Hit(value) = self.lookup(key).await {
            counter!("cache_lookups_total", "namespace" => namespace.clone(), "outcome" => "hit")
                .increment(1);
            return Ok(value);
        }

        counter!("cache_lookups_total", "namespace" => namespace.clone(), "outcome" => "miss")
            .increment(1);

        let value = match tokio::time::timeout(self.deadline, query()).await {
            Ok(Ok(value)) => value,
            Ok(Err(e)) => {
                counter!("cache_store_failures_total", "namespace" => namespace).increment(1);
                warn!(key = %key, error = %e, "Store query failed, nothing cached");
                return Err(DomainError::store_query_failed(e.to_string()));
            }
            Err(_) => {
                counter!("cache_store_failures_total", "namespace" => namespace).increment(1);
                warn!(key = %key, deadline_secs = self.deadline.as_secs(), "Store query timed out, nothing cached");
                return Err(DomainError::store_query_failed(format!(
                    "query for '{}' exceeded its deadline of {}s",
                    key,
                    self.deadline.as_secs()
                )));
            }
        };

        if let Some(ttl) = ttl_for(&value) {
            self.populate(key, &value, ttl).await;
        }

        Ok(value)
    }

    /// Reads and decodes `key`; every failure is reported as a miss
    pub async fn lookup<T: DeserializeOwned>(&self, key: &str) -> CacheLookup<T> {
        let Some(cache) = &self.cache else {
            return CacheLookup::Miss;
        };

        let raw = match tokio::time::timeout(self.deadline, cache.get_raw(key)).await {
            Ok(Ok(Some(raw))) => raw,
            Ok(Ok(None)) => {
                debug!(key = %key, "Cache miss");
                return CacheLookup::Miss;
            }
            Ok(Err(e)) => {
                warn!(key = %key, error = %e, "Cache read failed, falling back to store");
                return CacheLookup::Miss;
            }
            Err(_) => {
                warn!(key = %key, "Cache read timed out, falling back to store");
                return CacheLookup::Miss;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => {
                debug!(key = %key, "Cache hit");
                CacheLookup::Hit(value)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                CacheLookup::Miss
            }
        }
    }

    /// Serializes and writes `value`; failures are logged and swallowed
    pub async fn populate<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let Some(cache) = &self.cache else {
            return;
        };

        let data = match serde_json::to_string(value) {
            Ok(data) => data,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to serialize value for cache");
                return;
            }
        };

        match tokio::time::timeout(self.deadline, cache.set_raw(key, &data, ttl)).await {
            Ok(Ok(())) => debug!(key = %key, ttl_secs = ttl.as_secs(), "Cache populated"),
            Ok(Err(e)) => warn!(key = %key, error = %e, "Cache write failed"),
            Err(_) => warn!(key = %key, "Cache write timed out"),
        }
    }
}

fn namespace_of(key: &str) -> String {
    key.split(':').next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cache::MockCache;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const KEY: &str = "foods:page=1:perPage=10:startIndex=0";

    fn page(total: u64, items: &[&str]) -> PageResult<String> {
        PageResult {
            total_count: total,
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Query closure that counts its invocations
    fn counting(
        calls: &Arc<AtomicUsize>,
        result: Result<PageResult<String>, DomainError>,
    ) -> impl FnOnce() -> std::future::Ready<Result<PageResult<String>, DomainError>> {
        let calls = calls.clone();
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(result)
        }
    }

    #[tokio::test]
    async fn test_miss_queries_and_populates_with_populated_ttl() {
        let cache = Arc::new(MockCache::new());
        let reader = ReadThroughCache::new(cache.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        let result = reader
            .get_page(KEY, counting(&calls, Ok(page(25, &["a", "b"]))))
            .await
            .unwrap();

        assert_eq!(result, page(25, &["a", "b"]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let (json, ttl) = cache.entry(KEY).unwrap();
        assert_eq!(ttl, Some(Duration::from_secs(300)));
        assert_eq!(serde_json::from_str::<PageResult<String>>(&json).unwrap(), result);
    }

    #[tokio::test]
    async fn test_empty_result_uses_short_ttl() {
        let cache = Arc::new(MockCache::new());
        let reader = ReadThroughCache::new(cache.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        let result = reader
            .get_page(KEY, counting(&calls, Ok(PageResult::empty())))
            .await
            .unwrap();

        assert_eq!(result, PageResult::empty());
        assert_eq!(cache.entry(KEY).unwrap().1, Some(Duration::from_secs(60)));
    }

    #[tokio::test]
    async fn test_page_past_end_uses_populated_ttl() {
        let cache = Arc::new(MockCache::new());
        let reader = ReadThroughCache::new(cache.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        reader
            .get_page(KEY, counting(&calls, Ok(page(25, &[]))))
            .await
            .unwrap();

        assert_eq!(cache.entry(KEY).unwrap().1, Some(Duration::from_secs(300)));
    }

    #[tokio::test]
    async fn test_hit_skips_store() {
        let cached = page(3, &["x", "y", "z"]);
        let cache = Arc::new(MockCache::new().with_entry(KEY, &cached));
        let reader = ReadThroughCache::new(cache.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        let result = reader
            .get_page(KEY, counting(&calls, Ok(page(99, &[]))))
            .await
            .unwrap();

        assert_eq!(result, cached);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(cache.set_calls(), 0);
    }

    #[tokio::test]
    async fn test_second_call_within_ttl_is_served_from_cache() {
        let cache = Arc::new(MockCache::new());
        let reader = ReadThroughCache::new(cache.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        let first = reader
            .get_page(KEY, counting(&calls, Ok(page(25, &["a"]))))
            .await
            .unwrap();
        let second = reader
            .get_page(KEY, counting(&calls, Ok(page(26, &["b"]))))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_entry_reads_through_again() {
        use crate::infrastructure::cache::InMemoryCache;

        let ttl = Duration::from_millis(50);
        let reader = ReadThroughCache::new(Arc::new(InMemoryCache::new()))
            .with_policy(TtlPolicy::new(ttl, ttl));
        let calls = Arc::new(AtomicUsize::new(0));

        let first = reader
            .get_page(KEY, counting(&calls, Ok(page(1, &["a"]))))
            .await
            .unwrap();
        let within_ttl = reader
            .get_page(KEY, counting(&calls, Ok(page(2, &["a", "b"]))))
            .await
            .unwrap();

        assert_eq!(within_ttl, first);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(150)).await;

        let after_ttl = reader
            .get_page(KEY, counting(&calls, Ok(page(2, &["a", "b"]))))
            .await
            .unwrap();

        assert_eq!(after_ttl, page(2, &["a", "b"]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_store_failure_leaves_cache_untouched() {
        let cache = Arc::new(MockCache::new());
        let reader = ReadThroughCache::new(cache.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        let result = reader
            .get_page(KEY, counting(&calls, Err(DomainError::storage("connection refused"))))
            .await;

        assert!(matches!(result, Err(DomainError::StoreQueryFailed { .. })));
        assert_eq!(cache.set_calls(), 0);
        assert!(cache.entry(KEY).is_none());
    }

    #[tokio::test]
    async fn test_cache_read_error_falls_back_to_store() {
        let cache = Arc::new(MockCache::new().with_error("redis down"));
        let reader = ReadThroughCache::new(cache.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        let result = reader
            .get_page(KEY, counting(&calls, Ok(page(1, &["a"]))))
            .await
            .unwrap();

        assert_eq!(result, page(1, &["a"]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_a_miss_and_gets_overwritten() {
        let cache = Arc::new(MockCache::new().with_raw_entry(KEY, "{not json"));
        let reader = ReadThroughCache::new(cache.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        let result = reader
            .get_page(KEY, counting(&calls, Ok(page(2, &["a", "b"]))))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let (json, _) = cache.entry(KEY).unwrap();
        assert_eq!(serde_json::from_str::<PageResult<String>>(&json).unwrap(), result);
    }

    #[tokio::test]
    async fn test_cache_write_failure_does_not_fail_request() {
        let cache = Arc::new(MockCache::new().with_write_error("read-only replica"));
        let reader = ReadThroughCache::new(cache.clone());
        let calls = Arc::new(AtomicUsize::new(0));

        let result = reader
            .get_page(KEY, counting(&calls, Ok(page(1, &["a"]))))
            .await;

        assert!(result.is_ok());
        assert_eq!(cache.set_calls(), 1);
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_disabled_always_queries() {
        let reader = ReadThroughCache::disabled();
        let calls = Arc::new(AtomicUsize::new(0));

        assert!(!reader.is_enabled());
        reader.get_page(KEY, counting(&calls, Ok(page(1, &["a"])))).await.unwrap();
        reader.get_page(KEY, counting(&calls, Ok(page(1, &["a"])))).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_slow_query_fails_without_caching() {
        let cache = Arc::new(MockCache::new());
        let reader = ReadThroughCache::new(cache.clone()).with_deadline(Duration::from_millis(20));

        let result: Result<PageResult<String>, _> = reader
            .get_page(KEY, || async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(PageResult::empty())
            })
            .await;

        assert!(matches!(result, Err(DomainError::StoreQueryFailed { .. })));
        assert!(cache.entry(KEY).is_none());
    }

    #[tokio::test]
    async fn test_custom_policy() {
        let cache = Arc::new(MockCache::new());
        let policy = TtlPolicy::new(Duration::from_secs(5), Duration::from_secs(50));
        let reader = ReadThroughCache::new(cache.clone()).with_policy(policy);
        let calls = Arc::new(AtomicUsize::new(0));

        reader.get_page(KEY, counting(&calls, Ok(page(1, &["a"])))).await.unwrap();

        assert_eq!(reader.policy(), policy);
        assert_eq!(cache.entry(KEY).unwrap().1, Some(Duration::from_secs(50)));
    }

    #[tokio::test]
    async fn test_get_with_ttl_caches_found_values_only() {
        let cache = Arc::new(MockCache::new());
        let reader = ReadThroughCache::new(cache.clone());
        let ttl = Duration::from_secs(600);

        let found = reader
            .get_with_ttl("food:f1", ttl, || async { Ok(Some("Soup".to_string())) })
            .await
            .unwrap();
        let missing: Option<String> = reader
            .get_with_ttl("food:f2", ttl, || async { Ok(None) })
            .await
            .unwrap();

        assert_eq!(found, Some("Soup".to_string()));
        assert!(missing.is_none());
        assert_eq!(cache.entry("food:f1").unwrap().1, Some(ttl));
        assert!(cache.entry("food:f2").is_none());
    }

    #[tokio::test]
    async fn test_lookup_outcomes() {
        let cache = Arc::new(MockCache::new().with_entry("k", &7u32));
        let reader = ReadThroughCache::new(cache);

        assert_eq!(reader.lookup::<u32>("k").await, CacheLookup::Hit(7));
        assert_eq!(reader.lookup::<u32>("absent").await, CacheLookup::Miss);
        assert_eq!(reader.lookup::<String>("k").await, CacheLookup::Miss);
    }

    #[test]
    fn test_namespace_of() {
        assert_eq!(namespace_of(KEY), "foods");
        assert_eq!(namespace_of("plain"), "plain");
    }
}
