//! Paginated query cache with a single in-flight fetch per key
//!
//! A [`QueryClient`] is owned by the application root and handed to every
//! screen that lists things. Pages for a [`QueryKey`] are appended in
//! order; page N+1 is only requested once page N has resolved, and callers
//! racing on the same key share one request.
//!
//! The cache holds a bounded number of keys. Fetching past the bound evicts
//! the key that was least recently fetched or reset.

use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::error::Error;

/// Identity of a paginated list: which screen asked, and with what filter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub scope: String,
    pub filter: String,
}

impl QueryKey {
    pub fn new(scope: &str, filter: &str) -> Self {
        Self {
            scope: scope.to_string(),
            filter: filter.to_string(),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scope, self.filter)
    }
}

/// Why a page fetch failed, kept cloneable so every waiter can see it
#[derive(Debug, Clone, PartialEq)]
pub struct FetchFailure {
    pub status: Option<u16>,
    pub message: String,
}

impl From<&Error> for FetchFailure {
    fn from(err: &Error) -> Self {
        Self {
            status: err.status(),
            message: err.to_string(),
        }
    }
}

impl From<FetchFailure> for Error {
    fn from(failure: FetchFailure) -> Self {
        match failure.status {
            Some(status) => Error::api(status, failure.message),
            None => Error::general(failure.message),
        }
    }
}

#[derive(Debug, Clone)]
enum FetchOutcome {
    Appended,
    /// The key was reset while this request was in flight
    Stale,
    Failed(FetchFailure),
}

type InFlight = Shared<BoxFuture<'static, FetchOutcome>>;

/// Keys kept by [`QueryClient::new`] before the least recently fetched is evicted
pub const DEFAULT_CAPACITY: usize = 20;

struct Entry<T> {
    pages: Vec<Vec<T>>,
    generation: u64,
    last_used: u64,
    has_next_page: bool,
    error: Option<FetchFailure>,
}

impl<T> Entry<T> {
    fn new(generation: u64) -> Self {
        Self {
            pages: Vec::new(),
            generation,
            last_used: generation,
            has_next_page: true,
            error: None,
        }
    }
}

struct State<T> {
    entries: HashMap<QueryKey, Entry<T>>,
    in_flight: HashMap<QueryKey, (u64, InFlight)>,
    /// Source of generations and recency stamps; never reused, so a
    /// result can not land in an entry created after its own was evicted
    clock: u64,
    capacity: usize,
}

impl<T> State<T> {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// The entry for `key`, created if missing and marked as just used
    fn touch(&mut self, key: &QueryKey) -> &mut Entry<T> {
        let now = self.tick();
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(|| Entry::new(now));
        entry.last_used = now;
        entry
    }

    /// Drop the least recently fetched keys until the cache fits its
    /// capacity. `keep` and keys with a running request are never dropped.
    fn evict(&mut self, keep: &QueryKey) {
        while self.entries.len() > self.capacity {
            let oldest = self
                .entries
                .iter()
                .filter(|(key, _)| *key != keep && !self.in_flight.contains_key(*key))
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(key, _)| key.clone());

            match oldest {
                Some(key) => {
                    log::debug!("Evicting {}", key);
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }

    fn current_in_flight(&self, key: &QueryKey) -> Option<InFlight> {
        let generation = self.entries.get(key).map_or(0, |e| e.generation);
        match self.in_flight.get(key) {
            Some((gen, handle)) if *gen == generation => Some(handle.clone()),
            _ => None,
        }
    }

    fn complete(
        &mut self,
        key: &QueryKey,
        generation: u64,
        page_size: usize,
        result: Result<Vec<T>, Error>,
    ) -> FetchOutcome {
        if matches!(self.in_flight.get(key), Some((gen, _)) if *gen == generation) {
            self.in_flight.remove(key);
        }

        let entry = match self.entries.get_mut(key) {
            Some(entry) if entry.generation == generation => entry,
            _ => {
                log::debug!("Discarding stale page for {}", key);
                return FetchOutcome::Stale;
            }
        };

        match result {
            Ok(items) => {
                entry.has_next_page = !items.is_empty() && items.len() >= page_size;
                entry.pages.push(items);
                entry.error = None;
                log::debug!("Loaded page {} for {}", entry.pages.len(), key);
                FetchOutcome::Appended
            }
            Err(err) => {
                log::warn!(
                    "Fetching page {} for {} failed: {}",
                    entry.pages.len() + 1,
                    key,
                    err
                );
                let failure = FetchFailure::from(&err);
                entry.error = Some(failure.clone());
                FetchOutcome::Failed(failure)
            }
        }
    }
}

/// A point-in-time copy of one key's pages
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySnapshot<T> {
    pub pages: Vec<Vec<T>>,
    pub has_next_page: bool,
    pub is_fetching: bool,
    pub error: Option<FetchFailure>,
}

impl<T: Clone> QuerySnapshot<T> {
    /// Every loaded item, page order preserved
    pub fn items(&self) -> Vec<T> {
        self.pages.iter().flatten().cloned().collect()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.iter().all(Vec::is_empty)
    }
}

/// Cache of paginated lists keyed by [`QueryKey`]
pub struct QueryClient<T> {
    inner: Arc<Mutex<State<T>>>,
}

impl<T> Clone for QueryClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> Default for QueryClient<T> {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl<T> QueryClient<T> {
    /// A cache holding at most `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(State {
                entries: HashMap::new(),
                in_flight: HashMap::new(),
                clock: 0,
                capacity: capacity.max(1),
            })),
        }
    }
}

impl<T> QueryClient<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Load the next page for `key`.
    ///
    /// `fetcher` receives the 1-based page number and is only invoked when
    /// no request for this key is already running; otherwise the caller
    /// waits on the running one. A page shorter than `page_size` marks the
    /// end of the list, after which this is a no-op.
    pub async fn fetch_next_page<F, Fut>(
        &self,
        key: &QueryKey,
        page_size: usize,
        fetcher: F,
    ) -> Result<QuerySnapshot<T>, Error>
    where
        F: FnOnce(u32) -> Fut,
        Fut: Future<Output = Result<Vec<T>, Error>> + Send + 'static,
    {
        let handle = {
            let mut state = self.lock();

            match state.current_in_flight(key) {
                Some(handle) => handle,
                None => {
                    let entry = state.touch(key);
                    let exhausted = !entry.has_next_page;
                    let page = entry.pages.len() as u32 + 1;
                    let generation = entry.generation;
                    if !exhausted {
                        entry.error = None;
                    }
                    state.evict(key);

                    if exhausted {
                        drop(state);
                        return Ok(self.snapshot(key));
                    }

                    let request = fetcher(page);
                    let inner = Arc::clone(&self.inner);
                    let owned_key = key.clone();
                    let handle = async move {
                        let result = request.await;
                        let mut state = inner
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner());
                        state.complete(&owned_key, generation, page_size, result)
                    }
                    .boxed()
                    .shared();

                    log::debug!("Fetching page {} for {}", page, key);
                    state.in_flight.insert(key.clone(), (generation, handle.clone()));
                    handle
                }
            }
        };

        match handle.await {
            FetchOutcome::Failed(failure) => Err(failure.into()),
            FetchOutcome::Appended | FetchOutcome::Stale => Ok(self.snapshot(key)),
        }
    }

    /// Current pages for `key`; empty if it was never fetched
    pub fn snapshot(&self, key: &QueryKey) -> QuerySnapshot<T> {
        let state = self.lock();
        let is_fetching = state.current_in_flight(key).is_some();
        match state.entries.get(key) {
            Some(entry) => QuerySnapshot {
                pages: entry.pages.clone(),
                has_next_page: entry.has_next_page,
                is_fetching,
                error: entry.error.clone(),
            },
            None => QuerySnapshot {
                pages: Vec::new(),
                has_next_page: true,
                is_fetching,
                error: None,
            },
        }
    }

    /// Drop every page of `key` so the next fetch starts again at page 1.
    /// A request still running for the old pages is left to finish and its
    /// result is thrown away.
    pub fn reset(&self, key: &QueryKey) {
        let mut state = self.lock();
        let generation = state.tick();
        let entry = state.touch(key);
        entry.pages.clear();
        entry.generation = generation;
        entry.has_next_page = true;
        entry.error = None;
        state.in_flight.remove(key);
        state.evict(key);
        log::debug!("Reset {}", key);
    }

    /// Drop every key. Requests still running are discarded when they
    /// finish.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.in_flight.clear();
    }

    /// Number of keys currently cached
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.lock().current_in_flight(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;
    use tokio::sync::oneshot;

    fn key(filter: &str) -> QueryKey {
        QueryKey::new("test", filter)
    }

    fn page_of(page: u32, len: usize) -> Vec<String> {
        (0..len).map(|i| format!("p{}-{}", page, i)).collect()
    }

    #[tokio::test]
    async fn appends_pages_in_order() {
        let client = QueryClient::new();
        let key = key("nature");

        client
            .fetch_next_page(&key, 3, |page| async move { Ok(page_of(page, 3)) })
            .await
            .unwrap();
        let snapshot = client
            .fetch_next_page(&key, 3, |page| async move { Ok(page_of(page, 3)) })
            .await
            .unwrap();

        assert_eq!(snapshot.page_count(), 2);
        assert_eq!(snapshot.items()[0], "p1-0");
        assert_eq!(snapshot.items()[3], "p2-0");
        assert!(snapshot.has_next_page);
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_request() {
        let client: QueryClient<String> = QueryClient::new();
        let key = key("food");
        let calls = Arc::new(AtomicU32::new(0));

        let fetch = |client: QueryClient<String>, calls: Arc<AtomicU32>, key: QueryKey| async move {
            client
                .fetch_next_page(&key, 2, move |page| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok(page_of(page, 2))
                    }
                })
                .await
        };

        let (a, b) = tokio::join!(
            fetch(client.clone(), calls.clone(), key.clone()),
            fetch(client.clone(), calls.clone(), key.clone())
        );

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(a.unwrap().page_count(), 1);
        assert_eq!(b.unwrap().page_count(), 1);
    }

    #[tokio::test]
    async fn short_page_ends_the_list() {
        let client = QueryClient::new();
        let key = key("art");
        let calls = Arc::new(AtomicU32::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            client
                .fetch_next_page(&key, 5, move |page| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move { Ok(page_of(page, 2)) }
                })
                .await
                .unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!client.snapshot(&key).has_next_page);
    }

    #[tokio::test]
    async fn reset_discards_stale_in_flight_page() {
        let client: QueryClient<String> = QueryClient::new();
        let key = key("travel");
        let (release, gate) = oneshot::channel::<()>();

        let slow = {
            let client = client.clone();
            let key = key.clone();
            tokio::spawn(async move {
                client
                    .fetch_next_page(&key, 1, |_| async move {
                        let _ = gate.await;
                        Ok(vec!["old".to_string()])
                    })
                    .await
            })
        };

        while !client.is_fetching(&key) {
            tokio::task::yield_now().await;
        }
        client.reset(&key);
        client
            .fetch_next_page(&key, 1, |_| async { Ok(vec!["new".to_string()]) })
            .await
            .unwrap();

        let _ = release.send(());
        slow.await.unwrap().unwrap();

        assert_eq!(client.snapshot(&key).items(), vec!["new".to_string()]);
    }

    #[tokio::test]
    async fn failure_is_recorded_and_retry_refetches_same_page() {
        let client: QueryClient<String> = QueryClient::new();
        let key = key("fashion");

        let err = client
            .fetch_next_page(&key, 2, |_| async { Err(Error::api(503, "unavailable")) })
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(503));
        let snapshot = client.snapshot(&key);
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.error.unwrap().message, "unavailable");

        let retried = client
            .fetch_next_page(&key, 2, |page| async move {
                assert_eq!(page, 1);
                Ok(page_of(page, 2))
            })
            .await
            .unwrap();
        assert_eq!(retried.page_count(), 1);
        assert!(retried.error.is_none());
    }

    #[tokio::test]
    async fn least_recently_fetched_key_is_evicted() {
        let client = QueryClient::with_capacity(2);
        for filter in ["a", "b"] {
            client
                .fetch_next_page(&key(filter), 1, |p| async move { Ok(page_of(p, 1)) })
                .await
                .unwrap();
        }

        // Loading a second page of "a" makes "b" the oldest key.
        client
            .fetch_next_page(&key("a"), 1, |p| async move { Ok(page_of(p, 1)) })
            .await
            .unwrap();
        client
            .fetch_next_page(&key("c"), 1, |p| async move { Ok(page_of(p, 1)) })
            .await
            .unwrap();

        assert_eq!(client.len(), 2);
        assert_eq!(client.snapshot(&key("a")).page_count(), 2);
        assert_eq!(client.snapshot(&key("b")).page_count(), 0);
        assert_eq!(client.snapshot(&key("c")).page_count(), 1);

        // An evicted key starts over from page 1.
        client
            .fetch_next_page(&key("b"), 1, |page| async move {
                assert_eq!(page, 1);
                Ok(page_of(page, 1))
            })
            .await
            .unwrap();
        assert_eq!(client.snapshot(&key("a")).page_count(), 0);
    }

    #[tokio::test]
    async fn key_with_running_request_is_not_evicted() {
        let client: QueryClient<String> = QueryClient::with_capacity(1);
        let (release, gate) = oneshot::channel::<()>();

        let slow = {
            let client = client.clone();
            tokio::spawn(async move {
                client
                    .fetch_next_page(&key("slow"), 1, |_| async move {
                        let _ = gate.await;
                        Ok(vec!["slow".to_string()])
                    })
                    .await
            })
        };

        while !client.is_fetching(&key("slow")) {
            tokio::task::yield_now().await;
        }
        client
            .fetch_next_page(&key("fast"), 1, |_| async { Ok(vec!["fast".to_string()]) })
            .await
            .unwrap();
        assert_eq!(client.len(), 2);

        let _ = release.send(());
        slow.await.unwrap().unwrap();
        assert_eq!(client.snapshot(&key("slow")).items(), vec!["slow".to_string()]);
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let client = QueryClient::new();
        client
            .fetch_next_page(&key("a"), 1, |p| async move { Ok(page_of(p, 1)) })
            .await
            .unwrap();
        assert_eq!(client.snapshot(&key("a")).page_count(), 1);
        assert_eq!(client.snapshot(&key("b")).page_count(), 0);

        client.clear();
        assert_eq!(client.snapshot(&key("a")).page_count(), 0);
    }
}
