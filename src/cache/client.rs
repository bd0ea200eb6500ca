use std::{
    any::Any,
    collections::HashMap,
    fmt::Debug,
    marker::PhantomData,
    pin::Pin,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use tokio::{sync::watch, time::Instant};

use crate::{
    Error,
    api_error::ApiError,
    cache::{QueryKey, QueryState},
};

/// How long a query result is served from the cache without a refetch.
pub const DEFAULT_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// How long an unused query is kept before it is evicted.
pub const DEFAULT_GC_TIME: Duration = Duration::from_secs(30 * 60);

/// Settings for the [QueryClient].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a result is considered fresh after its request resolves.
    pub stale_time: Duration,
    /// How many times a failed read is retried before the failure is
    /// surfaced. Only transient failures are retried.
    pub retry: u32,
    /// How long to wait before retrying a failed read.
    pub retry_delay: Duration,
    /// How long a query with no observers and no fetch in flight is kept
    /// after it was last used.
    pub gc_time: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            stale_time: DEFAULT_STALE_TIME,
            retry: 1,
            retry_delay: Duration::from_secs(1),
            gc_time: DEFAULT_GC_TIME,
        }
    }
}

type AnyValue = Arc<dyn Any + Send + Sync>;
type FetchFuture = Pin<Box<dyn Future<Output = Result<AnyValue, ApiError>> + Send>>;
type Fetcher = Arc<dyn Fn() -> FetchFuture + Send + Sync>;

/// Everything the cache knows about one query.
#[derive(Clone)]
struct Snapshot {
    state: QueryState<AnyValue>,
    /// When the current data was received.
    updated_at: Option<Instant>,
    is_fetching: bool,
    /// Set by invalidation, cleared by a fetch that started after it.
    is_invalidated: bool,
    /// Incremented on every invalidation, so a fetch can tell whether it
    /// started before the latest one.
    generation: u64,
    /// Set when the query is removed from the cache. Nothing is published
    /// after this.
    is_removed: bool,
}

impl Snapshot {
    fn empty() -> Self {
        Self {
            state: QueryState::Pending,
            updated_at: None,
            is_fetching: false,
            is_invalidated: false,
            generation: 0,
            is_removed: false,
        }
    }

    fn is_fresh(&self, stale_time: Duration) -> bool {
        !self.is_invalidated
            && self
                .updated_at
                .is_some_and(|updated_at| updated_at.elapsed() < stale_time)
    }
}

struct CacheEntry {
    state: Arc<watch::Sender<Snapshot>>,
    fetcher: Fetcher,
    /// When the query was last read, or last seen with observers.
    last_used: Instant,
}

impl CacheEntry {
    fn is_unused(&self) -> bool {
        self.state.receiver_count() == 0 && !self.state.borrow().is_fetching
    }

    /// Wake every observer and waiting reader with [Error::QueryCancelled].
    fn mark_removed(&self) {
        self.state.send_modify(|snapshot| {
            snapshot.is_removed = true;
            snapshot.is_fetching = false;
        });
    }
}

struct Inner {
    config: CacheConfig,
    entries: Mutex<HashMap<QueryKey, CacheEntry>>,
}

/// Caches API reads by [QueryKey].
///
/// - A fresh result is returned without a request.
/// - A result older than [CacheConfig::stale_time] is returned as is while it
///   is refreshed in the background.
/// - An invalidated result is fetched again before it is returned.
/// - Concurrent reads of one key share a single request.
/// - A query nobody has observed or read for [CacheConfig::gc_time] is
///   evicted.
///
/// Cloning is cheap and clones share the same cache. Fetches run on spawned
/// tasks, so a Tokio runtime must be running.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl QueryClient {
    /// Create an empty cache.
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                entries: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// The settings this cache was created with.
    pub fn config(&self) -> &CacheConfig {
        &self.inner.config
    }

    /// Read the query `key`, calling `fetcher` if the cache cannot answer.
    ///
    /// # Errors
    ///
    /// Returns [Error::Api] if the fetch failed (after retrying once if the
    /// failure was transient), or [Error::QueryTypeMismatch] if `key` was
    /// previously cached with a different type.
    pub async fn fetch_query<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<Arc<T>, Error>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let mut receiver = {
            let mut entries = self.lock_entries()?;
            self.evict_unused(&mut entries);
            let entry = upsert_entry(&mut entries, &key, erase(fetcher));
            let snapshot = entry.state.borrow().clone();

            if let QueryState::Success(value) = &snapshot.state {
                if snapshot.is_fresh(self.inner.config.stale_time) {
                    tracing::trace!("Cache hit for query {key}");
                    return downcast(&key, value);
                }

                if !snapshot.is_invalidated {
                    tracing::debug!("Serving stale query {key} while refreshing it");
                    if !snapshot.is_fetching {
                        self.spawn_fetch(&key, entry);
                    }
                    return downcast(&key, value);
                }
            }

            if !snapshot.is_fetching {
                self.spawn_fetch(&key, entry);
            }

            entry.state.subscribe()
        };

        let snapshot = receiver
            .wait_for(|snapshot| !snapshot.is_fetching)
            .await
            .map_err(|_| Error::QueryCancelled(key.to_string()))?
            .clone();

        if snapshot.is_removed {
            return Err(Error::QueryCancelled(key.to_string()));
        }

        match snapshot.state {
            QueryState::Success(value) => downcast(&key, &value),
            QueryState::Error(error) => Err(error),
            QueryState::Pending => Err(Error::QueryCancelled(key.to_string())),
        }
    }

    /// Subscribe to the query `key`, fetching it if there is no fresh result.
    ///
    /// While the observer is alive the query counts as displayed: invalidating
    /// it triggers an immediate refetch and the observer is notified of every
    /// change.
    pub fn watch_query<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<QueryObserver<T>, Error>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        let mut entries = self.lock_entries()?;
        self.evict_unused(&mut entries);
        let entry = upsert_entry(&mut entries, &key, erase(fetcher));
        let receiver = entry.state.subscribe();

        let needs_fetch = {
            let snapshot = entry.state.borrow();
            !snapshot.is_fetching && !snapshot.is_fresh(self.inner.config.stale_time)
        };

        if needs_fetch {
            self.spawn_fetch(&key, entry);
        }

        Ok(QueryObserver {
            key,
            receiver,
            value_type: PhantomData,
        })
    }

    /// Mark every query whose key starts with `prefix` as stale.
    ///
    /// Queries that are currently observed are fetched again straight away,
    /// the others on their next read. Returns the number of queries marked.
    pub fn invalidate_queries(&self, prefix: &QueryKey) -> Result<usize, Error> {
        let entries = self.lock_entries()?;
        let mut invalidated = 0;

        for (key, entry) in entries.iter().filter(|(key, _)| key.starts_with(prefix)) {
            entry.state.send_modify(|snapshot| {
                snapshot.is_invalidated = true;
                snapshot.generation += 1;
            });

            let is_fetching = entry.state.borrow().is_fetching;
            if entry.state.receiver_count() > 0 && !is_fetching {
                tracing::debug!("Refetching invalidated query {key}");
                self.spawn_fetch(key, entry);
            }

            invalidated += 1;
        }

        tracing::debug!("Invalidated {invalidated} queries under {prefix}");

        Ok(invalidated)
    }

    /// The cached data for `key`, if any, without fetching.
    pub fn get_query_data<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
    ) -> Result<Option<Arc<T>>, Error> {
        let entries = self.lock_entries()?;

        let Some(entry) = entries.get(key) else {
            return Ok(None);
        };

        let snapshot = entry.state.borrow();
        match &snapshot.state {
            QueryState::Success(value) => downcast(key, value).map(Some),
            _ => Ok(None),
        }
    }

    /// The state of `key` as an observer would see it, or `None` if the key
    /// has never been queried.
    pub fn get_query_state<T: Send + Sync + 'static>(
        &self,
        key: &QueryKey,
    ) -> Result<Option<QueryState<Arc<T>>>, Error> {
        let entries = self.lock_entries()?;

        Ok(entries
            .get(key)
            .map(|entry| typed_state(key, &entry.state.borrow())))
    }

    /// Remove every query whose key starts with `prefix`.
    ///
    /// Observers and waiting readers of a removed query get
    /// [Error::QueryCancelled], and the result of a fetch still in flight is
    /// discarded. Returns the number of queries removed.
    pub fn remove_queries(&self, prefix: &QueryKey) -> Result<usize, Error> {
        let mut entries = self.lock_entries()?;
        let before = entries.len();

        entries.retain(|key, entry| {
            if key.starts_with(prefix) {
                entry.mark_removed();
                false
            } else {
                true
            }
        });

        Ok(before - entries.len())
    }

    /// Remove every query.
    pub fn clear(&self) -> Result<(), Error> {
        let mut entries = self.lock_entries()?;

        for entry in entries.values() {
            entry.mark_removed();
        }
        entries.clear();

        Ok(())
    }

    /// Drop queries that nobody has used for [CacheConfig::gc_time].
    ///
    /// Observed queries count as used whenever this runs.
    fn evict_unused(&self, entries: &mut HashMap<QueryKey, CacheEntry>) {
        let gc_time = self.inner.config.gc_time;
        let now = Instant::now();

        entries.retain(|key, entry| {
            if !entry.is_unused() {
                entry.last_used = now;
                return true;
            }

            let keep = now.duration_since(entry.last_used) < gc_time;
            if !keep {
                tracing::trace!("Evicting unused query {key}");
            }

            keep
        });
    }

    fn lock_entries(&self) -> Result<MutexGuard<'_, HashMap<QueryKey, CacheEntry>>, Error> {
        self.inner
            .entries
            .lock()
            .map_err(|_| Error::CacheLockError)
    }

    /// Start fetching `key` on a new task.
    ///
    /// The caller must have checked that no fetch is in flight.
    fn spawn_fetch(&self, key: &QueryKey, entry: &CacheEntry) {
        entry
            .state
            .send_modify(|snapshot| snapshot.is_fetching = true);

        let key = key.clone();
        let state = Arc::clone(&entry.state);
        let fetcher = Arc::clone(&entry.fetcher);
        let config = self.inner.config.clone();

        tokio::spawn(run_fetch(key, state, fetcher, config));
    }
}

impl Debug for QueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entry_count = self
            .inner
            .entries
            .lock()
            .map(|entries| entries.len())
            .ok();

        f.debug_struct("QueryClient")
            .field("config", &self.inner.config)
            .field("entries", &entry_count)
            .finish()
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

/// A subscription to one query, see [QueryClient::watch_query].
pub struct QueryObserver<T> {
    key: QueryKey,
    receiver: watch::Receiver<Snapshot>,
    value_type: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> QueryObserver<T> {
    /// The key of the observed query.
    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    /// The current state of the query.
    pub fn state(&self) -> QueryState<Arc<T>> {
        typed_state(&self.key, &self.receiver.borrow())
    }

    /// Whether a request for the query is in flight.
    pub fn is_fetching(&self) -> bool {
        self.receiver.borrow().is_fetching
    }

    /// Wait for the next change to the query and return the new state.
    ///
    /// # Errors
    ///
    /// Returns [Error::QueryCancelled] if the query is removed from the cache.
    pub async fn changed(&mut self) -> Result<QueryState<Arc<T>>, Error> {
        self.receiver
            .changed()
            .await
            .map_err(|_| Error::QueryCancelled(self.key.to_string()))?;

        if self.receiver.borrow().is_removed {
            return Err(Error::QueryCancelled(self.key.to_string()));
        }

        Ok(self.state())
    }

    /// Wait until no request for the query is in flight and return the state.
    ///
    /// # Errors
    ///
    /// Returns [Error::QueryCancelled] if the query is removed from the cache.
    pub async fn settled(&mut self) -> Result<QueryState<Arc<T>>, Error> {
        let snapshot = self
            .receiver
            .wait_for(|snapshot| !snapshot.is_fetching)
            .await
            .map_err(|_| Error::QueryCancelled(self.key.to_string()))?
            .clone();

        if snapshot.is_removed {
            return Err(Error::QueryCancelled(self.key.to_string()));
        }

        Ok(typed_state(&self.key, &snapshot))
    }
}

impl<T> Debug for QueryObserver<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryObserver")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

fn erase<T, F, Fut>(fetcher: F) -> Fetcher
where
    T: Send + Sync + 'static,
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    Arc::new(move || {
        let future = fetcher();
        Box::pin(async move { future.await.map(|value| Arc::new(value) as AnyValue) })
    })
}

/// Get the entry for `key`, creating it if needed, and make `fetcher` the
/// function used for its future fetches.
fn upsert_entry<'a>(
    entries: &'a mut HashMap<QueryKey, CacheEntry>,
    key: &QueryKey,
    fetcher: Fetcher,
) -> &'a CacheEntry {
    let entry = entries
        .entry(key.clone())
        .or_insert_with(|| CacheEntry {
            state: Arc::new(watch::channel(Snapshot::empty()).0),
            fetcher: Arc::clone(&fetcher),
            last_used: Instant::now(),
        });
    entry.fetcher = fetcher;
    entry.last_used = Instant::now();

    entry
}

fn downcast<T: Send + Sync + 'static>(key: &QueryKey, value: &AnyValue) -> Result<Arc<T>, Error> {
    Arc::clone(value)
        .downcast::<T>()
        .map_err(|_| Error::QueryTypeMismatch(key.to_string()))
}

fn typed_state<T: Send + Sync + 'static>(key: &QueryKey, snapshot: &Snapshot) -> QueryState<Arc<T>> {
    if snapshot.is_removed {
        return QueryState::Error(Error::QueryCancelled(key.to_string()));
    }

    match &snapshot.state {
        QueryState::Success(value) => match downcast(key, value) {
            Ok(value) => QueryState::Success(value),
            Err(error) => QueryState::Error(error),
        },
        // A retry or refetch after an error is reported as loading.
        _ if snapshot.is_fetching => QueryState::Pending,
        QueryState::Error(error) => QueryState::Error(error.clone()),
        QueryState::Pending => QueryState::Pending,
    }
}

async fn run_fetch(
    key: QueryKey,
    state: Arc<watch::Sender<Snapshot>>,
    fetcher: Fetcher,
    config: CacheConfig,
) {
    loop {
        let generation = state.borrow().generation;
        tracing::debug!("Fetching query {key}");

        let result = fetch_with_retry(&key, &fetcher, &config).await;
        let has_observers = state.receiver_count() > 0;
        let mut fetch_again = false;

        state.send_if_modified(|snapshot| {
            if snapshot.is_removed {
                tracing::debug!("Query {key} was removed while fetching, discarding the result");
                return false;
            }

            let is_outdated = snapshot.generation != generation;

            match result {
                Ok(value) => {
                    snapshot.state = QueryState::Success(value);
                    snapshot.updated_at = Some(Instant::now());
                    snapshot.is_invalidated = is_outdated;
                }
                // Data that merely aged out is still the best we have.
                Err(error)
                    if matches!(snapshot.state, QueryState::Success(_))
                        && !snapshot.is_invalidated =>
                {
                    tracing::warn!("Refreshing query {key} failed, keeping cached data: {error}");
                }
                Err(error) => snapshot.state = QueryState::Error(error.into()),
            }

            fetch_again = is_outdated && has_observers;
            snapshot.is_fetching = fetch_again;
            true
        });

        if !fetch_again {
            break;
        }

        tracing::debug!("Query {key} was invalidated while fetching, fetching again");
    }
}

async fn fetch_with_retry(
    key: &QueryKey,
    fetcher: &Fetcher,
    config: &CacheConfig,
) -> Result<AnyValue, ApiError> {
    let mut attempts = 0;

    loop {
        match fetcher().await {
            Ok(value) => return Ok(value),
            Err(error) if attempts < config.retry && error.is_transient() => {
                attempts += 1;
                tracing::warn!(
                    "Query {key} failed, retrying ({attempts}/{}): {error}",
                    config.retry
                );
                tokio::time::sleep(config.retry_delay).await;
            }
            Err(error) => {
                tracing::warn!("Query {key} failed: {error}");
                return Err(error);
            }
        }
    }
}
