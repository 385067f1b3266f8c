use std::sync::Arc;
use std::time::Instant;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use moka::sync::Cache;
use tokio::runtime::Handle;
use tokio::spawn;
use tracing::{debug, error, warn};

use crate::cache::{DetailState, LoadOutcome, TransactionSource};
use crate::config::CacheSettings;
use crate::models::{FetchError, Transaction};
use crate::types::CacheKey;

/// Lazily loaded, deduplicated store of per-account transaction detail.
///
/// A key is either loaded, in flight, or absent. The in-flight map's entry lock
/// guards both the check-then-mark step in [`TransactionCache::ensure_loaded`]
/// and the completion step, so a key is never fetched twice concurrently.
pub struct TransactionCache<S: TransactionSource> {
    source: Arc<S>,
    fetch_limit: usize,
    loaded: Cache<CacheKey, Arc<[Transaction]>>,
    in_flight: DashMap<CacheKey, Instant>,
    failures: DashMap<CacheKey, String>,
    runtime: Option<Handle>
}

impl<S: TransactionSource> TransactionCache<S> {
    /// Fetches are spawned on the tokio runtime current at construction, if any.
    /// Use [`TransactionCache::with_runtime`] when the cache is built elsewhere.
    pub fn new(source: Arc<S>, settings: &CacheSettings) -> Self {
        let mut builder = Cache::<CacheKey, Arc<[Transaction]>>::builder();

        if let Some(capacity) = settings.max_capacity {
            builder = builder.max_capacity(capacity);
        }

        if let Some(time_to_live) = settings.time_to_live {
            builder = builder.time_to_live(time_to_live);
        }

        Self {
            source,
            fetch_limit: settings.fetch_limit,
            loaded: builder.build(),
            in_flight: DashMap::new(),
            failures: DashMap::new(),
            runtime: Handle::try_current().ok()
        }
    }

    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    /// Starts a fetch for `key` unless it is already cached or in flight.
    ///
    /// Safe to call from any thread. The check and the in-flight mark happen
    /// synchronously under one lock; only the spawned fetch suspends. Without a
    /// runtime to spawn on, the key is recorded as failed and nothing is marked.
    pub fn ensure_loaded(self: &Arc<Self>, key: &str) -> LoadOutcome {
        let entry = match self.in_flight.entry(key.to_string()) {
            Entry::Occupied(_) => {
                debug!("Transactions for account [{key}] already in flight");
                return LoadOutcome::InFlight;
            }
            Entry::Vacant(entry) => entry
        };

        if self.loaded.contains_key(key) {
            debug!("Transactions for account [{key}] served from cache");
            return LoadOutcome::Hit;
        }

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            warn!("No async runtime available to fetch transactions for account [{key}]");
            self.failures.insert(key.to_string(), FetchError::transport(key, "no async runtime available").to_string());
            return LoadOutcome::Unavailable;
        };

        entry.insert(Instant::now());
        self.failures.remove(key);

        debug!("Fetching up to [{}] transactions for account [{key}]", self.fetch_limit);

        let cache = Arc::clone(self);
        let key = key.to_string();

        LoadOutcome::Started(runtime.spawn(async move {
            let source = Arc::clone(&cache.source);
            let fetch_key = key.clone();
            let limit = cache.fetch_limit;
            let fetch = spawn(async move { source.fetch(&fetch_key, limit).await });

            let result = match fetch.await {
                Ok(result) => result,
                Err(error) => Err(FetchError::transport(&key, format!("fetch task failed: {error}")))
            };

            cache.complete(&key, result);
        }))
    }

    fn complete(&self, key: &str, result: Result<Vec<Transaction>, FetchError>) {
        let Entry::Occupied(entry) = self.in_flight.entry(key.to_string()) else {
            error!("Fetch for account [{key}] completed but was not marked in flight");
            return;
        };

        match result {
            Ok(transactions) => {
                debug!("Cached [{}] transactions for account [{key}] after {:?}", transactions.len(), entry.get().elapsed());
                self.loaded.insert(key.to_string(), Arc::from(transactions));
            }
            Err(error) => {
                warn!("{error}");
                self.failures.insert(key.to_string(), error.to_string());
            }
        }

        entry.remove();
    }

    pub fn get(&self, key: &str) -> Option<Arc<[Transaction]>> {
        self.loaded.get(key)
    }

    pub fn is_in_flight(&self, key: &str) -> bool {
        self.in_flight.contains_key(key)
    }

    /// Keys with a fetch outstanding, sorted for stable reporting.
    pub fn in_flight_keys(&self) -> Vec<CacheKey> {
        let mut keys: Vec<_> = self.in_flight.iter().map(|item| item.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn detail_state(&self, key: &str) -> DetailState {
        if self.is_in_flight(key) {
            return DetailState::Loading;
        }

        if let Some(transactions) = self.loaded.get(key) {
            return DetailState::Loaded(transactions);
        }

        match self.failures.get(key) {
            Some(message) => DetailState::Failed(message.value().clone()),
            None => DetailState::NotRequested
        }
    }

    /// Drops one cached entry so the next expand refetches it.
    pub fn invalidate(&self, key: &str) {
        self.loaded.invalidate(key);
        self.failures.remove(key);
    }

    /// Applies pending capacity and expiry evictions now instead of on the
    /// next maintenance pass.
    pub fn run_pending_tasks(&self) {
        self.loaded.run_pending_tasks();
    }

    /// Drops every cached entry. Fetches already in flight still land.
    pub fn clear(&self) {
        self.loaded.invalidate_all();
        self.failures.clear();
    }
}
