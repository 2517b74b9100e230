//! In-memory response cache.
//!
//! Entries are whole upstream responses keyed by question fingerprint. Every
//! entry lives for the same configured TTL regardless of the record TTLs it
//! carries. At capacity one random entry is evicted before an insert.

pub mod metrics;

pub use metrics::CacheMetrics;

use dockside_dns_application::ports::{question_key, CacheStats, ResponseCache};
use dockside_dns_domain::QuestionKey;
use hickory_proto::op::Message;
use rustc_hash::FxHashMap;
use std::sync::atomic::Ordering;
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::{Duration, Instant};
use tracing::debug;

const DEFAULT_CAPACITY: usize = 1024;
const DEFAULT_TTL: Duration = Duration::from_secs(600);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheOptions {
    /// Maximum number of entries.
    pub capacity: usize,
    /// Lifetime applied to every insertion.
    pub ttl: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            ttl: DEFAULT_TTL,
        }
    }
}

struct CachedResponse {
    message: Message,
    expires_at: Instant,
    slot: usize,
}

/// Entry map plus a dense key list, so a random victim is picked in O(1).
#[derive(Default)]
struct Store {
    entries: FxHashMap<QuestionKey, CachedResponse>,
    keys: Vec<QuestionKey>,
}

impl Store {
    fn insert(&mut self, key: QuestionKey, message: Message, expires_at: Instant) {
        let slot = self.keys.len();
        self.keys.push(key.clone());
        self.entries.insert(
            key,
            CachedResponse {
                message,
                expires_at,
                slot,
            },
        );
    }

    fn remove(&mut self, key: &QuestionKey) -> bool {
        let Some(removed) = self.entries.remove(key) else {
            return false;
        };
        self.keys.swap_remove(removed.slot);
        if let Some(moved) = self.keys.get(removed.slot) {
            if let Some(entry) = self.entries.get_mut(moved) {
                entry.slot = removed.slot;
            }
        }
        true
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.keys.clear();
    }
}

pub struct DnsResponseCache {
    store: RwLock<Store>,
    options: CacheOptions,
    metrics: CacheMetrics,
    rng: Mutex<fastrand::Rng>,
}

impl DnsResponseCache {
    pub fn new(options: CacheOptions) -> Self {
        Self {
            store: RwLock::new(Store::default()),
            options,
            metrics: CacheMetrics::default(),
            rng: Mutex::new(fastrand::Rng::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.store
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .entries
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Only removes the entry if it is still expired; a concurrent add may
    // have replaced it since the read lock was dropped.
    fn remove_expired(&self, key: &QuestionKey, now: Instant) {
        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        if store.entries.get(key).is_some_and(|e| e.expires_at <= now) {
            store.remove(key);
        }
    }

    fn evict_random(&self, store: &mut Store) {
        if store.keys.is_empty() {
            return;
        }
        let index = self
            .rng
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .usize(..store.keys.len());
        let victim = store.keys[index].clone();
        if store.remove(&victim) {
            self.metrics.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(key = %victim, "Evicted cache entry");
        }
    }
}

impl Default for DnsResponseCache {
    fn default() -> Self {
        Self::new(CacheOptions::default())
    }
}

impl ResponseCache for DnsResponseCache {
    fn get(&self, key: &QuestionKey) -> Option<Message> {
        let now = Instant::now();
        let found = {
            let store = self.store.read().unwrap_or_else(PoisonError::into_inner);
            store
                .entries
                .get(key)
                .map(|e| (e.expires_at > now).then(|| e.message.clone()))
        };

        match found {
            Some(Some(message)) => {
                self.metrics.hits.fetch_add(1, Ordering::Relaxed);
                Some(message)
            }
            Some(None) => {
                self.metrics.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key = %key, "Cache entry expired");
                self.remove_expired(key, now);
                None
            }
            None => {
                self.metrics.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    fn add(&self, response: &Message) {
        if self.options.capacity == 0 {
            return;
        }
        let Some(query) = response.queries().first() else {
            debug!(id = response.id(), "Not caching response without a question");
            return;
        };
        let key = question_key(query);

        let mut store = self.store.write().unwrap_or_else(PoisonError::into_inner);
        if store.entries.contains_key(&key) {
            return;
        }
        if store.entries.len() >= self.options.capacity {
            self.evict_random(&mut store);
        }

        store.insert(key, response.clone(), Instant::now() + self.options.ttl);
        self.metrics.insertions.fetch_add(1, Ordering::Relaxed);
    }

    fn remove(&self, key: &QuestionKey) {
        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }

    fn reset(&self) {
        self.store
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
        self.metrics.reset();
    }

    fn stats(&self) -> CacheStats {
        self.metrics.snapshot(self.len())
    }
}
