use dockside_dns_domain::QuestionKey;
use hickory_proto::op::{Message, Query};

/// Snapshot of cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub evictions: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            (self.hits as f64 / total as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Bounded store of upstream responses keyed by question fingerprint.
pub trait ResponseCache: Send + Sync {
    /// Returns a copy of the cached response. Expired entries are removed
    /// and reported as misses.
    fn get(&self, key: &QuestionKey) -> Option<Message>;

    /// Stores `response` under its first question. An existing entry for the
    /// same key is left untouched.
    fn add(&self, response: &Message);

    fn remove(&self, key: &QuestionKey);

    /// Drops every entry and zeroes the counters.
    fn reset(&self);

    fn stats(&self) -> CacheStats;
}

pub fn question_key(query: &Query) -> QuestionKey {
    QuestionKey::new(&query.name().to_ascii(), &query.query_type().to_string())
}
