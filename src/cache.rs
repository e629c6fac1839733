//! Term memoization with an explicit capacity policy

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// How resolved terms are memoized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CachePolicy {
    pub enabled: bool,
    /// Maximum number of keys held; oldest insertions are evicted first.
    /// `None` keeps entries for the session lifetime.
    pub capacity: Option<usize>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: None,
        }
    }
}

impl CachePolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            capacity: None,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            enabled: true,
            capacity: Some(capacity),
        }
    }
}

/// Hit/miss counters and current size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Key-value memo with FIFO eviction.
///
/// Several keys may point at the same value (a term is stored under the key
/// it was requested by and under its id).
#[derive(Debug)]
pub struct TermCache<V> {
    policy: CachePolicy,
    entries: DashMap<String, V>,
    order: Mutex<VecDeque<String>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> TermCache<V> {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn is_enabled(&self) -> bool {
        self.policy.enabled
    }

    /// Look `key` up, counting the hit or miss. Always misses when disabled.
    pub fn get(&self, key: &str) -> Option<V> {
        if !self.policy.enabled {
            return None;
        }
        match self.entries.get(key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(key, "cache hit");
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Like [`get`](Self::get) but leaves the counters alone.
    pub fn peek(&self, key: &str) -> Option<V> {
        if !self.policy.enabled {
            return None;
        }
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Whether `key` is cached, without touching the counters.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Store `value` under each of `keys`. No-op when disabled.
    pub fn insert<S: AsRef<str>>(&self, keys: &[S], value: V) {
        if !self.policy.enabled {
            return;
        }
        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        for key in keys {
            let key = key.as_ref();
            if self.entries.insert(key.to_string(), value.clone()).is_none() {
                order.push_back(key.to_string());
            }
        }
        if let Some(capacity) = self.policy.capacity {
            while order.len() > capacity {
                let Some(oldest) = order.pop_front() else { break };
                self.entries.remove(&oldest);
                debug!(key = %oldest, "cache eviction");
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        let mut order = self.order.lock().unwrap_or_else(PoisonError::into_inner);
        order.clear();
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}
