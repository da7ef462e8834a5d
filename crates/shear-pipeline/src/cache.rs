//! Plugin-lifetime caches.
//!
//! Both caches are memoization points, not locks: concurrent probes of
//! the same target may duplicate pure work, and the last writer wins.
//! Eviction happens only through the invalidation hook.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Class-export verdicts keyed by canonical path.
#[derive(Debug, Default)]
pub(crate) struct ClassVerdictCache {
    inner: RwLock<FxHashMap<String, bool>>,
}

impl ClassVerdictCache {
    pub(crate) fn get(&self, path: &str) -> Option<bool> {
        self.inner.read().get(path).copied()
    }

    pub(crate) fn insert(&self, path: &str, verdict: bool) {
        self.inner.write().insert(path.to_string(), verdict);
    }

    pub(crate) fn evict(&self, path: &str) {
        self.inner.write().remove(path);
    }
}

/// Loaded source text keyed by (environment, canonical path).
#[derive(Debug, Default)]
pub(crate) struct SourceCache {
    inner: RwLock<FxHashMap<(String, String), Arc<str>>>,
}

impl SourceCache {
    pub(crate) fn get(&self, environment: &str, path: &str) -> Option<Arc<str>> {
        self.inner
            .read()
            .get(&(environment.to_string(), path.to_string()))
            .cloned()
    }

    pub(crate) fn insert(&self, environment: &str, path: &str, text: Arc<str>) {
        self.inner
            .write()
            .insert((environment.to_string(), path.to_string()), text);
    }

    /// Drops the entry for `path` in every environment.
    pub(crate) fn evict_path(&self, path: &str) {
        self.inner.write().retain(|(_, p), _| p != path);
    }
}
