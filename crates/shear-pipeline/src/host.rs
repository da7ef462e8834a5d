//! Host build-pipeline contract.
//!
//! The host brings its own resolver and module graph; the plugin only
//! consumes them through these traits. Hooks are independent asynchronous
//! units: the plugin assumes no ordering between files and shares no
//! mutable state across invocations beyond its own lock-guarded caches.

use async_trait::async_trait;

/// The host's specifier resolver.
#[async_trait]
pub trait HostResolver: Send + Sync {
    /// Resolves `specifier` from `importer` to an absolute module id, or
    /// `None` when the target cannot be resolved. An unresolvable import
    /// is not an error for this plugin; the edge is simply left
    /// unrewritten.
    async fn resolve(&self, specifier: &str, importer: Option<&str>) -> Option<String>;
}

/// The host's module graph, queryable by id fragment and by importers.
pub trait HostModuleGraph: Send + Sync {
    /// Ids of every module whose id contains `fragment`.
    fn ids_containing(&self, fragment: &str) -> Vec<String>;

    /// Ids of the modules importing `id`.
    fn importers_of(&self, id: &str) -> Vec<String>;

    /// Marks `id` dirty so the next request recomputes its transform.
    fn invalidate(&self, id: &str);
}
