//! Shear Pipeline - wires the analyzers and rewriters into a host build
//! pipeline.
//!
//! The host drives four hooks, in order:
//!
//! ```text
//! ┌─────────────────────┐
//! │  rewrite_imports    │  tag eligible import edges (pre-transform)
//! └─────────┬───────────┘
//!           ▼
//! ┌─────────────────────┐
//! │  resolve_forked_id  │  re-attach the tag to the resolved id;
//! └─────────┬───────────┘  this is what forks the module graph
//!           ▼
//! ┌─────────────────────┐
//! │  transform_exports  │  prune a forked module to its requested set
//! └─────────┬───────────┘
//!           ▼
//! ┌─────────────────────┐
//! │  invalidate         │  drop forks (and caches) of a changed file
//! └─────────────────────┘
//! ```
//!
//! The pipeline owns two caches: the class-export verdict per canonical
//! path, and the loaded source text per (environment, path) used by the
//! class probe. Both live for the plugin instance and are evicted by
//! [`ShearPlugin::invalidate`].

mod cache;
mod eligibility;
pub mod host;
pub mod loader;
pub mod plugin;
pub mod resolver;

// Re-export the plugin surface
pub use host::{HostModuleGraph, HostResolver};
pub use loader::{ModuleLoader, NativeModuleLoader};
pub use plugin::ShearPlugin;
pub use resolver::OxcHostResolver;
