//! Shear JS - syntax-tree analysis and rewriting for JavaScript/TypeScript.
//!
//! Everything here operates on a single oxc parse of a module:
//!
//! - [`parse_program`]: one parse per transform; the resulting tree is
//!   shared by the analyzers and the rewriters
//! - [`analyze_imports`]: which export names each import source consumes
//! - [`analyze_exports`]: which names a module exports, and whether a
//!   wildcard re-export makes the full set unknowable
//! - [`exports_class`]: whether a module exports a class (such modules
//!   are never forked)
//! - [`rewrite_imports`]: tags eligible import sources with the requested
//!   export set
//! - [`prune_exports`]: removes or demotes exports outside a requested
//!   set, then sweeps the code that is no longer reachable
//!
//! All transforms are span-preserving text edits on the original source,
//! so untouched code keeps its exact bytes.

pub mod class_guard;
mod dce;
mod edit;
pub mod exports;
pub mod imports;
pub mod parse;
pub mod prune;
pub mod rewrite;

// Re-export the per-module entry points
pub use class_guard::exports_class;
pub use exports::{analyze_exports, ExportClosure};
pub use imports::{analyze_imports, ImportMap};
pub use parse::{parse_program, source_type_for_id};
pub use prune::prune_exports;
pub use rewrite::rewrite_imports;
