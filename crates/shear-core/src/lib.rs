//! Shear Core - shared types for the export-splitting transform.
//!
//! This crate provides the leaf pieces the rest of the workspace builds on:
//!
//! - [`classify`]: import-source classification (path / alias / bare package)
//! - [`query`]: the query-tag codec that forks a module's identity by the
//!   set of export names requested from it
//! - [`ShearOptions`]: plugin configuration
//! - [`Error`] and [`Result`]: the common error type
//!
//! # Architecture
//!
//! A module is forked by appending a canonical query tag to its id:
//!
//! ```text
//! src/utils.ts                              (canonical id)
//! src/utils.ts?tss-split-exports=bar,foo    (forked id)
//! ```
//!
//! Two forks requesting the same export set always serialize to the same
//! id, so an id-keyed module cache treats them as one node; different sets
//! yield distinct nodes with independently pruned output.

pub mod error;
pub mod options;
pub mod query;
pub mod specifier;

// Re-export core types for convenience
pub use error::{Error, Result};
pub use options::ShearOptions;
pub use query::{
    append_tag, decode_tag, has_tag, split_tag, strip_tag, SPLIT_EXPORTS_PARAM,
};
pub use specifier::{classify, SpecifierKind};
