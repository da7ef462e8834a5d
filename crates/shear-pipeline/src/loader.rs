//! Module-loader collaborator.
//!
//! The class-export probe needs a target module's source text without
//! re-triggering this plugin's own transforms. The host usually adapts
//! its module loader here; [`NativeModuleLoader`] reads straight from
//! disk for tests and standalone hosts.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use shear_core::{Error, Result};

/// Fetches a module's untransformed source text.
#[async_trait]
pub trait ModuleLoader: Send + Sync {
    /// Loads the source of `id` for a build environment. Must be
    /// cache-coherent per environment: two loads of the same id in the
    /// same environment see the same content between invalidations.
    async fn load(&self, environment: &str, id: &str) -> Result<Arc<str>>;
}

/// Loads module source from the filesystem, ignoring the environment.
#[derive(Debug, Default)]
pub struct NativeModuleLoader;

#[async_trait]
impl ModuleLoader for NativeModuleLoader {
    async fn load(&self, _environment: &str, id: &str) -> Result<Arc<str>> {
        let path: PathBuf = Path::new(id).to_path_buf();
        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|source| Error::Load { path, source })?;
        Ok(Arc::from(text.as_str()))
    }
}
