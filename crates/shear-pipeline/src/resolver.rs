//! Default resolver adapter.
//!
//! Hosts normally hand the plugin their own resolver; this adapter wraps
//! `oxc_resolver` with TypeScript-friendly extensions so the pipeline can
//! run (and be tested) without a full host.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use oxc_resolver::{ResolveOptions, Resolver};

use crate::eligibility::clean_path;
use crate::host::HostResolver;

/// [`HostResolver`] backed by `oxc_resolver`.
pub struct OxcHostResolver {
    resolver: Arc<Resolver>,
    project_root: PathBuf,
}

impl OxcHostResolver {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let resolver = Resolver::new(ResolveOptions {
            extensions: [".ts", ".tsx", ".js", ".jsx", ".mjs", ".cjs", ".mts", ".cts"]
                .map(String::from)
                .to_vec(),
            ..ResolveOptions::default()
        });
        Self {
            resolver: Arc::new(resolver),
            project_root: project_root.into(),
        }
    }
}

#[async_trait]
impl HostResolver for OxcHostResolver {
    async fn resolve(&self, specifier: &str, importer: Option<&str>) -> Option<String> {
        let dir = importer
            .map(|importer| {
                Path::new(clean_path(importer))
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.project_root.clone())
            })
            .unwrap_or_else(|| self.project_root.clone());

        // Resolution touches the filesystem; keep it off the async
        // executor threads.
        let resolver = Arc::clone(&self.resolver);
        let specifier = specifier.to_string();
        tokio::task::spawn_blocking(move || {
            resolver
                .resolve(&dir, &specifier)
                .ok()
                .map(|resolution| resolution.full_path().to_string_lossy().into_owned())
        })
        .await
        .ok()
        .flatten()
    }
}
