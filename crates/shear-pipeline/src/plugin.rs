//! The pipeline orchestrator.
//!
//! One [`ShearPlugin`] instance serves every build environment of a host.
//! Hooks may run concurrently for different files; the only shared state
//! is the two lock-guarded caches, with last-write-wins semantics.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::future::join_all;
use globset::GlobSet;
use oxc_allocator::Allocator;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use shear_core::{
    append_tag, has_tag, split_tag, strip_tag, Result, ShearOptions, SPLIT_EXPORTS_PARAM,
};
use shear_js::{
    analyze_imports, exports_class, parse_program, prune_exports, source_type_for_id,
};

use crate::cache::{ClassVerdictCache, SourceCache};
use crate::eligibility::{clean_path, has_unrelated_marker, is_eligible_id};
use crate::host::{HostModuleGraph, HostResolver};
use crate::loader::ModuleLoader;

/// The export-splitting plugin.
pub struct ShearPlugin {
    options: ShearOptions,
    ignore: GlobSet,
    class_verdicts: ClassVerdictCache,
    sources: SourceCache,
}

impl ShearPlugin {
    /// Creates a plugin instance for the given options.
    ///
    /// # Errors
    ///
    /// Returns an error when the ignore globs fail to compile.
    pub fn new(options: ShearOptions) -> Result<Self> {
        let ignore = options.ignore_set()?;
        Ok(Self {
            options,
            ignore,
            class_verdicts: ClassVerdictCache::default(),
            sources: SourceCache::default(),
        })
    }

    /// Stage 1: rewrite stage, installed before other source transforms.
    ///
    /// Tags every eligible import edge of `id` with the export names it
    /// consumes. Import targets are resolved concurrently; an edge is
    /// left alone when its target is unresolvable, outside the project,
    /// not a parseable source type, or exports a class. Returns `None`
    /// when no import changed.
    ///
    /// # Errors
    ///
    /// Fails when `code` does not parse; the host fails that file's
    /// build.
    pub async fn rewrite_imports(
        &self,
        environment: &str,
        code: &str,
        id: &str,
        resolver: &dyn HostResolver,
        loader: &dyn ModuleLoader,
    ) -> Result<Option<String>> {
        if !is_eligible_id(id, &self.options, &self.ignore) {
            return Ok(None);
        }

        // The arena-backed tree must not live across an await point, so
        // analysis is scoped; its output owns everything the rewrite
        // needs and the file is parsed exactly once.
        let imports = {
            let allocator = Allocator::default();
            let program = parse_program(&allocator, code, source_type_for_id(id), id)?;
            analyze_imports(&program)
        };
        if imports.is_empty() {
            return Ok(None);
        }

        // None of the targets depends on another; resolve them batched.
        let importer = clean_path(id);
        let resolutions = join_all(imports.sources.keys().map(|source| {
            let source = source.clone();
            async move {
                let target = resolver.resolve(&source, Some(importer)).await;
                (source, target)
            }
        }))
        .await;

        let mut plan: FxHashMap<String, BTreeSet<String>> = FxHashMap::default();
        for (source, target) in resolutions {
            let Some(target) = target else {
                debug!(source = %source, importer = id, "import target unresolved, edge left as-is");
                continue;
            };
            if !is_eligible_id(&target, &self.options, &self.ignore) {
                continue;
            }
            if self.target_exports_class(environment, &target, loader).await {
                debug!(source = %source, target = %target, "target exports a class, never forked");
                continue;
            }
            if let Some(names) = imports.names(&source) {
                plan.insert(source, names.clone());
            }
        }
        if plan.is_empty() {
            return Ok(None);
        }

        Ok(shear_js::rewrite_imports(code, &imports, &plan))
    }

    /// Stage 2: specifier-resolve stage.
    ///
    /// For a tagged specifier, resolves its untagged form through the
    /// host and re-attaches the re-canonicalized tag to the absolute id.
    /// The host then treats each (canonical id, tag) pair as a distinct
    /// module node, which is what forks the graph.
    pub async fn resolve_forked_id(
        &self,
        specifier: &str,
        importer: Option<&str>,
        resolver: &dyn HostResolver,
    ) -> Option<String> {
        if !has_tag(specifier) {
            return None;
        }
        let (clean, names) = split_tag(specifier);
        let names = names.filter(|names| !names.is_empty())?;
        let resolved = resolver.resolve(&clean, importer).await?;
        Some(append_tag(&resolved, &names))
    }

    /// Stage 3: export-transform stage, installed before other source
    /// transforms.
    ///
    /// Prunes a forked module down to the export set encoded in its id.
    /// Ids claimed by the unrelated directive-extraction mechanism are
    /// skipped. Returns `None` when the module already matches its
    /// requested set.
    ///
    /// # Errors
    ///
    /// Fails when `code` does not parse.
    pub fn transform_exports(&self, code: &str, id: &str) -> Result<Option<String>> {
        if has_unrelated_marker(id) || !has_tag(id) {
            return Ok(None);
        }
        let Some(requested) = shear_core::decode_tag(id) else {
            return Ok(None);
        };
        if requested.is_empty() {
            return Ok(None);
        }

        let allocator = Allocator::default();
        let program = parse_program(&allocator, code, source_type_for_id(id), id)?;
        Ok(prune_exports(code, &program, &requested))
    }

    /// Stage 4: invalidation stage.
    ///
    /// On a change of `changed_id`, marks every fork of that file (and
    /// the fork's importers) dirty in the host graph and returns the
    /// extra invalidated ids. Also drops the file from the class-verdict
    /// and loaded-source caches.
    pub fn invalidate(&self, graph: &dyn HostModuleGraph, changed_id: &str) -> Vec<String> {
        let canonical = clean_path(changed_id);
        self.class_verdicts.evict(canonical);
        self.sources.evict_path(canonical);

        let mut extra = Vec::new();
        for id in graph.ids_containing(SPLIT_EXPORTS_PARAM) {
            if strip_tag(&id) != canonical && id != changed_id {
                continue;
            }
            debug!(fork = %id, changed = changed_id, "invalidating fork of changed file");
            graph.invalidate(&id);
            for importer in graph.importers_of(&id) {
                graph.invalidate(&importer);
                extra.push(importer);
            }
            extra.push(id);
        }
        extra.sort();
        extra.dedup();
        extra
    }

    /// Cached class-export probe for a resolved import target.
    ///
    /// Load or parse failures fail open: the target is assumed not to
    /// export a class and forking proceeds. A transient failure can
    /// therefore fork a class-exporting module; the alternative (failing
    /// closed) would silently disable the optimization on flaky I/O.
    async fn target_exports_class(
        &self,
        environment: &str,
        target: &str,
        loader: &dyn ModuleLoader,
    ) -> bool {
        let canonical = clean_path(target).to_string();
        if let Some(verdict) = self.class_verdicts.get(&canonical) {
            return verdict;
        }

        let text = match self.sources.get(environment, &canonical) {
            Some(text) => text,
            None => match loader.load(environment, &canonical).await {
                Ok(text) => {
                    self.sources.insert(environment, &canonical, Arc::clone(&text));
                    text
                }
                Err(error) => {
                    warn!(%error, target = %canonical, "class probe could not load target, assuming no class exports");
                    return false;
                }
            },
        };

        let verdict = {
            let allocator = Allocator::default();
            let code: &str = &text;
            match parse_program(&allocator, code, source_type_for_id(&canonical), &canonical) {
                Ok(program) => exports_class(&program),
                Err(error) => {
                    warn!(%error, target = %canonical, "class probe could not parse target, assuming no class exports");
                    false
                }
            }
        };
        self.class_verdicts.insert(&canonical, verdict);
        verdict
    }
}
