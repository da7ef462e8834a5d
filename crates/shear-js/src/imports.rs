//! Import analysis.
//!
//! Produces, per distinct import source, the set of value-level binding
//! names a module actually consumes from it. Only entries that survive
//! the skip rules here are candidates for forking.

use std::collections::BTreeSet;

use oxc_ast::ast::{
    ImportDeclarationSpecifier, ImportOrExportKind, Program, Statement,
};
use oxc_span::Span;
use rustc_hash::{FxHashMap, FxHashSet};

use shear_core::{classify, has_tag};

/// Names requested from one import source, plus where its source string
/// literals sit in the text (one span per import declaration, quotes
/// included) so the rewriter can retag them without another parse.
#[derive(Debug, Clone, Default)]
pub struct ImportEntry {
    /// Requested export names; a default import contributes `default`.
    pub names: BTreeSet<String>,
    /// Spans of the source string literals to rewrite.
    pub source_spans: Vec<Span>,
}

/// Per-module import table: source string to requested names.
#[derive(Debug, Clone, Default)]
pub struct ImportMap {
    pub sources: FxHashMap<String, ImportEntry>,
}

impl ImportMap {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Requested names for `source`, if it survived analysis.
    pub fn names(&self, source: &str) -> Option<&BTreeSet<String>> {
        self.sources.get(source).map(|entry| &entry.names)
    }
}

/// Builds the import table for a module.
///
/// Skip rules, each a hard skip for that entry:
/// - type-only imports, and type-only specifiers within a value import
///   (an entry whose specifiers are all type-only is dropped)
/// - any namespace specifier disqualifies the entire source: an aliased
///   namespace object cannot be selectively pruned
/// - zero-specifier side-effect imports
/// - sources already carrying a query tag (no re-tagging)
/// - bare package sources
///
/// Several declarations importing from the same source union their names.
pub fn analyze_imports(program: &Program<'_>) -> ImportMap {
    let mut sources: FxHashMap<String, ImportEntry> = FxHashMap::default();
    let mut disqualified: FxHashSet<String> = FxHashSet::default();

    for stmt in &program.body {
        let Statement::ImportDeclaration(decl) = stmt else {
            continue;
        };
        if matches!(decl.import_kind, ImportOrExportKind::Type) {
            continue;
        }
        let source = decl.source.value.as_str();
        if has_tag(source) || !classify(source).is_forkable() {
            continue;
        }
        let Some(specifiers) = &decl.specifiers else {
            // `import './polyfill'` binds nothing; leave it alone.
            continue;
        };
        if specifiers.is_empty() {
            continue;
        }

        let mut names: BTreeSet<String> = BTreeSet::new();
        let mut namespace = false;
        for specifier in specifiers {
            match specifier {
                ImportDeclarationSpecifier::ImportSpecifier(s) => {
                    if matches!(s.import_kind, ImportOrExportKind::Type) {
                        continue;
                    }
                    names.insert(s.imported.name().to_string());
                }
                ImportDeclarationSpecifier::ImportDefaultSpecifier(_) => {
                    names.insert("default".to_string());
                }
                ImportDeclarationSpecifier::ImportNamespaceSpecifier(_) => {
                    namespace = true;
                }
            }
        }

        if namespace {
            disqualified.insert(source.to_string());
            continue;
        }
        if names.is_empty() {
            // All specifiers were type-only.
            continue;
        }

        let entry = sources.entry(source.to_string()).or_default();
        entry.names.extend(names);
        entry.source_spans.push(decl.source.span);
    }

    for source in &disqualified {
        sources.remove(source);
    }

    ImportMap { sources }
}
