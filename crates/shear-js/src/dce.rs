//! Dead-code elimination over a module's top level.
//!
//! Two-pass mark-and-sweep: reference sets are collected per top-level
//! statement from the original tree, liveness is propagated from the
//! statements that survive pruning, and everything unreferenced is swept.
//! The reference walk is scope-naive (an inner binding with the same name
//! counts as a reference), which errs on the side of keeping code.

use oxc_ast::ast::{IdentifierReference, Statement, VariableDeclarator};
use oxc_ast_visit::{walk, Visit};
use oxc_span::Span;
use rustc_hash::FxHashSet;

/// Collects the names of every identifier referenced inside a subtree.
#[derive(Default)]
struct RefCollector {
    names: FxHashSet<String>,
}

impl<'a> Visit<'a> for RefCollector {
    fn visit_identifier_reference(&mut self, it: &IdentifierReference<'a>) {
        self.names.insert(it.name.to_string());
        walk::walk_identifier_reference(self, it);
    }
}

/// Identifier names referenced anywhere inside `stmt`.
pub(crate) fn stmt_refs(stmt: &Statement<'_>) -> FxHashSet<String> {
    let mut collector = RefCollector::default();
    collector.visit_statement(stmt);
    collector.names
}

/// Identifier names referenced by one variable declarator (its
/// initializer, pattern defaults, and type annotation).
pub(crate) fn declarator_refs(declarator: &VariableDeclarator<'_>) -> FxHashSet<String> {
    let mut collector = RefCollector::default();
    collector.visit_variable_declarator(declarator);
    collector.names
}

/// How a swept local unit is written back out.
#[derive(Debug)]
pub(crate) enum LocalRender {
    /// A whole statement: deleted when dead.
    Statement { span: Span },
    /// A declaration export demoted to local scope: the `export` prefix is
    /// stripped when alive, the whole statement deleted when dead.
    Demoted { export_span: Span, full_span: Span },
    /// A declarator emitted (or not) by its owning variable-statement
    /// group.
    GroupMember,
}

/// One sweepable unit: a top-level declaration (or single declarator)
/// that survives only while something live references it.
#[derive(Debug)]
pub(crate) struct LocalUnit {
    pub bindings: Vec<String>,
    pub refs: FxHashSet<String>,
    pub render: LocalRender,
}

/// Marks local units reachable from `roots`.
///
/// Returns the per-unit liveness plus the full referenced-name set (root
/// references and the references of every live unit) used to sweep
/// imports.
pub(crate) fn mark_live(
    roots: &FxHashSet<String>,
    locals: &[LocalUnit],
) -> (Vec<bool>, FxHashSet<String>) {
    let mut live = vec![false; locals.len()];
    let mut referenced = roots.clone();

    loop {
        let mut changed = false;
        for (index, unit) in locals.iter().enumerate() {
            if live[index] {
                continue;
            }
            if unit.bindings.iter().any(|name| referenced.contains(name)) {
                live[index] = true;
                changed = true;
                for name in &unit.refs {
                    referenced.insert(name.clone());
                }
            }
        }
        if !changed {
            return (live, referenced);
        }
    }
}
