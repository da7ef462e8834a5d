//! Export pruning.
//!
//! Given the set of export names a fork was requested with, removes or
//! demotes every other export and sweeps the code that is no longer
//! reachable from what survives. Wildcard re-exports are opaque and are
//! always left untouched; pruning through them stays the host bundler's
//! job.

use std::collections::BTreeSet;

use oxc_ast::ast::{
    Declaration, ExportAllDeclaration, ExportDefaultDeclaration, ExportDefaultDeclarationKind,
    ExportNamedDeclaration, ImportDeclaration, ImportDeclarationSpecifier, ImportOrExportKind,
    Program, Statement, VariableDeclarationKind,
};
use oxc_span::Span;
use rustc_hash::FxHashSet;

use crate::dce::{declarator_refs, mark_live, stmt_refs, LocalRender, LocalUnit};
use crate::edit::{line_indent, SourceEditor};
use crate::exports::{analyze_exports, binding_pattern_names};

/// Prunes a module down to `requested`.
///
/// Returns `None` when nothing needed to change: either every enumerable
/// export was requested (and no statement was touched), or the edits all
/// cancelled out. The caller can then skip emitting output and let the
/// host serve the module unchanged.
pub fn prune_exports(
    source_text: &str,
    program: &Program<'_>,
    requested: &BTreeSet<String>,
) -> Option<String> {
    let closure = analyze_exports(program);
    if !closure.opaque && closure.is_covered_by(requested) {
        return None;
    }

    let mut pruner = Pruner::new(source_text, requested);
    for stmt in &program.body {
        pruner.statement(stmt);
    }
    pruner.emit()
}

/// A variable statement whose declarators are swept individually and
/// re-rendered as a group.
struct VarGroup {
    span: Span,
    kind: &'static str,
    /// Declarator spans that stay in the `export` statement.
    kept_exported: Vec<Span>,
    /// (local-unit index, declarator span) for the sweepable rest.
    members: Vec<(usize, Span)>,
    exported: bool,
    indent: String,
}

struct ImportSpec {
    local: String,
    span: Span,
    braced: bool,
    type_only: bool,
}

struct ImportInfo {
    span: Span,
    source_span: Span,
    type_only: bool,
    /// `None` for a bindingless side-effect import, which always stays.
    specifiers: Option<Vec<ImportSpec>>,
}

struct Pruner<'s, 'req> {
    source: &'s str,
    requested: &'req BTreeSet<String>,
    /// Names referenced by statements that survive as-is.
    roots: FxHashSet<String>,
    locals: Vec<LocalUnit>,
    groups: Vec<VarGroup>,
    removals: Vec<Span>,
    rewrites: Vec<(Span, String)>,
    imports: Vec<ImportInfo>,
}

impl<'s, 'req> Pruner<'s, 'req> {
    fn new(source: &'s str, requested: &'req BTreeSet<String>) -> Self {
        Self {
            source,
            requested,
            roots: FxHashSet::default(),
            locals: Vec::new(),
            groups: Vec::new(),
            removals: Vec::new(),
            rewrites: Vec::new(),
            imports: Vec::new(),
        }
    }

    fn slice(&self, span: Span) -> &'s str {
        &self.source[span.start as usize..span.end as usize]
    }

    fn statement(&mut self, stmt: &Statement<'_>) {
        match stmt {
            Statement::ImportDeclaration(decl) => self.imports.push(import_info(decl)),
            Statement::ExportNamedDeclaration(decl) => self.export_named(stmt, decl),
            Statement::ExportDefaultDeclaration(decl) => self.export_default(stmt, decl),
            Statement::ExportAllDeclaration(decl) => self.export_all(decl),
            Statement::VariableDeclaration(var) => {
                let mut members = Vec::new();
                for declarator in &var.declarations {
                    let mut names = BTreeSet::new();
                    binding_pattern_names(&declarator.id, &mut names);
                    members.push((self.locals.len(), declarator.span));
                    self.locals.push(LocalUnit {
                        bindings: names.into_iter().collect(),
                        refs: declarator_refs(declarator),
                        render: LocalRender::GroupMember,
                    });
                }
                self.groups.push(VarGroup {
                    span: var.span,
                    kind: kind_text(var.kind),
                    kept_exported: Vec::new(),
                    members,
                    exported: false,
                    indent: line_indent(self.source, var.span.start).to_string(),
                });
            }
            Statement::FunctionDeclaration(func) => match &func.id {
                Some(id) => self.locals.push(LocalUnit {
                    bindings: vec![id.name.to_string()],
                    refs: stmt_refs(stmt),
                    render: LocalRender::Statement { span: func.span },
                }),
                None => self.roots.extend(stmt_refs(stmt)),
            },
            Statement::ClassDeclaration(class) => match &class.id {
                Some(id) => self.locals.push(LocalUnit {
                    bindings: vec![id.name.to_string()],
                    refs: stmt_refs(stmt),
                    render: LocalRender::Statement { span: class.span },
                }),
                None => self.roots.extend(stmt_refs(stmt)),
            },
            // Everything else (expressions, control flow, TS declarations)
            // stays put and roots whatever it references.
            _ => self.roots.extend(stmt_refs(stmt)),
        }
    }

    fn export_named(&mut self, stmt: &Statement<'_>, decl: &ExportNamedDeclaration<'_>) {
        if matches!(decl.export_kind, ImportOrExportKind::Type) {
            // `export type { T }` stays verbatim; root its locals so the
            // bindings (often type imports) they lean on survive the sweep.
            if decl.source.is_none() {
                for specifier in &decl.specifiers {
                    self.roots.insert(specifier.local.name().to_string());
                }
            }
            return;
        }
        if let Some(declaration) = &decl.declaration {
            self.export_declaration(stmt, decl.span, declaration);
        } else {
            self.export_specifiers(decl);
        }
    }

    fn export_declaration(
        &mut self,
        stmt: &Statement<'_>,
        export_span: Span,
        declaration: &Declaration<'_>,
    ) {
        match declaration {
            Declaration::FunctionDeclaration(func) => match &func.id {
                Some(id) if !self.requested.contains(id.name.as_str()) => {
                    self.demote(stmt, export_span, func.span, id.name.to_string());
                }
                _ => self.roots.extend(stmt_refs(stmt)),
            },
            Declaration::ClassDeclaration(class) => match &class.id {
                Some(id) if !self.requested.contains(id.name.as_str()) => {
                    self.demote(stmt, export_span, class.span, id.name.to_string());
                }
                _ => self.roots.extend(stmt_refs(stmt)),
            },
            Declaration::VariableDeclaration(var) => {
                let mut kept: Vec<Span> = Vec::new();
                let mut pruned = Vec::new();
                for declarator in &var.declarations {
                    let mut names = BTreeSet::new();
                    binding_pattern_names(&declarator.id, &mut names);
                    // A destructuring pattern cannot be split; it stays
                    // exported if any name it binds is requested.
                    if names.iter().any(|n| self.requested.contains(n)) {
                        kept.push(declarator.span);
                        self.roots.extend(declarator_refs(declarator));
                    } else {
                        pruned.push(declarator);
                    }
                }
                if pruned.is_empty() {
                    return;
                }
                let mut members = Vec::new();
                for declarator in pruned {
                    let mut names = BTreeSet::new();
                    binding_pattern_names(&declarator.id, &mut names);
                    members.push((self.locals.len(), declarator.span));
                    self.locals.push(LocalUnit {
                        bindings: names.into_iter().collect(),
                        refs: declarator_refs(declarator),
                        render: LocalRender::GroupMember,
                    });
                }
                self.groups.push(VarGroup {
                    span: export_span,
                    kind: kind_text(var.kind),
                    kept_exported: kept,
                    members,
                    exported: true,
                    indent: line_indent(self.source, export_span.start).to_string(),
                });
            }
            // TS declarations under `export` carry no prunable runtime
            // binding; leave them alone.
            _ => {}
        }
    }

    fn export_specifiers(&mut self, decl: &ExportNamedDeclaration<'_>) {
        let kept: Vec<_> = decl
            .specifiers
            .iter()
            .filter(|s| {
                matches!(s.export_kind, ImportOrExportKind::Type)
                    || self.requested.contains(s.exported.name().as_str())
            })
            .collect();

        if decl.source.is_none() {
            for specifier in &kept {
                self.roots.insert(specifier.local.name().to_string());
            }
        }
        if kept.len() == decl.specifiers.len() {
            return;
        }
        if kept.is_empty() {
            self.removals.push(decl.span);
            return;
        }
        let list = kept
            .iter()
            .map(|s| self.slice(s.span))
            .collect::<Vec<_>>()
            .join(", ");
        let replacement = match &decl.source {
            Some(source) => {
                format!("export {{ {list} }} from {};", self.slice(source.span))
            }
            None => format!("export {{ {list} }};"),
        };
        self.rewrites.push((decl.span, replacement));
    }

    fn export_default(&mut self, stmt: &Statement<'_>, decl: &ExportDefaultDeclaration<'_>) {
        if self.requested.contains("default") {
            self.roots.extend(stmt_refs(stmt));
            return;
        }
        match &decl.declaration {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) if func.id.is_some() => {
                let name = func.id.as_ref().unwrap().name.to_string();
                self.demote(stmt, decl.span, func.span, name);
            }
            ExportDefaultDeclarationKind::ClassDeclaration(class) if class.id.is_some() => {
                let name = class.id.as_ref().unwrap().name.to_string();
                self.demote(stmt, decl.span, class.span, name);
            }
            // Anonymous functions/classes and arbitrary expressions bind
            // nothing reachable; drop the statement.
            _ => self.removals.push(decl.span),
        }
    }

    fn export_all(&mut self, decl: &ExportAllDeclaration<'_>) {
        if matches!(decl.export_kind, ImportOrExportKind::Type) {
            return;
        }
        match &decl.exported {
            // `export * as ns` is a single enumerable name.
            Some(exported) => {
                if !self.requested.contains(exported.name().as_str()) {
                    self.removals.push(decl.span);
                }
            }
            // Bare `export *` is opaque: always preserved.
            None => {}
        }
    }

    fn demote(&mut self, stmt: &Statement<'_>, full_span: Span, inner_start: Span, name: String) {
        self.locals.push(LocalUnit {
            bindings: vec![name],
            refs: stmt_refs(stmt),
            render: LocalRender::Demoted {
                export_span: Span::new(full_span.start, inner_start.start),
                full_span,
            },
        });
    }

    fn emit(self) -> Option<String> {
        let (live, referenced) = mark_live(&self.roots, &self.locals);
        let mut editor = SourceEditor::new(self.source);

        for span in &self.removals {
            editor.remove_statement(*span);
        }
        for (span, replacement) in &self.rewrites {
            editor.replace(*span, replacement.clone());
        }

        for (unit, alive) in self.locals.iter().zip(&live) {
            match &unit.render {
                LocalRender::Statement { span } => {
                    if !*alive {
                        editor.remove_statement(*span);
                    }
                }
                LocalRender::Demoted {
                    export_span,
                    full_span,
                } => {
                    if *alive {
                        editor.remove(*export_span);
                    } else {
                        editor.remove_statement(*full_span);
                    }
                }
                LocalRender::GroupMember => {}
            }
        }

        for group in &self.groups {
            let live_spans: Vec<Span> = group
                .members
                .iter()
                .filter(|(index, _)| live[*index])
                .map(|(_, span)| *span)
                .collect();

            if group.exported {
                let mut text = String::new();
                if !group.kept_exported.is_empty() {
                    let list = group
                        .kept_exported
                        .iter()
                        .map(|span| self.slice(*span))
                        .collect::<Vec<_>>()
                        .join(", ");
                    text.push_str(&format!("export {} {list};", group.kind));
                }
                if !live_spans.is_empty() {
                    if !text.is_empty() {
                        text.push('\n');
                        text.push_str(&group.indent);
                    }
                    let list = live_spans
                        .iter()
                        .map(|span| self.slice(*span))
                        .collect::<Vec<_>>()
                        .join(", ");
                    text.push_str(&format!("{} {list};", group.kind));
                }
                if text.is_empty() {
                    editor.remove_statement(group.span);
                } else {
                    editor.replace(group.span, text);
                }
            } else {
                if live_spans.len() == group.members.len() {
                    continue;
                }
                if live_spans.is_empty() {
                    editor.remove_statement(group.span);
                    continue;
                }
                let list = live_spans
                    .iter()
                    .map(|span| self.slice(*span))
                    .collect::<Vec<_>>()
                    .join(", ");
                editor.replace(group.span, format!("{} {list};", group.kind));
            }
        }

        for import in &self.imports {
            let Some(specifiers) = &import.specifiers else {
                continue;
            };
            if import.type_only || specifiers.is_empty() {
                continue;
            }
            let live_specs: Vec<&ImportSpec> = specifiers
                .iter()
                .filter(|s| s.type_only || referenced.contains(&s.local))
                .collect();
            if live_specs.len() == specifiers.len() {
                continue;
            }
            if live_specs.is_empty() {
                editor.remove_statement(import.span);
                continue;
            }
            let mut head: Vec<String> = Vec::new();
            let mut braced: Vec<&str> = Vec::new();
            for spec in live_specs {
                if spec.braced {
                    braced.push(self.slice(spec.span));
                } else {
                    head.push(self.slice(spec.span).to_string());
                }
            }
            if !braced.is_empty() {
                head.push(format!("{{ {} }}", braced.join(", ")));
            }
            editor.replace(
                import.span,
                format!(
                    "import {} from {};",
                    head.join(", "),
                    self.slice(import.source_span)
                ),
            );
        }

        if editor.is_dirty() {
            Some(editor.finish())
        } else {
            None
        }
    }
}

fn import_info(decl: &ImportDeclaration<'_>) -> ImportInfo {
    ImportInfo {
        span: decl.span,
        source_span: decl.source.span,
        type_only: matches!(decl.import_kind, ImportOrExportKind::Type),
        specifiers: decl.specifiers.as_ref().map(|specifiers| {
            specifiers
                .iter()
                .map(|specifier| match specifier {
                    ImportDeclarationSpecifier::ImportSpecifier(s) => ImportSpec {
                        local: s.local.name.to_string(),
                        span: s.span,
                        braced: true,
                        type_only: matches!(s.import_kind, ImportOrExportKind::Type),
                    },
                    ImportDeclarationSpecifier::ImportDefaultSpecifier(s) => ImportSpec {
                        local: s.local.name.to_string(),
                        span: s.span,
                        braced: false,
                        type_only: false,
                    },
                    ImportDeclarationSpecifier::ImportNamespaceSpecifier(s) => ImportSpec {
                        local: s.local.name.to_string(),
                        span: s.span,
                        braced: false,
                        type_only: false,
                    },
                })
                .collect()
        }),
    }
}

fn kind_text(kind: VariableDeclarationKind) -> &'static str {
    match kind {
        VariableDeclarationKind::Var => "var",
        VariableDeclarationKind::Const => "const",
        VariableDeclarationKind::Let => "let",
        VariableDeclarationKind::Using => "using",
        VariableDeclarationKind::AwaitUsing => "await using",
    }
}
