//! Class-export detection.
//!
//! A forked module is re-transformed per requested export set, so a class
//! it defines would become a structurally identical but distinct class in
//! every fork, breaking `instanceof` and reference equality across call
//! sites. Modules that export a locally defined class are therefore never
//! forked; the check runs before import rewriting.

use oxc_ast::ast::{
    BindingPatternKind, Declaration, ExportDefaultDeclarationKind, Expression, Program,
    Statement, VariableDeclarator,
};
use rustc_hash::FxHashSet;

/// Whether a module exports a locally defined class.
///
/// True for directly exported class declarations, `export default class`
/// (named or anonymous), `export const X = class ...`, and local classes
/// or class-expression variables re-exported via a specifier list or
/// `export default Identifier`. Re-exports from *other* modules are not
/// locally verifiable as classes and report false, as does class-looking
/// text inside strings or comments.
pub fn exports_class(program: &Program<'_>) -> bool {
    // Names bound to a class value somewhere at the top level. Collected
    // up front: `export { Foo }` may precede `class Foo {}`.
    let mut class_bindings: FxHashSet<&str> = FxHashSet::default();

    for stmt in &program.body {
        match stmt {
            Statement::ClassDeclaration(class) => {
                if let Some(id) = &class.id {
                    class_bindings.insert(id.name.as_str());
                }
            }
            Statement::VariableDeclaration(var) => {
                for declarator in &var.declarations {
                    collect_class_binding(declarator, &mut class_bindings);
                }
            }
            Statement::ExportNamedDeclaration(decl) => match &decl.declaration {
                Some(Declaration::ClassDeclaration(_)) => return true,
                Some(Declaration::VariableDeclaration(var)) => {
                    if var.declarations.iter().any(declarator_is_class) {
                        return true;
                    }
                }
                _ => {}
            },
            Statement::ExportDefaultDeclaration(decl) => {
                if matches!(
                    decl.declaration,
                    ExportDefaultDeclarationKind::ClassDeclaration(_)
                ) {
                    return true;
                }
            }
            _ => {}
        }
    }

    if class_bindings.is_empty() {
        return false;
    }

    for stmt in &program.body {
        match stmt {
            // Local specifier re-export: `export { Foo }`. A sourced list
            // re-exports another module's binding and proves nothing.
            Statement::ExportNamedDeclaration(decl) if decl.source.is_none() => {
                for specifier in &decl.specifiers {
                    if class_bindings.contains(specifier.local.name().as_str()) {
                        return true;
                    }
                }
            }
            Statement::ExportDefaultDeclaration(decl) => {
                if let ExportDefaultDeclarationKind::Identifier(ident) = &decl.declaration {
                    if class_bindings.contains(ident.name.as_str()) {
                        return true;
                    }
                }
            }
            _ => {}
        }
    }

    false
}

fn collect_class_binding<'a>(
    declarator: &'a VariableDeclarator<'a>,
    class_bindings: &mut FxHashSet<&'a str>,
) {
    if declarator_is_class(declarator) {
        if let BindingPatternKind::BindingIdentifier(id) = &declarator.id.kind {
            class_bindings.insert(id.name.as_str());
        }
    }
}

fn declarator_is_class(declarator: &VariableDeclarator<'_>) -> bool {
    matches!(declarator.init, Some(Expression::ClassExpression(_)))
}
