//! Export analysis.
//!
//! Enumerates the export names a module declares, and flags the module as
//! opaque when a wildcard re-export makes the full set unknowable without
//! resolving the re-exported module.

use std::collections::BTreeSet;

use oxc_ast::ast::{
    BindingPattern, BindingPatternKind, Declaration, ImportOrExportKind, Program,
    Statement,
};

/// The enumerable export names of a module.
#[derive(Debug, Clone, Default)]
pub struct ExportClosure {
    /// Every export name that can be enumerated locally; a default export
    /// contributes `default`.
    pub names: BTreeSet<String>,
    /// Set when the module contains `export * from ...`. An opaque module
    /// still has its enumerable exports pruned normally; only the wildcard
    /// itself is beyond local analysis.
    pub opaque: bool,
}

impl ExportClosure {
    /// Whether every enumerable name is inside `requested`.
    pub fn is_covered_by(&self, requested: &BTreeSet<String>) -> bool {
        self.names.iter().all(|name| requested.contains(name))
    }
}

/// Enumerates the exports of a module.
///
/// Covers declaration exports (`const`/`let`/`var` through destructuring
/// patterns, `function`, `class`), `export default`, local and re-export
/// specifier lists (the *exported* name, not the local one), and
/// `export * as ns`. Bare `export *` sets [`ExportClosure::opaque`] and
/// contributes no names. Type-only exports are erased downstream and are
/// not runtime exports, so they are not enumerated.
pub fn analyze_exports(program: &Program<'_>) -> ExportClosure {
    let mut closure = ExportClosure::default();

    for stmt in &program.body {
        match stmt {
            Statement::ExportNamedDeclaration(decl) => {
                if matches!(decl.export_kind, ImportOrExportKind::Type) {
                    continue;
                }
                if let Some(declaration) = &decl.declaration {
                    declaration_names(declaration, &mut closure.names);
                }
                for specifier in &decl.specifiers {
                    if matches!(specifier.export_kind, ImportOrExportKind::Type) {
                        continue;
                    }
                    closure.names.insert(specifier.exported.name().to_string());
                }
            }
            Statement::ExportDefaultDeclaration(_) => {
                closure.names.insert("default".to_string());
            }
            Statement::ExportAllDeclaration(decl) => {
                if matches!(decl.export_kind, ImportOrExportKind::Type) {
                    continue;
                }
                match &decl.exported {
                    // `export * as ns from ...` exports the single name `ns`.
                    Some(name) => {
                        closure.names.insert(name.name().to_string());
                    }
                    None => closure.opaque = true,
                }
            }
            _ => {}
        }
    }

    closure
}

/// Collects the names a declaration binds.
pub(crate) fn declaration_names(declaration: &Declaration<'_>, out: &mut BTreeSet<String>) {
    match declaration {
        Declaration::VariableDeclaration(var) => {
            for declarator in &var.declarations {
                binding_pattern_names(&declarator.id, out);
            }
        }
        Declaration::FunctionDeclaration(func) => {
            if let Some(id) = &func.id {
                out.insert(id.name.to_string());
            }
        }
        Declaration::ClassDeclaration(class) => {
            if let Some(id) = &class.id {
                out.insert(id.name.to_string());
            }
        }
        // TS-only declarations carry no runtime bindings worth forking.
        _ => {}
    }
}

/// Collects every identifier a binding pattern introduces, walking through
/// object/array destructuring, defaults, and rest elements.
pub(crate) fn binding_pattern_names(pattern: &BindingPattern<'_>, out: &mut BTreeSet<String>) {
    match &pattern.kind {
        BindingPatternKind::BindingIdentifier(id) => {
            out.insert(id.name.to_string());
        }
        BindingPatternKind::ObjectPattern(object) => {
            for property in &object.properties {
                binding_pattern_names(&property.value, out);
            }
            if let Some(rest) = &object.rest {
                binding_pattern_names(&rest.argument, out);
            }
        }
        BindingPatternKind::ArrayPattern(array) => {
            for element in array.elements.iter().flatten() {
                binding_pattern_names(element, out);
            }
            if let Some(rest) = &array.rest {
                binding_pattern_names(&rest.argument, out);
            }
        }
        BindingPatternKind::AssignmentPattern(assignment) => {
            binding_pattern_names(&assignment.left, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_program;
    use oxc_allocator::Allocator;
    use oxc_span::SourceType;

    fn analyze(source: &str) -> ExportClosure {
        let allocator = Allocator::default();
        let program =
            parse_program(&allocator, source, SourceType::ts(), "/test.ts").unwrap();
        analyze_exports(&program)
    }

    fn names(closure: &ExportClosure) -> Vec<String> {
        closure.names.iter().cloned().collect()
    }

    #[test]
    fn test_declaration_exports() {
        let closure = analyze(
            "export const a = 1, b = 2;\nexport function f() {}\nexport class C {}\nexport let { x, y: z } = obj;",
        );
        assert_eq!(names(&closure), ["C", "a", "b", "f", "x", "z"]);
        assert!(!closure.opaque);
    }

    #[test]
    fn test_default_export() {
        let closure = analyze("export default function main() {}");
        assert_eq!(names(&closure), ["default"]);
    }

    #[test]
    fn test_specifier_exports_use_exported_name() {
        let closure = analyze(
            "const a = 1, b = 2;\nexport { a, b as c };\nexport { d, e as f } from './other';",
        );
        assert_eq!(names(&closure), ["a", "c", "d", "f"]);
    }

    #[test]
    fn test_wildcard_sets_opaque() {
        let closure = analyze("export * from './other';\nexport const a = 1;");
        assert!(closure.opaque);
        assert_eq!(names(&closure), ["a"]);
    }

    #[test]
    fn test_namespace_reexport_is_enumerable() {
        let closure = analyze("export * as ns from './other';");
        assert!(!closure.opaque);
        assert_eq!(names(&closure), ["ns"]);
    }

    #[test]
    fn test_type_exports_are_not_enumerated() {
        let closure = analyze(
            "export type T = number;\nexport type { U } from './types';\nexport const real = 1;",
        );
        assert_eq!(names(&closure), ["real"]);
    }

    #[test]
    fn test_coverage_check() {
        let closure = analyze("export const a = 1;\nexport const b = 2;");
        let requested: BTreeSet<String> =
            ["a", "b", "extra"].iter().map(|s| s.to_string()).collect();
        assert!(closure.is_covered_by(&requested));
        let partial: BTreeSet<String> = ["a"].iter().map(|s| s.to_string()).collect();
        assert!(!closure.is_covered_by(&partial));
    }
}
