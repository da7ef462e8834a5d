//! Import rewriting.
//!
//! Replaces the source string of selected import declarations with its
//! tagged form, so the host's resolver later forks the target module per
//! requested export set. Resolution and class checks happen in the
//! pipeline; this is a pure span edit.

use std::collections::BTreeSet;

use rustc_hash::FxHashMap;

use shear_core::append_tag;

use crate::edit::SourceEditor;
use crate::imports::ImportMap;

/// Rewrites every import whose source appears in `plan` to carry the
/// encoded requested-export set.
///
/// `plan` is usually a filtered subset of the [`ImportMap`]'s entries:
/// the pipeline drops sources whose targets are unresolvable, outside the
/// project, or export a class. Returns `None` when no import changed.
pub fn rewrite_imports(
    source_text: &str,
    imports: &ImportMap,
    plan: &FxHashMap<String, BTreeSet<String>>,
) -> Option<String> {
    let mut editor = SourceEditor::new(source_text);

    for (source, names) in plan {
        if names.is_empty() {
            continue;
        }
        let Some(entry) = imports.sources.get(source) else {
            continue;
        };
        let tagged = append_tag(source, names);
        for span in &entry.source_spans {
            let raw = editor.slice(*span);
            // The span covers the literal with its quotes; keep whichever
            // quote style the author used.
            let quote = raw.chars().next().unwrap_or('\'');
            editor.replace(*span, format!("{quote}{tagged}{quote}"));
        }
    }

    if editor.is_dirty() {
        Some(editor.finish())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imports::analyze_imports;
    use crate::parse::{parse_program, source_type_for_id};
    use oxc_allocator::Allocator;

    fn rewrite_all(source: &str) -> Option<String> {
        let allocator = Allocator::default();
        let program =
            parse_program(&allocator, source, source_type_for_id("/m.ts"), "/m.ts").unwrap();
        let imports = analyze_imports(&program);
        let plan: FxHashMap<String, BTreeSet<String>> = imports
            .sources
            .iter()
            .map(|(source, entry)| (source.clone(), entry.names.clone()))
            .collect();
        rewrite_imports(source, &imports, &plan)
    }

    #[test]
    fn test_names_are_sorted_into_the_tag() {
        let out = rewrite_all("import { foo, bar } from './utils';").unwrap();
        assert_eq!(out, "import { foo, bar } from './utils?tss-split-exports=bar,foo';");
    }

    #[test]
    fn test_quote_style_is_preserved() {
        let out = rewrite_all("import { a } from \"./m\";").unwrap();
        assert!(out.contains("\"./m?tss-split-exports=a\""));
    }

    #[test]
    fn test_default_import_requests_default() {
        let out = rewrite_all("import def from './utils';").unwrap();
        assert!(out.contains("'./utils?tss-split-exports=default'"));
    }

    #[test]
    fn test_same_source_twice_gets_the_union_on_both() {
        let out = rewrite_all(
            "import { a } from './m';\nimport { b } from './m';",
        )
        .unwrap();
        let tagged = "'./m?tss-split-exports=a,b'";
        assert_eq!(out.matches(tagged).count(), 2);
    }

    #[test]
    fn test_nothing_eligible_returns_none() {
        assert_eq!(rewrite_all("import _ from 'lodash';"), None);
        assert_eq!(rewrite_all("import './side-effect';"), None);
        assert_eq!(rewrite_all("export const a = 1;"), None);
    }

    #[test]
    fn test_plan_subset_only_rewrites_listed_sources() {
        let source = "import { a } from './keep';\nimport { b } from './skip';";
        let allocator = Allocator::default();
        let program =
            parse_program(&allocator, source, source_type_for_id("/m.ts"), "/m.ts").unwrap();
        let imports = analyze_imports(&program);
        let mut plan: FxHashMap<String, BTreeSet<String>> = FxHashMap::default();
        plan.insert(
            "./keep".to_string(),
            imports.names("./keep").unwrap().clone(),
        );
        let out = rewrite_imports(source, &imports, &plan).unwrap();
        assert!(out.contains("'./keep?tss-split-exports=a'"));
        assert!(out.contains("'./skip'"));
    }
}
