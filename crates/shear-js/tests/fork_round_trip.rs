//! End-to-end: an importer is rewritten, the tag is decoded back off the
//! forked id, and the target is pruned with exactly that set.

use std::collections::BTreeSet;

use oxc_allocator::Allocator;
use rustc_hash::FxHashMap;

use shear_core::{append_tag, decode_tag, split_tag};
use shear_js::{
    analyze_exports, analyze_imports, parse_program, prune_exports, rewrite_imports,
    source_type_for_id,
};

const IMPORTER: &str = "import { formatDate, parseDate } from './dates';\n\
import { unrelated } from 'some-pkg';\n\
\n\
export const render = () => formatDate(parseDate('2024-01-01'));\n";

const TARGET: &str = "import { pad } from './pad';\n\
\n\
const ISO = /\\d{4}-\\d{2}-\\d{2}/;\n\
\n\
export const formatDate = (d) => pad(d.getFullYear());\n\
export const parseDate = (s) => new Date(s);\n\
export const startOfWeek = (d) => shiftDays(d, -d.getDay());\n\
const shiftDays = (d, n) => new Date(d.getTime() + n * 86400000);\n\
export function assertIso(s) { return ISO.test(s); }\n";

fn rewrite_everything(source: &str, id: &str) -> Option<String> {
    let allocator = Allocator::default();
    let program = parse_program(&allocator, source, source_type_for_id(id), id).unwrap();
    let imports = analyze_imports(&program);
    let plan: FxHashMap<String, BTreeSet<String>> = imports
        .sources
        .iter()
        .map(|(src, entry)| (src.clone(), entry.names.clone()))
        .collect();
    rewrite_imports(source, &imports, &plan)
}

#[test]
fn rewrite_then_prune_round_trip() {
    // Stage 1: the importer's eligible import edge is tagged.
    let rewritten = rewrite_everything(IMPORTER, "/src/view.ts").unwrap();
    assert!(rewritten.contains("'./dates?tss-split-exports=formatDate,parseDate'"));
    // The bare package import is untouched.
    assert!(rewritten.contains("'some-pkg'"));

    // Stage 2: the host resolves `./dates` and keeps the tag; decode it
    // back off the forked id.
    let forked_id = append_tag(
        "/src/dates.ts",
        &decode_tag("./dates?tss-split-exports=formatDate,parseDate").unwrap(),
    );
    let (clean, requested) = split_tag(&forked_id);
    assert_eq!(clean, "/src/dates.ts");
    let requested = requested.unwrap();

    // Stage 3: the target is pruned down to the requested set.
    let allocator = Allocator::default();
    let program = parse_program(
        &allocator,
        TARGET,
        source_type_for_id(&forked_id),
        &forked_id,
    )
    .unwrap();
    let pruned = prune_exports(TARGET, &program, &requested).unwrap();

    assert!(pruned.contains("export const formatDate"));
    assert!(pruned.contains("export const parseDate"));
    // The unrequested export and everything only it reached are gone.
    assert!(!pruned.contains("startOfWeek"));
    assert!(!pruned.contains("shiftDays"));
    assert!(!pruned.contains("assertIso"));
    // `pad` is still used by a surviving export; its import stays.
    assert!(pruned.contains("import { pad } from './pad';"));

    // The pruned module's enumerable exports equal the requested set.
    let allocator = Allocator::default();
    let program = parse_program(
        &allocator,
        &pruned,
        source_type_for_id("/src/dates.ts"),
        "/src/dates.ts",
    )
    .unwrap();
    let closure = analyze_exports(&program);
    assert_eq!(closure.names, requested);
    assert!(!closure.opaque);
}

#[test]
fn pruning_the_full_set_is_a_noop() {
    let requested: BTreeSet<String> = ["formatDate", "parseDate", "startOfWeek", "assertIso"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let allocator = Allocator::default();
    let program = parse_program(
        &allocator,
        TARGET,
        source_type_for_id("/src/dates.ts"),
        "/src/dates.ts",
    )
    .unwrap();
    assert_eq!(prune_exports(TARGET, &program, &requested), None);
}
