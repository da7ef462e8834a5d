//! Id eligibility filtering.
//!
//! Every hook is scoped to ids inside the project's own sources: real
//! files under the root, with a parseable source extension, not virtual,
//! not under dependency storage, and not claimed by the unrelated
//! directive-extraction mechanism.

use std::path::Path;

use globset::GlobSet;

use shear_core::ShearOptions;

/// Query marker of the unrelated directive-extraction mechanism. Ids it
/// has tagged are never ours to transform.
const UNRELATED_MARKER: &str = "tsr-directive-";

/// Whether another extraction mechanism already tagged this id.
pub(crate) fn has_unrelated_marker(id: &str) -> bool {
    match id.find('?') {
        Some(i) => id[i..].contains(&format!("?{UNRELATED_MARKER}"))
            || id[i..].contains(&format!("&{UNRELATED_MARKER}")),
        None => false,
    }
}

/// The path part of an id, without any query suffix.
pub(crate) fn clean_path(id: &str) -> &str {
    id.split('?').next().unwrap_or(id)
}

/// Whether `id` is eligible for rewriting and pruning.
pub(crate) fn is_eligible_id(id: &str, options: &ShearOptions, ignore: &GlobSet) -> bool {
    // Virtual modules are synthesized by other plugins.
    if id.starts_with('\0') {
        return false;
    }
    if has_unrelated_marker(id) {
        return false;
    }
    let clean = clean_path(id);
    let path = Path::new(clean);
    if !path.starts_with(&options.project_root) {
        return false;
    }
    if clean.contains("/node_modules/") {
        return false;
    }
    if !options.is_source_path(path) {
        return false;
    }
    if let Ok(relative) = path.strip_prefix(&options.project_root) {
        if ignore.is_match(relative) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> (ShearOptions, GlobSet) {
        let mut options = ShearOptions::new("/proj");
        options.ignore.push("**/generated/**".into());
        let ignore = options.ignore_set().unwrap();
        (options, ignore)
    }

    #[test]
    fn test_project_sources_are_eligible() {
        let (options, ignore) = options();
        assert!(is_eligible_id("/proj/src/a.ts", &options, &ignore));
        assert!(is_eligible_id("/proj/src/a.tsx?v=1", &options, &ignore));
    }

    #[test]
    fn test_everything_else_is_not() {
        let (options, ignore) = options();
        // Outside the root.
        assert!(!is_eligible_id("/other/src/a.ts", &options, &ignore));
        // Dependency storage.
        assert!(!is_eligible_id(
            "/proj/node_modules/pkg/index.js",
            &options,
            &ignore
        ));
        // Non-source file types.
        assert!(!is_eligible_id("/proj/src/a.css", &options, &ignore));
        // Virtual ids.
        assert!(!is_eligible_id("\0virtual:thing", &options, &ignore));
        // Unrelated extraction tag.
        assert!(!is_eligible_id(
            "/proj/src/a.ts?tsr-directive-use-server",
            &options,
            &ignore
        ));
        // User ignore globs.
        assert!(!is_eligible_id(
            "/proj/src/generated/a.ts",
            &options,
            &ignore
        ));
    }

    #[test]
    fn test_unrelated_marker_positions() {
        assert!(has_unrelated_marker("/a.ts?tsr-directive-use-server"));
        assert!(has_unrelated_marker(
            "/a.ts?v=1&tsr-directive-use-server=1"
        ));
        assert!(!has_unrelated_marker("/a.ts"));
        assert!(!has_unrelated_marker("/a.ts?tss-split-exports=x"));
        assert!(!has_unrelated_marker("/tsr-directive-looking/file.ts"));
    }
}
