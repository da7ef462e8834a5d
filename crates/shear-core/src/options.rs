//! Plugin configuration.

use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for the export-splitting transform.
///
/// Usually constructed with [`ShearOptions::new`]; hosts that keep plugin
/// settings in a TOML file can use [`ShearOptions::from_toml_str`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ShearOptions {
    /// Absolute root of the project's own sources. Files outside it are
    /// never rewritten or pruned.
    pub project_root: PathBuf,

    /// Extra glob patterns (relative to the root) excluded from rewriting.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// File extensions treated as parseable source.
    #[serde(default = "default_source_extensions")]
    pub source_extensions: Vec<String>,
}

fn default_source_extensions() -> Vec<String> {
    ["ts", "tsx", "js", "jsx", "mjs", "cjs", "mts", "cts"]
        .map(String::from)
        .to_vec()
}

impl ShearOptions {
    /// Creates options for a project root with default settings.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            ignore: Vec::new(),
            source_extensions: default_source_extensions(),
        }
    }

    /// Parses options from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Toml`] when the text is not valid TOML for this
    /// shape.
    pub fn from_toml_str(text: &str, file: impl Into<PathBuf>) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Toml {
            file: file.into(),
            source: e,
        })
    }

    /// Compiles the `ignore` patterns into a matcher.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] when a glob fails to compile.
    pub fn ignore_set(&self) -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore {
            let glob = Glob::new(pattern).map_err(|e| Error::Pattern(e.to_string()))?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| Error::Pattern(e.to_string()))
    }

    /// Whether `path` has one of the configured source extensions.
    pub fn is_source_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|ext| self.source_extensions.iter().any(|s| s == ext))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_extensions_cover_ts_and_js() {
        let options = ShearOptions::new("/proj");
        assert!(options.is_source_path(Path::new("/proj/src/a.ts")));
        assert!(options.is_source_path(Path::new("/proj/src/a.tsx")));
        assert!(options.is_source_path(Path::new("/proj/src/a.mjs")));
        assert!(!options.is_source_path(Path::new("/proj/src/a.css")));
        assert!(!options.is_source_path(Path::new("/proj/src/noext")));
    }

    #[test]
    fn test_from_toml() {
        let options = ShearOptions::from_toml_str(
            r#"
            project_root = "/proj"
            ignore = ["**/generated/**"]
            "#,
            ".shear.toml",
        )
        .unwrap();
        assert_eq!(options.project_root, PathBuf::from("/proj"));
        assert_eq!(options.ignore, vec!["**/generated/**".to_string()]);

        let set = options.ignore_set().unwrap();
        assert!(set.is_match("src/generated/a.ts"));
        assert!(!set.is_match("src/a.ts"));
    }

    #[test]
    fn test_bad_pattern_is_an_error() {
        let mut options = ShearOptions::new("/proj");
        options.ignore.push("[".into());
        assert!(matches!(options.ignore_set(), Err(Error::Pattern(_))));
    }
}
