//! Parse entry point shared by every analyzer and rewriter.

use std::path::Path;

use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_parser::Parser;
use oxc_span::SourceType;

use shear_core::{Error, Result};

/// Picks a [`SourceType`] from a module id, ignoring any query suffix.
pub fn source_type_for_id(id: &str) -> SourceType {
    let clean = id.split('?').next().unwrap_or(id);
    SourceType::from_path(Path::new(clean)).unwrap_or_default()
}

/// Parses a module into a syntax tree allocated in `allocator`.
///
/// The caller owns the allocator so the tree can be handed to several
/// analyzers without re-parsing.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the parser panics or reports any
/// diagnostic. A transform cannot safely proceed on a broken tree, so the
/// caller is expected to fail the file's build.
pub fn parse_program<'a>(
    allocator: &'a Allocator,
    source_text: &'a str,
    source_type: SourceType,
    id: &str,
) -> Result<Program<'a>> {
    let ret = Parser::new(allocator, source_text, source_type).parse();
    if ret.panicked || !ret.errors.is_empty() {
        let message = ret
            .errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "parser panicked".to_string());
        return Err(Error::Parse {
            id: id.to_string(),
            message,
        });
    }
    Ok(ret.program)
}
