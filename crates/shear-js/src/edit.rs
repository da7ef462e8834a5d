//! Span-based source editor.
//!
//! Transforms here never regenerate a whole file; they apply a small set
//! of non-overlapping replacements to the original text, so untouched
//! code keeps its exact bytes (and therefore its positions, up to the
//! nearest edit).

use oxc_span::Span;

/// One pending replacement of a byte range.
#[derive(Debug)]
struct Edit {
    start: usize,
    end: usize,
    replacement: String,
}

/// Collects non-overlapping span edits and applies them in one pass.
#[derive(Debug)]
pub struct SourceEditor<'a> {
    source: &'a str,
    edits: Vec<Edit>,
}

impl<'a> SourceEditor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            edits: Vec::new(),
        }
    }

    /// The text of `span` in the original source.
    pub fn slice(&self, span: Span) -> &'a str {
        &self.source[span.start as usize..span.end as usize]
    }

    /// Replaces `span` with `replacement`.
    pub fn replace(&mut self, span: Span, replacement: impl Into<String>) {
        self.edits.push(Edit {
            start: span.start as usize,
            end: span.end as usize,
            replacement: replacement.into(),
        });
    }

    /// Deletes `span` exactly.
    pub fn remove(&mut self, span: Span) {
        self.replace(span, "");
    }

    /// Deletes a whole top-level statement: the span itself plus any
    /// trailing semicolon and the remainder of its line, and the line's
    /// leading indentation when the statement starts the line.
    pub fn remove_statement(&mut self, span: Span) {
        let bytes = self.source.as_bytes();
        let mut start = span.start as usize;
        let mut end = span.end as usize;

        while start > 0 && matches!(bytes[start - 1], b' ' | b'\t') {
            start -= 1;
        }
        while end < bytes.len() && matches!(bytes[end], b' ' | b'\t' | b';') {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'\r' {
            end += 1;
        }
        if end < bytes.len() && bytes[end] == b'\n' {
            end += 1;
        }

        self.edits.push(Edit {
            start,
            end,
            replacement: String::new(),
        });
    }

    /// Whether any edit has been queued.
    pub fn is_dirty(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Applies the queued edits. Edits must not overlap.
    pub fn finish(mut self) -> String {
        self.edits.sort_by_key(|e| (e.start, e.end));
        debug_assert!(self
            .edits
            .windows(2)
            .all(|pair| pair[0].end <= pair[1].start));

        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for edit in &self.edits {
            out.push_str(&self.source[cursor..edit.start]);
            out.push_str(&edit.replacement);
            cursor = edit.end;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}

/// The leading whitespace of the line `offset` sits on.
pub fn line_indent(source: &str, offset: u32) -> &str {
    let bytes = source.as_bytes();
    let mut line_start = offset as usize;
    while line_start > 0 && bytes[line_start - 1] != b'\n' {
        line_start -= 1;
    }
    let mut indent_end = line_start;
    while indent_end < bytes.len() && matches!(bytes[indent_end], b' ' | b'\t') {
        indent_end += 1;
    }
    &source[line_start..indent_end]
}
