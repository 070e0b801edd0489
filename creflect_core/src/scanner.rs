//! Locates annotation blocks of the form `NAME((flags...), declaration)`.
//!
//! The scan walks the source once, tracking nesting of `()`, `[]` and `{}`
//! explicitly. Delimiters inside `//` and `/* */` comments and inside string
//! or character literals are ignored, both while looking for the annotation
//! name and while looking for the end of a block.

use crate::lexical::{find_closing, is_ident_byte, skip_lexical, skip_whitespace};
use tracing::trace;

/// One annotation block found in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Annotation<'a> {
    /// Text between the inner parentheses, e.g. `remove_prefix(FOO_), lowercase`.
    pub flag_spec: &'a str,
    /// Text after the separating comma up to the annotation's closing parenthesis.
    pub declaration: &'a str,
    /// Byte offset of the annotation name.
    pub offset: usize,
    /// 1-based line of the annotation name.
    pub line: usize,
}

/// Lazy, left-to-right iterator over the annotation blocks of a source text.
/// Blocks never overlap.
pub struct Scanner<'a> {
    source: &'a str,
    name: &'a str,
    pos: usize,
    line: usize,
    line_pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, annotation_name: &'a str) -> Self {
        Self {
            source,
            name: annotation_name,
            pos: 0,
            line: 1,
            line_pos: 0,
        }
    }

    fn line_at(&mut self, offset: usize) -> usize {
        let newlines = self.source.as_bytes()[self.line_pos..offset]
            .iter()
            .filter(|&&b| b == b'\n')
            .count();
        self.line += newlines;
        self.line_pos = offset;
        self.line
    }
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Annotation<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.name.is_empty() {
            return None;
        }

        let source = self.source;
        let bytes = source.as_bytes();
        let name = self.name.as_bytes();

        while self.pos < bytes.len() {
            if let Some(end) = skip_lexical(bytes, self.pos) {
                self.pos = end;
                continue;
            }

            let start = self.pos;
            let at_boundary = start == 0 || !is_ident_byte(bytes[start - 1]);
            if !at_boundary || !bytes[start..].starts_with(name) {
                self.pos += 1;
                continue;
            }

            let after = start + name.len();
            if bytes.get(after).is_some_and(|&b| is_ident_byte(b)) {
                // Longer identifier such as `CREFLECT_H`.
                self.pos = after;
                continue;
            }

            match match_block(source, after) {
                Some(block) => {
                    let line = self.line_at(start);
                    self.pos = block.end;
                    trace!(line, offset = start, "found annotation block");
                    return Some(Annotation {
                        flag_spec: block.flag_spec,
                        declaration: block.declaration,
                        offset: start,
                        line,
                    });
                }
                None => {
                    trace!(offset = start, "annotation name without a well-formed block");
                    self.pos = after;
                }
            }
        }

        None
    }
}

struct Block<'a> {
    flag_spec: &'a str,
    declaration: &'a str,
    /// Offset just past the closing parenthesis.
    end: usize,
}

fn match_block(source: &str, after_name: usize) -> Option<Block<'_>> {
    let bytes = source.as_bytes();

    let open = skip_whitespace(bytes, after_name);
    if bytes.get(open) != Some(&b'(') {
        return None;
    }
    let inner = skip_whitespace(bytes, open + 1);
    if bytes.get(inner) != Some(&b'(') {
        return None;
    }

    let flags_end = find_closing(bytes, inner + 1, b')')?;
    let comma = skip_whitespace(bytes, flags_end + 1);
    if bytes.get(comma) != Some(&b',') {
        return None;
    }
    let decl_end = find_closing(bytes, comma + 1, b')')?;

    Some(Block {
        flag_spec: &source[inner + 1..flags_end],
        declaration: &source[comma + 1..decl_end],
        end: decl_end + 1,
    })
}
