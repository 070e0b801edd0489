//! Recognition of `typedef enum [: type] { ... } Name` declarations.

use crate::lexical::{
    find_closing, ident_end, is_ident_byte, skip_comment, skip_literal, skip_whitespace,
};
use tracing::{trace, warn};

/// An enumeration recovered from an annotation's declaration text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDeclaration<'a> {
    /// Type name following the closing brace.
    pub name: &'a str,
    /// Underlying type given after `:`, if any.
    pub underlying: Option<&'a str>,
    /// Declaration text from `typedef` through the type name.
    pub text: &'a str,
    /// Enumerator tokens in source order, without values or comments.
    pub enumerators: Vec<String>,
}

/// Parses `declaration` as an enumeration. Returns `None` for anything
/// else, which callers treat as "not ours" rather than as an error.
pub fn parse_enum(declaration: &str) -> Option<EnumDeclaration<'_>> {
    let bytes = declaration.as_bytes();

    let start = skip_whitespace(bytes, 0);
    let mut pos = expect_keyword(bytes, start, "typedef")?;
    pos = expect_keyword(bytes, skip_whitespace(bytes, pos), "enum")?;
    pos = skip_whitespace(bytes, pos);

    let mut underlying = None;
    if bytes.get(pos) == Some(&b':') {
        let brace = pos + declaration[pos..].find('{')?;
        let ty = declaration[pos + 1..brace].trim();
        underlying = (!ty.is_empty()).then_some(ty);
        pos = brace;
    }

    if bytes.get(pos) != Some(&b'{') {
        trace!("declaration is not a typedef'd enum body");
        return None;
    }
    let body_start = pos + 1;
    let body_end = find_closing(bytes, body_start, b'}')?;

    let name_start = skip_whitespace(bytes, body_end + 1);
    let name_end = ident_end(bytes, name_start)?;
    let name = &declaration[name_start..name_end];

    let trailing = declaration[name_end..].trim();
    if !trailing.is_empty() {
        warn!(enum_name = name, trailing, "discarding text after enum type name");
    }

    Some(EnumDeclaration {
        name,
        underlying,
        text: &declaration[start..name_end],
        enumerators: split_enumerators(&declaration[body_start..body_end]),
    })
}

fn expect_keyword(bytes: &[u8], pos: usize, keyword: &str) -> Option<usize> {
    let end = pos + keyword.len();
    let matches = bytes.get(pos..end) == Some(keyword.as_bytes())
        && !bytes.get(end).is_some_and(|&b| is_ident_byte(b));
    matches.then_some(end)
}

/// Splits an enum body into enumerator tokens.
///
/// Comments are dropped, commas nested in `()`, `[]` or `{}` do not split,
/// each entry is cut at its first `=` and trimmed, and empty entries (such
/// as the one after a trailing comma) are skipped.
pub fn split_enumerators(body: &str) -> Vec<String> {
    let bytes = body.as_bytes();
    let mut entries = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut segment_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if let Some(end) = skip_comment(bytes, i) {
            current.push_str(&body[segment_start..i]);
            current.push(' ');
            i = end;
            segment_start = i;
            continue;
        }
        if let Some(end) = skip_literal(bytes, i) {
            i = end;
            continue;
        }
        match bytes[i] {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                current.push_str(&body[segment_start..i]);
                entries.push(std::mem::take(&mut current));
                segment_start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    current.push_str(&body[segment_start..]);
    entries.push(current);

    entries
        .iter()
        .map(|entry| entry.split('=').next().unwrap_or_default().trim().to_string())
        .filter(|token| !token.is_empty())
        .collect()
}
