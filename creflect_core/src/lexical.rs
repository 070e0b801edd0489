//! Byte-level helpers shared by the scanner and the declaration parser.
//!
//! Every delimiter this crate cares about is ASCII, so offsets returned here
//! always fall on UTF-8 character boundaries.

pub(crate) fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

pub(crate) fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(|b| b.is_ascii_whitespace()) {
        i += 1;
    }
    i
}

/// End of the identifier starting at `i`, or `None` if none starts there.
pub(crate) fn ident_end(bytes: &[u8], i: usize) -> Option<usize> {
    match bytes.get(i) {
        Some(&b) if b.is_ascii_alphabetic() || b == b'_' => {
            let len = bytes[i..].iter().take_while(|&&b| is_ident_byte(b)).count();
            Some(i + len)
        }
        _ => None,
    }
}

/// If a comment starts at `i`, returns the offset just past it. A line
/// comment stops before its newline.
pub(crate) fn skip_comment(bytes: &[u8], i: usize) -> Option<usize> {
    match (bytes.get(i), bytes.get(i + 1)) {
        (Some(b'/'), Some(b'/')) => Some(
            bytes[i..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(bytes.len(), |p| i + p),
        ),
        (Some(b'/'), Some(b'*')) => Some(
            bytes[i + 2..]
                .windows(2)
                .position(|w| w == b"*/")
                .map_or(bytes.len(), |p| i + 2 + p + 2),
        ),
        _ => None,
    }
}

/// If a string or character literal starts at `i`, returns the offset just
/// past it. A `'` inside a number such as `1'000` is a digit separator and
/// starts nothing.
pub(crate) fn skip_literal(bytes: &[u8], i: usize) -> Option<usize> {
    let quote = match bytes.get(i) {
        Some(b'\'') if inside_number(bytes, i) => return None,
        Some(&q @ (b'"' | b'\'')) => q,
        _ => return None,
    };

    let mut j = i + 1;
    while j < bytes.len() {
        match bytes[j] {
            b'\\' => j += 2,
            // C literals cannot span lines; a stray quote ends at the newline.
            b'\n' => return Some(j),
            b if b == quote => return Some(j + 1),
            _ => j += 1,
        }
    }
    Some(bytes.len())
}

/// True when the run of identifier bytes and separators ending just before
/// `i` is a numeric literal. Prefixed char literals (`L'x'`, `u8'x'`) start
/// with a letter.
fn inside_number(bytes: &[u8], i: usize) -> bool {
    let start = bytes[..i]
        .iter()
        .rposition(|&b| !(is_ident_byte(b) || b == b'\''))
        .map_or(0, |p| p + 1);
    start < i && bytes[start].is_ascii_digit()
}

pub(crate) fn skip_lexical(bytes: &[u8], i: usize) -> Option<usize> {
    skip_comment(bytes, i).or_else(|| skip_literal(bytes, i))
}

/// Returns the index of `closer` ending a group whose opening delimiter sits
/// just before `from`. Nested `()`, `[]` and `{}` must balance; a mismatch
/// ends the search without a result.
pub(crate) fn find_closing(bytes: &[u8], from: usize, closer: u8) -> Option<usize> {
    let mut expected = vec![closer];
    let mut i = from;

    while i < bytes.len() {
        if let Some(end) = skip_lexical(bytes, i) {
            i = end;
            continue;
        }
        match bytes[i] {
            b'(' => expected.push(b')'),
            b'[' => expected.push(b']'),
            b'{' => expected.push(b'}'),
            close @ (b')' | b']' | b'}') => {
                if expected.pop() != Some(close) {
                    return None;
                }
                if expected.is_empty() {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    None
}
