//! Byte-level scanning primitives.
//!
//! All functions take the full input plus a byte offset and return the new
//! offset, so the caller keeps a single cursor it can anchor diagnostics to.
//! Slicing is only ever performed adjacent to ASCII bytes, so the returned
//! `&str` slices are always on character boundaries.

use memchr::{memchr, memchr2, memchr3};

use crate::error::{ErrorCode, ScanError};

/// Lookup table for bytes which may appear in an identifier: printable ASCII
/// `0x20`–`0x7f` with ` "#%'(),={}` removed. Everything outside ASCII is
/// rejected.
pub(crate) static IDENT_ALLOWED: [bool; 256] = {
    const PR: bool = false; // disallowed printable bytes
    const CT: bool = false; // non-printable ascii and non-ascii
    const __: bool = true; // permitted bytes
    [
        //   1   2   3   4   5   6   7   8   9   A   B   C   D   E   F
        CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, // 0
        CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, // 1
        PR, __, PR, PR, __, PR, __, PR, PR, PR, __, __, PR, __, __, __, // 2
        __, __, __, __, __, __, __, __, __, __, __, __, __, PR, __, __, // 3
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 4
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 5
        __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, __, // 6
        __, __, __, __, __, __, __, __, __, __, __, PR, __, PR, __, __, // 7
        CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, // 8
        CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, // 9
        CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, // A
        CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, // B
        CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, // C
        CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, // D
        CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, // E
        CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, CT, // F
    ]
};

/// Skip past top-level comment text to just after the next `@`, or return
/// `None` at EOF. Everything between entries is comment by definition.
pub(crate) fn next_entry(input: &str, pos: usize) -> Option<usize> {
    memchr(b'@', &input.as_bytes()[pos..]).map(|i| pos + i + 1)
}

/// Skip whitespace inside an entry.
pub(crate) fn whitespace(input: &str, mut pos: usize) -> usize {
    let bytes = input.as_bytes();
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Scan an identifier: no leading ASCII digit, subsequent bytes per
/// [`IDENT_ALLOWED`].
pub(crate) fn identifier(input: &str, start: usize) -> Result<(usize, &str), ScanError> {
    let bytes = input.as_bytes();
    let mut end = start;

    while end < bytes.len() && IDENT_ALLOWED[bytes[end] as usize] {
        end += 1;
    }

    if end == start {
        return Err(ScanError::new(ErrorCode::EmptyIdentifier, start));
    }
    if bytes[start].is_ascii_digit() {
        return Err(ScanError::new(ErrorCode::IdentifierStartsWithDigit, start));
    }

    Ok((end, &input[start..end]))
}

/// Scan a run of ASCII digits. The caller has already peeked one.
pub(crate) fn number(input: &str, start: usize) -> (usize, &str) {
    let bytes = input.as_bytes();
    let mut end = start;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    (end, &input[start..end])
}

/// Scan brace-balanced text up to the closing delimiter matching an already
/// consumed `{`. Returns the contents (interior braces kept byte-for-byte)
/// and the offset just past the closing `}`.
pub(crate) fn balanced(input: &str, start: usize) -> Result<(usize, &str), ScanError> {
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut pos = start;

    while let Some(i) = memchr2(b'{', b'}', &bytes[pos..]) {
        pos += i;
        if bytes[pos] == b'{' {
            depth += 1;
        } else if depth == 0 {
            return Ok((pos + 1, &input[start..pos]));
        } else {
            depth -= 1;
        }
        pos += 1;
    }

    Err(ScanError::new(ErrorCode::UnclosedBracket, start))
}

/// Scan quoted text up to the first `"` at brace depth 0, after an already
/// consumed opening `"`. Interior braces must balance.
pub(crate) fn quoted(input: &str, start: usize) -> Result<(usize, &str), ScanError> {
    let bytes = input.as_bytes();
    let mut depth = 0usize;
    let mut pos = start;

    while let Some(i) = memchr3(b'"', b'{', b'}', &bytes[pos..]) {
        pos += i;
        match bytes[pos] {
            b'"' if depth == 0 => return Ok((pos + 1, &input[start..pos])),
            b'{' => depth += 1,
            b'}' => {
                if depth == 0 {
                    return Err(ScanError::new(ErrorCode::UnexpectedClosingBracket, pos));
                }
                depth -= 1;
            }
            _ => {}
        }
        pos += 1;
    }

    Err(ScanError::new(ErrorCode::UnclosedQuote, start))
}

/// Scan an entry key. Inside `{…}` the key stops at `}`; inside `(…)` it may
/// contain one. Both forms stop at a comma, whitespace, or line ending.
pub(crate) fn entry_key(input: &str, start: usize, paren: bool) -> (usize, &str) {
    let bytes = input.as_bytes();
    let mut end = start;
    while end < bytes.len() {
        match bytes[end] {
            b',' | b' ' | b'\t' | b'\n' | b'\r' => break,
            b'}' if !paren => break,
            _ => end += 1,
        }
    }
    (end, &input[start..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_entry() {
        assert_eq!(next_entry("junk", 0), None);
        assert_eq!(next_entry("", 0), None);
        assert_eq!(next_entry("@art", 0), Some(1));
        assert_eq!(next_entry("ignored @a", 0), Some(9));
        assert_eq!(next_entry("@a @b", 1), Some(4));
    }

    #[test]
    fn test_identifier() {
        assert!(matches!(identifier("article{", 0), Ok((7, "article"))));
        assert!(matches!(identifier("au-th.or ", 0), Ok((8, "au-th.or"))));
        assert_eq!(
            identifier("2020", 0).unwrap_err().code,
            ErrorCode::IdentifierStartsWithDigit
        );
        assert_eq!(
            identifier(",x", 0).unwrap_err().code,
            ErrorCode::EmptyIdentifier
        );
        // identifiers are ASCII-only
        assert_eq!(
            identifier("über", 0).unwrap_err().code,
            ErrorCode::EmptyIdentifier
        );
    }

    #[test]
    fn test_balanced() {
        assert!(matches!(balanced("url}bc", 0), Ok((4, "url"))));
        assert!(matches!(balanced("u{}r}c", 0), Ok((5, "u{}r"))));
        assert!(matches!(balanced("a{b{c}}d}", 0), Ok((9, "a{b{c}}d"))));
        assert_eq!(
            balanced("none", 0).unwrap_err().code,
            ErrorCode::UnclosedBracket
        );
        assert_eq!(
            balanced("{n}e", 0).unwrap_err().code,
            ErrorCode::UnclosedBracket
        );
    }

    #[test]
    fn test_quoted() {
        assert!(matches!(quoted(r#"ab"rest"#, 0), Ok((3, "ab"))));
        assert!(matches!(quoted(r#"a{"}b"x"#, 0), Ok((6, r#"a{"}b"#))));
        assert_eq!(quoted("ab", 0).unwrap_err().code, ErrorCode::UnclosedQuote);
        assert_eq!(
            quoted("a}b\"", 0).unwrap_err().code,
            ErrorCode::UnexpectedClosingBracket
        );
    }

    #[test]
    fn test_entry_key() {
        assert_eq!(entry_key("key,", 0, false), (3, "key"));
        assert_eq!(entry_key("key}", 0, false), (3, "key"));
        assert_eq!(entry_key("key}x,", 0, true), (5, "key}x"));
        assert_eq!(entry_key("key x", 0, true), (3, "key"));
        assert_eq!(entry_key(",", 0, false), (0, ""));
    }

    use proptest::prelude::*;
    proptest! {
        #[test]
        fn no_panic(s in "\\PC*") {
            let _ = next_entry(&s, 0);
            let _ = whitespace(&s, 0);
            let _ = identifier(&s, 0);
            let _ = number(&s, 0);
            let _ = balanced(&s, 0);
            let _ = quoted(&s, 0);
            let _ = entry_key(&s, 0, false);
            let _ = entry_key(&s, 0, true);
        }
    }
}
