//! # Title casing.
//!
//! Re-cases a field value under BibTeX's `t` format: letters at brace depth
//! 0 are lowercased, except the first character of the string and the first
//! character after sentence-ending punctuation. Brace groups protect their
//! contents, unless they open with a control sequence ("specials"), in
//! which case the control word survives verbatim and the argument text is
//! re-cased.

use crate::diag::Reporter;
use crate::pos::Pos;
use crate::tex;

/// Re-case `value` under BibTeX title rules.
///
/// Lowercasing is ASCII-only; characters outside ASCII pass through
/// unchanged. The operation is idempotent.
///
/// ```
/// use bibdb::{title_case, Pos, Reporter};
///
/// let mut rpt = Reporter::new();
/// let out = title_case("The TCP/IP Guide to Hello World", &Pos::unknown(), &mut rpt);
/// assert_eq!(out, "The tcp/ip guide to hello world");
/// ```
pub fn title_case(value: &str, pos: &Pos, rpt: &mut Reporter) -> String {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    // keep the case of the next character
    let mut keep = true;
    let mut after_punct = false;
    let mut balanced = true;

    while let Some(c) = rest.chars().next() {
        match c {
            '{' => {
                match tex::group(rest) {
                    Some((contents, tail)) => {
                        out.push('{');
                        if contents.starts_with('\\') && !keep {
                            recase_special(contents, &mut out);
                        } else {
                            // a non-special group, or a special occupying a
                            // keep-case position, is preserved whole
                            out.push_str(contents);
                        }
                        out.push('}');
                        rest = tail;
                    }
                    None => {
                        if balanced {
                            rpt.warn(pos.clone(), "unbalanced braces in string");
                            balanced = false;
                        }
                        out.push('{');
                        rest = &rest[1..];
                    }
                }
                keep = false;
                after_punct = false;
            }
            '}' => {
                if balanced {
                    rpt.warn(pos.clone(), "unbalanced braces in string");
                    balanced = false;
                }
                out.push('}');
                rest = &rest[1..];
            }
            c if c.is_ascii_whitespace() => {
                if after_punct {
                    keep = true;
                    after_punct = false;
                }
                out.push(c);
                rest = &rest[1..];
            }
            c => {
                if c.is_ascii_uppercase() && !keep {
                    out.push(c.to_ascii_lowercase());
                } else {
                    out.push(c);
                }
                after_punct = matches!(c, ':' | '.' | '?' | '!');
                keep = false;
                rest = &rest[c.len_utf8()..];
            }
        }
    }
    out
}

/// Re-case the inside of a special: control sequences survive verbatim,
/// nested groups protect their contents again, and the remaining argument
/// text is lowercased.
fn recase_special(contents: &str, out: &mut String) {
    let mut rest = contents;
    while let Some(c) = rest.chars().next() {
        match c {
            '\\' => {
                let (name, tail) = tex::control_sequence(&rest[1..]);
                out.push('\\');
                out.push_str(name);
                rest = tail;
            }
            '{' => match tex::group(rest) {
                Some((inner, tail)) => {
                    out.push('{');
                    if inner.starts_with('\\') {
                        recase_special(inner, out);
                    } else {
                        out.push_str(inner);
                    }
                    out.push('}');
                    rest = tail;
                }
                None => {
                    out.push('{');
                    rest = &rest[1..];
                }
            },
            _ => {
                if c.is_ascii_uppercase() {
                    out.push(c.to_ascii_lowercase());
                } else {
                    out.push(c);
                }
                rest = &rest[c.len_utf8()..];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recase(value: &str) -> String {
        let mut rpt = Reporter::new();
        let out = title_case(value, &Pos::unknown(), &mut rpt);
        assert!(rpt.is_empty(), "unexpected diagnostics for {value:?}");
        out
    }

    #[test]
    fn test_basic() {
        assert_eq!(
            recase("The TCP/IP Guide to Hello World"),
            "The tcp/ip guide to hello world"
        );
        assert_eq!(recase("already lower"), "already lower");
        assert_eq!(recase("  Leading Spaces"), "  Leading spaces");
    }

    #[test]
    fn test_sentence_punctuation() {
        assert_eq!(recase("Title: The Subtitle"), "Title: The subtitle");
        assert_eq!(recase("What? Me Worry?"), "What? Me worry?");
        assert_eq!(recase("E.g. This One. And That"), "E.g. This one. And that");
        // no whitespace after the punctuation: no keep-case
        assert_eq!(recase("Title:The Subtitle"), "Title:the subtitle");
    }

    #[test]
    fn test_braces_protect() {
        assert_eq!(recase("The {TCP/IP} Guide"), "The {TCP/IP} guide");
        assert_eq!(recase("{IBM} Goes {NeXT}"), "{IBM} goes {NeXT}");
        assert_eq!(recase("A {Nested {Group} Stays}"), "A {Nested {Group} Stays}");
    }

    #[test]
    fn test_specials() {
        // control word kept, argument re-cased
        assert_eq!(recase("The {\\TeX Book} Story"), "The {\\TeX book} story");
        assert_eq!(recase("Die {\\'E}cole"), "Die {\\'e}cole");
        // a special at the very start is the protected first character
        assert_eq!(recase("{\\'E}cole Normale"), "{\\'E}cole normale");
        // a nested group inside a special protects its contents again
        assert_eq!(
            recase("A {\\em Very {LOUD} Title}"),
            "A {\\em very {LOUD} title}"
        );
    }

    #[test]
    fn test_non_ascii_passthrough() {
        assert_eq!(recase("Über Die Größe"), "Über die größe");
    }

    #[test]
    fn test_unbalanced_warns_once() {
        let mut rpt = Reporter::new();
        let out = title_case("A } B } C", &Pos::unknown(), &mut rpt);
        assert_eq!(out, "A } b } c");
        assert_eq!(rpt.warning_count(), 1);
    }

    use proptest::prelude::*;
    proptest! {
        #[test]
        fn idempotent(s in "[a-zA-Z0-9 {}:.?!\\\\'-]*") {
            let mut rpt = Reporter::new();
            let pos = Pos::unknown();
            let once = title_case(&s, &pos, &mut rpt);
            let twice = title_case(&once, &pos, &mut rpt);
            prop_assert_eq!(&once, &twice);
        }

        #[test]
        fn no_panic(s in "\\PC*") {
            let mut rpt = Reporter::new();
            let _ = title_case(&s, &Pos::unknown(), &mut rpt);
        }
    }
}
