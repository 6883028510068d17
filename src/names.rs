//! # Name-list parsing.
//!
//! Splits an `author` or `editor` field value into names at the word `and`
//! (at brace depth 0 only), and each name into the four BibTeX parts under
//! the comma-count rules. Braces are kept in the output strings; consumers
//! decide whether to strip them.

use std::fmt;

use crate::diag::Reporter;
use crate::pos::Pos;
use crate::tex;

/// One personal name, split into BibTeX's four parts.
///
/// Empty parts are empty strings. Whitespace between the tokens of a part
/// is collapsed to a single space.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Name {
    first: String,
    von: String,
    last: String,
    jr: String,
}

impl Name {
    pub fn new(
        first: impl Into<String>,
        von: impl Into<String>,
        last: impl Into<String>,
        jr: impl Into<String>,
    ) -> Self {
        Self {
            first: first.into(),
            von: von.into(),
            last: last.into(),
            jr: jr.into(),
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn von(&self) -> &str {
        &self.von
    }

    pub fn last(&self) -> &str {
        &self.last
    }

    pub fn jr(&self) -> &str {
        &self.jr
    }
}

/// Formats the name in the unambiguous comma form `von Last, Jr, First`:
/// re-parsing the output yields the same partition.
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.von.is_empty() {
            write!(f, "{} ", self.von)?;
        }
        f.write_str(&self.last)?;
        if !self.jr.is_empty() {
            write!(f, ", {}", self.jr)?;
            write!(f, ", {}", self.first)?;
        } else if !self.first.is_empty() {
            write!(f, ", {}", self.first)?;
        }
        Ok(())
    }
}

/// Parse a field value into a list of names.
///
/// `pos` anchors diagnostics; use the field value's position.
pub fn parse_names(value: &str, pos: &Pos, rpt: &mut Reporter) -> Vec<Name> {
    split_list(value)
        .into_iter()
        .map(|name| parse_one(name, pos, rpt))
        .collect()
}

/// Case classification of a word token, read off its first letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Case {
    Upper,
    Lower,
    Caseless,
}

/// Case of a letter produced by the TeX translator: translated letters keep
/// their Unicode case, so `{\'e}` classifies as lower and `{\OE}` as upper.
fn case_of(c: char) -> Option<Case> {
    if c.is_uppercase() {
        Some(Case::Upper)
    } else if c.is_lowercase() {
        Some(Case::Lower)
    } else {
        None
    }
}

/// Case of a raw character: ASCII-only, like the original program. A
/// literal non-ASCII letter is caseless.
fn ascii_case_of(c: char) -> Option<Case> {
    if c.is_ascii_uppercase() {
        Some(Case::Upper)
    } else if c.is_ascii_lowercase() {
        Some(Case::Lower)
    } else {
        None
    }
}

/// Classify a token by its first letter. Brace groups are opaque unless they
/// open with a control sequence whose translation starts with a letter;
/// caseless characters do not stop the scan.
fn classify(token: &str) -> Case {
    let mut rest = token;
    while let Some(c) = rest.chars().next() {
        if c == '{' {
            match tex::group(rest) {
                Some((contents, tail)) => {
                    if contents.starts_with('\\') {
                        if let Some(case) = tex::first_letter(contents).and_then(case_of) {
                            return case;
                        }
                    }
                    rest = tail;
                }
                None => rest = &rest[1..],
            }
        } else {
            if let Some(case) = ascii_case_of(c) {
                return case;
            }
            rest = &rest[c.len_utf8()..];
        }
    }
    Case::Caseless
}

/// Byte spans of the whitespace-separated words of `s`, with whitespace
/// inside braces not separating.
fn word_spans(s: &str) -> Vec<(usize, usize)> {
    let mut spans = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    for (i, b) in s.bytes().enumerate() {
        match b {
            b'{' => {
                depth += 1;
                start.get_or_insert(i);
            }
            b'}' => {
                depth = depth.saturating_sub(1);
                start.get_or_insert(i);
            }
            b' ' | b'\t' | b'\n' | b'\r' if depth == 0 => {
                if let Some(st) = start.take() {
                    spans.push((st, i));
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(st) = start {
        spans.push((st, s.len()));
    }
    spans
}

fn words(s: &str) -> Vec<&str> {
    word_spans(s).into_iter().map(|(a, b)| &s[a..b]).collect()
}

fn join(tokens: &[&str]) -> String {
    tokens.join(" ")
}

/// Split a value into names at the word `and`, case-insensitive, at brace
/// depth 0. Empty segments are dropped.
fn split_list(value: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut seg: Option<(usize, usize)> = None;
    for (start, end) in word_spans(value) {
        if value[start..end].eq_ignore_ascii_case("and") {
            if let Some((s, e)) = seg.take() {
                names.push(&value[s..e]);
            }
        } else {
            seg = Some(match seg {
                Some((s, _)) => (s, end),
                None => (start, end),
            });
        }
    }
    if let Some((s, e)) = seg {
        names.push(&value[s..e]);
    }
    names
}

/// Split one name into sections at top-level commas.
fn split_commas(name: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, b) in name.bytes().enumerate() {
        match b {
            b'{' => depth += 1,
            b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                parts.push(&name[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&name[start..]);
    parts
}

fn parse_one(name: &str, pos: &Pos, rpt: &mut Reporter) -> Name {
    let sections = split_commas(name);
    match sections.len() {
        1 => first_von_last(&words(sections[0])),
        2 => {
            let (von, last) = von_last(&words(sections[0]));
            Name {
                first: join(&words(sections[1])),
                von,
                last,
                jr: String::new(),
            }
        }
        3 => {
            let (von, last) = von_last(&words(sections[0]));
            Name {
                first: join(&words(sections[2])),
                von,
                last,
                jr: join(&words(sections[1])),
            }
        }
        n => {
            rpt.warn(
                pos.clone(),
                format!("too many commas in name `{}`", name.trim()),
            );
            let (von, last) = von_last(&words(sections[0]));
            let jr = sections[1..n - 1]
                .iter()
                .map(|s| join(&words(s)))
                .collect::<Vec<_>>()
                .join(", ");
            Name {
                first: join(&words(sections[n - 1])),
                von,
                last,
                jr,
            }
        }
    }
}

/// The `First von Last` form: von spans the first through last lower-case
/// tokens, never taking the final token; with no lower-case token the final
/// token is Last and everything before it is First.
fn first_von_last(tokens: &[&str]) -> Name {
    let Some((final_token, rest)) = tokens.split_last() else {
        return Name::default();
    };
    let limit = rest.len();

    let mut lows = (0..limit).filter(|&i| classify(tokens[i]) == Case::Lower);
    match lows.next() {
        None => Name {
            first: join(&tokens[..limit]),
            von: String::new(),
            last: (*final_token).to_owned(),
            jr: String::new(),
        },
        Some(i) => {
            let j = lows.last().unwrap_or(i);
            Name {
                first: join(&tokens[..i]),
                von: join(&tokens[i..=j]),
                last: join(&tokens[j + 1..]),
                jr: String::new(),
            }
        }
    }
}

/// The `von Last` prefix of the comma forms: the leading run of lower-case
/// tokens is von, the rest is Last, and Last always keeps the final token.
fn von_last(tokens: &[&str]) -> (String, String) {
    if tokens.is_empty() {
        return (String::new(), String::new());
    }
    let limit = tokens.len() - 1;
    let mut k = 0;
    while k < limit && classify(tokens[k]) == Case::Lower {
        k += 1;
    }
    (join(&tokens[..k]), join(&tokens[k..]))
}
