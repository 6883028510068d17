//! # Source positions.
//!
//! Entries, fields, and diagnostics are anchored to the input they came from
//! by a [`Pos`]: the stream name plus a 1-based line and column. Positions
//! are computed on demand from byte offsets by a [`LineIndex`] built once per
//! input stream.

use std::fmt;
use std::sync::Arc;

use memchr::memchr_iter;

/// A location in a parsed input stream.
///
/// The column is a byte column; `.bib` input is overwhelmingly ASCII and this
/// matches how the original program counts.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Pos {
    file: Arc<str>,
    line: u32,
    col: u32,
}

impl Pos {
    pub(crate) fn new(file: &Arc<str>, line: u32, col: u32) -> Self {
        Self {
            file: Arc::clone(file),
            line,
            col,
        }
    }

    /// A position for strings that did not come from a parsed stream.
    ///
    /// Useful when calling [`title_case`](crate::title_case) or
    /// [`tex_to_unicode`](crate::tex_to_unicode) on ad-hoc input.
    pub fn unknown() -> Self {
        Self {
            file: Arc::from("<string>"),
            line: 0,
            col: 0,
        }
    }

    /// The name of the input stream this position refers to.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// 1-based line number, or 0 for [`Pos::unknown`].
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 1-based byte column, or 0 for [`Pos::unknown`].
    pub fn col(&self) -> u32 {
        self.col
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.line == 0 {
            f.write_str(&self.file)
        } else {
            write!(f, "{}:{}:{}", self.file, self.line, self.col)
        }
    }
}

/// Maps byte offsets in one input stream to line/column positions.
///
/// Line breaks are `\n`; a preceding `\r` is treated as part of the broken
/// line, so `\r\n` counts as a single line ending.
#[derive(Debug)]
pub(crate) struct LineIndex {
    file: Arc<str>,
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub(crate) fn new(file: &str, input: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(memchr_iter(b'\n', input.as_bytes()).map(|i| i + 1));
        Self {
            file: Arc::from(file),
            line_starts,
        }
    }

    /// The position of the byte at `offset`.
    pub(crate) fn pos(&self, offset: usize) -> Pos {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        Pos::new(
            &self.file,
            (line + 1) as u32,
            (offset - self.line_starts[line] + 1) as u32,
        )
    }
}
