//! # Error types.
//!
//! Recoverable scanner and parser errors are internal: they are rendered
//! into [`Diagnostic`]s and the parser resynchronizes. The only error that
//! crosses the public API is [`FatalError`], returned by
//! [`Parser::finalize`](crate::Parser::finalize) when the parse recorded any
//! diagnostic.

use std::fmt;

use crate::diag::Diagnostic;

/// A recoverable error at a byte offset in the current input stream.
#[derive(Debug, PartialEq)]
pub(crate) struct ScanError {
    pub(crate) code: ErrorCode,
    pub(crate) offset: usize,
}

impl ScanError {
    pub(crate) fn new(code: ErrorCode, offset: usize) -> Self {
        Self { code, offset }
    }
}

#[derive(Debug, PartialEq)]
pub(crate) enum ErrorCode {
    InvalidStartOfEntry,
    ExpectedFieldSep,
    ExpectedValue,
    ExpectedEndOfEntry(char),
    EmptyIdentifier,
    IdentifierStartsWithDigit,
    EmptyEntryKey,
    UnclosedBracket,
    UnclosedQuote,
    UnexpectedClosingBracket,
    UnexpectedEof,
    InvalidUtf8,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStartOfEntry => f.write_str("expected start of entry '{' or '('"),
            Self::ExpectedFieldSep => f.write_str("expected field separator '='"),
            Self::ExpectedValue => f.write_str("expected a value token"),
            Self::ExpectedEndOfEntry(closing) => write!(f, "expected end of entry '{closing}'"),
            Self::EmptyIdentifier => f.write_str("identifier missing or length 0"),
            Self::IdentifierStartsWithDigit => f.write_str("identifier starts with ASCII digit"),
            Self::EmptyEntryKey => f.write_str("entry key missing"),
            Self::UnclosedBracket => f.write_str("unclosed '{' in token"),
            Self::UnclosedQuote => f.write_str("unclosed '\"' in token"),
            Self::UnexpectedClosingBracket => f.write_str("unmatched closing bracket"),
            Self::UnexpectedEof => f.write_str("unexpected end of input"),
            Self::InvalidUtf8 => f.write_str("input is not valid UTF-8"),
        }
    }
}

/// The parse produced diagnostics, so no database is handed back.
///
/// Parsing itself keeps going past recoverable problems; this is the single
/// fatal signal raised afterwards by
/// [`Parser::finalize`](crate::Parser::finalize). The diagnostics recorded by
/// the parse are carried here so one-shot callers such as
/// [`from_str`](crate::from_str) lose nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct FatalError {
    diagnostics: Vec<Diagnostic>,
    errors: usize,
}

impl FatalError {
    pub(crate) fn new(diagnostics: Vec<Diagnostic>, errors: usize) -> Self {
        Self {
            diagnostics,
            errors,
        }
    }

    /// The diagnostics that made the parse fatal, in input order.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.len() - self.errors
    }
}

impl fmt::Display for FatalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bibliography input rejected: {} error(s), {} warning(s)",
            self.errors,
            self.warning_count()
        )
    }
}

impl std::error::Error for FatalError {}
