//! # The `.bib` parser.
//!
//! [`Parser`] accepts one or more input streams and accumulates a
//! [`Database`]. Recoverable problems are logged to the caller's
//! [`Reporter`] and parsing resynchronizes at the next top-level `@`, so one
//! run reports as many problems as it can find; [`Parser::finalize`] then
//! refuses to hand back a database from a dirty parse.
//!
//! Values are expanded while parsing: `#`-concatenation is performed and
//! macros are resolved against the table built up by `@string` commands, so
//! entries carry plain strings with interior braces kept byte-for-byte.

pub(crate) mod macros;
mod scan;

pub use macros::MacroTable;

use crate::db::Database;
use crate::diag::Reporter;
use crate::entry::Entry;
use crate::error::{ErrorCode, FatalError, ScanError};
use crate::pos::LineIndex;

/// A resumable `.bib` parser.
///
/// ```
/// use bibdb::{Parser, Reporter};
///
/// let mut rpt = Reporter::new();
/// let mut parser = Parser::new();
/// parser.parse("@article{foo, title = {Hello}}", "refs.bib", &mut rpt);
/// let db = parser.finalize(&rpt).unwrap();
///
/// assert_eq!(db.get("foo").unwrap().get("title"), Some("Hello"));
/// ```
#[derive(Debug)]
pub struct Parser {
    db: Database,
    macros: MacroTable,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// A fresh parser with the month macros pre-defined.
    pub fn new() -> Self {
        let mut macros = MacroTable::new();
        macros.set_month_macros();
        Self {
            db: Database::default(),
            macros,
        }
    }

    /// Parse one input stream, logging recoverable problems to `rpt`.
    ///
    /// May be called repeatedly: entries accumulate in first-seen order
    /// across streams and `@string` definitions carry over.
    pub fn parse(&mut self, input: &str, name: &str, rpt: &mut Reporter) {
        StreamParser {
            input,
            pos: 0,
            lines: LineIndex::new(name, input),
            macros: &mut self.macros,
            db: &mut self.db,
            rpt,
        }
        .run();
    }

    /// Parse one byte stream.
    ///
    /// Input that is not valid UTF-8 is diagnosed as an error; the valid
    /// prefix is still parsed.
    pub fn parse_bytes(&mut self, input: &[u8], name: &str, rpt: &mut Reporter) {
        match std::str::from_utf8(input) {
            Ok(s) => self.parse(s, name, rpt),
            Err(err) => {
                let prefix = std::str::from_utf8(&input[..err.valid_up_to()]).unwrap_or_default();
                self.parse(prefix, name, rpt);
                let lines = LineIndex::new(name, prefix);
                rpt.error(lines.pos(prefix.len()), ErrorCode::InvalidUtf8.to_string());
            }
        }
    }

    /// The macro table in its current state.
    pub fn macros(&self) -> &MacroTable {
        &self.macros
    }

    /// Finish parsing.
    ///
    /// Returns the database if the reporter is clean, and a [`FatalError`]
    /// carrying the recorded diagnostics otherwise. Spot problems such as a
    /// duplicated key are warnings so that parsing can keep going, but a
    /// database built from flawed input is still refused here.
    pub fn finalize(self, rpt: &Reporter) -> Result<Database, FatalError> {
        if rpt.is_empty() {
            Ok(self.db)
        } else {
            Err(FatalError::new(
                rpt.diagnostics().to_vec(),
                rpt.error_count(),
            ))
        }
    }
}

/// Cursor state for a single input stream.
struct StreamParser<'r, 'p> {
    input: &'r str,
    pos: usize,
    lines: LineIndex,
    macros: &'p mut MacroTable,
    db: &'p mut Database,
    rpt: &'p mut Reporter,
}

impl<'r> StreamParser<'r, '_> {
    fn run(&mut self) {
        while let Some(next) = scan::next_entry(self.input, self.pos) {
            self.pos = next;
            if let Err(err) = self.command_or_entry(next - 1) {
                self.rpt
                    .error(self.lines.pos(err.offset), err.code.to_string());
                // resynchronize: the next iteration skips to the next
                // top-level `@`
            }
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    fn ws(&mut self) {
        self.pos = scan::whitespace(self.input, self.pos);
    }

    fn command_or_entry(&mut self, at: usize) -> Result<(), ScanError> {
        self.ws();
        let (end, id) = scan::identifier(self.input, self.pos)?;
        self.pos = end;

        if id.eq_ignore_ascii_case("comment") {
            // only the keyword is consumed; whatever follows is an
            // inter-entry comment
            Ok(())
        } else if id.eq_ignore_ascii_case("preamble") {
            self.preamble()
        } else if id.eq_ignore_ascii_case("string") {
            self.string_command()
        } else {
            self.entry(at, id)
        }
    }

    /// Consume an opening delimiter and return the matching closing one.
    fn initial(&mut self) -> Result<u8, ScanError> {
        self.ws();
        match self.peek() {
            Some(b'{') => {
                self.pos += 1;
                Ok(b'}')
            }
            Some(b'(') => {
                self.pos += 1;
                Ok(b')')
            }
            _ => Err(ScanError::new(ErrorCode::InvalidStartOfEntry, self.pos)),
        }
    }

    /// Consume the closing delimiter chosen by [`Self::initial`].
    fn terminal(&mut self, closing: u8) -> Result<(), ScanError> {
        self.ws();
        if self.peek() == Some(closing) {
            self.pos += 1;
            Ok(())
        } else {
            Err(ScanError::new(
                ErrorCode::ExpectedEndOfEntry(closing as char),
                self.pos,
            ))
        }
    }

    fn field_sep(&mut self) -> Result<(), ScanError> {
        self.ws();
        if self.peek() == Some(b'=') {
            self.pos += 1;
            Ok(())
        } else {
            Err(ScanError::new(ErrorCode::ExpectedFieldSep, self.pos))
        }
    }

    fn preamble(&mut self) -> Result<(), ScanError> {
        let closing = self.initial()?;
        let value = self.value()?;
        self.terminal(closing)?;
        self.db.push_preamble(&value);
        Ok(())
    }

    fn string_command(&mut self) -> Result<(), ScanError> {
        let closing = self.initial()?;
        self.ws();
        let (end, name) = scan::identifier(self.input, self.pos)?;
        self.pos = end;
        self.field_sep()?;
        let value = self.value()?;
        self.terminal(closing)?;
        self.macros.define(name, value);
        Ok(())
    }

    /// Parse a `#`-concatenated value, expanding macros as they appear.
    fn value(&mut self) -> Result<String, ScanError> {
        let mut out = String::new();
        loop {
            self.ws();
            match self.peek() {
                Some(b'0'..=b'9') => {
                    let (end, digits) = scan::number(self.input, self.pos);
                    self.pos = end;
                    out.push_str(digits);
                }
                Some(b'{') => {
                    self.pos += 1;
                    let (end, text) = scan::balanced(self.input, self.pos)?;
                    self.pos = end;
                    out.push_str(text);
                }
                Some(b'"') => {
                    self.pos += 1;
                    let (end, text) = scan::quoted(self.input, self.pos)?;
                    self.pos = end;
                    out.push_str(text);
                }
                Some(_) => {
                    let start = self.pos;
                    let (end, id) = scan::identifier(self.input, self.pos)
                        .map_err(|err| ScanError::new(ErrorCode::ExpectedValue, err.offset))?;
                    self.pos = end;
                    match self.macros.get(id) {
                        Some(text) => out.push_str(text),
                        None => self
                            .rpt
                            .warn(self.lines.pos(start), format!("undefined macro `{id}`")),
                    }
                }
                None => return Err(ScanError::new(ErrorCode::UnexpectedEof, self.pos)),
            }
            self.ws();
            if self.peek() == Some(b'#') {
                self.pos += 1;
            } else {
                return Ok(out);
            }
        }
    }

    fn entry(&mut self, at: usize, typ: &'r str) -> Result<(), ScanError> {
        let closing = self.initial()?;
        self.ws();
        let key_start = self.pos;
        let (end, key) = scan::entry_key(self.input, self.pos, closing == b')');
        self.pos = end;
        if key.is_empty() {
            return Err(ScanError::new(ErrorCode::EmptyEntryKey, key_start));
        }

        let mut entry = Entry::new(typ.to_ascii_lowercase(), key.to_owned(), self.lines.pos(at));
        loop {
            self.ws();
            if self.peek() != Some(b',') {
                break;
            }
            self.pos += 1;
            self.ws();
            if self.peek() == Some(closing) {
                // trailing comma
                break;
            }

            let name_start = self.pos;
            let (end, name) = scan::identifier(self.input, self.pos)?;
            self.pos = end;
            self.field_sep()?;
            self.ws();
            let value_pos = self.lines.pos(self.pos);
            let value = self.value()?;

            let name = name.to_ascii_lowercase();
            if entry.get(&name).is_some() {
                self.rpt.warn(
                    self.lines.pos(name_start),
                    format!("duplicate field `{name}` in entry `{key}`"),
                );
            } else {
                entry.push_field(name, value, value_pos);
            }
        }
        self.terminal(closing)?;

        if let Err(dup) = self.db.insert(entry) {
            self.rpt.warn(
                dup.pos().clone(),
                format!("duplicate entry key `{}`", dup.key()),
            );
        }
        Ok(())
    }
}
