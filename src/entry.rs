//! # Entries and their fields.

use std::fmt;

use crate::diag::Reporter;
use crate::names::{self, Name};
use crate::parse::macros::MONTHS;
use crate::pos::Pos;

/// One field of an entry: a lowercased name, the raw expanded value, and the
/// source position of the value for anchoring downstream diagnostics.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Field {
    name: String,
    value: String,
    pos: Pos,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The raw value: macros expanded, `#`-pieces joined, delimiters
    /// stripped, interior braces kept.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn pos(&self) -> &Pos {
        &self.pos
    }
}

/// A parsed entry.
///
/// The type is lowercased; the key is kept verbatim. Fields preserve the
/// order they appeared in the source, and their names are lowercased and
/// unique within the entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Entry {
    typ: String,
    key: String,
    fields: Vec<Field>,
    pos: Pos,
}

impl Entry {
    pub(crate) fn new(typ: String, key: String, pos: Pos) -> Self {
        Self {
            typ,
            key,
            fields: Vec::new(),
            pos,
        }
    }

    pub(crate) fn push_field(&mut self, name: String, value: String, pos: Pos) {
        self.fields.push(Field { name, value, pos });
    }

    pub(crate) fn remove_field(&mut self, name: &str) {
        self.fields.retain(|field| field.name != name);
    }

    /// The lowercased entry type, e.g. `article`.
    pub fn typ(&self) -> &str {
        &self.typ
    }

    /// The citation key, verbatim.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The position of the entry's `@`.
    pub fn pos(&self) -> &Pos {
        &self.pos
    }

    /// The fields in source order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field value; the name is matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
            .map(|field| field.value.as_str())
    }

    /// The source position of a field's value.
    pub fn field_pos(&self, name: &str) -> Option<&Pos> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
            .map(|field| &field.pos)
    }

    /// The names in the `author` field; empty if the field is missing.
    pub fn authors(&self, rpt: &mut Reporter) -> Vec<Name> {
        self.name_field("author", rpt)
    }

    /// The names in the `editor` field; empty if the field is missing.
    pub fn editors(&self, rpt: &mut Reporter) -> Vec<Name> {
        self.name_field("editor", rpt)
    }

    fn name_field(&self, name: &str, rpt: &mut Reporter) -> Vec<Name> {
        match (self.get(name), self.field_pos(name)) {
            (Some(value), Some(pos)) => names::parse_names(value, pos, rpt),
            _ => Vec::new(),
        }
    }

    /// The month field as a number in `1..=12`.
    ///
    /// Accepts the canonical month strings the month macros expand to, in
    /// any case, full or abbreviated to three letters with an optional
    /// trailing period. Returns `None` for a missing or unrecognized field.
    pub fn month_num(&self) -> Option<u32> {
        let value = self.get("month")?;
        let value = value.trim().trim_end_matches('.');
        MONTHS
            .iter()
            .position(|month| {
                month.eq_ignore_ascii_case(value) || month[..3].eq_ignore_ascii_case(value)
            })
            .map(|i| i as u32 + 1)
    }

    /// The canonical pretty-printed form of the entry.
    ///
    /// ```
    /// # use bibdb::from_str;
    /// let db = from_str("@Article{k, year = 2020 }", "refs.bib").unwrap();
    /// assert_eq!(db.get("k").unwrap().to_bib(), "@article{k,\n  year = {2020},\n}\n");
    /// ```
    pub fn to_bib(&self) -> String {
        let mut out = format!("@{}{{{},\n", self.typ, self.key);
        for field in &self.fields {
            out.push_str(&format!("  {} = {{{}}},\n", field.name, field.value));
        }
        out.push_str("}\n");
        out
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bib())
    }
}
