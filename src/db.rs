//! # The parsed database.

use std::collections::hash_map::{Entry as Slot, HashMap};

use crate::diag::Reporter;
use crate::entry::Entry;

/// An ordered collection of parsed entries.
///
/// Iteration yields entries in first-seen order across all parsed streams.
/// Lookup by key is case-sensitive, but keys that differ only in case are
/// still duplicates: the parser keeps the first and warns about the rest.
#[derive(Debug, Clone, Default)]
pub struct Database {
    entries: Vec<Entry>,
    index: HashMap<String, usize>,
    preamble: String,
}

impl Database {
    /// Insert an entry, detecting duplicate keys case-insensitively.
    ///
    /// On a duplicate the database is left unchanged and the rejected entry
    /// is handed back for diagnosis.
    pub(crate) fn insert(&mut self, entry: Entry) -> Result<(), Entry> {
        match self.index.entry(entry.key().to_ascii_lowercase()) {
            Slot::Occupied(_) => Err(entry),
            Slot::Vacant(slot) => {
                slot.insert(self.entries.len());
                self.entries.push(entry);
                Ok(())
            }
        }
    }

    pub(crate) fn push_preamble(&mut self, value: &str) {
        self.preamble.push_str(value);
    }

    /// Look up an entry by key, comparing case-sensitively.
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.index
            .get(&key.to_ascii_lowercase())
            .map(|&i| &self.entries[i])
            .filter(|entry| entry.key() == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// The entries in first-seen order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The concatenated contents of all `@preamble` commands.
    pub fn preamble(&self) -> &str {
        &self.preamble
    }

    /// Resolve the `crossref` field of `entry` against this database.
    ///
    /// Returns a new entry in which every field present in the target and
    /// absent in `entry` has been copied over (with the target's value and
    /// position), and the `crossref` field itself removed. Chains are
    /// resolved one hop only: the target's own `crossref`, if any, is not
    /// inherited, which also makes resolution idempotent. A missing target
    /// is a warning and `entry` is returned unchanged minus the crossref.
    pub fn resolve_crossref(&self, entry: &Entry, rpt: &mut Reporter) -> Entry {
        let Some(target_key) = entry.get("crossref") else {
            return entry.clone();
        };
        let pos = entry
            .field_pos("crossref")
            .cloned()
            .unwrap_or_else(|| entry.pos().clone());

        let mut resolved = entry.clone();
        resolved.remove_field("crossref");

        match self.get(target_key) {
            Some(target) => {
                for field in target.fields() {
                    if field.name() != "crossref" && resolved.get(field.name()).is_none() {
                        resolved.push_field(
                            field.name().to_owned(),
                            field.value().to_owned(),
                            field.pos().clone(),
                        );
                    }
                }
            }
            None => rpt.warn(pos, format!("crossref target `{target_key}` not found")),
        }
        resolved
    }
}

impl<'a> IntoIterator for &'a Database {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Parser, Reporter};

    fn db(input: &str) -> Database {
        let mut rpt = Reporter::new();
        let mut parser = Parser::new();
        parser.parse(input, "test.bib", &mut rpt);
        parser.finalize(&rpt).unwrap()
    }

    #[test]
    fn test_order_preserved() {
        let db = db("@misc{b, k = 1} @misc{c, k = 2} @misc{a, k = 3}");
        let keys: Vec<_> = db.iter().map(Entry::key).collect();
        assert_eq!(keys, ["b", "c", "a"]);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let db = db("@misc{Knuth84, k = 1}");
        assert!(db.contains_key("Knuth84"));
        assert!(!db.contains_key("knuth84"));
    }

    #[test]
    fn test_resolve_crossref() {
        let db = db(
            "@article{a, crossref = {b}, title = {T}}
             @proceedings{b, year = {2020}, title = {Ignored}}",
        );
        let mut rpt = Reporter::new();
        let resolved = db.resolve_crossref(db.get("a").unwrap(), &mut rpt);

        assert!(rpt.is_empty());
        assert_eq!(resolved.get("crossref"), None);
        assert_eq!(resolved.get("year"), Some("2020"));
        // fields already present in the source are not overwritten
        assert_eq!(resolved.get("title"), Some("T"));
        // the original entry is untouched
        assert_eq!(db.get("a").unwrap().get("crossref"), Some("b"));
    }

    #[test]
    fn test_resolve_crossref_idempotent() {
        let db = db(
            "@article{a, crossref = {b}}
             @proceedings{b, crossref = {c}, series = {S}}
             @misc{c, note = {deep}}",
        );
        let mut rpt = Reporter::new();
        let once = db.resolve_crossref(db.get("a").unwrap(), &mut rpt);
        let twice = db.resolve_crossref(&once, &mut rpt);

        assert!(rpt.is_empty());
        // one hop only: the target's own crossref is not inherited
        assert_eq!(once.get("series"), Some("S"));
        assert_eq!(once.get("note"), None);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_resolve_crossref_missing_target() {
        let db = db("@article{a, crossref = {nowhere}, year = 1999}");
        let mut rpt = Reporter::new();
        let resolved = db.resolve_crossref(db.get("a").unwrap(), &mut rpt);

        assert_eq!(rpt.warning_count(), 1);
        assert!(rpt.diagnostics()[0].message().contains("nowhere"));
        assert_eq!(resolved.get("crossref"), None);
        assert_eq!(resolved.get("year"), Some("1999"));
    }
}
