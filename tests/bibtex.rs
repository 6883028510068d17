//! End-to-end tests driving the parser, the database, and the field
//! transforms together.

use bibdb::{Entry, Parser, Pos, Reporter, from_str, tex_to_unicode, title_case};

#[test]
fn test_simple_entry() {
    let db = from_str(
        r#"@article{foo, title = {Hello}, author = "Jane Doe"}"#,
        "refs.bib",
    )
    .unwrap();

    assert_eq!(db.len(), 1);
    let entry = db.get("foo").unwrap();
    assert_eq!(entry.typ(), "article");
    assert_eq!(entry.key(), "foo");
    assert_eq!(
        entry
            .fields()
            .iter()
            .map(|f| (f.name(), f.value()))
            .collect::<Vec<_>>(),
        [("title", "Hello"), ("author", "Jane Doe")]
    );
}

#[test]
fn test_macro_concatenation() {
    let db = from_str(
        r#"@string{j = "Journal"} @article{a, journal = j # " of X"}"#,
        "refs.bib",
    )
    .unwrap();
    assert_eq!(db.get("a").unwrap().get("journal"), Some("Journal of X"));
}

#[test]
fn test_duplicate_key_is_fatal_but_parsed() {
    let err = from_str(
        "@article{k, year = 1999} @book{k, year = 2000}",
        "refs.bib",
    )
    .unwrap_err();

    assert_eq!(err.error_count(), 0);
    assert_eq!(err.warning_count(), 1);
    assert!(err.diagnostics()[0].message().contains("duplicate entry key"));
    assert!(err.to_string().contains("1 warning"));
}

#[test]
fn test_crossref_resolution() {
    let mut rpt = Reporter::new();
    let mut parser = Parser::new();
    parser.parse(
        "@article{a, crossref={b}} @proceedings{b, year={2020}}",
        "refs.bib",
        &mut rpt,
    );
    let db = parser.finalize(&rpt).unwrap();

    let resolved = db.resolve_crossref(db.get("a").unwrap(), &mut rpt);
    assert!(rpt.is_empty());
    assert_eq!(resolved.get("year"), Some("2020"));
    assert_eq!(resolved.get("crossref"), None);
}

#[test]
fn test_junk_prefix_property() {
    // a database is a prefix of what the same input plus trailing junk and
    // further entries produces
    let base = "@article{a, x = 1} @article{b, x = 2}";
    let extended = format!("{base} some junk then @article{{c, x = 3}}");

    let keys = |input: &str| -> Vec<String> {
        from_str(input, "refs.bib")
            .unwrap()
            .iter()
            .map(|e| e.key().to_owned())
            .collect()
    };

    let short = keys(base);
    let long = keys(&extended);
    assert_eq!(short, long[..short.len()]);
}

#[test]
fn test_to_bib_reparses() {
    let db = from_str(
        r#"@Article{Knuth:1984, author = "Knuth, Donald E.", title = {Literate Programming}, year = 1984}"#,
        "refs.bib",
    )
    .unwrap();
    let printed = db.get("Knuth:1984").unwrap().to_bib();

    let db2 = from_str(&printed, "printed.bib").unwrap();
    let entry2 = db2.get("Knuth:1984").unwrap();
    assert_eq!(entry2.typ(), "article");
    assert_eq!(entry2.get("author"), Some("Knuth, Donald E."));
    assert_eq!(entry2.to_bib(), printed);
}

#[test]
fn test_error_positions_across_lines() {
    let mut rpt = Reporter::new();
    let mut parser = Parser::new();
    parser.parse(
        "@article{ok, year = 2020}\n@article{bad, year = )}\n",
        "refs.bib",
        &mut rpt,
    );

    assert_eq!(rpt.error_count(), 1);
    let diag = &rpt.diagnostics()[0];
    assert_eq!(diag.pos().file(), "refs.bib");
    assert_eq!(diag.pos().line(), 2);
}

#[test]
fn test_authors_with_tex_names() {
    let mut rpt = Reporter::new();
    let mut parser = Parser::new();
    parser.parse(
        r#"@book{erdos, author = "Erd{\H{o}}s, P{\'a}l and de la Vall{\'e}e Poussin, Charles"}"#,
        "refs.bib",
        &mut rpt,
    );
    let db = parser.finalize(&rpt).unwrap();
    let entry = db.get("erdos").unwrap();

    let authors = entry.authors(&mut rpt);
    assert!(rpt.is_empty());
    assert_eq!(authors.len(), 2);
    assert_eq!(authors[0].last(), r"Erd{\H{o}}s");
    assert_eq!(authors[1].von(), "de la");
    assert_eq!(authors[1].last(), r"Vall{\'e}e Poussin");

    // the braced form renders to plain Unicode
    let pos = entry.field_pos("author").unwrap().clone();
    assert_eq!(
        tex_to_unicode(authors[0].last(), &pos, &mut rpt),
        "Erdős"
    );
    assert!(rpt.is_empty());
}

#[test]
fn test_title_case_on_parsed_field() {
    let mut rpt = Reporter::new();
    let mut parser = Parser::new();
    parser.parse(
        "@article{a, title = {The TCP/IP Guide to Hello World}}",
        "refs.bib",
        &mut rpt,
    );
    let db = parser.finalize(&rpt).unwrap();
    let entry = db.get("a").unwrap();

    let title = title_case(
        entry.get("title").unwrap(),
        entry.field_pos("title").unwrap(),
        &mut rpt,
    );
    assert_eq!(title, "The tcp/ip guide to hello world");

    // idempotent on its own output
    let again = title_case(&title, &Pos::unknown(), &mut rpt);
    assert_eq!(again, title);
    assert!(rpt.is_empty());
}

#[test]
fn test_multiple_streams_ordering_and_duplicates() {
    let mut rpt = Reporter::new();
    let mut parser = Parser::new();
    parser.parse("@misc{one, n = 1}", "a.bib", &mut rpt);
    parser.parse("@misc{two, n = 2} @misc{ONE, n = 3}", "b.bib", &mut rpt);

    // the cross-stream duplicate (case-insensitive) is dropped with a warning
    assert_eq!(rpt.warning_count(), 1);
    assert_eq!(rpt.diagnostics()[0].pos().file(), "b.bib");

    let err = parser.finalize(&rpt).unwrap_err();
    assert_eq!(err.error_count(), 0);
}

#[cfg(feature = "serde")]
#[test]
fn test_entry_serializes() {
    let db = from_str("@article{a, title = {T}, year = 1999}", "refs.bib").unwrap();
    let json = serde_json::to_value(db.get("a").unwrap()).unwrap();

    assert_eq!(json["typ"], "article");
    assert_eq!(json["key"], "a");
    assert_eq!(json["fields"][0]["name"], "title");
    assert_eq!(json["fields"][1]["value"], "1999");
}

#[test]
fn test_entry_display_matches_to_bib() {
    let db = from_str("@misc{m, note = {x}}", "refs.bib").unwrap();
    let entry: &Entry = db.get("m").unwrap();
    assert_eq!(entry.to_string(), entry.to_bib());
}
