//! # Description of the bibliography syntax.
//!
//! The goal of this module is to give an explicit description of the
//! grammar accepted by this crate, as a [pest](https://docs.rs/pest/latest/pest/)
//! parser derived from `src/syntax/bibtex.pest`. The hand-rolled reader in
//! the crate proper is the normative implementation; the grammar here is a
//! restatement used for documentation and testing.
//!
//! ## Structure of a bibliography
//!
//! 1. Everything outside an entry is comment: any bytes up to the next `@`.
//!    There is no `%`-style comment syntax; the original program does not
//!    have one either.
//!    ```ignore
//!    junk = _{ (!"@" ~ ANY)* }
//!    ```
//! 2. An identifier is a printable ASCII character sequence excluding the
//!    literal characters `{}(),="#%'` and space, not starting with an ASCII
//!    digit. Entry types, field keys, and macro names are identifiers and
//!    compare case-insensitively.
//! 3. A value is a non-empty `#`-separated sequence of tokens, where a
//!    token is a digit run, a brace-balanced `{...}` group, a `"..."`
//!    quoted string whose closing quote sits at brace depth 0, or a macro
//!    name.
//! 4. An entry key inside `{...}` stops at `,`, whitespace, or `}`; inside
//!    `(...)` it may contain `}`.
//! 5. `@comment` consumes the keyword only and resynchronizes; `@preamble`
//!    holds a value; `@string` holds a single `name = value` definition; any
//!    other `@type` begins a regular entry with `key` and `name = value`
//!    fields, with an optional trailing comma.
//!
//! ## Differences from the hand parser
//!
//! The grammar admits a few forms the reader additionally diagnoses,
//! because the data model forbids them:
//!
//! 1. An empty entry key parses here but is a recoverable error there.
//! 2. Duplicate fields and duplicate entry keys are grammatical; the reader
//!    keeps the first occurrence and warns.
use pest_derive::Parser;

/// A simple automatically derived pest parser.
#[derive(Parser)]
#[grammar = "syntax/bibtex.pest"] // relative to src
pub struct BibGrammar;

#[cfg(test)]
mod tests {
    use super::*;
    use pest::Parser;

    #[test]
    fn test_parse() {
        let input = r#"
            junk between entries
            @article (weird}key,
               journal = { Text} #
                jan,
            )
            @article {k2, title={T} # 1990,}
            @article {k3, title = "{"}"}
            @misc{bare}
            @string{v = 1234}
            @string( v = "one" # {two} )
            @comment{ignored, not an entry}
            @commentary{x, note = {a real entry type}}
            @preamble{ {Text} # v # {"} }
        "#;

        let parsed = BibGrammar::parse(Rule::bib, input);

        assert!(parsed.is_ok(), "{parsed:?}");
    }

    #[test]
    fn test_reject() {
        for input in [
            "@article{k, title = }",
            "@article{k, title = {unclosed}",
            "@string{2x = {digit-led name}}",
            // the keyword is consumed, `{` is junk, and `@article}` is a
            // malformed entry
            "@comment{@article}",
        ] {
            assert!(
                BibGrammar::parse(Rule::bib, input).is_err(),
                "should reject {input:?}"
            );
        }
    }
}
