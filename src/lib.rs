//! # bibdb
//!
//! A parser and field-processing toolkit for `.bib` bibliography databases,
//! faithful to the behavior of the original BibTeX program.
//! ```bib
//! @article{key,
//!   title = {Title},
//!   author = {One, Author},
//!   year = 2024,
//! }
//! ```
//! The crate has four cooperating parts:
//!
//! - a [`Parser`] that tokenizes and structures entries, executes `@string`
//!   and `@preamble` commands, and builds an ordered [`Database`],
//! - a name parser ([`parse_names`], [`Entry::authors`]) splitting
//!   author/editor strings into the four BibTeX name parts,
//! - a title caser ([`title_case`]) implementing the `t` format's
//!   outside-braces lowercasing,
//! - a TeX-to-Unicode translator ([`tex_to_unicode`]) for accents,
//!   ligatures, dashes, and control symbols.
//!
//! Everything that can go wrong with the *input* is reported through a
//! [`Reporter`] passed in by the caller, and parsing continues past
//! recoverable problems so that one run reports as much as possible.
//! [`Parser::finalize`] then either hands over the database or fails once
//! with a [`FatalError`].
//!
//! ## Parsing
//!
//! ```
//! use bibdb::{Parser, Reporter};
//!
//! let input = r#"
//!     @string{anna = "Anna Gersdorf"}
//!     @article{gersdorf2019,
//!       author = anna # " and Theo {van der Haar}",
//!       title = {The {TCP/IP} Guide to Nothing},
//!       month = sep,
//!       year = 2019,
//!     }
//! "#;
//!
//! let mut rpt = Reporter::new();
//! let mut parser = Parser::new();
//! parser.parse(input, "refs.bib", &mut rpt);
//! let db = parser.finalize(&rpt).unwrap();
//!
//! let entry = db.get("gersdorf2019").unwrap();
//! assert_eq!(entry.typ(), "article");
//! assert_eq!(entry.get("author"), Some("Anna Gersdorf and Theo {van der Haar}"));
//! assert_eq!(entry.month_num(), Some(9));
//!
//! let authors = entry.authors(&mut rpt);
//! assert_eq!(authors[0].last(), "Gersdorf");
//! assert_eq!(authors[1].first(), "Theo");
//! ```
//!
//! ## Field transforms
//!
//! ```
//! use bibdb::{tex_to_unicode, title_case, Pos, Reporter};
//!
//! let mut rpt = Reporter::new();
//! let pos = Pos::unknown();
//!
//! assert_eq!(tex_to_unicode(r"Erd{\H{o}}s", &pos, &mut rpt), "Erdős");
//! assert_eq!(
//!     title_case("The Art of Computer Programming", &pos, &mut rpt),
//!     "The art of computer programming"
//! );
//! assert!(rpt.is_empty());
//! ```
//!
//! ## Syntax
//!
//! `.bib` files do not have a universally agreed-upon grammar; this crate
//! implements the one the original program accepts. With the `syntax`
//! feature enabled, the [syntax module](syntax) restates that grammar as an
//! explicit [pest](https://docs.rs/pest/latest/pest/) parser.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod case;
mod db;
mod diag;
mod entry;
mod error;
mod names;
mod parse;
mod pos;
mod tex;

#[cfg(feature = "syntax")]
#[cfg_attr(docsrs, doc(cfg(feature = "syntax")))]
pub mod syntax;

pub use crate::{
    case::title_case,
    db::Database,
    diag::{Diagnostic, Reporter, Severity},
    entry::{Entry, Field},
    error::FatalError,
    names::{Name, parse_names},
    parse::{MacroTable, Parser},
    pos::Pos,
    tex::{first_letter, tex_to_unicode},
};

/// Parse a single `.bib` string into a [`Database`].
///
/// Diagnostics of a failed parse travel inside the [`FatalError`]; callers
/// that want warnings from a *successful* parse should drive a [`Parser`]
/// with their own [`Reporter`] instead.
pub fn from_str(input: &str, name: &str) -> Result<Database, FatalError> {
    let mut rpt = Reporter::new();
    let mut parser = Parser::new();
    parser.parse(input, name, &mut rpt);
    parser.finalize(&rpt)
}

/// Parse a single `.bib` byte stream into a [`Database`].
///
/// Input that is not valid UTF-8 is a fatal parse error.
pub fn from_bytes(input: &[u8], name: &str) -> Result<Database, FatalError> {
    let mut rpt = Reporter::new();
    let mut parser = Parser::new();
    parser.parse_bytes(input, name, &mut rpt);
    parser.finalize(&rpt)
}
