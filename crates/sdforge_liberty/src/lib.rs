//! Lexer and parser for the Liberty (`.lib`) timing library format.
//!
//! Liberty is a nested group/attribute grammar: `group_type ( name ) { ... }`
//! blocks containing simple attributes (`name : value ;`), complex attributes
//! (`name ( v1, v2, ... ) ;`), and child groups. This crate turns Liberty text
//! into a format-agnostic [`GroupNode`] tree; it knows the grammar, not the
//! timing semantics. Extracting cells, pins, and arcs from the tree is the
//! model builder's job, so grammar growth never touches the typed model.
//!
//! Parsing is all-or-nothing per file: the first lexical or syntactic error
//! aborts with a typed error carrying the offending [`Span`]. Malformed
//! characterization data is never guessed at.
//!
//! [`Span`]: sdforge_source::Span

#![warn(missing_docs)]

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{AttrValue, Attribute, GroupNode, Value};
pub use lexer::{lex, LexError, LexErrorKind};
pub use parser::{parse, ParseError, ParseErrorKind};

use sdforge_source::FileId;

/// An error from either phase of Liberty reading.
#[derive(Debug, thiserror::Error)]
pub enum LibertyError {
    /// The lexer rejected the input.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The parser rejected the token stream.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// Lexes and parses Liberty source text into a generic group tree.
///
/// Convenience wrapper around [`lex`] and [`parse`].
pub fn parse_source(source: &str, file: FileId) -> Result<GroupNode, LibertyError> {
    let tokens = lex(source, file)?;
    Ok(parse(&tokens, source)?)
}
