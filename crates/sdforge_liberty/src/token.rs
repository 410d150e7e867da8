//! Token types for the Liberty lexer.
//!
//! Defines the [`LibertyToken`] enum covering the punctuation and literal
//! kinds of the Liberty grammar, plus the [`Token`] struct pairing a token
//! kind with its source [`Span`].

use sdforge_source::Span;
use serde::{Deserialize, Serialize};

/// A Liberty token kind.
///
/// Liberty has no reserved words — `library`, `cell`, `pin` and friends are
/// ordinary identifiers whose meaning comes from position. Literal values are
/// not stored in the token; they are retrieved from the source text using the
/// token's span.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum LibertyToken {
    /// An identifier, e.g. `cell`, `timing_sense`, `positive_unate`.
    ///
    /// Bus-bit pin names like `FBIO[22]` lex as a single identifier.
    Ident,
    /// A double-quoted string literal, e.g. `"1ns"` or `"0.1, 0.2, 0.3"`.
    Str,
    /// A numeric literal: integer or floating, optionally signed and with
    /// a scientific exponent, e.g. `0.0017`, `-1.5e-2`.
    Number,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `;`
    Semi,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// End of file
    Eof,
}

impl LibertyToken {
    /// A short human-readable description for "expected X, found Y" messages.
    pub fn describe(self) -> &'static str {
        match self {
            LibertyToken::Ident => "identifier",
            LibertyToken::Str => "string",
            LibertyToken::Number => "number",
            LibertyToken::LBrace => "'{'",
            LibertyToken::RBrace => "'}'",
            LibertyToken::LParen => "'('",
            LibertyToken::RParen => "')'",
            LibertyToken::Semi => "';'",
            LibertyToken::Comma => "','",
            LibertyToken::Colon => "':'",
            LibertyToken::Eof => "end of file",
        }
    }
}

/// A lexed token with its kind and source location.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Token {
    /// The kind of this token.
    pub kind: LibertyToken,
    /// The source span covering this token's text.
    pub span: Span,
}
