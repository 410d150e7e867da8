//! Lexical analyzer for Liberty source text.
//!
//! Converts source text into a sequence of [`Token`]s, handling `//` and
//! `/* ... */` comments, `#` line comments, and backslash-newline line
//! continuations (both appear in vendor-generated libraries). Lexing is
//! all-or-nothing: the first malformed construct aborts with a [`LexError`];
//! there is no recovery.

use crate::token::{LibertyToken, Token};
use sdforge_source::{FileId, Span};

/// The reason a [`LexError`] was raised.
#[derive(Clone, Copy, PartialEq, Eq, Debug, thiserror::Error)]
pub enum LexErrorKind {
    /// A string literal was not closed before end of line or file.
    #[error("unterminated string literal")]
    UnterminatedString,
    /// A `/* ... */` comment was not closed before end of file.
    #[error("unterminated block comment")]
    UnterminatedComment,
    /// A character that starts no Liberty token.
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
}

/// A fatal lexical error with the span of the offending text.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct LexError {
    /// What went wrong.
    pub kind: LexErrorKind,
    /// Where it went wrong.
    pub span: Span,
}

/// Lexes Liberty source text into a vector of tokens.
///
/// Whitespace, comments, and line continuations are skipped. On success the
/// returned vector always ends with a [`LibertyToken::Eof`] token.
pub fn lex(source: &str, file: FileId) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer {
        source: source.as_bytes(),
        pos: 0,
        file,
    };
    lexer.lex_all()
}

struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    file: FileId,
}

impl Lexer<'_> {
    fn lex_all(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.pos >= self.source.len() {
                tokens.push(Token {
                    kind: LibertyToken::Eof,
                    span: Span::new(self.file, self.pos as u32, self.pos as u32),
                });
                return Ok(tokens);
            }
            tokens.push(self.next_token()?);
        }
    }

    fn peek(&self) -> u8 {
        if self.pos < self.source.len() {
            self.source[self.pos]
        } else {
            0
        }
    }

    fn peek_at(&self, offset: usize) -> u8 {
        let idx = self.pos + offset;
        if idx < self.source.len() {
            self.source[idx]
        } else {
            0
        }
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(self.file, start as u32, self.pos as u32)
    }

    fn error(&self, kind: LexErrorKind, start: usize) -> LexError {
        LexError {
            kind,
            span: self.span_from(start),
        }
    }

    /// Skips whitespace, comments, and backslash-newline continuations.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            while self.pos < self.source.len() && self.source[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= self.source.len() {
                return Ok(());
            }
            // Line continuation: backslash followed by a line break
            if self.peek() == b'\\' && matches!(self.peek_at(1), b'\n' | b'\r') {
                self.pos += 2;
                continue;
            }
            // Line comments: // and # both occur in vendor libraries
            if (self.peek() == b'/' && self.peek_at(1) == b'/') || self.peek() == b'#' {
                while self.pos < self.source.len() && self.source[self.pos] != b'\n' {
                    self.pos += 1;
                }
                continue;
            }
            // Block comment: /* ... */
            if self.peek() == b'/' && self.peek_at(1) == b'*' {
                let start = self.pos;
                self.pos += 2;
                loop {
                    if self.pos >= self.source.len() {
                        return Err(self.error(LexErrorKind::UnterminatedComment, start));
                    }
                    if self.source[self.pos] == b'*' && self.peek_at(1) == b'/' {
                        self.pos += 2;
                        break;
                    }
                    self.pos += 1;
                }
                continue;
            }
            return Ok(());
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let b = self.peek();

        if is_ident_start(b) {
            return Ok(self.lex_identifier(start));
        }
        if b.is_ascii_digit() || (matches!(b, b'-' | b'+') && self.peek_at(1).is_ascii_digit()) {
            return Ok(self.lex_number(start));
        }
        if b == b'"' {
            return self.lex_string(start);
        }

        self.pos += 1;
        let kind = match b {
            b'{' => LibertyToken::LBrace,
            b'}' => LibertyToken::RBrace,
            b'(' => LibertyToken::LParen,
            b')' => LibertyToken::RParen,
            b';' => LibertyToken::Semi,
            b',' => LibertyToken::Comma,
            b':' => LibertyToken::Colon,
            other => {
                return Err(self.error(LexErrorKind::UnexpectedChar(other as char), start));
            }
        };
        Ok(Token {
            kind,
            span: self.span_from(start),
        })
    }

    fn lex_identifier(&mut self, start: usize) -> Token {
        while self.pos < self.source.len() && is_ident_char(self.source[self.pos]) {
            self.pos += 1;
        }
        // Bus-bit suffix: FBIO[22] is one pin name
        if self.peek() == b'[' {
            let mut probe = self.pos + 1;
            while probe < self.source.len() && self.source[probe].is_ascii_digit() {
                probe += 1;
            }
            if probe > self.pos + 1 && probe < self.source.len() && self.source[probe] == b']' {
                self.pos = probe + 1;
            }
        }
        Token {
            kind: LibertyToken::Ident,
            span: self.span_from(start),
        }
    }

    fn lex_number(&mut self, start: usize) -> Token {
        if matches!(self.peek(), b'-' | b'+') {
            self.pos += 1;
        }
        self.eat_digits();
        if self.peek() == b'.' && self.peek_at(1).is_ascii_digit() {
            self.pos += 1;
            self.eat_digits();
        }
        if matches!(self.peek(), b'e' | b'E') {
            let mut probe = self.pos + 1;
            if matches!(self.peek_at(1), b'-' | b'+') {
                probe += 1;
            }
            if probe < self.source.len() && self.source[probe].is_ascii_digit() {
                self.pos = probe;
                self.eat_digits();
            }
        }
        Token {
            kind: LibertyToken::Number,
            span: self.span_from(start),
        }
    }

    fn eat_digits(&mut self) {
        while self.pos < self.source.len() && self.source[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
    }

    fn lex_string(&mut self, start: usize) -> Result<Token, LexError> {
        self.pos += 1; // opening quote
        loop {
            if self.pos >= self.source.len() {
                return Err(self.error(LexErrorKind::UnterminatedString, start));
            }
            match self.source[self.pos] {
                b'"' => {
                    self.pos += 1;
                    return Ok(Token {
                        kind: LibertyToken::Str,
                        span: self.span_from(start),
                    });
                }
                // Strings may wrap across lines with a continuation backslash
                b'\\' => self.pos += 2,
                b'\n' => {
                    return Err(self.error(LexErrorKind::UnterminatedString, start));
                }
                _ => self.pos += 1,
            }
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_ok(source: &str) -> Vec<Token> {
        lex(source, FileId::from_raw(0)).expect("lexing should succeed")
    }

    fn kinds(tokens: &[Token]) -> Vec<LibertyToken> {
        tokens.iter().map(|t| t.kind).collect()
    }

    fn texts<'a>(tokens: &[Token], source: &'a str) -> Vec<&'a str> {
        tokens
            .iter()
            .map(|t| &source[t.span.start as usize..t.span.end as usize])
            .collect()
    }

    #[test]
    fn empty_input() {
        assert_eq!(kinds(&lex_ok("")), vec![LibertyToken::Eof]);
    }

    #[test]
    fn punctuation() {
        let tokens = lex_ok("( ) { } ; , :");
        assert_eq!(
            kinds(&tokens),
            vec![
                LibertyToken::LParen,
                LibertyToken::RParen,
                LibertyToken::LBrace,
                LibertyToken::RBrace,
                LibertyToken::Semi,
                LibertyToken::Comma,
                LibertyToken::Colon,
                LibertyToken::Eof,
            ]
        );
    }

    #[test]
    fn identifiers() {
        let src = "library cell_rise timing_sense";
        let tokens = lex_ok(src);
        assert_eq!(
            kinds(&tokens),
            vec![
                LibertyToken::Ident,
                LibertyToken::Ident,
                LibertyToken::Ident,
                LibertyToken::Eof
            ]
        );
        assert_eq!(
            texts(&tokens[..3], src),
            vec!["library", "cell_rise", "timing_sense"]
        );
    }

    #[test]
    fn bus_bit_identifier() {
        let src = "FBIO[22]";
        let tokens = lex_ok(src);
        assert_eq!(kinds(&tokens), vec![LibertyToken::Ident, LibertyToken::Eof]);
        assert_eq!(texts(&tokens[..1], src), vec!["FBIO[22]"]);
    }

    #[test]
    fn numbers() {
        let src = "0 42 0.0017 -1.5 +2.0 1.2e-3 3E4";
        let tokens = lex_ok(src);
        let k = kinds(&tokens);
        assert_eq!(k.len(), 8);
        assert!(k[..7].iter().all(|&t| t == LibertyToken::Number));
        assert_eq!(texts(&tokens[..7], src)[5], "1.2e-3");
    }

    #[test]
    fn string_literal() {
        let src = "\"1ns\" \"0.1, 0.2, 0.3\"";
        let tokens = lex_ok(src);
        assert_eq!(
            kinds(&tokens),
            vec![LibertyToken::Str, LibertyToken::Str, LibertyToken::Eof]
        );
        assert_eq!(texts(&tokens[..1], src), vec!["\"1ns\""]);
    }

    #[test]
    fn line_comments() {
        let tokens = lex_ok("pin // trailing\n# vendor note\ncell");
        assert_eq!(
            kinds(&tokens),
            vec![LibertyToken::Ident, LibertyToken::Ident, LibertyToken::Eof]
        );
    }

    #[test]
    fn block_comment() {
        let tokens = lex_ok("pin /* spans\nlines */ cell");
        assert_eq!(
            kinds(&tokens),
            vec![LibertyToken::Ident, LibertyToken::Ident, LibertyToken::Eof]
        );
    }

    #[test]
    fn line_continuation() {
        let tokens = lex_ok("values \\\n ( \"0.1\" )");
        assert_eq!(
            kinds(&tokens),
            vec![
                LibertyToken::Ident,
                LibertyToken::LParen,
                LibertyToken::Str,
                LibertyToken::RParen,
                LibertyToken::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_string_fails() {
        let err = lex("\"no close\n", FileId::from_raw(0)).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedString);
        assert_eq!(err.span.start, 0);
    }

    #[test]
    fn unterminated_comment_fails() {
        let err = lex("/* never closed", FileId::from_raw(0)).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnterminatedComment);
    }

    #[test]
    fn unexpected_char_fails() {
        let err = lex("pin @ Z", FileId::from_raw(0)).unwrap_err();
        assert_eq!(err.kind, LexErrorKind::UnexpectedChar('@'));
        assert_eq!(err.span.start, 4);
    }

    #[test]
    fn spans_cover_tokens() {
        let tokens = lex_ok("cell(BUF)");
        assert_eq!((tokens[0].span.start, tokens[0].span.end), (0, 4));
        assert_eq!((tokens[2].span.start, tokens[2].span.end), (5, 8));
    }

    #[test]
    fn eof_always_last() {
        let tokens = lex_ok("library");
        assert_eq!(tokens.last().unwrap().kind, LibertyToken::Eof);
    }
}
