//! Recursive descent parser for the Liberty group grammar.
//!
//! Consumes the token stream into a [`GroupNode`] tree. One error aborts the
//! parse; salvaging a malformed library is upstream tooling's problem, not
//! ours.

use crate::ast::{AttrValue, Attribute, GroupNode, Value};
use crate::token::{LibertyToken, Token};
use sdforge_source::Span;

/// Attributes whose quoted arguments are comma-separated numeric rows.
const TABLE_ATTRS: &[&str] = &["values", "index_1", "index_2", "index_3"];

/// The reason a [`ParseError`] was raised.
#[derive(Clone, PartialEq, Eq, Debug, thiserror::Error)]
pub enum ParseErrorKind {
    /// The parser found something other than what the grammar requires.
    #[error("expected {what}, found {found}")]
    Expected {
        /// What the grammar requires here.
        what: String,
        /// What was actually found.
        found: String,
    },
    /// A group body was still open at end of file.
    #[error("unmatched '{{' — group is never closed")]
    UnmatchedBrace,
    /// An attribute statement is missing its `;` terminator.
    #[error("missing ';' after attribute")]
    MissingSemicolon,
    /// A lookup-table row has a different column count than the first row.
    #[error("table row {row} has {found} columns, expected {expected}")]
    RaggedTable {
        /// The 1-indexed offending row.
        row: usize,
        /// The column count established by the first row.
        expected: usize,
        /// The column count actually found.
        found: usize,
    },
}

/// A fatal syntax error with the span of the offending tokens.
#[derive(Debug, thiserror::Error)]
#[error("{kind}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Where it went wrong.
    pub span: Span,
}

/// Parses a token stream into the top-level group (normally `library`).
///
/// The `tokens` must have been lexed from `source`. Exactly one top-level
/// group is accepted; trailing tokens are an error.
pub fn parse(tokens: &[Token], source: &str) -> Result<GroupNode, ParseError> {
    // The lexer always appends Eof, but `parse` is callable on its own.
    if tokens.is_empty() {
        return Err(ParseError {
            kind: ParseErrorKind::Expected {
                what: "a group".to_string(),
                found: "end of file".to_string(),
            },
            span: Span::DUMMY,
        });
    }
    let mut parser = Parser {
        tokens,
        pos: 0,
        source,
    };
    let root = parser.parse_group()?;
    if !parser.at(LibertyToken::Eof) {
        return Err(parser.expected("end of file"));
    }
    Ok(root)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    source: &'a str,
}

impl<'a> Parser<'a> {
    fn current(&self) -> LibertyToken {
        self.tokens[self.pos].kind
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn current_text(&self) -> &'a str {
        let span = self.current_span();
        &self.source[span.start as usize..span.end as usize]
    }

    fn at(&self, kind: LibertyToken) -> bool {
        self.current() == kind
    }

    fn advance(&mut self) {
        if !self.at(LibertyToken::Eof) {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: LibertyToken) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: LibertyToken) -> Result<(), ParseError> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.expected(kind.describe()))
        }
    }

    fn error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            span: self.current_span(),
        }
    }

    fn expected(&self, what: &str) -> ParseError {
        let found = if self.at(LibertyToken::Eof) {
            "end of file".to_string()
        } else {
            format!("'{}'", self.current_text())
        };
        self.error(ParseErrorKind::Expected {
            what: what.to_string(),
            found,
        })
    }

    /// Parses `kind ( args? ) { body }`.
    fn parse_group(&mut self) -> Result<GroupNode, ParseError> {
        let start = self.current_span();
        let kind = self.expect_ident()?;
        self.expect(LibertyToken::LParen)?;
        let args = self.parse_args()?;
        let header_end = self.current_span();
        self.expect(LibertyToken::RParen)?;
        self.expect(LibertyToken::LBrace)?;

        let mut group = GroupNode {
            kind,
            name: group_name(&args),
            attributes: Vec::new(),
            children: Vec::new(),
            span: start.merge(header_end),
        };
        self.parse_body(&mut group)?;
        Ok(group)
    }

    fn parse_body(&mut self, group: &mut GroupNode) -> Result<(), ParseError> {
        loop {
            if self.eat(LibertyToken::RBrace) {
                return Ok(());
            }
            if self.at(LibertyToken::Eof) {
                return Err(ParseError {
                    kind: ParseErrorKind::UnmatchedBrace,
                    span: group.span,
                });
            }
            self.parse_item(group)?;
        }
    }

    /// Parses one statement in a group body: a simple attribute, a complex
    /// attribute, or a child group. All three start with an identifier; the
    /// following token decides which.
    fn parse_item(&mut self, group: &mut GroupNode) -> Result<(), ParseError> {
        let start = self.current_span();
        let name = self.expect_ident()?;

        match self.current() {
            LibertyToken::Colon => {
                self.advance();
                let value = self.parse_value()?;
                let end = self.current_span();
                if !self.eat(LibertyToken::Semi) {
                    return Err(self.error(ParseErrorKind::MissingSemicolon));
                }
                group.attributes.push(Attribute {
                    name,
                    value: AttrValue::Simple(value),
                    span: start.merge(end),
                });
                Ok(())
            }
            LibertyToken::LParen => {
                self.advance();
                let args = self.parse_args()?;
                let close = self.current_span();
                self.expect(LibertyToken::RParen)?;

                if self.at(LibertyToken::LBrace) {
                    self.advance();
                    let mut child = GroupNode {
                        kind: name,
                        name: group_name(&args),
                        attributes: Vec::new(),
                        children: Vec::new(),
                        span: start.merge(close),
                    };
                    self.parse_body(&mut child)?;
                    group.children.push(child);
                    Ok(())
                } else if self.eat(LibertyToken::Semi) {
                    let value = if TABLE_ATTRS.contains(&name.as_str()) {
                        AttrValue::Table(self.build_table(&args, start.merge(close))?)
                    } else {
                        AttrValue::Complex(args)
                    };
                    group.attributes.push(Attribute {
                        name,
                        value,
                        span: start.merge(close),
                    });
                    Ok(())
                } else {
                    Err(self.error(ParseErrorKind::MissingSemicolon))
                }
            }
            _ => Err(self.expected("':' or '('")),
        }
    }

    /// Parses a comma-separated argument list; stops before `)`.
    fn parse_args(&mut self) -> Result<Vec<Value>, ParseError> {
        let mut args = Vec::new();
        if self.at(LibertyToken::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_value()?);
            if !self.eat(LibertyToken::Comma) {
                return Ok(args);
            }
        }
    }

    fn parse_value(&mut self) -> Result<Value, ParseError> {
        match self.current() {
            LibertyToken::Number => {
                let text = self.current_text();
                let n: f64 = text
                    .parse()
                    .map_err(|_| self.expected("numeric literal"))?;
                self.advance();
                Ok(Value::Number(n))
            }
            LibertyToken::Str => {
                let text = self.current_text();
                let inner = text[1..text.len() - 1].to_string();
                self.advance();
                Ok(Value::Text(inner))
            }
            LibertyToken::Ident => {
                let text = self.current_text().to_string();
                self.advance();
                Ok(Value::Text(text))
            }
            _ => Err(self.expected("a value")),
        }
    }

    /// Turns the arguments of a table attribute into rectangular numeric rows.
    ///
    /// Each quoted argument is one row of comma-separated numbers; a bare
    /// number argument is a one-element row.
    fn build_table(&self, args: &[Value], span: Span) -> Result<Vec<Vec<f64>>, ParseError> {
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(args.len());
        for arg in args {
            let row = match arg {
                Value::Number(n) => vec![*n],
                Value::Text(text) => {
                    let mut row = Vec::new();
                    for piece in text.split(',') {
                        let piece = piece.trim();
                        if piece.is_empty() {
                            continue;
                        }
                        let n: f64 = piece.parse().map_err(|_| ParseError {
                            kind: ParseErrorKind::Expected {
                                what: "number in table row".to_string(),
                                found: format!("'{piece}'"),
                            },
                            span,
                        })?;
                        row.push(n);
                    }
                    row
                }
            };
            rows.push(row);
        }
        if let Some(first) = rows.first() {
            let expected = first.len();
            for (i, row) in rows.iter().enumerate().skip(1) {
                if row.len() != expected {
                    return Err(ParseError {
                        kind: ParseErrorKind::RaggedTable {
                            row: i + 1,
                            expected,
                            found: row.len(),
                        },
                        span,
                    });
                }
            }
        }
        Ok(rows)
    }

    fn expect_ident(&mut self) -> Result<String, ParseError> {
        if self.at(LibertyToken::Ident) {
            let text = self.current_text().to_string();
            self.advance();
            Ok(text)
        } else {
            Err(self.expected("identifier"))
        }
    }
}

/// Derives a group's name from its header arguments.
///
/// Most groups have zero or one argument; the rare multi-argument headers
/// (e.g. `ff(IQ,IQN)`) keep all arguments joined, since the tree carries them
/// opaquely.
fn group_name(args: &[Value]) -> Option<String> {
    if args.is_empty() {
        return None;
    }
    Some(
        args.iter()
            .map(Value::as_text)
            .collect::<Vec<_>>()
            .join(","),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use sdforge_source::FileId;

    fn parse_ok(source: &str) -> GroupNode {
        let tokens = lex(source, FileId::from_raw(0)).expect("lexing should succeed");
        parse(&tokens, source).expect("parsing should succeed")
    }

    fn parse_err(source: &str) -> ParseError {
        let tokens = lex(source, FileId::from_raw(0)).expect("lexing should succeed");
        parse(&tokens, source).expect_err("parsing should fail")
    }

    #[test]
    fn empty_library() {
        let root = parse_ok("library(test) { }");
        assert_eq!(root.kind, "library");
        assert_eq!(root.name.as_deref(), Some("test"));
        assert!(root.attributes.is_empty());
        assert!(root.children.is_empty());
    }

    #[test]
    fn unnamed_group() {
        let root = parse_ok("library(l) { cell(BUF) { pin(Z) { timing() { } } } }");
        let timing = &root.children[0].children[0].children[0];
        assert_eq!(timing.kind, "timing");
        assert!(timing.name.is_none());
    }

    #[test]
    fn quoted_group_name() {
        let root = parse_ok("library(l) { pin (\"A\") { } }");
        assert_eq!(root.children[0].name.as_deref(), Some("A"));
    }

    #[test]
    fn bus_bit_group_name() {
        let root = parse_ok("library(l) { pin(FBIO[22]) { } }");
        assert_eq!(root.children[0].name.as_deref(), Some("FBIO[22]"));
    }

    #[test]
    fn simple_attributes() {
        let root = parse_ok(
            "library(l) { time_unit : \"1ns\"; delay_model : table_lookup; area : 1.25; }",
        );
        assert_eq!(root.simple_text("time_unit").as_deref(), Some("1ns"));
        assert_eq!(
            root.simple_text("delay_model").as_deref(),
            Some("table_lookup")
        );
        assert_eq!(root.simple_number("area"), Some(1.25));
    }

    #[test]
    fn complex_attribute() {
        let root = parse_ok("library(l) { capacitive_load_unit(1, pf); }");
        match &root.attr("capacitive_load_unit").unwrap().value {
            AttrValue::Complex(args) => {
                assert_eq!(args[0], Value::Number(1.0));
                assert_eq!(args[1], Value::Text("pf".to_string()));
            }
            other => panic!("expected complex attribute, got {other:?}"),
        }
    }

    #[test]
    fn define_statement_carried_opaquely() {
        let root = parse_ok("library(l) { define(process_corner, operating_conditions, string); }");
        match &root.attr("define").unwrap().value {
            AttrValue::Complex(args) => assert_eq!(args.len(), 3),
            other => panic!("expected complex attribute, got {other:?}"),
        }
    }

    #[test]
    fn scalar_values_table() {
        let root = parse_ok("library(l) { cell_rise(scalar) { values(\"0.120\"); } }");
        let rows = root.children[0].table("values").unwrap();
        assert_eq!(rows, &[vec![0.120]]);
    }

    #[test]
    fn two_dimensional_values_table() {
        let root =
            parse_ok("library(l) { cell_rise(t) { values(\"0.1, 0.2\", \"0.3, 0.4\"); } }");
        let rows = root.children[0].table("values").unwrap();
        assert_eq!(rows, &[vec![0.1, 0.2], vec![0.3, 0.4]]);
    }

    #[test]
    fn index_attributes_are_tables() {
        let root = parse_ok("library(l) { lu_table_template(t) { index_1(\"0.1, 0.5, 1.2\"); } }");
        let rows = root.children[0].table("index_1").unwrap();
        assert_eq!(rows, &[vec![0.1, 0.5, 1.2]]);
    }

    #[test]
    fn ragged_table_rejected() {
        let err = parse_err("library(l) { cell_rise(t) { values(\"0.1, 0.2\", \"0.3\"); } }");
        assert_eq!(
            err.kind,
            ParseErrorKind::RaggedTable {
                row: 2,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn missing_semicolon_rejected() {
        let err = parse_err("library(l) { area : 1.0 }");
        assert_eq!(err.kind, ParseErrorKind::MissingSemicolon);
    }

    #[test]
    fn unmatched_brace_rejected() {
        let err = parse_err("library(l) { cell(BUF) { ");
        assert_eq!(err.kind, ParseErrorKind::UnmatchedBrace);
    }

    #[test]
    fn empty_token_stream_rejected() {
        let err = parse(&[], "").expect_err("parsing should fail");
        assert_eq!(
            err.kind,
            ParseErrorKind::Expected {
                what: "a group".to_string(),
                found: "end of file".to_string(),
            }
        );
    }

    #[test]
    fn trailing_tokens_rejected() {
        let err = parse_err("library(l) { } cell(BUF) { }");
        assert!(matches!(err.kind, ParseErrorKind::Expected { .. }));
    }

    #[test]
    fn repeated_groups_preserved_in_order() {
        let root = parse_ok(
            "library(l) { cell(X) { pin(Z) { timing() { related_pin : \"A\"; } timing() { related_pin : \"B\"; } } } }",
        );
        let pin = &root.children[0].children[0];
        let related: Vec<_> = pin
            .children_of("timing")
            .filter_map(|t| t.simple_text("related_pin"))
            .collect();
        assert_eq!(related, vec!["A", "B"]);
    }

    #[test]
    fn when_condition_kept_verbatim() {
        let root =
            parse_ok("library(l) { timing() { when : \"A&!B\"; } }");
        assert_eq!(
            root.children[0].simple_text("when").as_deref(),
            Some("A&!B")
        );
    }

    #[test]
    fn error_spans_point_at_offender() {
        let src = "library(l) { area 1.0; }";
        let err = parse_err(src);
        // The offending token is the number where ':' or '(' was required.
        let span = err.span;
        assert_eq!(&src[span.start as usize..span.end as usize], "1.0");
    }
}
