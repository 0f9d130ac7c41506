//! Parsers for identifiers and literal constants.

use lachs::Span;

use crate::ast::expression::{Const, Ident};
use crate::lexer::Token;
use crate::parser::combinators::{
    BoxedParser, expect_lbracket, expect_lparen, expect_rbracket, expect_rparen,
};
use crate::parser::state::{ParseError, ParseState, Parser};

/// An ordinary identifier. Type variables (leading `'`) are rejected
/// here; they only make sense inside type annotations.
pub fn ident() -> BoxedParser<Ident> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Ident(inner)) if !inner.value.starts_with('\'') => {
            match state.advance() {
                Some(Token::Ident(id)) => Ok(Ident {
                    value: id.value,
                    position: id.position,
                }),
                _ => unreachable!(),
            }
        }
        Some(tok) => Err(ParseError::new("unexpected token")
            .expected("identifier")
            .found(tok.describe())
            .at(tok.pos())),
        None => Err(ParseError::new("unexpected end of input").expected("identifier")),
    })
}

pub fn integer() -> BoxedParser<(i64, Span)> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Integer(_)) => match state.advance() {
            Some(Token::Integer(int)) => {
                let value = int.value.parse::<i64>().map_err(|_| {
                    ParseError::new("integer literal out of range").at(int.position.clone())
                })?;
                Ok((value, int.position))
            }
            _ => unreachable!(),
        },
        Some(tok) => Err(ParseError::new("unexpected token")
            .expected("integer")
            .found(tok.describe())
            .at(tok.pos())),
        None => Err(ParseError::new("unexpected end of input").expected("integer")),
    })
}

/// Strip the surrounding quotes and resolve the usual escapes.
fn unescape(raw: &str) -> String {
    let inner = &raw[1..raw.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('\\') => out.push('\\'),
                Some('"') => out.push('"'),
                Some(other) => out.push(other),
                None => {}
            }
        } else {
            out.push(c);
        }
    }
    out
}

pub fn string_literal() -> BoxedParser<(String, Span)> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::StringLiteral(_)) => match state.advance() {
            Some(Token::StringLiteral(s)) => Ok((unescape(&s.value), s.position)),
            _ => unreachable!(),
        },
        Some(tok) => Err(ParseError::new("unexpected token")
            .expected("string")
            .found(tok.describe())
            .at(tok.pos())),
        None => Err(ParseError::new("unexpected end of input").expected("string")),
    })
}

/// A literal constant: integer, string, boolean, `()` or `[]`.
pub fn constant() -> BoxedParser<(Const, Span)> {
    BoxedParser::new(|state: &mut ParseState| {
        match state.peek() {
            Some(Token::Integer(_)) => {
                return integer().parse(state).map(|(v, span)| (Const::Int(v), span));
            }
            Some(Token::StringLiteral(_)) => {
                return string_literal()
                    .parse(state)
                    .map(|(v, span)| (Const::String(v), span));
            }
            Some(Token::True(_)) => {
                let span = state.advance().unwrap().pos();
                return Ok((Const::Bool(true), span));
            }
            Some(Token::False(_)) => {
                let span = state.advance().unwrap().pos();
                return Ok((Const::Bool(false), span));
            }
            _ => {}
        }

        // "(" ")" is unit, "[" "]" is nil
        let pos = state.position();
        if let Ok(open) = expect_lparen().parse(state) {
            if let Ok(close) = expect_rparen().parse(state) {
                return Ok((Const::Unit, open.pos().merge(&close.pos())));
            }
        }
        state.restore(pos);
        if let Ok(open) = expect_lbracket().parse(state) {
            if let Ok(close) = expect_rbracket().parse(state) {
                return Ok((Const::Nil, open.pos().merge(&close.pos())));
            }
        }
        state.restore(pos);

        Err(state.error_here("unexpected token").expected("constant"))
    })
}
