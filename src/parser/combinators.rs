use std::rc::Rc;

use crate::lexer::Token;

use super::state::{ParseError, ParseResult, ParseState, Parser};

// === Boxed Parser for type erasure ===

pub struct BoxedParser<T> {
    parser: Rc<dyn Fn(&mut ParseState) -> ParseResult<T>>,
}

impl<T> Clone for BoxedParser<T> {
    fn clone(&self) -> Self {
        BoxedParser {
            parser: Rc::clone(&self.parser),
        }
    }
}

impl<T: 'static> BoxedParser<T> {
    pub fn new<P: Parser<T> + 'static>(parser: P) -> Self {
        BoxedParser {
            parser: Rc::new(move |state| parser.parse(state)),
        }
    }

    /// Map: transform the result.
    pub fn map<U: 'static, F: Fn(T) -> U + 'static>(self, f: F) -> BoxedParser<U> {
        BoxedParser::new(move |state: &mut ParseState| {
            let a = self.parse(state)?;
            Ok(f(a))
        })
    }

    /// Choice: try self; on failure record the error, restore, try other.
    pub fn or(self, other: BoxedParser<T>) -> BoxedParser<T> {
        BoxedParser::new(move |state: &mut ParseState| {
            let pos = state.position();
            match self.parse(state) {
                Ok(a) => Ok(a),
                Err(err) => {
                    state.record_error(err);
                    state.restore(pos);
                    other.parse(state)
                }
            }
        })
    }
}

impl<T> Parser<T> for BoxedParser<T> {
    fn parse(&self, state: &mut ParseState) -> ParseResult<T> {
        (self.parser)(state)
    }
}

// === Primitive Parsers ===

pub fn token<F: Fn(&Token) -> bool + 'static>(
    predicate: F,
    expected: &'static str,
) -> BoxedParser<Token> {
    BoxedParser::new(move |state: &mut ParseState| match state.peek() {
        Some(tok) if predicate(tok) => Ok(state.advance().unwrap()),
        Some(tok) => Err(ParseError::new("unexpected token")
            .expected(expected)
            .found(tok.describe())
            .at(tok.pos())),
        None => Err(ParseError::new("unexpected end of input").expected(expected)),
    })
}

macro_rules! expect_fns {
    ($(($name:ident, $variant:ident, $desc:literal)),* $(,)?) => {
        $(
            pub fn $name() -> BoxedParser<Token> {
                token(|t| matches!(t, Token::$variant(_)), $desc)
            }
        )*
    };
}

expect_fns![
    (expect_let, Let, "'let'"),
    (expect_rec, Rec, "'rec'"),
    (expect_and, And, "'and'"),
    (expect_in, In, "'in'"),
    (expect_fun, Fun, "'fun'"),
    (expect_if, If, "'if'"),
    (expect_then, Then, "'then'"),
    (expect_else, Else, "'else'"),
    (expect_match, Match, "'match'"),
    (expect_with, With, "'with'"),
    (expect_arrow, Arrow, "'->'"),
    (expect_equals, Equals, "'='"),
    (expect_pipe, Pipe, "'|'"),
    (expect_comma, Comma, "','"),
    (expect_semi, Semi, "';'"),
    (expect_double_semi, DoubleSemi, "';;'"),
    (expect_colon, Colon, "':'"),
    (expect_double_colon, DoubleColon, "'::'"),
    (expect_underscore, Underscore, "'_'"),
    (expect_lparen, LParen, "'('"),
    (expect_rparen, RParen, "')'"),
    (expect_lbracket, LBracket, "'['"),
    (expect_rbracket, RBracket, "']'"),
];

/// Parse zero or more occurrences.
pub fn many<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let mut results = Vec::new();
        loop {
            let pos = state.position();
            match parser.parse(state) {
                Ok(item) => results.push(item),
                Err(err) => {
                    state.record_error(err);
                    state.restore(pos);
                    break;
                }
            }
        }
        Ok(results)
    })
}

/// Parse one or more occurrences.
pub fn many1<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Vec<T>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let first = parser.parse(state)?;
        let mut results = vec![first];
        loop {
            let pos = state.position();
            match parser.parse(state) {
                Ok(item) => results.push(item),
                Err(_) => {
                    state.restore(pos);
                    break;
                }
            }
        }
        Ok(results)
    })
}

/// Parse zero or one occurrence.
pub fn optional<T: 'static>(parser: BoxedParser<T>) -> BoxedParser<Option<T>> {
    BoxedParser::new(move |state: &mut ParseState| {
        let pos = state.position();
        match parser.parse(state) {
            Ok(item) => Ok(Some(item)),
            Err(_) => {
                state.restore(pos);
                Ok(None)
            }
        }
    })
}
