//! Structure item parsers.
//!
//! A leading `let` is ambiguous at the top level: it may start a
//! definition (`let x = 1`) or a `let ... in` expression evaluated for
//! its effects. The bindings are parsed once and the decision falls on
//! whether `in` follows.

use crate::ast::{RecFlag, StrItem};
use crate::lexer::Token;
use crate::parser::combinators::{BoxedParser, expect_and, expect_let, expect_rec, optional};
use crate::parser::state::{ParseState, Parser};

use super::expression::{binding, expression};

pub fn str_item() -> BoxedParser<StrItem> {
    BoxedParser::new(|state: &mut ParseState| {
        if !matches!(state.peek(), Some(Token::Let(_))) {
            return expression().parse(state).map(StrItem::Eval);
        }

        let start = state.position();
        expect_let().parse(state)?;
        let rec = match optional(expect_rec()).parse(state)? {
            Some(_) => RecFlag::Recursive,
            None => RecFlag::Nonrecursive,
        };
        let mut bindings = vec![binding().parse(state)?];
        while optional(expect_and()).parse(state)?.is_some() {
            bindings.push(binding().parse(state)?);
        }

        if matches!(state.peek(), Some(Token::In(_))) {
            // Actually a let-in expression; reparse as such
            state.restore(start);
            return expression().parse(state).map(StrItem::Eval);
        }

        Ok(StrItem::Value(rec, bindings))
    })
}
