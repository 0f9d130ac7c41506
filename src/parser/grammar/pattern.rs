//! Pattern parsers.
//!
//! `pattern := cons_pat ("," cons_pat)*` with `::` right-associative and
//! atoms for wildcards, constants, variables, parenthesized and
//! annotated patterns, and `[a; b]` list sugar.

use crate::ast::expression::Const;
use crate::ast::pattern::Pattern;
use crate::lexer::Token;
use crate::parser::combinators::{
    BoxedParser, expect_colon, expect_lbracket, expect_lparen, expect_rbracket, expect_rparen,
    expect_semi, expect_underscore,
};
use crate::parser::state::{ParseState, Parser};

use super::literal::{constant, ident};
use super::types::type_expr;

pub fn pattern() -> BoxedParser<Pattern> {
    BoxedParser::new(|state: &mut ParseState| {
        let first = cons_pattern().parse(state)?;
        let mut elems = vec![first];
        while matches!(state.peek(), Some(Token::Comma(_))) {
            state.advance();
            elems.push(cons_pattern().parse(state)?);
        }
        if elems.len() == 1 {
            Ok(elems.pop().unwrap())
        } else {
            Ok(Pattern::Tuple(elems))
        }
    })
}

/// `cons_pat := atom_pat ("::" cons_pat)?`
fn cons_pattern() -> BoxedParser<Pattern> {
    BoxedParser::new(|state: &mut ParseState| {
        let head = atom_pattern().parse(state)?;
        if matches!(state.peek(), Some(Token::DoubleColon(_))) {
            state.advance();
            let tail = cons_pattern().parse(state)?;
            Ok(Pattern::cons(head, tail))
        } else {
            Ok(head)
        }
    })
}

pub(crate) fn atom_pattern() -> BoxedParser<Pattern> {
    BoxedParser::new(|state: &mut ParseState| {
        // Wildcard
        if matches!(state.peek(), Some(Token::Underscore(_))) {
            let span = expect_underscore().parse(state)?.pos();
            return Ok(Pattern::Any(span));
        }

        // Constants, including "()" and "[]"
        let pos = state.position();
        if let Ok((value, span)) = constant().parse(state) {
            return Ok(Pattern::Const(value, span));
        }
        state.restore(pos);

        // Variable
        if let Ok(id) = ident().parse(state) {
            return Ok(Pattern::Var(id));
        }
        state.restore(pos);

        // Parenthesized or annotated pattern
        if expect_lparen().parse(state).is_ok() {
            let inner = pattern().parse(state)?;
            let inner = if matches!(state.peek(), Some(Token::Colon(_))) {
                expect_colon().parse(state)?;
                let annot = type_expr().parse(state)?;
                Pattern::Annotated(Box::new(inner), annot)
            } else {
                inner
            };
            expect_rparen().parse(state)?;
            return Ok(inner);
        }
        state.restore(pos);

        // "[p; q]" list sugar, lowered to a cons chain
        if expect_lbracket().parse(state).is_ok() {
            let mut elems = vec![pattern().parse(state)?];
            while matches!(state.peek(), Some(Token::Semi(_))) {
                expect_semi().parse(state)?;
                elems.push(pattern().parse(state)?);
            }
            let close = expect_rbracket().parse(state)?;
            let nil = Pattern::Const(Const::Nil, close.pos());
            return Ok(elems
                .into_iter()
                .rev()
                .fold(nil, |tail, head| Pattern::cons(head, tail)));
        }
        state.restore(pos);

        Err(state.error_here("unexpected token").expected("pattern"))
    })
}
