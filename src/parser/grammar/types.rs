//! Parser for surface type annotations.
//!
//! Precedence, loosest to tightest: `->` (right associative), `*`
//! tuples, the postfix `list` constructor, atoms.

use crate::ast::types::TyExpr;
use crate::lexer::Token;
use crate::parser::combinators::{BoxedParser, expect_lparen, expect_rparen};
use crate::parser::state::{ParseState, Parser};

/// `ty := ty_tuple ("->" ty)?`
pub fn type_expr() -> BoxedParser<TyExpr> {
    BoxedParser::new(|state: &mut ParseState| {
        let domain = tuple_type().parse(state)?;
        if matches!(state.peek(), Some(Token::Arrow(_))) {
            state.advance();
            let codomain = type_expr().parse(state)?;
            Ok(TyExpr::Arrow(Box::new(domain), Box::new(codomain)))
        } else {
            Ok(domain)
        }
    })
}

/// `ty_tuple := ty_post ("*" ty_post)*`
fn tuple_type() -> BoxedParser<TyExpr> {
    BoxedParser::new(|state: &mut ParseState| {
        let first = postfix_type().parse(state)?;
        let mut elems = vec![first];
        while matches!(state.peek(), Some(Token::Star(_))) {
            state.advance();
            elems.push(postfix_type().parse(state)?);
        }
        if elems.len() == 1 {
            Ok(elems.pop().unwrap())
        } else {
            Ok(TyExpr::Tuple(elems))
        }
    })
}

/// `ty_post := ty_atom "list"*`
fn postfix_type() -> BoxedParser<TyExpr> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut ty = atom_type().parse(state)?;
        while matches!(state.peek(), Some(Token::Ident(id)) if id.value == "list") {
            state.advance();
            ty = TyExpr::List(Box::new(ty));
        }
        Ok(ty)
    })
}

fn atom_type() -> BoxedParser<TyExpr> {
    BoxedParser::new(|state: &mut ParseState| {
        match state.peek() {
            Some(Token::Ident(id)) => {
                let ty = match id.value.as_str() {
                    "int" => Some(TyExpr::Int),
                    "bool" => Some(TyExpr::Bool),
                    "string" => Some(TyExpr::String),
                    "unit" => Some(TyExpr::Unit),
                    name if name.starts_with('\'') => {
                        Some(TyExpr::Var(name[1..].to_string()))
                    }
                    _ => None,
                };
                if let Some(ty) = ty {
                    state.advance();
                    return Ok(ty);
                }
                Err(state.error_here("unexpected token").expected("type"))
            }
            Some(Token::LParen(_)) => {
                expect_lparen().parse(state)?;
                let ty = type_expr().parse(state)?;
                expect_rparen().parse(state)?;
                Ok(ty)
            }
            _ => Err(state.error_here("unexpected token").expected("type")),
        }
    })
}
