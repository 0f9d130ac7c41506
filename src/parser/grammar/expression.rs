//! Expression parsers.
//!
//! Precedence, loosest to tightest: keyword forms (`fun`, `if`,
//! `match`, `let ... in`), tuple commas, `&&`, comparisons, `::`,
//! additive, multiplicative, application by juxtaposition, atoms.
//! Binary operators are parsed into curried applications of their
//! operator-named variables.

use lachs::Span;

use crate::ast::expression::{Binding, Expr, Ident};
use crate::ast::pattern::Pattern;
use crate::ast::RecFlag;
use crate::lexer::Token;
use crate::parser::combinators::{
    BoxedParser, expect_and, expect_arrow, expect_colon, expect_else, expect_equals, expect_fun,
    expect_if, expect_in, expect_lbracket, expect_let, expect_lparen, expect_match, expect_pipe,
    expect_rbracket, expect_rec, expect_rparen, expect_semi, expect_then, expect_with, many1,
    optional,
};
use crate::parser::state::{ParseState, Parser};

use super::literal::{constant, ident};
use super::pattern::{atom_pattern, pattern};
use super::types::type_expr;

fn binop(op: &str, span: Span, left: Expr, right: Expr) -> Expr {
    Expr::Apply(
        Box::new(Expr::Apply(
            Box::new(Expr::Var(Ident {
                value: op.to_string(),
                position: span,
            })),
            Box::new(left),
        )),
        Box::new(right),
    )
}

fn starts_keyword_form(token: Option<&Token>) -> bool {
    matches!(
        token,
        Some(Token::Fun(_) | Token::If(_) | Token::Match(_) | Token::Let(_))
    )
}

pub fn expression() -> BoxedParser<Expr> {
    BoxedParser::new(|state: &mut ParseState| match state.peek() {
        Some(Token::Fun(_)) => fun_expr().parse(state),
        Some(Token::If(_)) => if_expr().parse(state),
        Some(Token::Match(_)) => match_expr().parse(state),
        Some(Token::Let(_)) => let_expr().parse(state),
        _ => tuple_expr().parse(state),
    })
}

/// `binding := pattern "=" expression`
pub(crate) fn binding() -> BoxedParser<Binding> {
    BoxedParser::new(|state: &mut ParseState| {
        let pat = pattern().parse(state)?;
        expect_equals().parse(state)?;
        let value = expression().parse(state)?;
        Ok(Binding {
            pattern: pat,
            value,
        })
    })
}

/// `"let" ["rec"] binding ("and" binding)* "in" expression`
fn let_expr() -> BoxedParser<Expr> {
    BoxedParser::new(|state: &mut ParseState| {
        expect_let().parse(state)?;
        let rec = match optional(expect_rec()).parse(state)? {
            Some(_) => RecFlag::Recursive,
            None => RecFlag::Nonrecursive,
        };
        let mut bindings = vec![binding().parse(state)?];
        while optional(expect_and()).parse(state)?.is_some() {
            bindings.push(binding().parse(state)?);
        }
        expect_in().parse(state)?;
        let body = expression().parse(state)?;
        Ok(Expr::Let(crate::ast::expression::Let {
            rec,
            bindings,
            body: Box::new(body),
        }))
    })
}

/// `"fun" atom_pattern+ "->" expression`, nesting one `Fun` per pattern.
fn fun_expr() -> BoxedParser<Expr> {
    BoxedParser::new(|state: &mut ParseState| {
        expect_fun().parse(state)?;
        let params = many1(atom_pattern()).parse(state)?;
        expect_arrow().parse(state)?;
        let body = expression().parse(state)?;
        Ok(params
            .into_iter()
            .rev()
            .fold(body, |acc, param| Expr::fun(param, acc)))
    })
}

fn if_expr() -> BoxedParser<Expr> {
    BoxedParser::new(|state: &mut ParseState| {
        expect_if().parse(state)?;
        let cond = expression().parse(state)?;
        expect_then().parse(state)?;
        let then_branch = expression().parse(state)?;
        expect_else().parse(state)?;
        let else_branch = expression().parse(state)?;
        Ok(Expr::If(
            Box::new(cond),
            Box::new(then_branch),
            Box::new(else_branch),
        ))
    })
}

/// `"match" expression "with" ["|"] case ("|" case)*`
fn match_expr() -> BoxedParser<Expr> {
    BoxedParser::new(|state: &mut ParseState| {
        expect_match().parse(state)?;
        let scrutinee = expression().parse(state)?;
        expect_with().parse(state)?;
        let _ = optional(expect_pipe()).parse(state)?;

        let mut cases = vec![match_case().parse(state)?];
        while optional(expect_pipe()).parse(state)?.is_some() {
            cases.push(match_case().parse(state)?);
        }
        Ok(Expr::Match(Box::new(scrutinee), cases))
    })
}

fn match_case() -> BoxedParser<(Pattern, Expr)> {
    BoxedParser::new(|state: &mut ParseState| {
        let pat = pattern().parse(state)?;
        expect_arrow().parse(state)?;
        let body = expression().parse(state)?;
        Ok((pat, body))
    })
}

/// `tuple := and_expr ("," and_expr)*`; a trailing keyword form is
/// allowed as the final element (`(1, fun x -> x)`).
fn tuple_expr() -> BoxedParser<Expr> {
    BoxedParser::new(|state: &mut ParseState| {
        let first = and_expr().parse(state)?;
        let mut elems = vec![first];
        while matches!(state.peek(), Some(Token::Comma(_))) {
            state.advance();
            if starts_keyword_form(state.peek()) {
                elems.push(expression().parse(state)?);
                break;
            }
            elems.push(and_expr().parse(state)?);
        }
        if elems.len() == 1 {
            Ok(elems.pop().unwrap())
        } else {
            Ok(Expr::Tuple(elems))
        }
    })
}

/// `and_expr := cmp_expr ("&&" cmp_expr)*`
fn and_expr() -> BoxedParser<Expr> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut left = cmp_expr().parse(state)?;
        while let Some(Token::AndAnd(inner)) = state.peek() {
            let span = inner.position.clone();
            state.advance();
            let right = cmp_expr().parse(state)?;
            left = binop("&&", span, left, right);
        }
        Ok(left)
    })
}

/// `cmp_expr := cons_expr (cmpop cons_expr)*`
fn cmp_expr() -> BoxedParser<Expr> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut left = cons_expr().parse(state)?;
        loop {
            let op = match state.peek() {
                Some(Token::Equals(_)) => "=",
                Some(Token::NotEquals(_)) => "<>",
                Some(Token::Less(_)) => "<",
                Some(Token::Greater(_)) => ">",
                Some(Token::LessEquals(_)) => "<=",
                Some(Token::GreaterEquals(_)) => ">=",
                _ => break,
            };
            let span = state.advance().unwrap().pos();
            let right = cons_expr().parse(state)?;
            left = binop(op, span, left, right);
        }
        Ok(left)
    })
}

/// `cons_expr := add_expr ("::" cons_expr)?`, right associative.
fn cons_expr() -> BoxedParser<Expr> {
    BoxedParser::new(|state: &mut ParseState| {
        let head = add_expr().parse(state)?;
        if matches!(state.peek(), Some(Token::DoubleColon(_))) {
            state.advance();
            let tail = cons_expr().parse(state)?;
            Ok(Expr::cons(head, tail))
        } else {
            Ok(head)
        }
    })
}

fn add_expr() -> BoxedParser<Expr> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut left = mul_expr().parse(state)?;
        loop {
            let op = match state.peek() {
                Some(Token::Plus(_)) => "+",
                Some(Token::Minus(_)) => "-",
                _ => break,
            };
            let span = state.advance().unwrap().pos();
            let right = mul_expr().parse(state)?;
            left = binop(op, span, left, right);
        }
        Ok(left)
    })
}

fn mul_expr() -> BoxedParser<Expr> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut left = app_expr().parse(state)?;
        loop {
            let op = match state.peek() {
                Some(Token::Star(_)) => "*",
                Some(Token::Slash(_)) => "/",
                _ => break,
            };
            let span = state.advance().unwrap().pos();
            let right = app_expr().parse(state)?;
            left = binop(op, span, left, right);
        }
        Ok(left)
    })
}

/// Application by juxtaposition, left associative: `f x y`.
fn app_expr() -> BoxedParser<Expr> {
    BoxedParser::new(|state: &mut ParseState| {
        let mut expr = atom_expr().parse(state)?;
        loop {
            let pos = state.position();
            match atom_expr().parse(state) {
                Ok(arg) => expr = Expr::apply(expr, arg),
                Err(_) => {
                    state.restore(pos);
                    break;
                }
            }
        }
        Ok(expr)
    })
}

fn atom_expr() -> BoxedParser<Expr> {
    BoxedParser::new(|state: &mut ParseState| {
        match state.peek() {
            // Parenthesized expression, unit, or annotation
            Some(Token::LParen(_)) => {
                let open = expect_lparen().parse(state)?;
                if let Some(Token::RParen(_)) = state.peek() {
                    let close = expect_rparen().parse(state)?;
                    return Ok(Expr::Const(
                        crate::ast::expression::Const::Unit,
                        open.pos().merge(&close.pos()),
                    ));
                }
                let inner = expression().parse(state)?;
                let inner = if matches!(state.peek(), Some(Token::Colon(_))) {
                    expect_colon().parse(state)?;
                    let annot = type_expr().parse(state)?;
                    Expr::Annotated(Box::new(inner), annot)
                } else {
                    inner
                };
                expect_rparen().parse(state)?;
                Ok(inner)
            }

            // "[a; b; c]" list literal, lowered to a cons chain
            Some(Token::LBracket(_)) => {
                let open = expect_lbracket().parse(state)?;
                if let Some(Token::RBracket(_)) = state.peek() {
                    let close = expect_rbracket().parse(state)?;
                    return Ok(Expr::Const(
                        crate::ast::expression::Const::Nil,
                        open.pos().merge(&close.pos()),
                    ));
                }
                let mut elems = vec![expression().parse(state)?];
                while matches!(state.peek(), Some(Token::Semi(_))) {
                    expect_semi().parse(state)?;
                    elems.push(expression().parse(state)?);
                }
                let close = expect_rbracket().parse(state)?;
                let nil = Expr::Const(crate::ast::expression::Const::Nil, close.pos());
                Ok(elems
                    .into_iter()
                    .rev()
                    .fold(nil, |tail, head| Expr::cons(head, tail)))
            }

            Some(Token::Ident(_)) => ident().parse(state).map(Expr::Var),

            _ => constant()
                .parse(state)
                .map(|(value, span)| Expr::Const(value, span)),
        }
    })
}
