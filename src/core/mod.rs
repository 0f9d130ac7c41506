//! Core AST - the simplified form after pattern elimination
//!
//! This tree has no patterns left in it:
//! - every `fun` carries a flat list of plain parameter names,
//! - every `let` binds a plain name,
//! - `match` is gone, compiled to chains of conditionals over
//!   projection calls.
//!
//! Parameter and binder names may be the literal `"()"` for a
//! unit-valued slot; a recursive binder may be the empty string when the
//! source bound a non-variable pattern recursively (such programs are
//! rejected by inference before they reach this form).

use crate::ast::expression::Const;

#[derive(Debug, Clone, PartialEq)]
pub enum CoreExpr {
    Const(Const),
    Var(String),
    Apply(Box<CoreExpr>, Box<CoreExpr>),
    If(Box<CoreExpr>, Box<CoreExpr>, Box<CoreExpr>),
    Tuple(Vec<CoreExpr>),
    Cons(Box<CoreExpr>, Box<CoreExpr>),
    /// A function with one or more plain parameters.
    Fun(Vec<String>, Box<CoreExpr>),
    Let(CoreBinding, Box<CoreExpr>),
}

/// A binding as it appears in a core `let` or at the top level.
#[derive(Debug, Clone, PartialEq)]
pub enum CoreBinding {
    Nonrec(String, Box<CoreExpr>),
    Rec(Vec<(String, CoreExpr)>),
}

/// The lowered form of a module: top-level bindings only.
pub type CoreStructure = Vec<CoreBinding>;

impl CoreExpr {
    pub fn var(name: impl Into<String>) -> Self {
        CoreExpr::Var(name.into())
    }

    pub fn int(value: i64) -> Self {
        CoreExpr::Const(Const::Int(value))
    }

    pub fn apply(func: CoreExpr, arg: CoreExpr) -> Self {
        CoreExpr::Apply(Box::new(func), Box::new(arg))
    }

    pub fn binop(op: impl Into<String>, left: CoreExpr, right: CoreExpr) -> Self {
        CoreExpr::apply(CoreExpr::apply(CoreExpr::var(op), left), right)
    }

    pub fn if_then(cond: CoreExpr, then_branch: CoreExpr, else_branch: CoreExpr) -> Self {
        CoreExpr::If(Box::new(cond), Box::new(then_branch), Box::new(else_branch))
    }

    pub fn let_in(binding: CoreBinding, body: CoreExpr) -> Self {
        CoreExpr::Let(binding, Box::new(body))
    }

    pub fn nonrec(name: impl Into<String>, value: CoreExpr) -> CoreBinding {
        CoreBinding::Nonrec(name.into(), Box::new(value))
    }
}
