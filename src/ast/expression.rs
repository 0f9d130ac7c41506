use lachs::Span;

use super::pattern::Pattern;
use super::types::TyExpr;
use super::RecFlag;

#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub value: String,
    pub position: Span,
}

impl Ident {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            position: Span::default(),
        }
    }
}

/// Literal constants shared between expressions and patterns.
#[derive(Debug, Clone, PartialEq)]
pub enum Const {
    Int(i64),
    Bool(bool),
    String(String),
    Unit,
    /// The empty list marker `[]`.
    Nil,
}

/// A single `pattern = expression` binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub pattern: Pattern,
    pub value: Expr,
}

/// A `let [rec] ... in body` expression.
#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    pub rec: RecFlag,
    pub bindings: Vec<Binding>,
    pub body: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(Const, Span),
    Var(Ident),
    Apply(Box<Expr>, Box<Expr>),
    If(Box<Expr>, Box<Expr>, Box<Expr>),
    Fun(Pattern, Box<Expr>),
    Let(Let),
    Match(Box<Expr>, Vec<(Pattern, Expr)>),
    Tuple(Vec<Expr>),
    Cons(Box<Expr>, Box<Expr>),
    Annotated(Box<Expr>, TyExpr),
}

impl Expr {
    pub fn var(name: impl Into<String>) -> Self {
        Expr::Var(Ident::new(name))
    }

    pub fn int(value: i64) -> Self {
        Expr::Const(Const::Int(value), Span::default())
    }

    pub fn apply(func: Expr, arg: Expr) -> Self {
        Expr::Apply(Box::new(func), Box::new(arg))
    }

    /// A binary operator application `op l r`, written as two nested
    /// curried applications of the operator-named variable.
    pub fn binop(op: impl Into<String>, left: Expr, right: Expr) -> Self {
        Expr::apply(Expr::apply(Expr::var(op), left), right)
    }

    pub fn fun(pattern: Pattern, body: Expr) -> Self {
        Expr::Fun(pattern, Box::new(body))
    }

    pub fn let_in(rec: RecFlag, pattern: Pattern, value: Expr, body: Expr) -> Self {
        Expr::Let(Let {
            rec,
            bindings: vec![Binding { pattern, value }],
            body: Box::new(body),
        })
    }

    pub fn cons(head: Expr, tail: Expr) -> Self {
        Expr::Cons(Box::new(head), Box::new(tail))
    }

    /// Source location covered by this expression, merged from its leaves.
    pub fn span(&self) -> Span {
        match self {
            Expr::Const(_, span) => span.clone(),
            Expr::Var(ident) => ident.position.clone(),
            Expr::Apply(func, arg) => func.span().merge(&arg.span()),
            Expr::If(cond, _, else_branch) => cond.span().merge(&else_branch.span()),
            Expr::Fun(pattern, body) => pattern.span().merge(&body.span()),
            Expr::Let(binding) => binding
                .bindings
                .iter()
                .fold(binding.body.span(), |acc, b| acc.merge(&b.pattern.span())),
            Expr::Match(scrutinee, cases) => cases
                .iter()
                .fold(scrutinee.span(), |acc, (_, body)| acc.merge(&body.span())),
            Expr::Tuple(elements) => elements
                .iter()
                .map(Expr::span)
                .reduce(|acc, s| acc.merge(&s))
                .unwrap_or_default(),
            Expr::Cons(head, tail) => head.span().merge(&tail.span()),
            Expr::Annotated(inner, _) => inner.span(),
        }
    }
}
