use lachs::Span;

use super::expression::{Const, Ident};
use super::types::TyExpr;

/// Patterns as they appear in `let`, `fun` and `match` binders.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// The wildcard `_`.
    Any(Span),
    Const(Const, Span),
    Var(Ident),
    Cons(Box<Pattern>, Box<Pattern>),
    /// Always holds at least two sub-patterns.
    Tuple(Vec<Pattern>),
    Annotated(Box<Pattern>, TyExpr),
}

impl Pattern {
    pub fn var(name: impl Into<String>) -> Self {
        Pattern::Var(Ident::new(name))
    }

    pub fn any() -> Self {
        Pattern::Any(Span::default())
    }

    pub fn cons(head: Pattern, tail: Pattern) -> Self {
        Pattern::Cons(Box::new(head), Box::new(tail))
    }

    pub fn span(&self) -> Span {
        match self {
            Pattern::Any(span) => span.clone(),
            Pattern::Const(_, span) => span.clone(),
            Pattern::Var(ident) => ident.position.clone(),
            Pattern::Cons(head, tail) => head.span().merge(&tail.span()),
            Pattern::Tuple(elements) => elements
                .iter()
                .map(Pattern::span)
                .reduce(|acc, s| acc.merge(&s))
                .unwrap_or_default(),
            Pattern::Annotated(inner, _) => inner.span(),
        }
    }

    /// Names bound by this pattern, in left-to-right source order.
    pub fn bound_names(&self) -> Vec<String> {
        match self {
            Pattern::Any(_) | Pattern::Const(_, _) => Vec::new(),
            Pattern::Var(ident) => vec![ident.value.clone()],
            Pattern::Cons(head, tail) => {
                let mut names = head.bound_names();
                names.extend(tail.bound_names());
                names
            }
            Pattern::Tuple(elements) => {
                elements.iter().flat_map(Pattern::bound_names).collect()
            }
            Pattern::Annotated(inner, _) => inner.bound_names(),
        }
    }

    /// The pattern with any outer annotations stripped.
    ///
    /// Annotations never change which value a pattern matches, so every
    /// consumer that only cares about the shape resolves through them.
    pub fn resolved(&self) -> &Pattern {
        match self {
            Pattern::Annotated(inner, _) => inner.resolved(),
            other => other,
        }
    }
}
