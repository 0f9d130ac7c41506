use std::fmt;

use lachs::Span;

use super::ty::{Type, TypeVar};

/// Errors produced by the inference pass.
///
/// A single kind list is shared by the whole core: unification and
/// substitution report through the same enum as the inference driver.
/// Failures constructed below the AST level carry a default span; the
/// inferencer re-attaches the span of the node it was working on via
/// [`TypeError::with_span`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeError {
    /// Binding `var := ty` would construct an infinite type.
    OccursCheck {
        var: TypeVar,
        ty: Type,
        span: Span,
    },
    /// Reference to an identifier with no binding in scope.
    NoVariable { name: String, span: Span },
    /// The two types cannot be made equal (includes tuple length mismatch).
    UnificationFailed {
        left: Type,
        right: Type,
        span: Span,
    },
    /// Dynamic pattern mismatch found during static analysis.
    ///
    /// Currently unused by the inferencer; carried for completeness.
    PatternMatching { span: Span },
    /// A construct the checker deliberately rejects.
    NotImplemented { what: String, span: Span },
    /// A `let` with no bindings.
    EmptyLet { span: Span },
}

impl TypeError {
    pub fn occurs_check(var: TypeVar, ty: Type) -> Self {
        TypeError::OccursCheck {
            var,
            ty,
            span: Span::default(),
        }
    }

    pub fn no_variable(name: String, span: Span) -> Self {
        TypeError::NoVariable { name, span }
    }

    pub fn unification_failed(left: Type, right: Type) -> Self {
        TypeError::UnificationFailed {
            left,
            right,
            span: Span::default(),
        }
    }

    pub fn not_implemented(what: impl Into<String>, span: Span) -> Self {
        TypeError::NotImplemented {
            what: what.into(),
            span,
        }
    }

    pub fn empty_let(span: Span) -> Self {
        TypeError::EmptyLet { span }
    }

    /// Replace the attached span, typically with the span of the AST node
    /// the inferencer was visiting when the failure bubbled up.
    pub fn with_span(mut self, new_span: Span) -> Self {
        match &mut self {
            TypeError::OccursCheck { span, .. }
            | TypeError::NoVariable { span, .. }
            | TypeError::UnificationFailed { span, .. }
            | TypeError::PatternMatching { span }
            | TypeError::NotImplemented { span, .. }
            | TypeError::EmptyLet { span } => *span = new_span,
        }
        self
    }

    fn span(&self) -> &Span {
        match self {
            TypeError::OccursCheck { span, .. }
            | TypeError::NoVariable { span, .. }
            | TypeError::UnificationFailed { span, .. }
            | TypeError::PatternMatching { span }
            | TypeError::NotImplemented { span, .. }
            | TypeError::EmptyLet { span } => span,
        }
    }

    fn message(&self) -> String {
        match self {
            TypeError::OccursCheck { var, ty, .. } => format!(
                "occurs check: cannot construct infinite type {} = {}",
                Type::Var(var.clone()).pretty(),
                ty.pretty()
            ),
            TypeError::NoVariable { name, .. } => {
                format!("unbound variable: {}", name)
            }
            TypeError::UnificationFailed { left, right, .. } => format!(
                "unification failed: cannot unify {} with {}",
                left.pretty(),
                right.pretty()
            ),
            TypeError::PatternMatching { .. } => "pattern matching error".to_string(),
            TypeError::NotImplemented { what, .. } => {
                format!("not implemented: {}", what)
            }
            TypeError::EmptyLet { .. } => "let binding without any bindings".to_string(),
        }
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = self.message();
        let span = self.span();
        // Spans without attached source render as a bare message
        if span.source.is_empty() {
            write!(f, "Type error: {}", msg)
        } else {
            write!(f, "{}", span.to_string(&msg))
        }
    }
}

impl std::error::Error for TypeError {}
