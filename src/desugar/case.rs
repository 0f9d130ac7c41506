//! Guard and projection construction for pattern elimination.
//!
//! A pattern match against a scrutinee expression is decomposed into two
//! independent pieces:
//!
//! - [`check_pat`] - the boolean guards that must all hold for the
//!   pattern to match,
//! - [`pat_decls`] - one `let` binding per variable the pattern binds,
//!   each a chain of projections reaching that variable.
//!
//! [`create_case`] combines both into the guarded expansion used for
//! `match` arms, destructuring `let`s and destructuring parameters.

use crate::ast::expression::Const;
use crate::ast::pattern::Pattern;
use crate::core::CoreExpr;

/// Runtime primitives the lowered code calls. These names are part of
/// the contract with the host environment.
pub const LIST_LEN: &str = "list_len";
pub const GET_HEAD: &str = "get_head";
pub const GET_TAIL: &str = "get_tail";
pub const TUPLE_GET: &str = "tuple_get";
pub const FAIL_MATCH: &str = "fail_match";

/// Which sub-value a projection extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elem {
    ConsHead,
    ConsTail,
    /// Zero-based tuple element.
    Tuple(usize),
}

/// Build the expression extracting `elem` from `expr`.
pub fn get_element(expr: &CoreExpr, elem: Elem) -> CoreExpr {
    match elem {
        Elem::ConsHead => CoreExpr::apply(CoreExpr::var(GET_HEAD), expr.clone()),
        Elem::ConsTail => CoreExpr::apply(CoreExpr::var(GET_TAIL), expr.clone()),
        Elem::Tuple(index) => CoreExpr::apply(
            CoreExpr::apply(CoreExpr::var(TUPLE_GET), CoreExpr::int(index as i64)),
            expr.clone(),
        ),
    }
}

/// The terminal "no case matched" branch.
pub fn fail_match() -> CoreExpr {
    CoreExpr::apply(CoreExpr::var(FAIL_MATCH), CoreExpr::Const(Const::Unit))
}

/// Number of cons nodes along the right spine of a cons pattern. A list
/// matching `a :: b :: t` must be longer than `spine - 1 = 1`.
fn cons_spine(pat: &Pattern) -> i64 {
    match pat.resolved() {
        Pattern::Cons(_, tail) => 1 + cons_spine(tail),
        _ => 0,
    }
}

/// Boolean guards that must all hold for `pat` to match `scrut`.
///
/// `add_list` controls whether a cons pattern emits its own length
/// check: the top-level check of a cons spine covers the whole spine, so
/// the recursive call on the tail suppresses it.
pub fn check_pat(scrut: &CoreExpr, pat: &Pattern, add_list: bool) -> Vec<CoreExpr> {
    match pat {
        Pattern::Annotated(inner, _) => check_pat(scrut, inner, add_list),

        Pattern::Const(Const::Unit, _) => Vec::new(),
        Pattern::Const(constant, _) => vec![CoreExpr::binop(
            "=",
            scrut.clone(),
            CoreExpr::Const(constant.clone()),
        )],

        Pattern::Tuple(pats) => pats
            .iter()
            .enumerate()
            .flat_map(|(index, sub_pat)| {
                check_pat(&get_element(scrut, Elem::Tuple(index)), sub_pat, true)
            })
            .collect(),

        Pattern::Cons(head, tail) => {
            let mut guards = Vec::new();
            if add_list {
                guards.push(CoreExpr::binop(
                    ">",
                    CoreExpr::apply(CoreExpr::var(LIST_LEN), scrut.clone()),
                    CoreExpr::int(cons_spine(pat) - 1),
                ));
            }
            guards.extend(check_pat(&get_element(scrut, Elem::ConsHead), head, true));
            guards.extend(check_pat(&get_element(scrut, Elem::ConsTail), tail, false));
            guards
        }

        Pattern::Var(_) | Pattern::Any(_) => Vec::new(),
    }
}

/// One `(name, projection chain)` pair per variable bound by `pat`.
pub fn pat_decls(scrut: &CoreExpr, pat: &Pattern) -> Vec<(String, CoreExpr)> {
    match pat {
        Pattern::Annotated(inner, _) => pat_decls(scrut, inner),

        Pattern::Var(ident) => vec![(ident.value.clone(), scrut.clone())],

        Pattern::Any(_) | Pattern::Const(_, _) => Vec::new(),

        Pattern::Cons(head, tail) => {
            let mut decls = pat_decls(&get_element(scrut, Elem::ConsHead), head);
            decls.extend(pat_decls(&get_element(scrut, Elem::ConsTail), tail));
            decls
        }

        Pattern::Tuple(pats) => pats
            .iter()
            .enumerate()
            .flat_map(|(index, sub_pat)| {
                pat_decls(&get_element(scrut, Elem::Tuple(index)), sub_pat)
            })
            .collect(),
    }
}

/// The guarded expansion of matching `pat` against `scrut`.
///
/// `then_expr` is wrapped with the variable-binding `let`s from
/// [`pat_decls`]. With no guards the wrapped expression is returned
/// directly; otherwise the guards are folded under `&&` into a
/// conditional falling back to `else_expr`.
pub fn create_case(
    scrut: &CoreExpr,
    pat: &Pattern,
    then_expr: CoreExpr,
    else_expr: CoreExpr,
) -> CoreExpr {
    let wrapped = pat_decls(scrut, pat)
        .into_iter()
        .rev()
        .fold(then_expr, |body, (name, projection)| {
            CoreExpr::let_in(CoreExpr::nonrec(name, projection), body)
        });

    match combine_checks(check_pat(scrut, pat, true)) {
        None => wrapped,
        Some(cond) => CoreExpr::if_then(cond, wrapped, else_expr),
    }
}

/// Left fold of guards under `&&`; `None` when there are no guards.
pub fn combine_checks(checks: Vec<CoreExpr>) -> Option<CoreExpr> {
    checks
        .into_iter()
        .reduce(|acc, check| CoreExpr::binop("&&", acc, check))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scrut() -> CoreExpr {
        CoreExpr::var("xs")
    }

    #[test]
    fn test_wildcard_and_var_have_no_checks() {
        assert!(check_pat(&scrut(), &Pattern::any(), true).is_empty());
        assert!(check_pat(&scrut(), &Pattern::var("x"), true).is_empty());
    }

    #[test]
    fn test_unit_const_has_no_checks() {
        let pat = Pattern::Const(Const::Unit, Default::default());
        assert!(check_pat(&scrut(), &pat, true).is_empty());
    }

    #[test]
    fn test_const_check_is_equality() {
        let pat = Pattern::Const(Const::Int(0), Default::default());
        let checks = check_pat(&CoreExpr::var("n"), &pat, true);
        assert_eq!(
            checks,
            vec![CoreExpr::binop("=", CoreExpr::var("n"), CoreExpr::int(0))]
        );
    }

    #[test]
    fn test_cons_check_is_length_guard() {
        // h :: t needs list_len xs > 0 and nothing else.
        let pat = Pattern::cons(Pattern::var("h"), Pattern::var("t"));
        let checks = check_pat(&scrut(), &pat, true);
        assert_eq!(
            checks,
            vec![CoreExpr::binop(
                ">",
                CoreExpr::apply(CoreExpr::var(LIST_LEN), scrut()),
                CoreExpr::int(0)
            )]
        );
    }

    #[test]
    fn test_nested_cons_emits_single_length_guard() {
        // a :: b :: t needs list_len xs > 1, once.
        let pat = Pattern::cons(
            Pattern::var("a"),
            Pattern::cons(Pattern::var("b"), Pattern::var("t")),
        );
        let checks = check_pat(&scrut(), &pat, true);
        assert_eq!(
            checks,
            vec![CoreExpr::binop(
                ">",
                CoreExpr::apply(CoreExpr::var(LIST_LEN), scrut()),
                CoreExpr::int(1)
            )]
        );
    }

    #[test]
    fn test_singleton_list_checks_tail_is_nil() {
        // x :: [] needs list_len xs > 0 and get_tail xs = [].
        let pat = Pattern::cons(
            Pattern::var("x"),
            Pattern::Const(Const::Nil, Default::default()),
        );
        let checks = check_pat(&scrut(), &pat, true);
        assert_eq!(checks.len(), 2);
        assert_eq!(
            checks[1],
            CoreExpr::binop(
                "=",
                CoreExpr::apply(CoreExpr::var(GET_TAIL), scrut()),
                CoreExpr::Const(Const::Nil)
            )
        );
    }

    #[test]
    fn test_tuple_checks_project_each_position() {
        // (0, y) checks tuple_get 0 scrut = 0 only.
        let pat = Pattern::Tuple(vec![
            Pattern::Const(Const::Int(0), Default::default()),
            Pattern::var("y"),
        ]);
        let checks = check_pat(&scrut(), &pat, true);
        assert_eq!(
            checks,
            vec![CoreExpr::binop(
                "=",
                get_element(&scrut(), Elem::Tuple(0)),
                CoreExpr::int(0)
            )]
        );
    }

    #[test]
    fn test_cons_inside_tuple_gets_its_own_length_guard() {
        // (h :: t, y): the nested cons is a fresh projection and keeps
        // its own length check.
        let pat = Pattern::Tuple(vec![
            Pattern::cons(Pattern::var("h"), Pattern::var("t")),
            Pattern::var("y"),
        ]);
        let checks = check_pat(&scrut(), &pat, true);
        assert_eq!(
            checks,
            vec![CoreExpr::binop(
                ">",
                CoreExpr::apply(CoreExpr::var(LIST_LEN), get_element(&scrut(), Elem::Tuple(0))),
                CoreExpr::int(0)
            )]
        );
    }

    #[test]
    fn test_pat_decls_var() {
        let decls = pat_decls(&scrut(), &Pattern::var("x"));
        assert_eq!(decls, vec![("x".to_string(), scrut())]);
    }

    #[test]
    fn test_pat_decls_tuple() {
        let pat = Pattern::Tuple(vec![Pattern::var("a"), Pattern::var("b")]);
        let decls = pat_decls(&scrut(), &pat);
        assert_eq!(
            decls,
            vec![
                ("a".to_string(), get_element(&scrut(), Elem::Tuple(0))),
                ("b".to_string(), get_element(&scrut(), Elem::Tuple(1))),
            ]
        );
    }

    #[test]
    fn test_pat_decls_nested_cons() {
        // a :: (b, _) :: _ reaches b through tail, head, tuple 0.
        let pat = Pattern::cons(
            Pattern::var("a"),
            Pattern::cons(
                Pattern::Tuple(vec![Pattern::var("b"), Pattern::any()]),
                Pattern::any(),
            ),
        );
        let decls = pat_decls(&scrut(), &pat);
        let tail = get_element(&scrut(), Elem::ConsTail);
        let second = get_element(&tail, Elem::ConsHead);
        assert_eq!(
            decls,
            vec![
                ("a".to_string(), get_element(&scrut(), Elem::ConsHead)),
                ("b".to_string(), get_element(&second, Elem::Tuple(0))),
            ]
        );
    }

    #[test]
    fn test_create_case_irrefutable_has_no_conditional() {
        let pat = Pattern::Tuple(vec![Pattern::var("a"), Pattern::var("b")]);
        let case = create_case(&scrut(), &pat, CoreExpr::var("a"), fail_match());
        // let a = ... in let b = ... in a
        match case {
            CoreExpr::Let(_, body) => match *body {
                CoreExpr::Let(_, inner) => assert_eq!(*inner, CoreExpr::var("a")),
                other => panic!("expected nested let, got {:?}", other),
            },
            other => panic!("expected let, got {:?}", other),
        }
    }

    #[test]
    fn test_create_case_guarded_builds_conditional() {
        let pat = Pattern::cons(Pattern::var("h"), Pattern::any());
        let case = create_case(&scrut(), &pat, CoreExpr::var("h"), CoreExpr::int(0));
        match case {
            CoreExpr::If(_, then_branch, else_branch) => {
                assert!(matches!(*then_branch, CoreExpr::Let(_, _)));
                assert_eq!(*else_branch, CoreExpr::int(0));
            }
            other => panic!("expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn test_combine_checks_folds_left() {
        let combined = combine_checks(vec![
            CoreExpr::var("c1"),
            CoreExpr::var("c2"),
            CoreExpr::var("c3"),
        ])
        .unwrap();
        assert_eq!(
            combined,
            CoreExpr::binop(
                "&&",
                CoreExpr::binop("&&", CoreExpr::var("c1"), CoreExpr::var("c2")),
                CoreExpr::var("c3")
            )
        );
    }
}
