//! Unification of types, producing substitutions.
//!
//! `unify(l, r)` finds the most general substitution `s` such that
//! `s(l) = s(r)`, or fails with [`TypeError::UnificationFailed`] /
//! [`TypeError::OccursCheck`]. The occurs-check itself lives in
//! [`Substitution::singleton`].

use super::error::TypeError;
use super::subst::Substitution;
use super::ty::Type;

pub fn unify(t1: &Type, t2: &Type) -> Result<Substitution, TypeError> {
    match (t1, t2) {
        // Identical primitive types unify with the empty substitution
        (Type::Int, Type::Int)
        | (Type::Bool, Type::Bool)
        | (Type::String, Type::String)
        | (Type::Unit, Type::Unit) => Ok(Substitution::empty()),

        (Type::Var(v1), Type::Var(v2)) if v1 == v2 => Ok(Substitution::empty()),
        (Type::Var(v), other) | (other, Type::Var(v)) => {
            Substitution::singleton(v.clone(), other.clone())
        }

        (Type::Func(l1, r1), Type::Func(l2, r2)) => {
            let s1 = unify(l1, l2)?;
            let s2 = unify(&s1.apply(r1), &s1.apply(r2))?;
            s1.compose(&s2)
        }

        (Type::List(e1), Type::List(e2)) => unify(e1, e2),

        (Type::Tuple(elems1), Type::Tuple(elems2)) => {
            if elems1.len() != elems2.len() {
                return Err(TypeError::unification_failed(t1.clone(), t2.clone()));
            }
            elems1
                .iter()
                .zip(elems2.iter())
                .try_fold(Substitution::empty(), |acc, (l, r)| {
                    let s = unify(&acc.apply(l), &acc.apply(r))?;
                    acc.compose(&s)
                })
        }

        _ => Err(TypeError::unification_failed(t1.clone(), t2.clone())),
    }
}
