//! # Type Substitutions for Unification
//!
//! A substitution maps type variables to types, representing assignments
//! discovered during type inference. For example, after inferring
//! `fun x -> x + 1` we might have the substitution `'a := int`.
//!
//! ## Composition
//!
//! Composition here is *confluent*: extending a substitution with a
//! mapping for an already-bound variable unifies the two candidate types
//! instead of overwriting, and inserting a new mapping re-applies it
//! through all existing values. Repeated composition of the same
//! substitution is therefore a no-op, and no dangling aliases
//! (`'a := 'b` alongside `'b := int`) survive a composition:
//!
//! ```text
//! S1 = {'a := 'b}
//! S2 = {'b := int}
//!
//! compose(S2, S1) = {'a := int, 'b := int}
//! ```
//!
//! ## Related Modules
//!
//! - [`crate::types::ty`] - Type definitions substitutions apply to
//! - [`crate::types::unify`] - Unification, which produces substitutions
//! - [`crate::types::env`] - Environments substitutions are applied to

use std::collections::HashMap;

use super::error::TypeError;
use super::ty::{Type, TypeVar};
use super::unify::unify;

fn occurs_in(var: &TypeVar, ty: &Type) -> bool {
    match ty {
        Type::Int | Type::Bool | Type::String | Type::Unit => false,
        Type::Var(v) => v == var,
        Type::List(elem_ty) => occurs_in(var, elem_ty),
        Type::Tuple(elems) => elems.iter().any(|t| occurs_in(var, t)),
        Type::Func(t1, t2) => occurs_in(var, t1) || occurs_in(var, t2),
    }
}

/// A substitution mapping type variables to types.
///
/// Invariant: no key occurs free in its own value ([`Substitution::singleton`]
/// enforces the occurs-check, and composition preserves it).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitution(pub HashMap<TypeVar, Type>);

impl Substitution {
    /// Create an empty substitution (no mappings).
    pub fn empty() -> Self {
        Substitution(HashMap::new())
    }

    /// Create a substitution with a single mapping `var := ty`.
    ///
    /// Fails with [`TypeError::OccursCheck`] if `var` occurs in `ty`,
    /// which would denote an infinite type.
    pub fn singleton(var: TypeVar, ty: Type) -> Result<Self, TypeError> {
        if occurs_in(&var, &ty) {
            return Err(TypeError::occurs_check(var, ty));
        }
        let mut map = HashMap::new();
        map.insert(var, ty);
        Ok(Substitution(map))
    }

    pub fn find(&self, var: &TypeVar) -> Option<&Type> {
        self.0.get(var)
    }

    /// A copy of this substitution without a mapping for `var`.
    pub fn remove(&self, var: &TypeVar) -> Substitution {
        let mut map = self.0.clone();
        map.remove(var);
        Substitution(map)
    }

    /// Apply this substitution to a type.
    ///
    /// Recursively replaces every type variable that has a mapping;
    /// unmapped variables are left in place.
    pub fn apply(&self, ty: &Type) -> Type {
        match ty {
            Type::Int | Type::Bool | Type::String | Type::Unit => ty.clone(),
            Type::Var(v) => self.0.get(v).cloned().unwrap_or_else(|| ty.clone()),
            Type::List(elem_ty) => Type::List(Box::new(self.apply(elem_ty))),
            Type::Tuple(elems) => Type::Tuple(elems.iter().map(|t| self.apply(t)).collect()),
            Type::Func(t1, t2) => Type::func(self.apply(t1), self.apply(t2)),
        }
    }

    /// Extend with a single mapping.
    ///
    /// If `var` is unbound, the new value first has this substitution
    /// applied to it and is then folded back through all existing values,
    /// so no alias chains remain. If `var` is already bound, the two
    /// candidate types are unified and the result composed in, making
    /// composition confluent.
    fn extend(&self, var: TypeVar, ty: Type) -> Result<Substitution, TypeError> {
        match self.0.get(&var) {
            Some(bound) => {
                let resolved = unify(&ty, bound)?;
                self.compose(&resolved)
            }
            None => {
                let ty = self.apply(&ty);
                let one = Substitution::singleton(var.clone(), ty.clone())?;
                let mut map: HashMap<TypeVar, Type> = self
                    .0
                    .iter()
                    .map(|(k, v)| (k.clone(), one.apply(v)))
                    .collect();
                map.insert(var, ty);
                Ok(Substitution(map))
            }
        }
    }

    /// Compose with another substitution by extending with each of its
    /// mappings in turn.
    pub fn compose(&self, other: &Substitution) -> Result<Substitution, TypeError> {
        other
            .0
            .iter()
            .try_fold(self.clone(), |acc, (var, ty)| {
                acc.extend(var.clone(), ty.clone())
            })
    }

    /// Left fold of [`Substitution::compose`] over a sequence.
    pub fn compose_all<I>(substs: I) -> Result<Substitution, TypeError>
    where
        I: IntoIterator<Item = Substitution>,
    {
        substs
            .into_iter()
            .try_fold(Substitution::empty(), |acc, s| acc.compose(&s))
    }
}
