//! # Type Environment for Type Inference
//!
//! The type environment (`TypeEnv`) maps names to type schemes. It is a
//! persistent structure: operations return new environments, never
//! modify in place.
//!
//! When a variable is looked up during inference its scheme is
//! **instantiated** with fresh type variables, which is what makes
//! `let`-bound values polymorphic:
//!
//! ```text
//! // Environment contains: id : forall 'a. 'a -> 'a
//! // id 1     instantiates to int -> int
//! // id true  instantiates to bool -> bool
//! ```

use std::collections::{HashMap, HashSet};

use crate::ast::pattern::Pattern;

use super::subst::Substitution;
use super::ty::{Type, TypeScheme, TypeVar};

/// Type environment mapping names to type schemes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeEnv {
    bindings: HashMap<String, TypeScheme>,
}

impl TypeEnv {
    /// Create a new empty type environment.
    pub fn empty() -> Self {
        TypeEnv {
            bindings: HashMap::new(),
        }
    }

    /// Create a new environment with initial bindings.
    pub fn with_bindings(bindings: Vec<(String, TypeScheme)>) -> Self {
        TypeEnv {
            bindings: bindings.into_iter().collect(),
        }
    }

    /// The environment every module is checked against: comparison
    /// operators are polymorphic, arithmetic is integer-only.
    pub fn initial() -> Self {
        let var = TypeVar::new(0);
        let compare = TypeScheme::polymorphic(
            vec![var.clone()],
            Type::func(
                Type::Var(var.clone()),
                Type::func(Type::Var(var), Type::Bool),
            ),
        );
        let arith =
            TypeScheme::monomorphic(Type::func(Type::Int, Type::func(Type::Int, Type::Int)));

        let mut bindings = Vec::new();
        for op in ["=", "<>", "<", ">", "<=", ">="] {
            bindings.push((op.to_string(), compare.clone()));
        }
        for op in ["+", "-", "*", "/"] {
            bindings.push((op.to_string(), arith.clone()));
        }
        bindings.push((
            "&&".to_string(),
            TypeScheme::monomorphic(Type::func(Type::Bool, Type::func(Type::Bool, Type::Bool))),
        ));
        bindings.push((
            "print_int".to_string(),
            TypeScheme::monomorphic(Type::func(Type::Int, Type::Unit)),
        ));

        TypeEnv::with_bindings(bindings)
    }

    pub fn lookup(&self, name: &str) -> Option<&TypeScheme> {
        self.bindings.get(name)
    }

    /// Extend this environment with a new binding, shadowing any
    /// existing binding with the same name.
    pub fn extend(&self, name: String, scheme: TypeScheme) -> TypeEnv {
        let mut new_bindings = self.bindings.clone();
        new_bindings.insert(name, scheme);
        TypeEnv {
            bindings: new_bindings,
        }
    }

    /// A copy of this environment without a binding for `name`.
    pub fn remove(&self, name: &str) -> TypeEnv {
        let mut new_bindings = self.bindings.clone();
        new_bindings.remove(name);
        TypeEnv {
            bindings: new_bindings,
        }
    }

    /// Free type variables of the environment: the union of the free
    /// variables of every stored scheme. These are the variables that
    /// must not be generalized by a `let`.
    pub fn free_type_vars(&self) -> HashSet<TypeVar> {
        self.bindings
            .values()
            .flat_map(TypeScheme::free_type_vars)
            .collect()
    }

    /// Apply a substitution to every scheme in the environment.
    pub fn apply_subst(&self, subst: &Substitution) -> TypeEnv {
        TypeEnv {
            bindings: self
                .bindings
                .iter()
                .map(|(name, scheme)| (name.clone(), scheme.apply_subst(subst)))
                .collect(),
        }
    }

    /// Extend the environment for every name bound by `pat`, assigning
    /// each name a scheme with the same quantifiers as `scheme` and the
    /// corresponding sub-type of `scheme.ty`.
    ///
    /// Shape mismatches are not an error here: inference has already
    /// unified the pattern type with the bound value's type, so a
    /// mismatch just means there is nothing to refine and the
    /// environment is returned unchanged.
    pub fn ext_by_pat(&self, scheme: &TypeScheme, pat: &Pattern) -> TypeEnv {
        match (pat, &scheme.ty) {
            (Pattern::Var(ident), _) => self.extend(ident.value.clone(), scheme.clone()),
            (Pattern::Cons(head, tail), Type::List(elem)) => {
                let elem_scheme = TypeScheme::polymorphic(scheme.vars.clone(), (**elem).clone());
                let tail_scheme =
                    TypeScheme::polymorphic(scheme.vars.clone(), Type::list((**elem).clone()));
                self.ext_by_pat(&elem_scheme, head)
                    .ext_by_pat(&tail_scheme, tail)
            }
            (Pattern::Tuple(pats), Type::Tuple(types)) if pats.len() == types.len() => pats
                .iter()
                .zip(types.iter())
                .fold(self.clone(), |env, (sub_pat, sub_ty)| {
                    let sub_scheme =
                        TypeScheme::polymorphic(scheme.vars.clone(), sub_ty.clone());
                    env.ext_by_pat(&sub_scheme, sub_pat)
                }),
            _ => self.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_env() {
        let env = TypeEnv::empty();
        assert!(env.lookup("x").is_none());
    }

    #[test]
    fn test_extend_and_lookup() {
        let env = TypeEnv::empty();
        let env = env.extend("x".to_string(), TypeScheme::monomorphic(Type::Int));
        assert_eq!(env.lookup("x").unwrap().ty, Type::Int);
    }

    #[test]
    fn test_extend_shadows() {
        let env = TypeEnv::empty()
            .extend("x".to_string(), TypeScheme::monomorphic(Type::Int))
            .extend("x".to_string(), TypeScheme::monomorphic(Type::String));
        assert_eq!(env.lookup("x").unwrap().ty, Type::String);
    }

    #[test]
    fn test_remove() {
        let env = TypeEnv::empty().extend("x".to_string(), TypeScheme::monomorphic(Type::Int));
        assert!(env.remove("x").lookup("x").is_none());
        assert!(env.lookup("x").is_some());
    }

    #[test]
    fn test_free_type_vars() {
        let free_var = TypeVar::new(0);
        let bound_var = TypeVar::new(1);
        let env = TypeEnv::with_bindings(vec![
            (
                "x".to_string(),
                TypeScheme::monomorphic(Type::Var(free_var.clone())),
            ),
            (
                "id".to_string(),
                TypeScheme::polymorphic(
                    vec![bound_var.clone()],
                    Type::func(Type::Var(bound_var), Type::Var(free_var.clone())),
                ),
            ),
        ]);

        let free = env.free_type_vars();
        assert_eq!(free.len(), 1);
        assert!(free.contains(&free_var));
    }

    #[test]
    fn test_apply_subst_respects_quantifiers() {
        let var = TypeVar::new(0);
        let env = TypeEnv::with_bindings(vec![(
            "id".to_string(),
            TypeScheme::polymorphic(
                vec![var.clone()],
                Type::func(Type::Var(var.clone()), Type::Var(var.clone())),
            ),
        )]);

        let subst = Substitution::singleton(var.clone(), Type::Int).unwrap();
        let applied = env.apply_subst(&subst);
        // 'a is quantified, so the scheme is untouched.
        assert_eq!(
            applied.lookup("id").unwrap().ty,
            Type::func(Type::Var(var.clone()), Type::Var(var))
        );
    }

    #[test]
    fn test_ext_by_pat_var() {
        let env = TypeEnv::empty();
        let scheme = TypeScheme::monomorphic(Type::Int);
        let env = env.ext_by_pat(&scheme, &Pattern::var("x"));
        assert_eq!(env.lookup("x").unwrap().ty, Type::Int);
    }

    #[test]
    fn test_ext_by_pat_cons() {
        let env = TypeEnv::empty();
        let scheme = TypeScheme::monomorphic(Type::list(Type::Int));
        let pat = Pattern::cons(Pattern::var("h"), Pattern::var("t"));
        let env = env.ext_by_pat(&scheme, &pat);
        assert_eq!(env.lookup("h").unwrap().ty, Type::Int);
        assert_eq!(env.lookup("t").unwrap().ty, Type::list(Type::Int));
    }

    #[test]
    fn test_ext_by_pat_tuple() {
        let env = TypeEnv::empty();
        let scheme = TypeScheme::monomorphic(Type::Tuple(vec![Type::Int, Type::Bool]));
        let pat = Pattern::Tuple(vec![Pattern::var("a"), Pattern::var("b")]);
        let env = env.ext_by_pat(&scheme, &pat);
        assert_eq!(env.lookup("a").unwrap().ty, Type::Int);
        assert_eq!(env.lookup("b").unwrap().ty, Type::Bool);
    }

    #[test]
    fn test_ext_by_pat_mismatch_is_noop() {
        let env = TypeEnv::empty();
        let scheme = TypeScheme::monomorphic(Type::Int);
        let pat = Pattern::Tuple(vec![Pattern::var("a"), Pattern::var("b")]);
        assert_eq!(env.ext_by_pat(&scheme, &pat), env);
    }

    #[test]
    fn test_ext_by_pat_keeps_quantifiers() {
        let var = TypeVar::new(0);
        let env = TypeEnv::empty();
        let scheme = TypeScheme::polymorphic(
            vec![var.clone()],
            Type::Tuple(vec![
                Type::func(Type::Var(var.clone()), Type::Var(var.clone())),
                Type::Int,
            ]),
        );
        let pat = Pattern::Tuple(vec![Pattern::var("f"), Pattern::var("n")]);
        let env = env.ext_by_pat(&scheme, &pat);

        let f = env.lookup("f").unwrap();
        assert_eq!(f.vars, vec![var.clone()]);
        assert_eq!(f.ty, Type::func(Type::Var(var.clone()), Type::Var(var)));
        assert_eq!(env.lookup("n").unwrap().ty, Type::Int);
    }
}
