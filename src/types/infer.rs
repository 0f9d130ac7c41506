//! Hindley-Milner type inference over the surface AST.
//!
//! The inferencer threads an explicit [`Substitution`] through every
//! judgement: `infer_expr` returns the substitution discovered while
//! checking a node together with the node's type, and callers apply that
//! substitution to their environment before inferring sibling nodes.
//! Generalization happens at `let` bindings only.

use std::hash::{Hash, Hasher};

use crate::ast::expression::{Binding, Const, Expr};
use crate::ast::pattern::Pattern;
use crate::ast::types::TyExpr;
use crate::ast::{RecFlag, StrItem, Structure};
use crate::fresh::Counter;

use super::env::TypeEnv;
use super::error::TypeError;
use super::subst::Substitution;
use super::ty::{Type, TypeScheme, TypeVar};
use super::unify::unify;

/// Annotation variables are hashed into ids above this bit so they can
/// never collide with counter-issued ids.
const ANNOT_VAR_BIT: usize = 1 << 63;

fn annot_var(name: &str) -> TypeVar {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    name.hash(&mut hasher);
    TypeVar::with_name(
        (hasher.finish() as usize) | ANNOT_VAR_BIT,
        name.to_string(),
    )
}

/// Translate a surface type annotation into a type.
///
/// Two occurrences of the same annotation variable name map to the same
/// type variable, within and across annotations of one module.
pub fn annot_to_ty(annot: &TyExpr) -> Type {
    match annot {
        TyExpr::Int => Type::Int,
        TyExpr::Bool => Type::Bool,
        TyExpr::String => Type::String,
        TyExpr::Unit => Type::Unit,
        TyExpr::Var(name) => Type::Var(annot_var(name)),
        TyExpr::List(elem) => Type::list(annot_to_ty(elem)),
        TyExpr::Tuple(elems) => Type::Tuple(elems.iter().map(annot_to_ty).collect()),
        TyExpr::Arrow(t1, t2) => Type::func(annot_to_ty(t1), annot_to_ty(t2)),
    }
}

pub struct Infer {
    counter: Counter,
}

impl Infer {
    pub fn new() -> Self {
        Infer {
            counter: Counter::new(),
        }
    }

    fn fresh_var(&mut self) -> TypeVar {
        TypeVar::new(self.counter.fresh())
    }

    /// Replace a scheme's quantified variables with fresh ones.
    fn instantiate(&mut self, scheme: &TypeScheme) -> Type {
        let subst: std::collections::HashMap<_, _> = scheme
            .vars
            .iter()
            .map(|v| (v.clone(), Type::Var(self.fresh_var())))
            .collect();
        Substitution(subst).apply(&scheme.ty)
    }

    /// Quantify over the variables free in `ty` but not in `env`.
    fn generalize(&self, env: &TypeEnv, ty: &Type) -> TypeScheme {
        let free_in_env = env.free_type_vars();
        let free_in_ty = ty.free_type_vars();
        let mut vars: Vec<_> = free_in_ty.difference(&free_in_env).cloned().collect();
        // Deterministic quantifier order regardless of hash iteration
        vars.sort_by_key(|v| v.id);
        TypeScheme {
            vars,
            ty: ty.clone(),
        }
    }

    fn const_type(&mut self, constant: &Const) -> Type {
        match constant {
            Const::Int(_) => Type::Int,
            Const::Bool(_) => Type::Bool,
            Const::String(_) => Type::String,
            Const::Unit => Type::Unit,
            Const::Nil => Type::list(Type::Var(self.fresh_var())),
        }
    }

    /// Infer the type of a pattern, extending the environment with a
    /// fresh monomorphic binding for every variable the pattern binds.
    pub fn infer_pat(
        &mut self,
        env: &TypeEnv,
        pat: &Pattern,
    ) -> Result<(TypeEnv, Type), TypeError> {
        match pat {
            Pattern::Any(_) => Ok((env.clone(), Type::Var(self.fresh_var()))),

            Pattern::Const(constant, _) => Ok((env.clone(), self.const_type(constant))),

            Pattern::Var(ident) => {
                let var_ty = Type::Var(self.fresh_var());
                let env = env.extend(
                    ident.value.clone(),
                    TypeScheme::monomorphic(var_ty.clone()),
                );
                Ok((env, var_ty))
            }

            Pattern::Cons(head, tail) => {
                let (env1, head_ty) = self.infer_pat(env, head)?;
                let (env2, tail_ty) = self.infer_pat(&env1, tail)?;
                let s = unify(&Type::list(head_ty), &tail_ty)
                    .map_err(|e| e.with_span(pat.span()))?;
                Ok((env2.apply_subst(&s), s.apply(&tail_ty)))
            }

            Pattern::Tuple(pats) => {
                let mut env_cur = env.clone();
                let mut types = Vec::with_capacity(pats.len());
                for sub_pat in pats {
                    let (env_next, ty) = self.infer_pat(&env_cur, sub_pat)?;
                    env_cur = env_next;
                    types.push(ty);
                }
                Ok((env_cur, Type::Tuple(types)))
            }

            Pattern::Annotated(inner, annot) => {
                let (env1, inner_ty) = self.infer_pat(env, inner)?;
                let s = unify(&inner_ty, &annot_to_ty(annot))
                    .map_err(|e| e.with_span(pat.span()))?;
                Ok((env1.apply_subst(&s), s.apply(&inner_ty)))
            }
        }
    }

    pub fn infer_expr(
        &mut self,
        env: &TypeEnv,
        expr: &Expr,
    ) -> Result<(Substitution, Type), TypeError> {
        match expr {
            Expr::Const(constant, _) => Ok((Substitution::empty(), self.const_type(constant))),

            Expr::Var(ident) => match env.lookup(&ident.value) {
                Some(scheme) => Ok((Substitution::empty(), self.instantiate(scheme))),
                None => Err(TypeError::no_variable(
                    ident.value.clone(),
                    ident.position.clone(),
                )),
            },

            Expr::Apply(func, arg) => {
                let result_ty = Type::Var(self.fresh_var());
                let (s1, func_ty) = self.infer_expr(env, func)?;
                let (s2, arg_ty) = self.infer_expr(&env.apply_subst(&s1), arg)?;
                let s3 = unify(&Type::func(arg_ty, result_ty.clone()), &s2.apply(&func_ty))
                    .map_err(|e| e.with_span(expr.span()))?;
                let s = Substitution::compose_all([s1, s2, s3])?;
                let final_ty = s.apply(&result_ty);
                Ok((s, final_ty))
            }

            Expr::If(cond, then_branch, else_branch) => {
                let (s1, cond_ty) = self.infer_expr(env, cond)?;
                let env1 = env.apply_subst(&s1);
                let (s2, then_ty) = self.infer_expr(&env1, then_branch)?;
                let env2 = env1.apply_subst(&s2);
                let (s3, else_ty) = self.infer_expr(&env2, else_branch)?;

                let s4 = unify(&s3.apply(&s2.apply(&cond_ty)), &Type::Bool)
                    .map_err(|e| e.with_span(cond.span()))?;
                let s5 = unify(
                    &s4.apply(&s3.apply(&then_ty)),
                    &s4.apply(&else_ty),
                )
                .map_err(|e| e.with_span(expr.span()))?;

                let s = Substitution::compose_all([s1, s2, s3, s4, s5])?;
                let branch_ty = s.apply(&else_ty);
                Ok((s, branch_ty))
            }

            Expr::Fun(pattern, body) => {
                let (env1, param_ty) = self.infer_pat(env, pattern)?;
                let (s, body_ty) = self.infer_expr(&env1, body)?;
                let func_ty = s.apply(&Type::func(param_ty, body_ty));
                Ok((s, func_ty))
            }

            Expr::Tuple(elements) => {
                let mut s_acc = Substitution::empty();
                let mut env_cur = env.clone();
                let mut types = Vec::with_capacity(elements.len());
                for element in elements {
                    let (s, ty) = self.infer_expr(&env_cur, element)?;
                    env_cur = env_cur.apply_subst(&s);
                    s_acc = s_acc.compose(&s)?;
                    types.push(ty);
                }
                let tuple_ty = Type::Tuple(types.iter().map(|t| s_acc.apply(t)).collect());
                Ok((s_acc, tuple_ty))
            }

            Expr::Cons(head, tail) => {
                let (s1, head_ty) = self.infer_expr(env, head)?;
                let (s2, tail_ty) = self.infer_expr(env, tail)?;
                let s3 = unify(&Type::list(head_ty), &tail_ty)
                    .map_err(|e| e.with_span(expr.span()))?;
                let s = Substitution::compose_all([s1, s2, s3])?;
                let list_ty = s.apply(&tail_ty);
                Ok((s, list_ty))
            }

            Expr::Match(scrutinee, cases) => {
                let (s_scrut, scrut_ty) = self.infer_expr(env, scrutinee)?;
                let result_ty = Type::Var(self.fresh_var());

                let mut subst = s_scrut;
                for (pat, body) in cases {
                    let env_cur = env.apply_subst(&subst);
                    let (env_pat, pat_ty) = self.infer_pat(&env_cur, pat)?;
                    let s1 = unify(&subst.apply(&scrut_ty), &pat_ty)
                        .map_err(|e| e.with_span(pat.span()))?;
                    let env_body = env_pat.apply_subst(&s1);
                    let (s2, body_ty) = self.infer_expr(&env_body, body)?;
                    let s3 = unify(
                        &s2.apply(&s1.apply(&subst.apply(&result_ty))),
                        &body_ty,
                    )
                    .map_err(|e| e.with_span(body.span()))?;
                    subst = Substitution::compose_all([subst, s1, s2, s3])?;
                }

                let final_ty = subst.apply(&result_ty);
                Ok((subst, final_ty))
            }

            Expr::Let(let_expr) => {
                if let_expr.bindings.is_empty() {
                    return Err(TypeError::empty_let(expr.span()));
                }
                match let_expr.rec {
                    RecFlag::Nonrecursive => {
                        let mut subst = Substitution::empty();
                        let mut env_cur = env.clone();
                        for binding in &let_expr.bindings {
                            let (s, env_next) = self.infer_nonrec_binding(&env_cur, binding)?;
                            env_cur = env_next;
                            subst = subst.compose(&s)?;
                        }
                        let (s_body, body_ty) = self.infer_expr(&env_cur, &let_expr.body)?;
                        let subst = subst.compose(&s_body)?;
                        Ok((subst, body_ty))
                    }
                    RecFlag::Recursive => {
                        let (s, env_rec, _) = self.infer_rec_group(env, &let_expr.bindings)?;
                        let (s_body, body_ty) = self.infer_expr(&env_rec, &let_expr.body)?;
                        let subst = s.compose(&s_body)?;
                        Ok((subst, body_ty))
                    }
                }
            }

            // The constraint form is resolved into pattern annotations at
            // parse time; a residual expression annotation is transparent.
            Expr::Annotated(inner, _) => self.infer_expr(env, inner),
        }
    }

    /// One non-recursive `pattern = value` step: infer the value,
    /// generalize it, then refine every name the pattern binds.
    fn infer_nonrec_binding(
        &mut self,
        env: &TypeEnv,
        binding: &Binding,
    ) -> Result<(Substitution, TypeEnv), TypeError> {
        let (s1, value_ty) = self.infer_expr(env, &binding.value)?;
        let env1 = env.apply_subst(&s1);
        let scheme = self.generalize(&env1, &value_ty);
        let (env2, pat_ty) = self.infer_pat(&env1, &binding.pattern)?;
        let env3 = env2.ext_by_pat(&scheme, &binding.pattern);
        let s2 = unify(&value_ty, &pat_ty)
            .map_err(|e| e.with_span(binding.pattern.span()))?;
        let s = s1.compose(&s2)?;
        Ok((s.clone(), env3.apply_subst(&s)))
    }

    /// Infer a recursive binding group.
    ///
    /// All bindings are provisionally entered at fresh monomorphic types
    /// before any right-hand side is inferred, then generalized against
    /// the outer environment. Every binding must be a plain variable.
    fn infer_rec_group(
        &mut self,
        env: &TypeEnv,
        bindings: &[Binding],
    ) -> Result<(Substitution, TypeEnv, Vec<String>), TypeError> {
        let mut names = Vec::with_capacity(bindings.len());
        for binding in bindings {
            match binding.pattern.resolved() {
                Pattern::Var(ident) => names.push(ident.value.clone()),
                other => {
                    return Err(TypeError::not_implemented(
                        "recursive binding with a non-variable pattern",
                        other.span(),
                    ));
                }
            }
        }

        let provisional: Vec<Type> = bindings
            .iter()
            .map(|_| Type::Var(self.fresh_var()))
            .collect();
        let mut env_rec = env.clone();
        for (name, var_ty) in names.iter().zip(provisional.iter()) {
            env_rec = env_rec.extend(name.clone(), TypeScheme::monomorphic(var_ty.clone()));
        }

        let mut subst = Substitution::empty();
        for (binding, var_ty) in bindings.iter().zip(provisional.iter()) {
            let (s1, value_ty) = self.infer_expr(&env_rec.apply_subst(&subst), &binding.value)?;
            let s2 = unify(&s1.apply(&subst.apply(var_ty)), &value_ty)
                .map_err(|e| e.with_span(binding.pattern.span()))?;
            subst = Substitution::compose_all([subst, s1, s2])?;
        }

        // Generalize against the outer environment, which does not
        // contain the provisional bindings.
        let env_out = env.apply_subst(&subst);
        let mut env_final = env_out.clone();
        for (name, var_ty) in names.iter().zip(provisional.iter()) {
            let ty = subst.apply(var_ty);
            let scheme = self.generalize(&env_out.remove(name), &ty);
            env_final = env_final.extend(name.clone(), scheme);
        }

        Ok((subst, env_final, names))
    }

    /// Infer one structure item, returning the extended environment and
    /// the `(name, scheme)` pairs the item introduced, in source order.
    pub fn infer_str_item(
        &mut self,
        env: &TypeEnv,
        item: &StrItem,
    ) -> Result<(TypeEnv, Vec<(String, TypeScheme)>), TypeError> {
        match item {
            StrItem::Eval(expr) => {
                let (s, _) = self.infer_expr(env, expr)?;
                Ok((env.apply_subst(&s), Vec::new()))
            }

            StrItem::Value(RecFlag::Nonrecursive, bindings) => {
                if bindings.is_empty() {
                    return Err(TypeError::empty_let(lachs::Span::default()));
                }
                let mut env_cur = env.clone();
                let mut introduced = Vec::new();
                for binding in bindings {
                    let (_, env_next) = self.infer_nonrec_binding(&env_cur, binding)?;
                    env_cur = env_next;
                    for name in binding.pattern.bound_names() {
                        let scheme = env_cur
                            .lookup(&name)
                            .cloned()
                            .expect("pattern names are bound by infer_pat");
                        introduced.push((name, scheme));
                    }
                }
                Ok((env_cur, introduced))
            }

            StrItem::Value(RecFlag::Recursive, bindings) => {
                if bindings.is_empty() {
                    return Err(TypeError::empty_let(lachs::Span::default()));
                }
                let (_, env_rec, names) = self.infer_rec_group(env, bindings)?;
                let introduced = names
                    .into_iter()
                    .map(|name| {
                        let scheme = env_rec
                            .lookup(&name)
                            .cloned()
                            .expect("rec group names are bound");
                        (name, scheme)
                    })
                    .collect();
                Ok((env_rec, introduced))
            }
        }
    }
}

impl Default for Infer {
    fn default() -> Self {
        Self::new()
    }
}

/// Infer a whole module against the initial environment.
///
/// Returns the `(name, scheme)` pairs bound by the module in source
/// order, ready for `val` line printing.
pub fn infer_structure(structure: &Structure) -> Result<Vec<(String, TypeScheme)>, TypeError> {
    let mut infer = Infer::new();
    let mut env = TypeEnv::initial();
    let mut bindings = Vec::new();
    for item in structure {
        let (env_next, mut introduced) = infer.infer_str_item(&env, item)?;
        env = env_next;
        bindings.append(&mut introduced);
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::Ident;

    fn int(value: i64) -> Expr {
        Expr::int(value)
    }

    fn var(name: &str) -> Expr {
        Expr::var(name)
    }

    fn apply(func: Expr, arg: Expr) -> Expr {
        Expr::apply(func, arg)
    }

    fn fun(param: &str, body: Expr) -> Expr {
        Expr::fun(Pattern::var(param), body)
    }

    fn infer_in(env: &TypeEnv, expr: &Expr) -> Result<Type, TypeError> {
        let mut infer = Infer::new();
        let (_, ty) = infer.infer_expr(env, expr)?;
        Ok(ty)
    }

    #[test]
    fn test_infer_constants() {
        let env = TypeEnv::empty();
        assert_eq!(infer_in(&env, &int(42)).unwrap(), Type::Int);
        assert_eq!(
            infer_in(&env, &Expr::Const(Const::Bool(true), Default::default())).unwrap(),
            Type::Bool
        );
        assert_eq!(
            infer_in(&env, &Expr::Const(Const::Unit, Default::default())).unwrap(),
            Type::Unit
        );
    }

    #[test]
    fn test_infer_nil_is_polymorphic_list() {
        let env = TypeEnv::empty();
        let ty = infer_in(&env, &Expr::Const(Const::Nil, Default::default())).unwrap();
        assert!(matches!(ty, Type::List(ref elem) if matches!(**elem, Type::Var(_))));
    }

    #[test]
    fn test_infer_unbound_variable() {
        let env = TypeEnv::empty();
        let result = infer_in(&env, &var("x"));
        assert!(matches!(result, Err(TypeError::NoVariable { name, .. }) if name == "x"));
    }

    #[test]
    fn test_infer_identity_function() {
        let env = TypeEnv::empty();
        let ty = infer_in(&env, &fun("x", var("x"))).unwrap();
        match ty {
            Type::Func(t1, t2) => assert_eq!(t1, t2),
            other => panic!("expected function type, got {}", other),
        }
    }

    #[test]
    fn test_infer_application() {
        let env = TypeEnv::empty();
        let expr = apply(fun("x", var("x")), int(42));
        assert_eq!(infer_in(&env, &expr).unwrap(), Type::Int);
    }

    #[test]
    fn test_infer_arithmetic() {
        let env = TypeEnv::initial();
        let expr = Expr::binop("+", int(1), int(2));
        assert_eq!(infer_in(&env, &expr).unwrap(), Type::Int);
    }

    #[test]
    fn test_infer_arithmetic_rejects_bool() {
        let env = TypeEnv::initial();
        let expr = Expr::binop("+", int(1), Expr::Const(Const::Bool(true), Default::default()));
        assert!(matches!(
            infer_in(&env, &expr),
            Err(TypeError::UnificationFailed { .. })
        ));
    }

    #[test]
    fn test_infer_comparison_is_polymorphic() {
        let env = TypeEnv::initial();
        let expr = Expr::binop(
            "=",
            Expr::Const(Const::Bool(true), Default::default()),
            Expr::Const(Const::Bool(false), Default::default()),
        );
        assert_eq!(infer_in(&env, &expr).unwrap(), Type::Bool);
    }

    #[test]
    fn test_infer_if() {
        let env = TypeEnv::initial();
        let expr = Expr::If(
            Box::new(Expr::binop("<", int(1), int(2))),
            Box::new(int(1)),
            Box::new(int(2)),
        );
        assert_eq!(infer_in(&env, &expr).unwrap(), Type::Int);
    }

    #[test]
    fn test_infer_if_condition_must_be_bool() {
        let env = TypeEnv::empty();
        let expr = Expr::If(Box::new(int(1)), Box::new(int(1)), Box::new(int(2)));
        assert!(infer_in(&env, &expr).is_err());
    }

    #[test]
    fn test_infer_if_branches_must_agree() {
        let env = TypeEnv::empty();
        let expr = Expr::If(
            Box::new(Expr::Const(Const::Bool(true), Default::default())),
            Box::new(int(1)),
            Box::new(Expr::Const(Const::String("no".into()), Default::default())),
        );
        assert!(infer_in(&env, &expr).is_err());
    }

    #[test]
    fn test_infer_let_polymorphism() {
        // let id = fun x -> x in (id 1, id true)
        let env = TypeEnv::empty();
        let expr = Expr::let_in(
            RecFlag::Nonrecursive,
            Pattern::var("id"),
            fun("x", var("x")),
            Expr::Tuple(vec![
                apply(var("id"), int(1)),
                apply(
                    var("id"),
                    Expr::Const(Const::Bool(true), Default::default()),
                ),
            ]),
        );
        let ty = infer_in(&env, &expr).unwrap();
        assert_eq!(ty, Type::Tuple(vec![Type::Int, Type::Bool]));
    }

    #[test]
    fn test_infer_let_tuple_destructuring() {
        // let (a, b) = (1, true) in a
        let env = TypeEnv::empty();
        let expr = Expr::let_in(
            RecFlag::Nonrecursive,
            Pattern::Tuple(vec![Pattern::var("a"), Pattern::var("b")]),
            Expr::Tuple(vec![
                int(1),
                Expr::Const(Const::Bool(true), Default::default()),
            ]),
            var("a"),
        );
        assert_eq!(infer_in(&env, &expr).unwrap(), Type::Int);
    }

    #[test]
    fn test_infer_empty_let_fails() {
        let env = TypeEnv::empty();
        let expr = Expr::Let(crate::ast::expression::Let {
            rec: RecFlag::Nonrecursive,
            bindings: vec![],
            body: Box::new(int(1)),
        });
        assert!(matches!(
            infer_in(&env, &expr),
            Err(TypeError::EmptyLet { .. })
        ));
    }

    #[test]
    fn test_infer_rec_non_variable_pattern_fails() {
        let env = TypeEnv::empty();
        let expr = Expr::Let(crate::ast::expression::Let {
            rec: RecFlag::Recursive,
            bindings: vec![Binding {
                pattern: Pattern::Tuple(vec![Pattern::var("a"), Pattern::var("b")]),
                value: Expr::Tuple(vec![int(1), int(2)]),
            }],
            body: Box::new(int(1)),
        });
        assert!(matches!(
            infer_in(&env, &expr),
            Err(TypeError::NotImplemented { .. })
        ));
    }

    #[test]
    fn test_infer_recursive_factorial() {
        // let rec fac = fun n -> if n <= 1 then 1 else n * fac (n - 1) in fac
        let env = TypeEnv::initial();
        let fac_body = fun(
            "n",
            Expr::If(
                Box::new(Expr::binop("<=", var("n"), int(1))),
                Box::new(int(1)),
                Box::new(Expr::binop(
                    "*",
                    var("n"),
                    apply(var("fac"), Expr::binop("-", var("n"), int(1))),
                )),
            ),
        );
        let expr = Expr::let_in(RecFlag::Recursive, Pattern::var("fac"), fac_body, var("fac"));
        assert_eq!(
            infer_in(&env, &expr).unwrap(),
            Type::func(Type::Int, Type::Int)
        );
    }

    #[test]
    fn test_infer_match_on_list() {
        // match xs with | [] -> 0 | h :: t -> 1
        let env =
            TypeEnv::empty().extend("xs".to_string(), TypeScheme::monomorphic(Type::list(Type::Int)));
        let expr = Expr::Match(
            Box::new(var("xs")),
            vec![
                (Pattern::Const(Const::Nil, Default::default()), int(0)),
                (Pattern::cons(Pattern::var("h"), Pattern::var("t")), int(1)),
            ],
        );
        assert_eq!(infer_in(&env, &expr).unwrap(), Type::Int);
    }

    #[test]
    fn test_infer_match_head_type_flows_out() {
        let env =
            TypeEnv::empty().extend("xs".to_string(), TypeScheme::monomorphic(Type::list(Type::Int)));
        let expr = Expr::Match(
            Box::new(var("xs")),
            vec![
                (Pattern::Const(Const::Nil, Default::default()), int(0)),
                (
                    Pattern::cons(Pattern::var("h"), Pattern::any()),
                    var("h"),
                ),
            ],
        );
        assert_eq!(infer_in(&env, &expr).unwrap(), Type::Int);
    }

    #[test]
    fn test_infer_cons() {
        let env = TypeEnv::empty();
        let expr = Expr::cons(int(1), Expr::Const(Const::Nil, Default::default()));
        assert_eq!(infer_in(&env, &expr).unwrap(), Type::list(Type::Int));
    }

    #[test]
    fn test_infer_cons_element_mismatch() {
        let env = TypeEnv::empty();
        let expr = Expr::cons(
            int(1),
            Expr::cons(
                Expr::Const(Const::Bool(true), Default::default()),
                Expr::Const(Const::Nil, Default::default()),
            ),
        );
        assert!(infer_in(&env, &expr).is_err());
    }

    #[test]
    fn test_infer_pattern_annotation() {
        // fun (x : int) -> x
        let env = TypeEnv::empty();
        let expr = Expr::fun(
            Pattern::Annotated(Box::new(Pattern::var("x")), TyExpr::Int),
            var("x"),
        );
        assert_eq!(
            infer_in(&env, &expr).unwrap(),
            Type::func(Type::Int, Type::Int)
        );
    }

    #[test]
    fn test_annotation_vars_are_stable() {
        let a1 = annot_to_ty(&TyExpr::Var("a".to_string()));
        let a2 = annot_to_ty(&TyExpr::Var("a".to_string()));
        let b = annot_to_ty(&TyExpr::Var("b".to_string()));
        assert_eq!(a1, a2);
        assert_ne!(a1, b);
    }

    #[test]
    fn test_infer_structure_collects_val_bindings() {
        // let id = fun x -> x
        // let temp = (id 1, id true)
        let structure = vec![
            StrItem::Value(
                RecFlag::Nonrecursive,
                vec![Binding {
                    pattern: Pattern::var("id"),
                    value: fun("x", var("x")),
                }],
            ),
            StrItem::Value(
                RecFlag::Nonrecursive,
                vec![Binding {
                    pattern: Pattern::var("temp"),
                    value: Expr::Tuple(vec![
                        apply(var("id"), int(1)),
                        apply(
                            var("id"),
                            Expr::Const(Const::Bool(true), Default::default()),
                        ),
                    ]),
                }],
            ),
        ];

        let bindings = infer_structure(&structure).unwrap();
        assert_eq!(bindings.len(), 2);

        let (id_name, id_scheme) = &bindings[0];
        assert_eq!(id_name, "id");
        assert_eq!(id_scheme.vars.len(), 1);

        let (temp_name, temp_scheme) = &bindings[1];
        assert_eq!(temp_name, "temp");
        assert_eq!(temp_scheme.ty, Type::Tuple(vec![Type::Int, Type::Bool]));
    }

    #[test]
    fn test_infer_structure_unbound_reports_name() {
        let structure = vec![StrItem::Value(
            RecFlag::Nonrecursive,
            vec![Binding {
                pattern: Pattern::var("x"),
                value: Expr::Var(Ident::new("y")),
            }],
        )];
        assert!(matches!(
            infer_structure(&structure),
            Err(TypeError::NoVariable { name, .. }) if name == "y"
        ));
    }

    #[test]
    fn test_infer_mutual_recursion() {
        // let rec even = fun n -> if n = 0 then true else odd (n - 1)
        // and odd = fun n -> if n = 0 then false else even (n - 1)
        let even_body = fun(
            "n",
            Expr::If(
                Box::new(Expr::binop("=", var("n"), int(0))),
                Box::new(Expr::Const(Const::Bool(true), Default::default())),
                Box::new(apply(var("odd"), Expr::binop("-", var("n"), int(1)))),
            ),
        );
        let odd_body = fun(
            "n",
            Expr::If(
                Box::new(Expr::binop("=", var("n"), int(0))),
                Box::new(Expr::Const(Const::Bool(false), Default::default())),
                Box::new(apply(var("even"), Expr::binop("-", var("n"), int(1)))),
            ),
        );
        let structure = vec![StrItem::Value(
            RecFlag::Recursive,
            vec![
                Binding {
                    pattern: Pattern::var("even"),
                    value: even_body,
                },
                Binding {
                    pattern: Pattern::var("odd"),
                    value: odd_body,
                },
            ],
        )];

        let bindings = infer_structure(&structure).unwrap();
        assert_eq!(bindings.len(), 2);
        assert_eq!(bindings[0].1.ty, Type::func(Type::Int, Type::Bool));
        assert_eq!(bindings[1].1.ty, Type::func(Type::Int, Type::Bool));
    }
}
