//! Pattern elimination - lower the surface AST to the core AST
//!
//! This pass rewrites every construct that binds through a pattern into
//! first-order operations: destructuring becomes explicit projection
//! calls, `match` becomes chains of conditionals, and `fun`/`let`
//! binders become plain names. The result is ready for A-normalization
//! and code generation.
//!
//! Fresh intermediate names use the prefix `a` (`a0`, `a1`, ...). They
//! are fresh with respect to the pass's own counter only; user programs
//! must not use identifiers of the form `a<digits>`.

pub mod case;

use crate::ast::expression::{Binding, Const, Expr};
use crate::ast::pattern::Pattern;
use crate::ast::{RecFlag, StrItem, Structure};
use crate::core::{CoreBinding, CoreExpr, CoreStructure};
use crate::fresh::Counter;

use case::{check_pat, combine_checks, create_case, fail_match, pat_decls};

pub struct Eliminator {
    counter: Counter,
}

impl Eliminator {
    pub fn new() -> Self {
        Eliminator {
            counter: Counter::new(),
        }
    }

    fn fresh_name(&mut self) -> String {
        format!("a{}", self.counter.fresh())
    }

    pub fn pe_expr(&mut self, expr: &Expr) -> CoreExpr {
        match expr {
            Expr::Const(constant, _) => CoreExpr::Const(constant.clone()),

            Expr::Var(ident) => CoreExpr::Var(ident.value.clone()),

            Expr::Apply(func, arg) => {
                CoreExpr::apply(self.pe_expr(func), self.pe_expr(arg))
            }

            Expr::If(cond, then_branch, else_branch) => CoreExpr::if_then(
                self.pe_expr(cond),
                self.pe_expr(then_branch),
                self.pe_expr(else_branch),
            ),

            Expr::Tuple(elements) => {
                CoreExpr::Tuple(elements.iter().map(|e| self.pe_expr(e)).collect())
            }

            Expr::Cons(head, tail) => {
                CoreExpr::Cons(Box::new(self.pe_expr(head)), Box::new(self.pe_expr(tail)))
            }

            Expr::Annotated(inner, _) => self.pe_expr(inner),

            Expr::Fun(_, _) => self.pe_fun(expr),

            Expr::Match(scrutinee, cases) => {
                let scrutinee = self.pe_expr(scrutinee);
                match scrutinee {
                    // A variable or constant can be re-used across the
                    // case guards without duplicating evaluation.
                    CoreExpr::Var(_) | CoreExpr::Const(_) => self.pe_match(&scrutinee, cases),
                    computed => {
                        let name = self.fresh_name();
                        let compiled = self.pe_match(&CoreExpr::var(name.clone()), cases);
                        CoreExpr::let_in(CoreExpr::nonrec(name, computed), compiled)
                    }
                }
            }

            Expr::Let(let_expr) => {
                let body = self.pe_expr(&let_expr.body);
                match let_expr.rec {
                    RecFlag::Nonrecursive => let_expr
                        .bindings
                        .iter()
                        .rev()
                        .fold(body, |acc, binding| self.pe_let_binding(binding, acc)),
                    RecFlag::Recursive => {
                        CoreExpr::let_in(self.pe_decl(&let_expr.bindings), body)
                    }
                }
            }
        }
    }

    /// Lower a contiguous chain of `fun` binders into one core function
    /// with a flat parameter list.
    ///
    /// Plain variables keep their name and unit patterns become the
    /// `"()"` slot; any other pattern gets a fresh parameter name and is
    /// destructured in the body. Several destructuring parameters are
    /// tupled up and matched in a single case.
    fn pe_fun(&mut self, expr: &Expr) -> CoreExpr {
        let mut params = Vec::new();
        let mut destructured: Vec<(String, Pattern)> = Vec::new();

        let mut current = expr;
        while let Expr::Fun(pat, fun_body) = current {
            match pat.resolved() {
                Pattern::Var(ident) => params.push(ident.value.clone()),
                Pattern::Const(Const::Unit, _) => params.push("()".to_string()),
                other => {
                    let name = self.fresh_name();
                    params.push(name.clone());
                    destructured.push((name, other.clone()));
                }
            }
            current = fun_body;
        }

        let body = self.pe_expr(current);
        let body = match destructured.len() {
            0 => body,
            1 => {
                let (name, pat) = destructured.into_iter().next().unwrap();
                create_case(&CoreExpr::var(name), &pat, body, fail_match())
            }
            _ => {
                let tuple_name = self.fresh_name();
                let scrutinee = CoreExpr::Tuple(
                    destructured
                        .iter()
                        .map(|(name, _)| CoreExpr::var(name.clone()))
                        .collect(),
                );
                let pats = destructured.into_iter().map(|(_, pat)| pat).collect();
                let case = create_case(
                    &CoreExpr::var(tuple_name.clone()),
                    &Pattern::Tuple(pats),
                    body,
                    fail_match(),
                );
                CoreExpr::let_in(CoreExpr::nonrec(tuple_name, scrutinee), case)
            }
        };

        CoreExpr::Fun(params, Box::new(body))
    }

    /// Compile match cases top to bottom against an already-atomic
    /// scrutinee. An irrefutable case swallows the remaining cases; the
    /// terminal branch is the `fail_match` call.
    fn pe_match(&mut self, scrutinee: &CoreExpr, cases: &[(Pattern, Expr)]) -> CoreExpr {
        match cases.split_first() {
            None => fail_match(),
            Some(((pat, case_body), rest)) => {
                let body = self.pe_expr(case_body);
                if check_pat(scrutinee, pat, true).is_empty() {
                    // Irrefutable: later cases are unreachable
                    create_case(scrutinee, pat, body, fail_match())
                } else {
                    let otherwise = self.pe_match(scrutinee, rest);
                    create_case(scrutinee, pat, body, otherwise)
                }
            }
        }
    }

    /// Lower one non-recursive `let` binding around an already-lowered
    /// body.
    fn pe_let_binding(&mut self, binding: &Binding, body: CoreExpr) -> CoreExpr {
        match binding.pattern.resolved() {
            Pattern::Var(ident) => CoreExpr::let_in(
                CoreExpr::nonrec(ident.value.clone(), self.pe_expr(&binding.value)),
                body,
            ),
            Pattern::Const(Const::Unit, _) => CoreExpr::let_in(
                CoreExpr::nonrec("()", self.pe_expr(&binding.value)),
                body,
            ),
            pat => {
                let value = self.pe_expr(&binding.value);
                match value {
                    CoreExpr::Var(_) => create_case(&value, pat, body, fail_match()),
                    computed => {
                        let name = self.fresh_name();
                        let case =
                            create_case(&CoreExpr::var(name.clone()), pat, body, fail_match());
                        CoreExpr::let_in(CoreExpr::nonrec(name, computed), case)
                    }
                }
            }
        }
    }

    /// Lower a recursive binding group.
    ///
    /// A non-variable recursive binder has no name to give; it gets the
    /// empty string. Inference rejects such programs, so the pipeline
    /// never produces one here.
    fn pe_decl(&mut self, bindings: &[Binding]) -> CoreBinding {
        CoreBinding::Rec(
            bindings
                .iter()
                .map(|binding| {
                    let name = match binding.pattern.resolved() {
                        Pattern::Var(ident) => ident.value.clone(),
                        _ => String::new(),
                    };
                    (name, self.pe_expr(&binding.value))
                })
                .collect(),
        )
    }

    /// Lower one top-level structure item into a run of core bindings.
    pub fn pe_str_item(&mut self, item: &StrItem) -> Vec<CoreBinding> {
        match item {
            StrItem::Eval(expr) => {
                vec![CoreBinding::Nonrec("()".to_string(), Box::new(self.pe_expr(expr)))]
            }

            StrItem::Value(RecFlag::Recursive, bindings) => vec![self.pe_decl(bindings)],

            StrItem::Value(RecFlag::Nonrecursive, bindings) => {
                let mut out = Vec::new();
                for binding in bindings {
                    match binding.pattern.resolved() {
                        Pattern::Var(ident) => out.push(CoreBinding::Nonrec(
                            ident.value.clone(),
                            Box::new(self.pe_expr(&binding.value)),
                        )),
                        Pattern::Const(Const::Unit, _) => out.push(CoreBinding::Nonrec(
                            "()".to_string(),
                            Box::new(self.pe_expr(&binding.value)),
                        )),
                        pat => {
                            // Bind the value once, guard it, then emit
                            // one projection binding per variable.
                            let name = self.fresh_name();
                            out.push(CoreBinding::Nonrec(
                                name.clone(),
                                Box::new(self.pe_expr(&binding.value)),
                            ));
                            let scrutinee = CoreExpr::var(name);
                            if let Some(cond) =
                                combine_checks(check_pat(&scrutinee, pat, true))
                            {
                                out.push(CoreBinding::Nonrec(
                                    "()".to_string(),
                                    Box::new(CoreExpr::if_then(
                                        cond,
                                        CoreExpr::Const(Const::Unit),
                                        fail_match(),
                                    )),
                                ));
                            }
                            for (var_name, projection) in pat_decls(&scrutinee, pat) {
                                out.push(CoreBinding::Nonrec(var_name, Box::new(projection)));
                            }
                        }
                    }
                }
                out
            }
        }
    }
}

impl Default for Eliminator {
    fn default() -> Self {
        Self::new()
    }
}

/// Lower a whole module.
pub fn eliminate_structure(structure: &Structure) -> CoreStructure {
    let mut eliminator = Eliminator::new();
    structure
        .iter()
        .flat_map(|item| eliminator.pe_str_item(item))
        .collect()
}
