//! Evaluator for the surface AST, with full pattern matching.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::expression::{Binding, Const, Expr};
use crate::ast::pattern::Pattern;
use crate::ast::{RecFlag, StrItem, Structure};

use super::value::{Closure, Env, Value};
use super::{Interpreter, RuntimeError};

fn const_value(constant: &Const) -> Value {
    match constant {
        Const::Int(value) => Value::Int(*value),
        Const::Bool(value) => Value::Bool(*value),
        Const::String(value) => Value::String(value.clone()),
        Const::Unit => Value::Unit,
        Const::Nil => Value::List(Vec::new()),
    }
}

/// Try to match `value` against `pat`; on success return the variable
/// bindings the pattern produces, in left-to-right order.
pub(crate) fn match_pattern(pat: &Pattern, value: &Value) -> Option<Vec<(String, Value)>> {
    match (pat, value) {
        (Pattern::Any(_), _) => Some(Vec::new()),

        (Pattern::Var(ident), _) => Some(vec![(ident.value.clone(), value.clone())]),

        (Pattern::Const(Const::Int(expected), _), Value::Int(actual)) => {
            (expected == actual).then(Vec::new)
        }
        (Pattern::Const(Const::Bool(expected), _), Value::Bool(actual)) => {
            (expected == actual).then(Vec::new)
        }
        (Pattern::Const(Const::String(expected), _), Value::String(actual)) => {
            (expected == actual).then(Vec::new)
        }
        (Pattern::Const(Const::Unit, _), Value::Unit) => Some(Vec::new()),
        (Pattern::Const(Const::Nil, _), Value::List(items)) => items.is_empty().then(Vec::new),

        (Pattern::Cons(head, tail), Value::List(items)) => {
            let (first, rest) = items.split_first()?;
            let mut bound = match_pattern(head, first)?;
            bound.extend(match_pattern(tail, &Value::List(rest.to_vec()))?);
            Some(bound)
        }

        (Pattern::Tuple(pats), Value::Tuple(items)) if pats.len() == items.len() => {
            let mut bound = Vec::new();
            for (sub_pat, item) in pats.iter().zip(items.iter()) {
                bound.extend(match_pattern(sub_pat, item)?);
            }
            Some(bound)
        }

        (Pattern::Annotated(inner, _), _) => match_pattern(inner, value),

        _ => None,
    }
}

/// Destructure `value` through `pat` into `env`, failing if the pattern
/// does not match.
fn bind_pattern(env: Env, pat: &Pattern, value: Value) -> Result<Env, RuntimeError> {
    let bound = match_pattern(pat, &value).ok_or(RuntimeError::MatchFailure)?;
    let mut env = env;
    for (name, bound_value) in bound {
        env.insert(name, bound_value);
    }
    Ok(env)
}

impl Interpreter {
    /// Evaluate a surface structure item by item.
    pub fn run_structure(&mut self, structure: &Structure) -> Result<(), RuntimeError> {
        let mut env = Self::initial_env();
        for item in structure {
            env = self.eval_str_item(env, item)?;
        }
        Ok(())
    }

    fn eval_str_item(&mut self, env: Env, item: &StrItem) -> Result<Env, RuntimeError> {
        match item {
            StrItem::Eval(expr) => {
                self.eval_expr(&env, expr)?;
                Ok(env)
            }
            StrItem::Value(RecFlag::Nonrecursive, bindings) => {
                let mut env = env;
                for binding in bindings {
                    let value = self.eval_expr(&env, &binding.value)?;
                    env = bind_pattern(env, &binding.pattern, value)?;
                }
                Ok(env)
            }
            StrItem::Value(RecFlag::Recursive, bindings) => self.eval_rec_group(env, bindings),
        }
    }

    /// Evaluate a recursive group: values are evaluated in the outer
    /// environment, entered together, then every closure's captured
    /// environment is extended with the group so calls can recurse.
    pub(crate) fn eval_rec_group(
        &mut self,
        env: Env,
        bindings: &[Binding],
    ) -> Result<Env, RuntimeError> {
        let mut values = Vec::with_capacity(bindings.len());
        for binding in bindings {
            values.push(self.eval_expr(&env, &binding.value)?);
        }

        let mut group = Vec::new();
        let mut new_env = env;
        for (binding, value) in bindings.iter().zip(values.iter()) {
            if let Pattern::Var(ident) = binding.pattern.resolved() {
                group.push((ident.value.clone(), value.clone()));
                new_env.insert(ident.value.clone(), value.clone());
            }
        }

        for value in &values {
            if let Value::Closure(closure) = value {
                let mut patched = closure.env.borrow().clone();
                for (name, group_value) in &group {
                    patched.insert(name.clone(), group_value.clone());
                }
                *closure.env.borrow_mut() = patched;
            }
        }

        Ok(new_env)
    }

    pub(crate) fn eval_expr(&mut self, env: &Env, expr: &Expr) -> Result<Value, RuntimeError> {
        match expr {
            Expr::Const(constant, _) => Ok(const_value(constant)),

            Expr::Var(ident) => env
                .get(&ident.value)
                .cloned()
                .ok_or_else(|| RuntimeError::Unbound(ident.value.clone())),

            Expr::Apply(func, arg) => {
                // `&&` must not evaluate its right operand eagerly
                if let Expr::Apply(inner, left) = &**func {
                    if matches!(&**inner, Expr::Var(op) if op.value == "&&") {
                        if !self.eval_expr(env, left)?.as_bool()? {
                            return Ok(Value::Bool(false));
                        }
                        return Ok(Value::Bool(self.eval_expr(env, arg)?.as_bool()?));
                    }
                }
                let func_value = self.eval_expr(env, func)?;
                let arg_value = self.eval_expr(env, arg)?;
                self.apply_value(func_value, arg_value)
            }

            Expr::If(cond, then_branch, else_branch) => {
                if self.eval_expr(env, cond)?.as_bool()? {
                    self.eval_expr(env, then_branch)
                } else {
                    self.eval_expr(env, else_branch)
                }
            }

            Expr::Fun(param, body) => Ok(Value::Closure(Rc::new(Closure {
                param: param.clone(),
                body: (**body).clone(),
                env: RefCell::new(env.clone()),
            }))),

            Expr::Tuple(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval_expr(env, element)?);
                }
                Ok(Value::Tuple(values))
            }

            Expr::Cons(head, tail) => {
                let head_value = self.eval_expr(env, head)?;
                let tail_value = self.eval_expr(env, tail)?;
                let mut items = vec![head_value];
                items.extend(tail_value.as_list()?.iter().cloned());
                Ok(Value::List(items))
            }

            Expr::Match(scrutinee, cases) => {
                let value = self.eval_expr(env, scrutinee)?;
                for (pat, body) in cases {
                    if let Some(bound) = match_pattern(pat, &value) {
                        let mut case_env = env.clone();
                        for (name, bound_value) in bound {
                            case_env.insert(name, bound_value);
                        }
                        return self.eval_expr(&case_env, body);
                    }
                }
                Err(RuntimeError::MatchFailure)
            }

            Expr::Let(let_expr) => match let_expr.rec {
                RecFlag::Nonrecursive => {
                    let mut body_env = env.clone();
                    for binding in &let_expr.bindings {
                        let value = self.eval_expr(&body_env, &binding.value)?;
                        body_env = bind_pattern(body_env, &binding.pattern, value)?;
                    }
                    self.eval_expr(&body_env, &let_expr.body)
                }
                RecFlag::Recursive => {
                    let body_env = self.eval_rec_group(env.clone(), &let_expr.bindings)?;
                    self.eval_expr(&body_env, &let_expr.body)
                }
            },

            Expr::Annotated(inner, _) => self.eval_expr(env, inner),
        }
    }

    pub(crate) fn apply_closure(
        &mut self,
        closure: &Closure,
        arg: Value,
    ) -> Result<Value, RuntimeError> {
        let bound = match_pattern(&closure.param, &arg).ok_or(RuntimeError::MatchFailure)?;
        let mut env = closure.env.borrow().clone();
        for (name, value) in bound {
            env.insert(name, value);
        }
        self.eval_expr(&env, &closure.body)
    }
}
