//! Evaluator for the lowered core AST.
//!
//! No patterns exist at this level; destructuring happens through the
//! projection builtins (`list_len`, `get_head`, `get_tail`, `tuple_get`)
//! that the elimination pass compiled in.

use std::cell::RefCell;
use std::rc::Rc;

use crate::ast::expression::Const;
use crate::core::{CoreBinding, CoreExpr, CoreStructure};

use super::value::{CoreClosure, Env, Value};
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

/// `"()"` slots evaluate for effect only and the empty name (rejected
/// by inference upstream) binds nothing.
fn extend(mut env: Env, name: &str, value: Value) -> Env {
    if name != "()" && !name.is_empty() {
        env.insert(name.to_string(), value);
    }
    env
}

impl Interpreter {
    /// Evaluate a lowered structure binding by binding.
    pub fn run_core_structure(&mut self, structure: &CoreStructure) -> Result<(), RuntimeError> {
        let mut env = Self::initial_env();
        for binding in structure {
            env = self.eval_core_binding(env, binding)?;
        }
        Ok(())
    }

    fn eval_core_binding(
        &mut self,
        env: Env,
        binding: &CoreBinding,
    ) -> Result<Env, RuntimeError> {
        match binding {
            CoreBinding::Nonrec(name, value) => {
                let evaluated = self.eval_core(&env, value)?;
                Ok(extend(env, name, evaluated))
            }
            CoreBinding::Rec(decls) => {
                let mut values = Vec::with_capacity(decls.len());
                for (_, value) in decls {
                    values.push(self.eval_core(&env, value)?);
                }

                let mut group = Vec::new();
                let mut new_env = env;
                for ((name, _), value) in decls.iter().zip(values.iter()) {
                    if !name.is_empty() && name != "()" {
                        group.push((name.clone(), value.clone()));
                        new_env.insert(name.clone(), value.clone());
                    }
                }

                for value in &values {
                    if let Value::CoreClosure(closure, _) = value {
                        let mut patched = closure.env.borrow().clone();
                        for (name, group_value) in &group {
                            patched.insert(name.clone(), group_value.clone());
                        }
                        *closure.env.borrow_mut() = patched;
                    }
                }

                Ok(new_env)
            }
        }
    }

    pub(crate) fn eval_core(&mut self, env: &Env, expr: &CoreExpr) -> Result<Value, RuntimeError> {
        match expr {
            CoreExpr::Const(constant) => Ok(const_value(constant)),

            CoreExpr::Var(name) => env
                .get(name)
                .cloned()
                .ok_or_else(|| RuntimeError::Unbound(name.clone())),

            CoreExpr::Apply(func, arg) => {
                // Guard chains rely on `&&` short-circuiting: the length
                // check must protect the projections to its right.
                if let CoreExpr::Apply(inner, left) = &**func {
                    if matches!(&**inner, CoreExpr::Var(op) if op == "&&") {
                        if !self.eval_core(env, left)?.as_bool()? {
                            return Ok(Value::Bool(false));
                        }
                        return Ok(Value::Bool(self.eval_core(env, arg)?.as_bool()?));
                    }
                }
                let func_value = self.eval_core(env, func)?;
                let arg_value = self.eval_core(env, arg)?;
                self.apply_value(func_value, arg_value)
            }

            CoreExpr::If(cond, then_branch, else_branch) => {
                if self.eval_core(env, cond)?.as_bool()? {
                    self.eval_core(env, then_branch)
                } else {
                    self.eval_core(env, else_branch)
                }
            }

            CoreExpr::Tuple(elements) => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval_core(env, element)?);
                }
                Ok(Value::Tuple(values))
            }

            CoreExpr::Cons(head, tail) => {
                let head_value = self.eval_core(env, head)?;
                let tail_value = self.eval_core(env, tail)?;
                let mut items = vec![head_value];
                items.extend(tail_value.as_list()?.iter().cloned());
                Ok(Value::List(items))
            }

            CoreExpr::Fun(params, body) => Ok(Value::CoreClosure(
                Rc::new(CoreClosure {
                    params: params.clone(),
                    body: (**body).clone(),
                    env: RefCell::new(env.clone()),
                }),
                Vec::new(),
            )),

            CoreExpr::Let(binding, body) => {
                let body_env = self.eval_core_binding(env.clone(), binding)?;
                self.eval_core(&body_env, body)
            }
        }
    }

    pub(crate) fn apply_core_closure(
        &mut self,
        closure: &CoreClosure,
        args: Vec<Value>,
    ) -> Result<Value, RuntimeError> {
        let mut env = closure.env.borrow().clone();
        for (param, value) in closure.params.iter().zip(args) {
            if param == "()" {
                if !matches!(value, Value::Unit) {
                    return Err(RuntimeError::WrongType("unit argument"));
                }
            } else if !param.is_empty() {
                env.insert(param.clone(), value);
            }
        }
        self.eval_core(&env, &closure.body)
    }
}
