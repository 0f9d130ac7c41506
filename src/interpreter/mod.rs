//! Tree-walking interpreters for the surface and the core AST.
//!
//! Two evaluators share one value representation and one builtin
//! environment: [`run_program`] evaluates the surface tree (with full
//! pattern matching), [`run_lowered`] evaluates the eliminated core tree
//! (no patterns, but the projection primitives). A well-typed program
//! and its lowered form produce identical output.

mod core_eval;
mod eval;
mod value;

pub use value::{Builtin, Closure, CoreClosure, Env, Value};

use std::fmt;
use std::fmt::Write;

use crate::ast::Structure;
use crate::core::CoreStructure;
use crate::desugar::case;
use value::{values_compare, values_equal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    Unbound(String),
    NotAFunction,
    WrongType(&'static str),
    DivisionByZero,
    MatchFailure,
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RuntimeError::Unbound(name) => write!(f, "undefined identifier: {}", name),
            RuntimeError::NotAFunction => write!(f, "cannot apply a non-function value"),
            RuntimeError::WrongType(expected) => write!(f, "expected a {}", expected),
            RuntimeError::DivisionByZero => write!(f, "division by zero"),
            RuntimeError::MatchFailure => write!(f, "match failure"),
        }
    }
}

impl std::error::Error for RuntimeError {}

/// Evaluator state: only the captured output of `print_int`.
pub struct Interpreter {
    output: String,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            output: String::new(),
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// The runtime environment both evaluators start from: operators,
    /// `print_int`, and the projection primitives the lowered code calls.
    pub fn initial_env() -> Env {
        let mut env = Env::new();
        let builtins = [
            ("+", Builtin::Add),
            ("-", Builtin::Sub),
            ("*", Builtin::Mul),
            ("/", Builtin::Div),
            ("=", Builtin::Eq),
            ("<>", Builtin::NotEq),
            ("<", Builtin::Lt),
            (">", Builtin::Gt),
            ("<=", Builtin::LtEq),
            (">=", Builtin::GtEq),
            ("&&", Builtin::And),
            ("print_int", Builtin::PrintInt),
            (case::LIST_LEN, Builtin::ListLen),
            (case::GET_HEAD, Builtin::GetHead),
            (case::GET_TAIL, Builtin::GetTail),
            (case::TUPLE_GET, Builtin::TupleGet),
            (case::FAIL_MATCH, Builtin::FailMatch),
        ];
        for (name, builtin) in builtins {
            env.insert(name.to_string(), Value::Builtin(builtin, Vec::new()));
        }
        env
    }

    /// Apply one argument to a function value, delegating to the
    /// matching evaluator once a closure is saturated.
    pub(crate) fn apply_value(&mut self, func: Value, arg: Value) -> Result<Value, RuntimeError> {
        match func {
            Value::Closure(closure) => self.apply_closure(&closure, arg),
            Value::CoreClosure(closure, mut applied) => {
                applied.push(arg);
                if applied.len() == closure.params.len() {
                    self.apply_core_closure(&closure, applied)
                } else {
                    Ok(Value::CoreClosure(closure, applied))
                }
            }
            Value::Builtin(builtin, mut applied) => {
                applied.push(arg);
                if applied.len() == builtin.arity() {
                    self.apply_builtin(builtin, applied)
                } else {
                    Ok(Value::Builtin(builtin, applied))
                }
            }
            _ => Err(RuntimeError::NotAFunction),
        }
    }

    fn apply_builtin(&mut self, builtin: Builtin, args: Vec<Value>) -> Result<Value, RuntimeError> {
        use std::cmp::Ordering;
        match builtin {
            Builtin::Add => Ok(Value::Int(args[0].as_int()? + args[1].as_int()?)),
            Builtin::Sub => Ok(Value::Int(args[0].as_int()? - args[1].as_int()?)),
            Builtin::Mul => Ok(Value::Int(args[0].as_int()? * args[1].as_int()?)),
            Builtin::Div => {
                let divisor = args[1].as_int()?;
                if divisor == 0 {
                    return Err(RuntimeError::DivisionByZero);
                }
                Ok(Value::Int(args[0].as_int()? / divisor))
            }

            Builtin::Eq => Ok(Value::Bool(values_equal(&args[0], &args[1])?)),
            Builtin::NotEq => Ok(Value::Bool(!values_equal(&args[0], &args[1])?)),
            Builtin::Lt => Ok(Value::Bool(
                values_compare(&args[0], &args[1])? == Ordering::Less,
            )),
            Builtin::Gt => Ok(Value::Bool(
                values_compare(&args[0], &args[1])? == Ordering::Greater,
            )),
            Builtin::LtEq => Ok(Value::Bool(
                values_compare(&args[0], &args[1])? != Ordering::Greater,
            )),
            Builtin::GtEq => Ok(Value::Bool(
                values_compare(&args[0], &args[1])? != Ordering::Less,
            )),

            // Strict fallback; applications of the `&&` variable are
            // short-circuited by the evaluators before getting here.
            Builtin::And => Ok(Value::Bool(args[0].as_bool()? && args[1].as_bool()?)),

            Builtin::PrintInt => {
                let value = args[0].as_int()?;
                writeln!(self.output, "{}", value).expect("writing to a string cannot fail");
                Ok(Value::Unit)
            }

            Builtin::ListLen => Ok(Value::Int(args[0].as_list()?.len() as i64)),
            Builtin::GetHead => args[0]
                .as_list()?
                .first()
                .cloned()
                .ok_or(RuntimeError::MatchFailure),
            Builtin::GetTail => {
                let items = args[0].as_list()?;
                if items.is_empty() {
                    return Err(RuntimeError::MatchFailure);
                }
                Ok(Value::List(items[1..].to_vec()))
            }
            Builtin::TupleGet => {
                let index = args[0].as_int()?;
                match &args[1] {
                    Value::Tuple(items) => items
                        .get(index as usize)
                        .cloned()
                        .ok_or(RuntimeError::MatchFailure),
                    _ => Err(RuntimeError::WrongType("tuple")),
                }
            }

            Builtin::FailMatch => Err(RuntimeError::MatchFailure),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluate a surface structure and return its captured output.
pub fn run_program(structure: &Structure) -> Result<String, RuntimeError> {
    let mut interpreter = Interpreter::new();
    interpreter.run_structure(structure)?;
    Ok(interpreter.output)
}

/// Evaluate a lowered structure and return its captured output.
pub fn run_lowered(structure: &CoreStructure) -> Result<String, RuntimeError> {
    let mut interpreter = Interpreter::new();
    interpreter.run_core_structure(structure)?;
    Ok(interpreter.output)
}
