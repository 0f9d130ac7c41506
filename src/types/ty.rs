//! # Core Type System Definitions
//!
//! Foundational types for Hindley-Milner inference: types, type
//! variables, and type schemes.
//!
//! ## Overview
//!
//! - **Type** - concrete and polymorphic types (`int`, `bool`, `string`,
//!   `unit`, lists, tuples, variables, arrows)
//! - **TypeVar** - type variable for polymorphism (e.g. `'a`)
//! - **TypeScheme** - polymorphic type with quantified variables
//!   (e.g. `forall 'a. 'a -> 'a`)
//!
//! ## Type Schemes
//!
//! Type schemes represent polymorphism by quantifying type variables:
//!
//! ```text
//! Identity function type:
//! TypeScheme {
//!     vars: [TypeVar { id: 0 }],
//!     ty: Func(Var(0), Var(0))  // 'a -> 'a
//! }
//!
//! // When used, we instantiate with fresh vars:
//! // Instance 1: 't5 -> 't5
//! // Instance 2: 't6 -> 't6
//! ```
//!
//! ## Related Modules
//!
//! - [`crate::types::infer`] - Type inference using these types
//! - [`crate::types::env`] - Type environment storing type schemes
//! - [`crate::types::subst`] - Substitutions over type variables

use std::collections::HashSet;
use std::fmt;

use super::subst::Substitution;

/// Type variable for polymorphism.
///
/// Each type variable is uniquely identified by an integer id. Variables
/// originating from source annotations additionally carry the annotation
/// name for pretty printing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeVar {
    pub id: usize,
    pub name: Option<String>,
}

impl TypeVar {
    pub fn new(id: usize) -> Self {
        Self { id, name: None }
    }

    pub fn with_name(id: usize, name: String) -> Self {
        Self {
            id,
            name: Some(name),
        }
    }
}

/// All possible types in marlin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Int,
    Bool,
    String,
    Unit,
    List(Box<Type>),
    /// Always holds at least two element types.
    Tuple(Vec<Type>),
    Var(TypeVar),
    Func(Box<Type>, Box<Type>),
}

impl Type {
    /// Create a function type `t1 -> t2`.
    pub fn func(t1: Type, t2: Type) -> Self {
        Type::Func(Box::new(t1), Box::new(t2))
    }

    /// Create a list type `elem list`.
    pub fn list(elem: Type) -> Self {
        Type::List(Box::new(elem))
    }

    pub fn var(id: usize) -> Self {
        Type::Var(TypeVar::new(id))
    }

    /// Get the set of free type variables in this type.
    ///
    /// At the level of a bare type every variable is free; quantification
    /// only happens in [`TypeScheme`].
    pub fn free_type_vars(&self) -> HashSet<TypeVar> {
        match self {
            Type::Int | Type::Bool | Type::String | Type::Unit => HashSet::new(),
            Type::Var(v) => {
                let mut set = HashSet::new();
                set.insert(v.clone());
                set
            }
            Type::List(elem_ty) => elem_ty.free_type_vars(),
            Type::Tuple(elems) => elems
                .iter()
                .flat_map(Type::free_type_vars)
                .collect(),
            Type::Func(t1, t2) => {
                let mut set = t1.free_type_vars();
                set.extend(t2.free_type_vars());
                set
            }
        }
    }

    /// Render this type in source syntax.
    ///
    /// Arrows are right-associative, tuple elements are joined by ` * `
    /// and list types are suffixed with ` list`:
    ///
    /// ```text
    /// Func(Int, Func(Int, Int)).pretty()        // "int -> int -> int"
    /// Func(Func(Int, Int), Bool).pretty()       // "(int -> int) -> bool"
    /// Tuple([Int, Bool]).pretty()               // "int * bool"
    /// List(Tuple([Int, Int])).pretty()          // "(int * int) list"
    /// ```
    pub fn pretty(&self) -> String {
        match self {
            Type::Int => "int".to_string(),
            Type::Bool => "bool".to_string(),
            Type::String => "string".to_string(),
            Type::Unit => "unit".to_string(),
            Type::Var(v) => match &v.name {
                Some(name) => format!("'{}", name),
                None => format!("'t{}", v.id),
            },
            Type::List(elem_ty) => {
                let elem = if matches!(**elem_ty, Type::Func(_, _) | Type::Tuple(_)) {
                    format!("({})", elem_ty.pretty())
                } else {
                    elem_ty.pretty()
                };
                format!("{} list", elem)
            }
            Type::Tuple(elems) => elems
                .iter()
                .map(|t| {
                    if matches!(t, Type::Func(_, _) | Type::Tuple(_)) {
                        format!("({})", t.pretty())
                    } else {
                        t.pretty()
                    }
                })
                .collect::<Vec<_>>()
                .join(" * "),
            Type::Func(t1, t2) => {
                let domain = if matches!(**t1, Type::Func(_, _)) {
                    format!("({})", t1.pretty())
                } else {
                    t1.pretty()
                };
                format!("{} -> {}", domain, t2.pretty())
            }
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.pretty())
    }
}

/// Polymorphic type scheme `forall vars. ty`.
///
/// The quantified variables are instantiated with fresh type variables at
/// every use site; variables not in `vars` are free and tie the scheme to
/// its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeScheme {
    pub vars: Vec<TypeVar>,
    pub ty: Type,
}

impl TypeScheme {
    /// A scheme with no quantified variables.
    pub fn monomorphic(ty: Type) -> Self {
        TypeScheme {
            vars: Vec::new(),
            ty,
        }
    }

    pub fn polymorphic(vars: Vec<TypeVar>, ty: Type) -> Self {
        TypeScheme { vars, ty }
    }

    /// Free type variables of the scheme: `free(ty) \ vars`.
    pub fn free_type_vars(&self) -> HashSet<TypeVar> {
        let mut free = self.ty.free_type_vars();
        for var in &self.vars {
            free.remove(var);
        }
        free
    }

    /// Apply a substitution underneath the quantifiers.
    ///
    /// The substitution is first restricted by removing the quantified
    /// variables, which keeps the application capture-avoiding.
    pub fn apply_subst(&self, subst: &Substitution) -> TypeScheme {
        let restricted = self
            .vars
            .iter()
            .fold(subst.clone(), |acc, var| acc.remove(var));
        TypeScheme {
            vars: self.vars.clone(),
            ty: restricted.apply(&self.ty),
        }
    }
}
