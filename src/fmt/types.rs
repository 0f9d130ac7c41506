//! Rendering of inferred types as `val` lines.
//!
//! Type variables are renamed to letters in order of first appearance
//! (`'a`, `'b`, ..., `'z`, `'a1`, ...), so the output is independent of
//! the internal variable numbering a particular inference run produced.

use crate::types::ty::{Type, TypeScheme, TypeVar};

fn letter(index: usize) -> String {
    let ch = (b'a' + (index % 26) as u8) as char;
    if index < 26 {
        ch.to_string()
    } else {
        format!("{}{}", ch, index / 26)
    }
}

fn collect_vars(ty: &Type, order: &mut Vec<usize>) {
    match ty {
        Type::Int | Type::Bool | Type::String | Type::Unit => {}
        Type::Var(v) => {
            if !order.contains(&v.id) {
                order.push(v.id);
            }
        }
        Type::List(elem) => collect_vars(elem, order),
        Type::Tuple(elems) => elems.iter().for_each(|t| collect_vars(t, order)),
        Type::Func(t1, t2) => {
            collect_vars(t1, order);
            collect_vars(t2, order);
        }
    }
}

fn rename(ty: &Type, order: &[usize]) -> Type {
    match ty {
        Type::Int | Type::Bool | Type::String | Type::Unit => ty.clone(),
        Type::Var(v) => {
            let index = order
                .iter()
                .position(|id| *id == v.id)
                .expect("every variable was collected");
            Type::Var(TypeVar::with_name(index, letter(index)))
        }
        Type::List(elem) => Type::list(rename(elem, order)),
        Type::Tuple(elems) => Type::Tuple(elems.iter().map(|t| rename(t, order)).collect()),
        Type::Func(t1, t2) => Type::func(rename(t1, order), rename(t2, order)),
    }
}

/// Render a scheme's type with deterministically lettered variables.
pub fn pretty_scheme(scheme: &TypeScheme) -> String {
    let mut order = Vec::new();
    collect_vars(&scheme.ty, &mut order);
    rename(&scheme.ty, &order).pretty()
}

/// The `val <name> : <type>` summary of an inferred module.
pub fn val_bindings(bindings: &[(String, TypeScheme)]) -> String {
    let mut out = String::new();
    for (name, scheme) in bindings {
        out.push_str(&format!("val {} : {}\n", name, pretty_scheme(scheme)));
    }
    out
}
