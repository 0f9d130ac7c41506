//! Grammar productions for the surface language.

mod expression;
mod literal;
mod pattern;
mod statement;
mod types;

pub use expression::expression;
pub use pattern::pattern;
pub use statement::str_item;
pub use types::type_expr;

use crate::ast::Structure;
use crate::parser::combinators::{expect_double_semi, optional};
use crate::parser::state::{ParseError, ParseState, Parser};

/// Parse a whole module: structure items, optionally separated by `;;`.
pub fn parse(state: &mut ParseState) -> Result<Structure, ParseError> {
    let mut items = Vec::new();
    while state.has_next() {
        match str_item().parse(state) {
            Ok(item) => items.push(item),
            Err(err) => {
                // The deepest failure is the one worth reporting
                state.record_error(err);
                return Err(state
                    .furthest_error()
                    .cloned()
                    .expect("an error was just recorded"));
            }
        }
        let _ = optional(expect_double_semi()).parse(state);
    }
    Ok(items)
}
