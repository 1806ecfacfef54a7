//! Evaluating infix expressions.
//!
//! Expressions are tokenized, converted to postfix order with the
//! shunting-yard algorithm, then run on a value stack. Every operator and
//! function is looked up in an [`OperatorRegistry`], which can be extended at
//! runtime.

pub mod builtins;
mod engine;
pub mod eval;
pub mod parse;
pub mod registry;

pub use engine::{solve_quadratic, AlgebraicEngine};
pub use eval::{evaluate_postfix, Context};
pub use parse::{to_postfix, tokenize, Token};
pub use registry::{
    Arity, Operation, OperatorEntry, OperatorRegistry, Precedence,
};
