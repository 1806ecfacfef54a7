//! An expression evaluator and linear system solver.
//!
//! There are two engines:
//!
//! - The [`AlgebraicEngine`] evaluates infix expressions like
//!   `3 + 5 * sqrt(16)` using an [`OperatorRegistry`] which can be extended
//!   with new operators and functions at runtime
//! - The [`LinearSystemEngine`] solves systems of linear equations like
//!   `2x + y = 5; x - y = 1` using either Gauss-Jordan elimination or
//!   Cramer's Rule
//!
//! The [`Engine`] type wraps both of them up as a calculator session, and
//! remembers the previous answer as `Ans`.

#[cfg(test)]
#[macro_use]
extern crate pretty_assertions;

pub mod algebra;
pub mod config;
mod engine;
pub mod linear;
mod result;
pub mod solve;

pub use algebra::{AlgebraicEngine, Context, OperatorRegistry, Precedence};
pub use config::{AngleUnit, Config};
pub use engine::{Engine, Mode, ANSWER};
pub use linear::LinearSystemEngine;
pub use result::{AlgebraicError, EngineError, EngineResult, LinearError, Value};
