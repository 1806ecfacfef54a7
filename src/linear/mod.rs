//! Parsing and solving systems of linear equations.
//!
//! Systems are written as `;`-separated equations (`2x + y = 5; x - y = 1`)
//! and solved either with Gauss-Jordan elimination or with Cramer's Rule.
//! Matrix literals (`[1, 2; 3, 4]`) feed the QR and eigenvalue commands.

pub mod cramer;
mod engine;
pub mod equations;
pub mod gauss;
pub mod matrix;
pub mod qr;

pub use cramer::{cramers_rule, determinant};
pub use engine::LinearSystemEngine;
pub(crate) use engine::strip_command;
pub use equations::{parse_system, System};
pub use gauss::gauss_jordan;
pub use matrix::parse_matrix;
pub use qr::{eigenvalues, gram_schmidt};
