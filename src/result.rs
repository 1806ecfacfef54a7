//! The result and error types shared by both engines.

use nalgebra::{DMatrix, DVector};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Anything a successful evaluation can produce.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Vector(DVector<f64>),
    Matrix(DMatrix<f64>),
}

impl Value {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Value::Scalar(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&DVector<f64>> {
        match self {
            Value::Vector(vector) => Some(vector),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&DMatrix<f64>> {
        match self {
            Value::Matrix(matrix) => Some(matrix),
            _ => None,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self { Value::Scalar(value) }
}

impl From<DVector<f64>> for Value {
    fn from(vector: DVector<f64>) -> Self { Value::Vector(vector) }
}

impl From<DMatrix<f64>> for Value {
    fn from(matrix: DMatrix<f64>) -> Self { Value::Matrix(matrix) }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Scalar(value) => write!(f, "{}", value),
            Value::Vector(vector) => write_row(f, vector.iter()),
            Value::Matrix(matrix) => {
                write!(f, "[")?;

                for (i, row) in matrix.row_iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_row(f, row.iter())?;
                }

                write!(f, "]")
            },
        }
    }
}

fn write_row<'a, I>(f: &mut Formatter<'_>, items: I) -> fmt::Result
where
    I: Iterator<Item = &'a f64>,
{
    write!(f, "[")?;

    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }

    write!(f, "]")
}

/// Failures raised while evaluating an algebraic expression.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Error)]
pub enum AlgebraicError {
    #[error("division by zero")]
    DivideByZero,
    #[error("the result is indeterminate")]
    IndeterminateResult,
    #[error("square root of a negative number")]
    NegativeRoot,
    #[error("argument is outside the function's domain")]
    DomainError,
    #[error("operator or function received the wrong number of arguments")]
    ArgumentMismatch,
    #[error("unknown operator, function or variable")]
    OperationNotFound,
}

/// Failures raised while parsing or solving a linear system.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Error)]
pub enum LinearError {
    #[error("the system has no unique solution")]
    NoSolution,
    #[error("the matrix dimensions don't match")]
    MatrixMismatch,
    #[error("unable to parse the input")]
    ParseError,
}

/// The error half of an [`EngineResult`], tagged with the engine that
/// produced it.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Error)]
pub enum EngineError {
    #[error("{0}")]
    Algebraic(#[from] AlgebraicError),
    #[error("{0}")]
    Linear(#[from] LinearError),
}

pub type EngineResult = Result<Value, EngineError>;
