//! Evaluating postfix token sequences.

use crate::{
    algebra::{
        parse::Token,
        registry::{Arity, OperatorRegistry},
    },
    result::AlgebraicError,
};
use arrayvec::ArrayVec;
use smol_str::SmolStr;
use std::{
    collections::{BTreeMap, HashMap},
    hash::BuildHasher,
};

/// Contextual information used when evaluating an expression, namely the
/// values of any named variables.
pub trait Context {
    fn lookup(&self, name: &str) -> Option<f64>;
}

/// No variables.
impl Context for () {
    fn lookup(&self, _name: &str) -> Option<f64> { None }
}

impl<'a, C: Context + ?Sized> Context for &'a C {
    fn lookup(&self, name: &str) -> Option<f64> { (**self).lookup(name) }
}

impl<S: BuildHasher> Context for HashMap<String, f64, S> {
    fn lookup(&self, name: &str) -> Option<f64> { self.get(name).copied() }
}

impl<S: BuildHasher> Context for HashMap<SmolStr, f64, S> {
    fn lookup(&self, name: &str) -> Option<f64> { self.get(name).copied() }
}

impl Context for BTreeMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> { self.get(name).copied() }
}

impl<'a> Context for [(&'a str, f64)] {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, value)| *value)
    }
}

/// Run a postfix token sequence on a value stack.
///
/// Operands are popped right-to-left, so for `a b -` the first pop is `b`.
/// The first failing operator aborts the evaluation, and a well-formed
/// sequence leaves exactly one value on the stack.
pub fn evaluate_postfix<C>(
    postfix: &[Token],
    registry: &OperatorRegistry,
    ctx: &C,
) -> Result<f64, AlgebraicError>
where
    C: Context + ?Sized,
{
    let mut stack: Vec<f64> = Vec::with_capacity(postfix.len());

    for token in postfix {
        let value = match token {
            Token::Number(number) => *number,
            Token::Identifier(name) => ctx.lookup(name).ok_or_else(|| {
                log::debug!("\"{}\" isn't a known variable", name);
                AlgebraicError::OperationNotFound
            })?,
            Token::Operator(symbol) => {
                let operands = pop_operands::<2>(&mut stack)?;
                registry.dispatch(symbol, Arity::Binary, &operands)?
            },
            Token::Function(symbol) => {
                let operands = pop_operands::<1>(&mut stack)?;
                registry.dispatch(symbol, Arity::Unary, &operands)?
            },
            // the shunting-yard algorithm never emits parentheses
            Token::OpenParen | Token::CloseParen => {
                return Err(AlgebraicError::ArgumentMismatch)
            },
        };

        stack.push(value);
    }

    match stack.as_slice() {
        [answer] => Ok(*answer),
        _ => Err(AlgebraicError::ArgumentMismatch),
    }
}

/// Pop `N` operands, returning them in left-to-right order.
fn pop_operands<const N: usize>(
    stack: &mut Vec<f64>,
) -> Result<ArrayVec<f64, N>, AlgebraicError> {
    if stack.len() < N {
        return Err(AlgebraicError::ArgumentMismatch);
    }

    Ok(stack.drain(stack.len() - N..).collect())
}
