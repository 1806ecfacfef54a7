//! The operators and functions every [`OperatorRegistry`] starts with.

use crate::{
    algebra::registry::{OperatorRegistry, Precedence},
    config::Config,
    result::AlgebraicError,
};

/// Adapt a two-operand function so it can be stored in an
/// [`OperatorRegistry`].
pub fn binary<F>(
    op: F,
) -> impl Fn(&[f64]) -> Result<f64, AlgebraicError> + Send + Sync + 'static
where
    F: Fn(f64, f64) -> Result<f64, AlgebraicError> + Send + Sync + 'static,
{
    move |args: &[f64]| match *args {
        [left, right] => op(left, right),
        _ => Err(AlgebraicError::ArgumentMismatch),
    }
}

/// Adapt a one-operand function so it can be stored in an
/// [`OperatorRegistry`].
pub fn unary<F>(
    op: F,
) -> impl Fn(&[f64]) -> Result<f64, AlgebraicError> + Send + Sync + 'static
where
    F: Fn(f64) -> Result<f64, AlgebraicError> + Send + Sync + 'static,
{
    move |args: &[f64]| match *args {
        [operand] => op(operand),
        _ => Err(AlgebraicError::ArgumentMismatch),
    }
}

pub(crate) fn register(registry: &OperatorRegistry, config: &Config) {
    register_arithmetic(registry);
    register_roots_and_logarithms(registry);
    register_trigonometry(registry, config);
    register_hyperbolic(registry, config);
}

fn register_arithmetic(registry: &OperatorRegistry) {
    registry.register_operator(
        "+",
        Precedence::AddSub,
        binary(|left, right| Ok(left + right)),
    );
    registry.register_operator(
        "-",
        Precedence::AddSub,
        binary(|left, right| Ok(left - right)),
    );
    registry.register_operator(
        "*",
        Precedence::MultiDiv,
        binary(|left, right| Ok(left * right)),
    );
    registry.register_operator(
        "/",
        Precedence::MultiDiv,
        binary(|left, right| {
            check_divisor(left, right)?;
            Ok(left / right)
        }),
    );
    registry.register_operator(
        "%",
        Precedence::MOD,
        binary(|left, right| {
            check_divisor(left, right)?;
            // truncated remainder, same sign as the dividend
            Ok(left % right)
        }),
    );
    registry.register_operator(
        "^",
        Precedence::Pow,
        binary(|base, exponent| {
            if base == 0.0 && exponent == 0.0 {
                Err(AlgebraicError::IndeterminateResult)
            } else if base == 0.0 && exponent < 0.0 {
                Err(AlgebraicError::DivideByZero)
            } else {
                Ok(base.powf(exponent))
            }
        }),
    );

    // sign prefixes, e.g. "sqrt(-1)" or "2 * -3"
    registry.register_unary_operator("-", unary(|x| Ok(-x)));
    registry.register_unary_operator("+", unary(|x| Ok(x)));
}

fn check_divisor(dividend: f64, divisor: f64) -> Result<(), AlgebraicError> {
    match (dividend == 0.0, divisor == 0.0) {
        (true, true) => Err(AlgebraicError::IndeterminateResult),
        (false, true) => Err(AlgebraicError::DivideByZero),
        _ => Ok(()),
    }
}

fn register_roots_and_logarithms(registry: &OperatorRegistry) {
    registry.register_unary_operator(
        "sqrt",
        unary(|x| {
            if x < 0.0 {
                Err(AlgebraicError::NegativeRoot)
            } else {
                Ok(x.sqrt())
            }
        }),
    );
    registry.register_unary_operator("exp", unary(|x| Ok(x.exp())));
    registry
        .register_unary_operator("log", unary(|x| positive(x).map(f64::log10)));
    registry
        .register_unary_operator("lg", unary(|x| positive(x).map(f64::log2)));
    registry.register_unary_operator("ln", unary(|x| positive(x).map(f64::ln)));
}

fn positive(x: f64) -> Result<f64, AlgebraicError> {
    if x > 0.0 {
        Ok(x)
    } else {
        Err(AlgebraicError::DomainError)
    }
}

/// `1/x`, unless `x` is too close to zero to divide by.
fn reciprocal(x: f64, tolerance: f64) -> Result<f64, AlgebraicError> {
    if x.abs() < tolerance {
        Err(AlgebraicError::DivideByZero)
    } else {
        Ok(1.0 / x)
    }
}

fn within_unit_interval(x: f64) -> Result<f64, AlgebraicError> {
    if x.abs() <= 1.0 {
        Ok(x)
    } else {
        Err(AlgebraicError::DomainError)
    }
}

fn outside_unit_interval(x: f64) -> Result<f64, AlgebraicError> {
    if x.abs() >= 1.0 {
        Ok(x)
    } else {
        Err(AlgebraicError::DomainError)
    }
}

fn register_trigonometry(registry: &OperatorRegistry, config: &Config) {
    let unit = config.angle_unit;
    let tolerance = config.trig_tolerance;

    registry.register_unary_operator(
        "sin",
        unary(move |x| Ok(unit.to_radians(x).sin())),
    );
    registry.register_unary_operator(
        "cos",
        unary(move |x| Ok(unit.to_radians(x).cos())),
    );
    registry.register_unary_operator(
        "tan",
        unary(move |x| Ok(unit.to_radians(x).tan())),
    );
    registry.register_unary_operator(
        "cot",
        unary(move |x| reciprocal(unit.to_radians(x).tan(), tolerance)),
    );
    registry.register_unary_operator(
        "sec",
        unary(move |x| reciprocal(unit.to_radians(x).cos(), tolerance)),
    );
    registry.register_unary_operator(
        "csc",
        unary(move |x| reciprocal(unit.to_radians(x).sin(), tolerance)),
    );

    registry.register_unary_operator(
        "arcsin",
        unary(move |x| {
            within_unit_interval(x).map(|x| unit.from_radians(x.asin()))
        }),
    );
    registry.register_unary_operator(
        "arccos",
        unary(move |x| {
            within_unit_interval(x).map(|x| unit.from_radians(x.acos()))
        }),
    );
    registry.register_unary_operator(
        "arctan",
        unary(move |x| Ok(unit.from_radians(x.atan()))),
    );
    registry.register_unary_operator(
        "arccot",
        unary(move |x| {
            if x == 0.0 {
                Ok(unit.quarter_turn())
            } else {
                Ok(unit.from_radians((1.0 / x).atan()))
            }
        }),
    );
    registry.register_unary_operator(
        "arcsec",
        unary(move |x| {
            outside_unit_interval(x)
                .map(|x| unit.from_radians((1.0 / x).acos()))
        }),
    );
    registry.register_unary_operator(
        "arccsc",
        unary(move |x| {
            outside_unit_interval(x)
                .map(|x| unit.from_radians((1.0 / x).asin()))
        }),
    );
}

fn register_hyperbolic(registry: &OperatorRegistry, config: &Config) {
    let tolerance = config.trig_tolerance;

    registry.register_unary_operator("sinh", unary(|x| Ok(x.sinh())));
    registry.register_unary_operator("cosh", unary(|x| Ok(x.cosh())));
    registry.register_unary_operator("tanh", unary(|x| Ok(x.tanh())));
    registry.register_unary_operator(
        "coth",
        unary(move |x| reciprocal(x.tanh(), tolerance)),
    );
    registry.register_unary_operator(
        "sech",
        unary(move |x| reciprocal(x.cosh(), tolerance)),
    );
    registry.register_unary_operator(
        "csch",
        unary(move |x| reciprocal(x.sinh(), tolerance)),
    );

    registry.register_unary_operator("arcsinh", unary(|x| Ok(x.asinh())));
    registry.register_unary_operator(
        "arccosh",
        unary(|x| {
            if x >= 1.0 {
                Ok(x.acosh())
            } else {
                Err(AlgebraicError::DomainError)
            }
        }),
    );
    registry.register_unary_operator(
        "arctanh",
        unary(|x| {
            if x.abs() < 1.0 {
                Ok(x.atanh())
            } else {
                Err(AlgebraicError::DomainError)
            }
        }),
    );
    registry.register_unary_operator(
        "arccoth",
        unary(|x| {
            if x.abs() > 1.0 {
                Ok(0.5 * ((x + 1.0) / (x - 1.0)).ln())
            } else {
                Err(AlgebraicError::DomainError)
            }
        }),
    );
    registry.register_unary_operator(
        "arcsech",
        unary(|x| {
            if x > 0.0 && x <= 1.0 {
                Ok((1.0 / x).acosh())
            } else {
                Err(AlgebraicError::DomainError)
            }
        }),
    );
    registry.register_unary_operator(
        "arccsch",
        unary(|x| {
            if x == 0.0 {
                Err(AlgebraicError::DivideByZero)
            } else {
                Ok((1.0 / x).asinh())
            }
        }),
    );
}
