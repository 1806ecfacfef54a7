//! Solving systems of non-linear equations with Newton's method.

use crate::{
    algebra::{
        eval::{self, Context},
        parse::{self, Token},
        registry::OperatorRegistry,
    },
    config::Config,
    linear::gauss,
    result::{AlgebraicError, EngineError},
};
use nalgebra::{DMatrix as Matrix, DVector as Vector};

/// The names given to the unknowns, in the same order as the initial guess.
pub const UNKNOWNS: [&str; 6] = ["x", "y", "z", "a", "b", "c"];

/// Solve a square system of (possibly non-linear) equations, starting from
/// `initial_guess`.
///
/// Each equation is either an expression which should equal zero or a
/// `lhs = rhs` pair. The `i`'th unknown is called `UNKNOWNS[i]`, and any other
/// names are resolved using `ctx`.
///
/// If the residuals haven't dropped below [`Config::newton_tolerance`] after
/// [`Config::newton_max_iterations`] steps, the latest estimate is returned.
pub fn solve_nonlinear<C>(
    equations: &[&str],
    initial_guess: &[f64],
    registry: &OperatorRegistry,
    config: &Config,
    ctx: &C,
) -> Result<Vector<f64>, EngineError>
where
    C: Context + ?Sized,
{
    if equations.is_empty()
        || equations.len() != initial_guess.len()
        || initial_guess.len() > UNKNOWNS.len()
    {
        log::debug!(
            "Can't solve {} equations with {} initial values",
            equations.len(),
            initial_guess.len()
        );
        return Err(AlgebraicError::ArgumentMismatch.into());
    }

    let residuals = Residuals::compile(equations, registry)?;
    solve_with_newtons_method(&residuals, initial_guess, config, ctx)
}

/// Newton's method for a set of equations, `F`, iterates
///
/// ```text
///  x_next = x_current - jacobian(F).inverse() * F(x_current)
/// ```
///
/// Calculating the inverse of a matrix is expensive, so each step is
/// rearranged as
///
/// ```text
/// jacobian(F) * (x_next - x_current) = -F(x_current)
/// ```
///
/// ... Which is in the form `A.δx = b` and can be handed to the Gauss-Jordan
/// solver.
///
/// See also:
///
/// - https://en.wikipedia.org/wiki/Newton%27s_method#Nonlinear_systems_of_equations
fn solve_with_newtons_method<C>(
    residuals: &Residuals<'_>,
    initial_guess: &[f64],
    config: &Config,
    ctx: &C,
) -> Result<Vector<f64>, EngineError>
where
    C: Context + ?Sized,
{
    let mut solution = Vector::from_column_slice(initial_guess);

    for iteration in 0..config.newton_max_iterations {
        let f_of_x = residuals.evaluate(solution.as_slice(), ctx)?;

        if f_of_x.norm() < config.newton_tolerance {
            log::debug!("Converged after {} iterations", iteration);
            return Ok(solution);
        }

        let jacobian = residuals.jacobian(
            solution.as_slice(),
            &f_of_x,
            config.newton_step,
            ctx,
        )?;
        let x_next = step_newtons_method(
            &jacobian,
            &solution,
            f_of_x,
            config.singularity_tolerance,
        )?;

        if approx::relative_eq!(x_next, solution) {
            return Ok(x_next);
        }
        solution = x_next;
    }

    log::debug!(
        "Gave up after {} iterations, returning {}",
        config.newton_max_iterations,
        solution.transpose()
    );

    Ok(solution)
}

fn step_newtons_method(
    jacobian: &Matrix<f64>,
    x: &Vector<f64>,
    f_of_x: Vector<f64>,
    tolerance: f64,
) -> Result<Vector<f64>, EngineError> {
    let negative_f_of_x = -f_of_x;
    let delta_x = gauss::gauss_jordan(jacobian, &negative_f_of_x, tolerance)?;

    Ok(delta_x + x)
}

/// The compiled residual, `lhs - rhs`, of each equation.
#[derive(Debug)]
struct Residuals<'r> {
    postfix: Vec<Vec<Token>>,
    registry: &'r OperatorRegistry,
}

impl<'r> Residuals<'r> {
    fn compile(
        equations: &[&str],
        registry: &'r OperatorRegistry,
    ) -> Result<Self, AlgebraicError> {
        let postfix = equations
            .iter()
            .map(|equation| parse::to_postfix(&residual(equation), registry))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Residuals { postfix, registry })
    }

    fn len(&self) -> usize { self.postfix.len() }

    fn evaluate<C>(
        &self,
        values: &[f64],
        ctx: &C,
    ) -> Result<Vector<f64>, AlgebraicError>
    where
        C: Context + ?Sized,
    {
        let unknowns = Unknowns { values, outer: ctx };
        let mut f_of_x = Vector::zeros(self.len());

        for (i, postfix) in self.postfix.iter().enumerate() {
            f_of_x[i] =
                eval::evaluate_postfix(postfix, self.registry, &unknowns)?;
        }

        Ok(f_of_x)
    }

    /// Approximate the jacobian using forward differences.
    fn jacobian<C>(
        &self,
        values: &[f64],
        f_of_x: &Vector<f64>,
        step: f64,
        ctx: &C,
    ) -> Result<Matrix<f64>, AlgebraicError>
    where
        C: Context + ?Sized,
    {
        let n = values.len();
        let mut jacobian = Matrix::zeros(self.len(), n);
        let mut nudged = values.to_vec();

        for column in 0..n {
            nudged[column] += step;
            let f_of_nudged = self.evaluate(&nudged, ctx)?;
            nudged[column] = values[column];

            jacobian.set_column(column, &((f_of_nudged - f_of_x) / step));
        }

        Ok(jacobian)
    }
}

/// Turn `lhs = rhs` into `(lhs) - (rhs)`.
fn residual(equation: &str) -> String {
    match equation.find('=') {
        Some(equals) => format!(
            "({}) - ({})",
            &equation[..equals],
            &equation[equals + 1..]
        ),
        None => equation.to_string(),
    }
}

/// Binds the unknowns to their current values, deferring everything else to
/// the caller's [`Context`].
struct Unknowns<'a, C: ?Sized> {
    values: &'a [f64],
    outer: &'a C,
}

impl<'a, C: Context + ?Sized> Context for Unknowns<'a, C> {
    fn lookup(&self, name: &str) -> Option<f64> {
        UNKNOWNS
            .iter()
            .zip(self.values)
            .find(|(unknown, _)| **unknown == name)
            .map(|(_, value)| *value)
            .or_else(|| self.outer.lookup(name))
    }
}
