use crate::{
    algebra::{
        eval::{self, Context},
        parse,
        registry::OperatorRegistry,
    },
    config::Config,
    linear::strip_command,
    result::{AlgebraicError, EngineError, EngineResult, Value},
    solve,
};
use nalgebra::DVector;

/// Evaluates infix expressions like `3 + 5 * sqrt(16)`.
///
/// Each engine owns its own [`OperatorRegistry`], so operators registered
/// through [`AlgebraicEngine::registry()`] are only visible to this engine.
#[derive(Debug)]
pub struct AlgebraicEngine {
    registry: OperatorRegistry,
    config: Config,
}

impl AlgebraicEngine {
    pub fn new() -> Self { AlgebraicEngine::with_config(Config::default()) }

    pub fn with_config(config: Config) -> Self {
        AlgebraicEngine {
            registry: OperatorRegistry::with_builtins(&config),
            config,
        }
    }

    pub fn registry(&self) -> &OperatorRegistry { &self.registry }

    pub fn config(&self) -> &Config { &self.config }

    /// Evaluate an expression, resolving any variables using `ctx`.
    pub fn evaluate<C>(&self, text: &str, ctx: &C) -> Result<f64, EngineError>
    where
        C: Context + ?Sized,
    {
        log::debug!("Evaluating {:?}", text);

        let postfix = parse::to_postfix(text, &self.registry)?;
        let value = eval::evaluate_postfix(&postfix, &self.registry, ctx)?;
        Ok(value)
    }

    /// Run one of the algebraic commands (`quadratic a b c` or
    /// `solve_nl {...} [...]`), falling back to
    /// [`AlgebraicEngine::evaluate()`] for anything else.
    pub fn execute<C>(&self, text: &str, ctx: &C) -> EngineResult
    where
        C: Context + ?Sized,
    {
        if let Some(args) = strip_command(text, "quadratic") {
            log::debug!("Solving the quadratic with coefficients {:?}", args);
            let (a, b, c) = quadratic_coefficients(args)?;
            return Ok(Value::Vector(solve_quadratic(a, b, c)?));
        }

        if let Some(args) = strip_command(text, "solve_nl") {
            log::debug!("Solving the non-linear system {:?}", args);
            let (equations, guess) = split_nonlinear_system(args)?;
            let solution = solve::solve_nonlinear(
                &equations,
                &guess,
                &self.registry,
                &self.config,
                ctx,
            )?;
            return Ok(Value::Vector(solution));
        }

        self.evaluate(text, ctx).map(Value::Scalar)
    }
}

impl Default for AlgebraicEngine {
    fn default() -> Self { AlgebraicEngine::new() }
}

/// Find the real roots of `ax² + bx + c`, with `(-b + √d) / 2a` first.
pub fn solve_quadratic(
    a: f64,
    b: f64,
    c: f64,
) -> Result<DVector<f64>, AlgebraicError> {
    if a == 0.0 {
        return Err(AlgebraicError::IndeterminateResult);
    }

    let discriminant = b * b - 4.0 * a * c;

    if discriminant < 0.0 {
        return Err(AlgebraicError::NegativeRoot);
    }

    let root = discriminant.sqrt();

    Ok(DVector::from_vec(vec![
        (-b + root) / (2.0 * a),
        (-b - root) / (2.0 * a),
    ]))
}

fn quadratic_coefficients(
    args: &str,
) -> Result<(f64, f64, f64), AlgebraicError> {
    let coefficients = args
        .split_whitespace()
        .map(parse::parse_number)
        .collect::<Option<Vec<f64>>>()
        .ok_or(AlgebraicError::ArgumentMismatch)?;

    match *coefficients {
        [a, b, c] => Ok((a, b, c)),
        _ => Err(AlgebraicError::ArgumentMismatch),
    }
}

/// Pull apart `{f1 = g1; f2 = g2} [x0, y0]`.
fn split_nonlinear_system(
    args: &str,
) -> Result<(Vec<&str>, Vec<f64>), AlgebraicError> {
    let (equations, rest) = delimited(args, '{', '}')?;
    let (guess, _) = delimited(rest, '[', ']')?;

    let equations = equations
        .split(';')
        .map(str::trim)
        .filter(|equation| !equation.is_empty())
        .collect();

    let guess = guess
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| {
            parse::parse_number(value).ok_or(AlgebraicError::ArgumentMismatch)
        })
        .collect::<Result<Vec<f64>, _>>()?;

    Ok((equations, guess))
}

/// Get the text between `open` and the following `close`, and whatever comes
/// after it.
fn delimited(
    src: &str,
    open: char,
    close: char,
) -> Result<(&str, &str), AlgebraicError> {
    let start = src.find(open).ok_or(AlgebraicError::ArgumentMismatch)?;
    let inner = &src[start + open.len_utf8()..];
    let end = inner.find(close).ok_or(AlgebraicError::ArgumentMismatch)?;

    Ok((&inner[..end], &inner[end + close.len_utf8()..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        algebra::{builtins, registry::Precedence},
        config::AngleUnit,
    };
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    macro_rules! evaluate_test {
        ($name:ident, $src:expr, Err($err:expr)) => {
            #[test]
            fn $name() {
                let engine = AlgebraicEngine::new();

                let got = engine.evaluate($src, &());

                assert_eq!(got, Err(EngineError::Algebraic($err)));
            }
        };
        ($name:ident, $src:expr, $should_be:expr) => {
            #[test]
            fn $name() {
                let engine = AlgebraicEngine::new();

                let got = engine.evaluate($src, &()).unwrap();

                assert_relative_eq!(got, $should_be, epsilon = 1e-9);
            }
        };
    }

    evaluate_test!(precedence, "3 + 5 * 2", 13.0);
    evaluate_test!(square_root, "sqrt(16)", 4.0);
    evaluate_test!(sine_in_degrees, "sin(90)", 1.0);
    evaluate_test!(power_is_right_associative, "2^3^2", 512.0);
    evaluate_test!(parentheses, "(3 + 5) * 2", 16.0);
    evaluate_test!(no_spaces_needed, "2*(3+4)-1", 13.0);
    evaluate_test!(nested_functions, "sqrt(ln(exp(16))) + 1", 5.0);
    evaluate_test!(subtraction_is_left_associative, "10 - 4 - 3", 3.0);
    evaluate_test!(division_is_left_associative, "64 / 4 / 2", 8.0);
    evaluate_test!(remainder, "17 % 5 + 1", 3.0);
    evaluate_test!(arcsecant, "arcsec(2)", 60.0);
    evaluate_test!(
        arcsecant_out_of_domain,
        "arcsec(0.5)",
        Err(AlgebraicError::DomainError)
    );
    evaluate_test!(
        divide_by_zero,
        "7 / 0",
        Err(AlgebraicError::DivideByZero)
    );
    evaluate_test!(
        zero_over_zero,
        "0 / 0",
        Err(AlgebraicError::IndeterminateResult)
    );
    evaluate_test!(leading_minus, "-3 + 1", -2.0);
    evaluate_test!(minus_after_an_operator, "2 * -3", -6.0);
    evaluate_test!(double_negation, "1 - -1", 2.0);
    evaluate_test!(negation_binds_tighter_than_power, "-2^2", 4.0);
    evaluate_test!(
        negative_root,
        "sqrt(-1)",
        Err(AlgebraicError::NegativeRoot)
    );
    evaluate_test!(
        unknown_function,
        "frobnicate(2)",
        Err(AlgebraicError::OperationNotFound)
    );
    evaluate_test!(
        unknown_variable,
        "x + 1",
        Err(AlgebraicError::OperationNotFound)
    );
    evaluate_test!(
        missing_operand,
        "3 +",
        Err(AlgebraicError::ArgumentMismatch)
    );
    evaluate_test!(
        too_many_operands,
        "3 4",
        Err(AlgebraicError::ArgumentMismatch)
    );
    evaluate_test!(
        unbalanced_parentheses,
        "(3 + 4",
        Err(AlgebraicError::ArgumentMismatch)
    );

    #[test]
    fn variables_come_from_the_context() {
        let engine = AlgebraicEngine::new();
        let mut ctx = HashMap::new();
        ctx.insert(String::from("Ans"), 13.0);

        let got = engine.evaluate("Ans * 2", &ctx).unwrap();

        assert_eq!(got, 26.0);
    }

    #[test]
    fn repeated_evaluation_is_deterministic() {
        let engine = AlgebraicEngine::new();
        let src = "sin(30) * 3^2 / (1 + cosh(0.5))";

        let first = engine.evaluate(src, &()).unwrap();

        for _ in 0..10 {
            assert_eq!(engine.evaluate(src, &()).unwrap(), first);
        }
    }

    #[test]
    fn custom_operators_are_picked_up() {
        let engine = AlgebraicEngine::new();
        engine.registry().register_operator(
            "<<",
            Precedence::MultiDiv,
            builtins::binary(|left, right| Ok(left * 2_f64.powf(right))),
        );
        engine
            .registry()
            .register_unary_operator("double", builtins::unary(|x| Ok(2.0 * x)));

        let got = engine.evaluate("1 + 3<<2 - double(4)", &()).unwrap();

        assert_eq!(got, 5.0);
    }

    #[test]
    fn registries_belong_to_their_engine() {
        let first = AlgebraicEngine::new();
        let second = AlgebraicEngine::new();
        first
            .registry()
            .register_unary_operator("triple", builtins::unary(|x| Ok(3.0 * x)));

        assert_eq!(first.evaluate("triple(2)", &()), Ok(6.0));
        assert_eq!(
            second.evaluate("triple(2)", &()),
            Err(EngineError::Algebraic(AlgebraicError::OperationNotFound))
        );
    }

    #[test]
    fn radians_can_be_configured() {
        let engine = AlgebraicEngine::with_config(
            Config::default().with_angle_unit(AngleUnit::Radians),
        );

        let got = engine.evaluate("cos(0) + sin(0)", &()).unwrap();

        assert_eq!(got, 1.0);
    }

    #[test]
    fn execute_wraps_scalars() {
        let engine = AlgebraicEngine::new();

        let got = engine.execute("3 + 5 * 2", &()).unwrap();

        assert_eq!(got, Value::Scalar(13.0));
    }

    #[test]
    fn quadratic_roots() {
        let engine = AlgebraicEngine::new();

        let got = engine.execute("quadratic 1 -3 2", &()).unwrap();

        assert_eq!(got, Value::Vector(DVector::from_vec(vec![2.0, 1.0])));
    }

    #[test]
    fn quadratic_failures() {
        let engine = AlgebraicEngine::new();
        let inputs = vec![
            ("quadratic 0 2 1", AlgebraicError::IndeterminateResult),
            ("quadratic 1 0 1", AlgebraicError::NegativeRoot),
            ("quadratic 1 2", AlgebraicError::ArgumentMismatch),
            ("quadratic 1 2 x", AlgebraicError::ArgumentMismatch),
            ("quadratic", AlgebraicError::ArgumentMismatch),
        ];

        for (src, should_be) in inputs {
            let got = engine.execute(src, &());
            assert_eq!(got, Err(EngineError::Algebraic(should_be)), "{}", src);
        }
    }

    #[test]
    fn repeated_quadratic_root() {
        let got = solve_quadratic(1.0, -4.0, 4.0).unwrap();

        assert_eq!(got, DVector::from_vec(vec![2.0, 2.0]));
    }

    #[test]
    fn nonlinear_system() {
        let engine = AlgebraicEngine::new();

        let got = engine
            .execute("solve_nl {x + y = 10; x - y = 2} [1, 1]", &())
            .unwrap();

        let solution = got.as_vector().unwrap();
        assert_relative_eq!(solution[0], 6.0, epsilon = 1e-3);
        assert_relative_eq!(solution[1], 4.0, epsilon = 1e-3);
    }

    #[test]
    fn nonlinear_system_needs_braces_and_a_guess() {
        let engine = AlgebraicEngine::new();
        let inputs = vec![
            "solve_nl x + y = 10; x - y = 2 [1, 1]",
            "solve_nl {x + y = 10; x - y = 2}",
            "solve_nl {x = 1} [one]",
            "solve_nl {x = 1; y = 2} [1]",
        ];

        for src in inputs {
            let got = engine.execute(src, &());
            assert_eq!(
                got,
                Err(EngineError::Algebraic(AlgebraicError::ArgumentMismatch)),
                "{}",
                src
            );
        }
    }

    #[test]
    fn split_up_a_nonlinear_system() {
        let (equations, guess) =
            split_nonlinear_system("{ x^2 = 4 ; y = x; } [ 1, -2.5 ]").unwrap();

        assert_eq!(equations, vec!["x^2 = 4", "y = x"]);
        assert_eq!(guess, vec![1.0, -2.5]);
    }
}
