use crate::{
    config::Config,
    linear::{cramer, equations, gauss, matrix, qr},
    result::{EngineResult, LinearError, Value},
};
use nalgebra::DVector;

/// Solves systems of linear equations and runs the matrix commands.
///
/// | Input                  | Result                                   |
/// | ---------------------- | ---------------------------------------- |
/// | `2x + y = 5; x - y = 1` | solved with Gauss-Jordan elimination    |
/// | `cramer <system>`      | solved with Cramer's Rule                |
/// | `qr <matrix>`          | the `Q` factor of a QR decomposition     |
/// | `ortho <matrix>`       | an orthonormal basis (same as `qr`)      |
/// | `eigen <matrix>`       | eigenvalue estimates from QR iteration   |
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearSystemEngine {
    config: Config,
}

impl LinearSystemEngine {
    pub fn new() -> Self { LinearSystemEngine::default() }

    pub fn with_config(config: Config) -> Self { LinearSystemEngine { config } }

    pub fn config(&self) -> &Config { &self.config }

    /// Solve a system of linear equations, using Cramer's Rule when the text
    /// starts with `cramer` and Gauss-Jordan elimination otherwise.
    pub fn solve(&self, text: &str) -> EngineResult {
        let solution = match strip_command(text, "cramer") {
            Some(system) => self.solve_with_cramers_rule(system)?,
            None => self.solve_with_gauss_jordan(text)?,
        };

        Ok(Value::Vector(solution))
    }

    /// Run a command, falling back to [`LinearSystemEngine::solve()`] when
    /// the text doesn't start with a known command.
    pub fn execute(&self, text: &str) -> EngineResult {
        let tolerance = self.config.singularity_tolerance;

        if let Some(src) = strip_command(text, "qr")
            .or_else(|| strip_command(text, "ortho"))
        {
            log::debug!("Orthonormalising {:?}", src);
            let m = matrix::parse_matrix(src)?;
            let (q, _r) = qr::gram_schmidt(&m, tolerance)?;
            return Ok(Value::Matrix(q));
        }

        if let Some(src) = strip_command(text, "eigen") {
            log::debug!("Estimating eigenvalues of {:?}", src);
            let m = matrix::parse_matrix(src)?;
            let eigenvalues = qr::eigenvalues(
                &m,
                self.config.max_qr_iterations,
                tolerance,
            )?;
            return Ok(Value::Vector(eigenvalues));
        }

        self.solve(text)
    }

    fn solve_with_gauss_jordan(
        &self,
        text: &str,
    ) -> Result<DVector<f64>, LinearError> {
        log::debug!("Solving {:?} with Gauss-Jordan elimination", text);
        let system = equations::parse_system(text)?;
        gauss::gauss_jordan(
            &system.coefficients,
            &system.constants,
            self.config.singularity_tolerance,
        )
    }

    fn solve_with_cramers_rule(
        &self,
        text: &str,
    ) -> Result<DVector<f64>, LinearError> {
        log::debug!("Solving {:?} with Cramer's Rule", text);
        let system = equations::parse_system(text)?;
        cramer::cramers_rule(
            &system.coefficients,
            &system.constants,
            self.config.singularity_tolerance,
        )
    }
}

/// If `text` starts with the word `command`, get the text that follows it.
pub(crate) fn strip_command<'a>(
    text: &'a str,
    command: &str,
) -> Option<&'a str> {
    let rest = text.trim_start().strip_prefix(command)?;

    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => None,
        _ => Some(rest.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::EngineError;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;

    fn vector(value: Value) -> DVector<f64> {
        match value {
            Value::Vector(v) => v,
            other => panic!("Expected a vector, found {:?}", other),
        }
    }

    #[test]
    fn gauss_jordan_by_default() {
        let engine = LinearSystemEngine::new();

        let got = vector(engine.solve("2x + y = 5; x - y = 1").unwrap());

        assert_relative_eq!(got, DVector::from_vec(vec![2.0, 1.0]), epsilon = 1e-9);
    }

    #[test]
    fn three_unknowns() {
        let engine = LinearSystemEngine::new();

        let got = vector(
            engine
                .solve("x + y + z = 6; 2y + 5z = -4; 2x + 5y - z = 27")
                .unwrap(),
        );

        assert_relative_eq!(
            got,
            DVector::from_vec(vec![5.0, 3.0, -2.0]),
            epsilon = 1e-9
        );
    }

    #[test]
    fn cramer_prefix_uses_cramers_rule() {
        let engine = LinearSystemEngine::new();

        let got = vector(engine.solve("cramer x + y = 3; x - y = 1").unwrap());

        assert_relative_eq!(got, DVector::from_vec(vec![2.0, 1.0]), epsilon = 1e-9);
    }

    #[test]
    fn singular_systems() {
        let engine = LinearSystemEngine::new();

        for src in &["x + y = 2; 2x + 2y = 4", "cramer x + y = 2; 2x + 2y = 4"] {
            let got = engine.solve(src);
            assert_eq!(got, Err(EngineError::Linear(LinearError::NoSolution)));
        }
    }

    #[test]
    fn too_many_unknowns() {
        let engine = LinearSystemEngine::new();

        let got = engine.solve("x + y = 1");

        assert_eq!(got, Err(EngineError::Linear(LinearError::ParseError)));
    }

    #[test]
    fn commands_need_a_word_boundary() {
        assert_eq!(strip_command("cramer x = 1", "cramer"), Some("x = 1"));
        assert_eq!(strip_command("  qr [1, 2]", "qr"), Some("[1, 2]"));
        assert_eq!(strip_command("qr[1, 2]", "qr"), Some("[1, 2]"));
        assert_eq!(strip_command("eigen", "eigen"), Some(""));
        assert_eq!(strip_command("cramers x = 1", "cramer"), None);
        assert_eq!(strip_command("x = 1", "cramer"), None);
    }

    #[test]
    fn orthonormal_basis() {
        let engine = LinearSystemEngine::new();

        let got = engine.execute("qr [[3, 1], [4, 2]]").unwrap();

        let q = match got {
            Value::Matrix(q) => q,
            other => panic!("Expected a matrix, found {:?}", other),
        };
        assert_relative_eq!(
            q.column(0).into_owned(),
            DVector::from_vec(vec![0.6, 0.8]),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            q.transpose() * &q,
            DMatrix::identity(2, 2),
            epsilon = 1e-12
        );
        assert_eq!(engine.execute("ortho [[3, 1], [4, 2]]"), Ok(Value::Matrix(q)));
    }

    #[test]
    fn orthonormalising_a_wide_matrix() {
        let engine = LinearSystemEngine::new();

        let got = engine.execute("qr [1, 2, 3; 4, 5, 6]");

        assert_eq!(got, Err(EngineError::Linear(LinearError::MatrixMismatch)));
    }

    #[test]
    fn eigenvalues() {
        let engine = LinearSystemEngine::new();

        let got = vector(engine.execute("eigen [[2, 1], [1, 2]]").unwrap());

        assert_relative_eq!(got, DVector::from_vec(vec![3.0, 1.0]), epsilon = 1e-6);
    }

    #[test]
    fn eigenvalues_need_a_square_matrix() {
        let engine = LinearSystemEngine::new();

        let got = engine.execute("eigen [1, 2, 3; 4, 5, 6]");

        assert_eq!(got, Err(EngineError::Linear(LinearError::MatrixMismatch)));
    }

    #[test]
    fn bad_matrix_literals() {
        let engine = LinearSystemEngine::new();

        for src in &["eigen [1, 2; 3]", "eigen [2, x]", "qr [1, 2e3; 4, 5]"] {
            let got = engine.execute(src);

            assert_eq!(got, Err(EngineError::Linear(LinearError::ParseError)));
        }
    }

    #[test]
    fn execute_falls_back_to_solving() {
        let engine = LinearSystemEngine::new();

        let got = engine.execute("x = 4").unwrap();

        assert_eq!(got, Value::Vector(DVector::from_vec(vec![4.0])));
    }

    #[test]
    fn singularity_tolerance_is_configurable() {
        let engine = LinearSystemEngine::with_config(
            Config::default().with_singularity_tolerance(1.0),
        );

        let got = engine.solve("0.5x = 1");

        assert_eq!(got, Err(EngineError::Linear(LinearError::NoSolution)));
    }
}
