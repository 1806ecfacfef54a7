use crate::{
    algebra::{AlgebraicEngine, Context, OperatorRegistry},
    config::Config,
    linear::LinearSystemEngine,
    result::{EngineResult, Value},
};

/// Which engine [`Engine::evaluate()`] hands its input to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Mode {
    Algebraic,
    LinearSystem,
}

impl Default for Mode {
    fn default() -> Self { Mode::Algebraic }
}

/// The name the previous scalar answer is available under.
pub const ANSWER: &str = "Ans";

/// A calculator session.
///
/// # Examples
///
/// ```rust
/// use reckoner::{Engine, Mode, Value};
///
/// let mut engine = Engine::new();
///
/// assert_eq!(engine.evaluate("3 + 5 * 2"), Ok(Value::Scalar(13.0)));
/// assert_eq!(engine.evaluate("Ans / 2"), Ok(Value::Scalar(6.5)));
///
/// engine.set_mode(Mode::LinearSystem);
/// let solution = engine.evaluate("2x + y = 5; x - y = 1").unwrap();
/// assert_eq!(solution.to_string(), "[2, 1]");
/// ```
#[derive(Debug, Default)]
pub struct Engine {
    mode: Mode,
    algebraic: AlgebraicEngine,
    linear: LinearSystemEngine,
    last_answer: Option<f64>,
}

impl Engine {
    pub fn new() -> Self { Engine::default() }

    pub fn with_config(config: Config) -> Self {
        Engine {
            mode: Mode::default(),
            algebraic: AlgebraicEngine::with_config(config.clone()),
            linear: LinearSystemEngine::with_config(config),
            last_answer: None,
        }
    }

    pub fn mode(&self) -> Mode { self.mode }

    pub fn set_mode(&mut self, mode: Mode) {
        log::debug!("Switching to {:?} mode", mode);
        self.mode = mode;
    }

    /// The operators and functions available in algebraic mode.
    pub fn registry(&self) -> &OperatorRegistry { self.algebraic.registry() }

    /// The most recent scalar answer, if there is one.
    pub fn last_answer(&self) -> Option<f64> { self.last_answer }

    /// Evaluate some text using the current [`Mode`].
    ///
    /// In algebraic mode the previous scalar answer can be referred to as
    /// `Ans`.
    pub fn evaluate(&mut self, text: &str) -> EngineResult {
        self.evaluate_with_context(text, &())
    }

    /// Evaluate some text, resolving variables with `ctx` before falling back
    /// to `Ans`.
    pub fn evaluate_with_context<C>(
        &mut self,
        text: &str,
        ctx: &C,
    ) -> EngineResult
    where
        C: Context + ?Sized,
    {
        let result = match self.mode {
            Mode::Algebraic => {
                let ctx = WithAnswer {
                    inner: ctx,
                    answer: self.last_answer,
                };
                self.algebraic.execute(text, &ctx)
            },
            Mode::LinearSystem => self.linear.execute(text),
        };

        if let Ok(Value::Scalar(answer)) = result {
            self.last_answer = Some(answer);
        }

        result
    }
}

/// Makes the last answer available as [`ANSWER`].
struct WithAnswer<'a, C: ?Sized> {
    inner: &'a C,
    answer: Option<f64>,
}

impl<'a, C: Context + ?Sized> Context for WithAnswer<'a, C> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.inner.lookup(name).or_else(|| {
            if name == ANSWER {
                self.answer
            } else {
                None
            }
        })
    }
}
