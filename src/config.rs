//! Knobs shared by the algebraic and linear engines.

use std::f64::consts::FRAC_PI_2;

/// How trigonometric functions interpret their arguments (and how inverse
/// trigonometric functions report their results).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AngleUnit {
    Degrees,
    Radians,
}

impl AngleUnit {
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleUnit::Degrees => angle.to_radians(),
            AngleUnit::Radians => angle,
        }
    }

    pub fn from_radians(self, angle: f64) -> f64 {
        match self {
            AngleUnit::Degrees => angle.to_degrees(),
            AngleUnit::Radians => angle,
        }
    }

    /// A right angle, expressed in this unit.
    pub fn quarter_turn(self) -> f64 { self.from_radians(FRAC_PI_2) }
}

impl Default for AngleUnit {
    fn default() -> Self { AngleUnit::Degrees }
}

/// Engine-wide configuration.
///
/// The defaults reproduce the classic calculator behaviour: degrees, a `1e-9`
/// cut-off for singular pivots and vanishing trigonometric denominators, 100
/// rounds of QR iteration and 50 Newton steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub angle_unit: AngleUnit,
    /// Pivots and determinants with a smaller magnitude are treated as zero.
    pub singularity_tolerance: f64,
    /// `cot`, `sec`, `csc`, `coth` and `csch` fail when their denominator is
    /// smaller than this.
    pub trig_tolerance: f64,
    pub max_qr_iterations: usize,
    pub newton_max_iterations: usize,
    /// The forward-difference step used to approximate the jacobian.
    pub newton_step: f64,
    /// Newton's method stops once the residual norm drops below this.
    pub newton_tolerance: f64,
}

impl Config {
    pub fn new() -> Self { Config::default() }

    pub fn with_angle_unit(mut self, angle_unit: AngleUnit) -> Self {
        self.angle_unit = angle_unit;
        self
    }

    pub fn with_singularity_tolerance(mut self, tolerance: f64) -> Self {
        self.singularity_tolerance = tolerance;
        self
    }

    pub fn with_trig_tolerance(mut self, tolerance: f64) -> Self {
        self.trig_tolerance = tolerance;
        self
    }

    pub fn with_max_qr_iterations(mut self, iterations: usize) -> Self {
        self.max_qr_iterations = iterations;
        self
    }

    pub fn with_newton_max_iterations(mut self, iterations: usize) -> Self {
        self.newton_max_iterations = iterations;
        self
    }

    pub fn with_newton_step(mut self, step: f64) -> Self {
        self.newton_step = step;
        self
    }

    pub fn with_newton_tolerance(mut self, tolerance: f64) -> Self {
        self.newton_tolerance = tolerance;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            angle_unit: AngleUnit::default(),
            singularity_tolerance: 1e-9,
            trig_tolerance: 1e-9,
            max_qr_iterations: 100,
            newton_max_iterations: 50,
            newton_step: 1e-5,
            newton_tolerance: 1e-6,
        }
    }
}
