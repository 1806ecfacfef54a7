use crate::result::LinearError;
use nalgebra::{DMatrix, DVector};
use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

/// A square system of linear equations, `A·x = b`.
#[derive(Debug, Clone, PartialEq)]
pub struct System {
    /// The coefficient matrix, `A`.
    pub coefficients: DMatrix<f64>,
    /// The right-hand side, `b`.
    pub constants: DVector<f64>,
    /// The unknowns, in the order their columns appear in `A`.
    pub variables: Vec<char>,
}

impl System {
    pub fn len(&self) -> usize { self.variables.len() }

    pub fn is_empty(&self) -> bool { self.variables.is_empty() }
}

impl FromStr for System {
    type Err = LinearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> { parse_system(s) }
}

impl Display for System {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (row, constant) in self.constants.iter().enumerate() {
            if row > 0 {
                write!(f, "; ")?;
            }

            let mut first = true;

            for (column, variable) in self.variables.iter().enumerate() {
                let coefficient = self.coefficients[(row, column)];
                if coefficient == 0.0 {
                    continue;
                }

                match (first, coefficient < 0.0) {
                    (true, true) => write!(f, "-")?,
                    (true, false) => {},
                    (false, true) => write!(f, " - ")?,
                    (false, false) => write!(f, " + ")?,
                }

                if coefficient.abs() != 1.0 {
                    write!(f, "{}", coefficient.abs())?;
                }
                write!(f, "{}", variable)?;
                first = false;
            }

            if first {
                write!(f, "0")?;
            }

            write!(f, " = {}", constant)?;
        }

        Ok(())
    }
}

/// Parse a `;`-separated list of linear equations like `2x + y = 5; x - y = 1`.
///
/// Each equation is a sum of terms, an optional sign followed by an optional
/// coefficient and an optional single-letter variable, set equal to a number.
/// Terms without a variable are moved across to the right-hand side. The
/// system must have exactly as many unknowns as equations.
pub fn parse_system(src: &str) -> Result<System, LinearError> {
    let stripped: String = src.chars().filter(|c| !c.is_whitespace()).collect();

    let equations: Vec<&str> =
        stripped.split(';').filter(|eq| !eq.is_empty()).collect();

    if equations.is_empty() {
        return Err(LinearError::ParseError);
    }

    let mut variables: Vec<char> = Vec::new();
    let mut rows = Vec::with_capacity(equations.len());
    let mut constants = Vec::with_capacity(equations.len());

    for equation in &equations {
        let (terms, constant) = parse_equation(equation, &mut variables)?;
        rows.push(terms);
        constants.push(constant);
    }

    if variables.len() != equations.len() {
        log::debug!(
            "Found {} unknowns ({:?}) in {} equations",
            variables.len(),
            variables,
            equations.len()
        );
        return Err(LinearError::ParseError);
    }

    let n = equations.len();
    let mut coefficients = DMatrix::zeros(n, n);

    for (row, terms) in rows.into_iter().enumerate() {
        for (column, coefficient) in terms {
            coefficients[(row, column)] += coefficient;
        }
    }

    Ok(System {
        coefficients,
        constants: DVector::from_vec(constants),
        variables,
    })
}

/// Parse a single equation into its `(column, coefficient)` terms and its
/// constant, registering any new variables along the way.
fn parse_equation(
    equation: &str,
    variables: &mut Vec<char>,
) -> Result<(Vec<(usize, f64)>, f64), LinearError> {
    let equals = equation.find('=').ok_or(LinearError::ParseError)?;
    let (lhs, rhs) = (&equation[..equals], &equation[equals + 1..]);

    let mut constant = parse_float(rhs)?;
    let mut terms = Vec::new();

    for term in Terms::new(lhs) {
        let Term {
            coefficient,
            variable,
        } = term?;

        match variable {
            Some(variable) => {
                let column = column_of(variables, variable);
                terms.push((column, coefficient));
            },
            // a free term on the left moves to the right
            None => constant -= coefficient,
        }
    }

    Ok((terms, constant))
}

fn column_of(variables: &mut Vec<char>, variable: char) -> usize {
    match variables.iter().position(|&v| v == variable) {
        Some(column) => column,
        None => {
            variables.push(variable);
            variables.len() - 1
        },
    }
}

/// Only accept text which is entirely a finite number.
fn parse_float(text: &str) -> Result<f64, LinearError> {
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(LinearError::ParseError),
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
struct Term {
    /// The signed coefficient.
    coefficient: f64,
    variable: Option<char>,
}

/// An iterator over the signed terms on the left of an equation.
#[derive(Debug, Clone, PartialEq)]
struct Terms<'a> {
    src: &'a str,
    cursor: usize,
}

impl<'a> Terms<'a> {
    fn new(src: &'a str) -> Self { Terms { src, cursor: 0 } }

    fn rest(&self) -> &'a str { &self.src[self.cursor..] }

    fn peek(&self) -> Option<char> { self.rest().chars().next() }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    fn chomp_sign(&mut self) -> f64 {
        match self.peek() {
            Some('-') => {
                self.advance();
                -1.0
            },
            Some('+') => {
                self.advance();
                1.0
            },
            _ => 1.0,
        }
    }

    fn chomp_term(&mut self) -> Result<Term, LinearError> {
        let sign = self.chomp_sign();

        let start = self.cursor;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() || c == '.' || c.is_ascii_alphabetic() {
                self.advance();
            } else {
                break;
            }
        }
        let text = &self.src[start..self.cursor];

        let (number, variable) = match text.char_indices().last() {
            Some((index, c)) if c.is_ascii_alphabetic() => {
                (&text[..index], Some(c))
            },
            Some(_) => (text, None),
            // "x + + y", a trailing "+", or junk we don't understand
            None => return Err(LinearError::ParseError),
        };

        let coefficient = if number.is_empty() && variable.is_some() {
            1.0
        } else {
            parse_float(number)?
        };

        Ok(Term {
            coefficient: sign * coefficient,
            variable,
        })
    }
}

impl<'a> Iterator for Terms<'a> {
    type Item = Result<Term, LinearError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest().is_empty() {
            return None;
        }

        let term = self.chomp_term();

        if term.is_err() {
            // don't keep yielding the same error
            self.cursor = self.src.len();
        }

        Some(term)
    }
}
