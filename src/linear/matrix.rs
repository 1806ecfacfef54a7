//! Matrix literals and the handful of matrix manipulations the solvers need.

use crate::result::LinearError;
use nalgebra::{DMatrix, DVector};
use std::ops::Range;

/// Parse a matrix literal like `[1, 2; 3, 4]` or `[[1, 2], [3, 4]]`.
///
/// Rows are separated by `;` or closing brackets and every row must have the
/// same number of columns.
pub fn parse_matrix(src: &str) -> Result<DMatrix<f64>, LinearError> {
    let mut rows: Vec<Vec<f64>> = Vec::new();
    let mut current_row = Vec::new();

    for token in Tokens::new(src) {
        let token = token?;

        match token.kind {
            TokenKind::Number => {
                let number = token
                    .text
                    .parse()
                    .map_err(|_| LinearError::ParseError)?;
                current_row.push(number);
            },
            TokenKind::OpenBracket
            | TokenKind::CloseBracket
            | TokenKind::Semicolon => {
                if !current_row.is_empty() {
                    rows.push(std::mem::take(&mut current_row));
                }
            },
            TokenKind::Comma => {},
        }
    }

    if !current_row.is_empty() {
        rows.push(current_row);
    }

    let columns = match rows.first() {
        Some(first) => first.len(),
        None => return Err(LinearError::ParseError),
    };

    if rows.iter().any(|row| row.len() != columns) {
        log::debug!("Ragged matrix literal: {:?}", rows);
        return Err(LinearError::ParseError);
    }

    let cells: Vec<f64> = rows.into_iter().flatten().collect();
    Ok(DMatrix::from_row_slice(cells.len() / columns, columns, &cells))
}

/// The submatrix left after deleting one row and one column.
pub fn minor(matrix: &DMatrix<f64>, row: usize, column: usize) -> DMatrix<f64> {
    matrix.clone().remove_row(row).remove_column(column)
}

/// A copy of `matrix` with one column swapped out for `replacement`.
pub fn with_column(
    matrix: &DMatrix<f64>,
    column: usize,
    replacement: &DVector<f64>,
) -> DMatrix<f64> {
    let mut copy = matrix.clone();
    copy.set_column(column, replacement);
    copy
}

/// The augmented matrix, `[A|b]`.
pub fn augment(a: &DMatrix<f64>, b: &DVector<f64>) -> DMatrix<f64> {
    let n = a.ncols();
    let mut augmented = a.clone().insert_column(n, 0.0);
    augmented.set_column(n, b);
    augmented
}

#[derive(Debug, Clone, PartialEq)]
struct Tokens<'a> {
    src: &'a str,
    cursor: usize,
}

impl<'a> Tokens<'a> {
    fn new(src: &'a str) -> Self { Tokens { src, cursor: 0 } }

    fn rest(&self) -> &'a str { &self.src[self.cursor..] }

    fn peek(&self) -> Option<char> { self.rest().chars().next() }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.cursor += c.len_utf8();
        Some(c)
    }

    fn chomp(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.cursor;
        self.advance();
        Token::from_text(self.src, start..self.cursor, kind)
    }

    fn chomp_number(&mut self) -> Result<Token<'a>, LinearError> {
        let start = self.cursor;

        if self.peek() == Some('-') {
            self.advance();
        }

        let mut seen_decimal = false;

        while let Some(c) = self.peek() {
            match c {
                '0'..='9' => {},
                '.' if !seen_decimal => seen_decimal = true,
                _ => break,
            }
            self.advance();
        }

        let token =
            Token::from_text(self.src, start..self.cursor, TokenKind::Number);

        // a lone "-" or "." isn't a number
        if token.text.chars().any(|c| c.is_ascii_digit()) {
            Ok(token)
        } else {
            Err(LinearError::ParseError)
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token<'a>, LinearError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            return match self.peek()? {
                '[' => Some(Ok(self.chomp(TokenKind::OpenBracket))),
                ']' => Some(Ok(self.chomp(TokenKind::CloseBracket))),
                ';' => Some(Ok(self.chomp(TokenKind::Semicolon))),
                ',' => Some(Ok(self.chomp(TokenKind::Comma))),
                '0'..='9' | '-' | '.' => Some(self.chomp_number()),
                c if c.is_whitespace() => {
                    self.advance();
                    continue;
                },
                other => {
                    log::debug!("Unexpected {:?} in a matrix literal", other);
                    self.advance();
                    Some(Err(LinearError::ParseError))
                },
            };
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Token<'a> {
    text: &'a str,
    kind: TokenKind,
}

impl<'a> Token<'a> {
    fn from_text(
        original_source: &'a str,
        span: Range<usize>,
        kind: TokenKind,
    ) -> Self {
        Token {
            text: &original_source[span],
            kind,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
enum TokenKind {
    Number,
    OpenBracket,
    CloseBracket,
    Semicolon,
    Comma,
}
