//! Tokenizing and the infix to postfix conversion.

use crate::{
    algebra::registry::{Arity, OperatorRegistry, Precedence},
    result::AlgebraicError,
};
use smol_str::SmolStr;
use std::fmt::{self, Display, Formatter};

/// Convert an infix expression into postfix (Reverse Polish) order.
pub fn to_postfix(
    src: &str,
    registry: &OperatorRegistry,
) -> Result<Vec<Token>, AlgebraicError> {
    let tokens = tokenize(src, registry);
    let mut converter = ShuntingYard::new(registry);

    for token in tokens {
        converter.push(token)?;
    }

    converter.finish()
}

/// Split an expression into [`Token`]s.
///
/// Every parenthesis and registered binary operator gets padded with
/// whitespace before splitting, so operators registered at runtime don't need
/// to be separated from their operands by the user.
pub fn tokenize(src: &str, registry: &OperatorRegistry) -> Vec<Token> {
    let symbols = registry.binary_symbols();
    let spaced = pad_symbols(src, &symbols);

    let mut tokens: Vec<Token> = Vec::new();

    for word in spaced.split_whitespace() {
        let follows_operand =
            tokens.last().map(Token::is_operand_end).unwrap_or(false);
        tokens.push(Token::classify(word, follows_operand, registry));
    }

    tokens
}

fn pad_symbols(src: &str, symbols: &[SmolStr]) -> String {
    let mut padded = String::with_capacity(src.len() * 2);
    let mut rest = src;

    'outer: while let Some(c) = rest.chars().next() {
        if c == '(' || c == ')' {
            padded.push(' ');
            padded.push(c);
            padded.push(' ');
            rest = &rest[c.len_utf8()..];
            continue;
        }

        // symbols are sorted longest first so "**" wins over "*"
        for symbol in symbols {
            if !symbol.is_empty() && rest.starts_with(symbol.as_str()) {
                padded.push(' ');
                padded.push_str(symbol);
                padded.push(' ');
                rest = &rest[symbol.len()..];
                continue 'outer;
            }
        }

        padded.push(c);
        rest = &rest[c.len_utf8()..];
    }

    padded
}

/// A single token in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    /// A binary operator.
    Operator(SmolStr),
    /// A unary operator or function.
    Function(SmolStr),
    /// A name which will be looked up in the evaluation context.
    Identifier(SmolStr),
    OpenParen,
    CloseParen,
}

impl Token {
    fn classify(
        word: &str,
        follows_operand: bool,
        registry: &OperatorRegistry,
    ) -> Token {
        match word {
            "(" => return Token::OpenParen,
            ")" => return Token::CloseParen,
            _ => {},
        }

        if let Some(number) = parse_number(word) {
            return Token::Number(number);
        }

        let is_binary = registry.is_operator(word);
        let is_unary = registry.is_unary(word);

        // a symbol registered in both namespaces is binary when it has a left
        // operand, e.g. the "-" in "3 - 2" vs "- 2"
        match (is_binary, is_unary) {
            (true, true) if follows_operand => Token::Operator(word.into()),
            (_, true) => Token::Function(word.into()),
            (true, false) => Token::Operator(word.into()),
            (false, false) => Token::Identifier(word.into()),
        }
    }

    /// Can this token be the last thing in an operand?
    fn is_operand_end(&self) -> bool {
        match self {
            Token::Number(_) | Token::Identifier(_) | Token::CloseParen => true,
            Token::Operator(_) | Token::Function(_) | Token::OpenParen => false,
        }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Token::Number(number) => write!(f, "{}", number),
            Token::Operator(symbol)
            | Token::Function(symbol)
            | Token::Identifier(symbol) => write!(f, "{}", symbol),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
        }
    }
}

/// A token is only a number if the *whole* thing parses as one.
pub fn parse_number(word: &str) -> Option<f64> { word.parse().ok() }

/// Dijkstra's shunting-yard algorithm.
#[derive(Debug)]
struct ShuntingYard<'r> {
    registry: &'r OperatorRegistry,
    output: Vec<Token>,
    operators: Vec<Token>,
}

impl<'r> ShuntingYard<'r> {
    fn new(registry: &'r OperatorRegistry) -> Self {
        ShuntingYard {
            registry,
            output: Vec::new(),
            operators: Vec::new(),
        }
    }

    fn push(&mut self, token: Token) -> Result<(), AlgebraicError> {
        match token {
            Token::Number(_) | Token::Identifier(_) => self.output.push(token),
            // functions bind to whatever comes next, so there's nothing to
            // compare against yet
            Token::Function(_) | Token::OpenParen => self.operators.push(token),
            Token::Operator(ref symbol) => {
                self.pop_tighter_operators(symbol);
                self.operators.push(token);
            },
            Token::CloseParen => self.close_group()?,
        }

        Ok(())
    }

    fn pop_tighter_operators(&mut self, incoming: &str) {
        let incoming_precedence = self.binary_precedence(incoming);
        let left_associative = self.registry.is_left_associative(incoming);

        while let Some(top) = self.operators.last() {
            let top_precedence = match top {
                Token::Operator(symbol) => self.binary_precedence(symbol),
                Token::Function(_) => Precedence::Unary,
                _ => break,
            };

            let should_pop = top_precedence > incoming_precedence
                || (top_precedence == incoming_precedence && left_associative);

            if !should_pop {
                break;
            }

            if let Some(top) = self.operators.pop() {
                self.output.push(top);
            }
        }
    }

    fn binary_precedence(&self, symbol: &str) -> Precedence {
        self.registry
            .get(symbol, Arity::Binary)
            .map(|entry| entry.precedence())
            .unwrap_or(Precedence::None)
    }

    fn close_group(&mut self) -> Result<(), AlgebraicError> {
        loop {
            match self.operators.pop() {
                Some(Token::OpenParen) => break,
                Some(other) => self.output.push(other),
                // unbalanced parentheses
                None => return Err(AlgebraicError::ArgumentMismatch),
            }
        }

        // "f(x)" is a function applied to a parenthesised argument
        if let Some(Token::Function(_)) = self.operators.last() {
            if let Some(function) = self.operators.pop() {
                self.output.push(function);
            }
        }

        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Token>, AlgebraicError> {
        while let Some(token) = self.operators.pop() {
            if token == Token::OpenParen {
                return Err(AlgebraicError::ArgumentMismatch);
            }
            self.output.push(token);
        }

        log::trace!("Postfix: {}", DisplayTokens(&self.output));

        Ok(self.output)
    }
}

/// Display a token sequence separated by spaces.
pub(crate) struct DisplayTokens<'a>(pub &'a [Token]);

impl<'a> Display for DisplayTokens<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, token) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", token)?;
        }

        Ok(())
    }
}
