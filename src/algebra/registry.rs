//! The table of operators and functions an expression may use.

use crate::{algebra::builtins, config::Config, result::AlgebraicError};
use parking_lot::RwLock;
use smol_str::SmolStr;
use std::{
    collections::HashMap,
    fmt::{self, Debug, Formatter},
    sync::Arc,
};

/// How tightly an operator binds its operands.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    None = 0,
    AddSub = 1,
    MultiDiv = 2,
    Pow = 3,
    /// Functions and other unary operators bind tighter than anything else.
    Unary = 4,
}

impl Precedence {
    /// The remainder operator shares a level with multiplication and division.
    pub const MOD: Precedence = Precedence::MultiDiv;
}

/// Whether an operator takes one operand or two.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Arity {
    Unary,
    Binary,
}

/// The implementation behind an operator.
///
/// Operands are passed left to right.
pub type Operation =
    Arc<dyn Fn(&[f64]) -> Result<f64, AlgebraicError> + Send + Sync>;

/// A single entry in the [`OperatorRegistry`].
#[derive(Clone)]
pub struct OperatorEntry {
    symbol: SmolStr,
    arity: Arity,
    precedence: Precedence,
    operation: Operation,
}

impl OperatorEntry {
    pub fn symbol(&self) -> &str { &self.symbol }

    pub fn arity(&self) -> Arity { self.arity }

    pub fn precedence(&self) -> Precedence { self.precedence }

    pub fn apply(&self, args: &[f64]) -> Result<f64, AlgebraicError> {
        (self.operation)(args)
    }
}

impl Debug for OperatorEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorEntry")
            .field("symbol", &self.symbol)
            .field("arity", &self.arity)
            .field("precedence", &self.precedence)
            .finish()
    }
}

#[derive(Debug, Default)]
struct Tables {
    binary: HashMap<SmolStr, OperatorEntry>,
    unary: HashMap<SmolStr, OperatorEntry>,
}

impl Tables {
    fn table(&self, arity: Arity) -> &HashMap<SmolStr, OperatorEntry> {
        match arity {
            Arity::Binary => &self.binary,
            Arity::Unary => &self.unary,
        }
    }

    fn table_mut(
        &mut self,
        arity: Arity,
    ) -> &mut HashMap<SmolStr, OperatorEntry> {
        match arity {
            Arity::Binary => &mut self.binary,
            Arity::Unary => &mut self.unary,
        }
    }
}

/// A thread-safe, runtime-extensible table of binary operators and unary
/// functions.
///
/// Binary and unary symbols live in separate namespaces, so the same symbol
/// may be registered as both. Lookups take a shared lock and registrations
/// take an exclusive one.
pub struct OperatorRegistry {
    tables: RwLock<Tables>,
}

impl OperatorRegistry {
    /// A registry with nothing in it.
    pub fn empty() -> Self {
        OperatorRegistry {
            tables: RwLock::new(Tables::default()),
        }
    }

    /// A registry seeded with the arithmetic operators and the usual
    /// transcendental functions.
    pub fn with_builtins(config: &Config) -> Self {
        let registry = OperatorRegistry::empty();
        builtins::register(&registry, config);
        registry
    }

    /// Add a binary operator, replacing any existing binary operator with the
    /// same symbol.
    pub fn register_operator<S, F>(
        &self,
        symbol: S,
        precedence: Precedence,
        operation: F,
    ) where
        S: Into<SmolStr>,
        F: Fn(&[f64]) -> Result<f64, AlgebraicError> + Send + Sync + 'static,
    {
        self.insert(OperatorEntry {
            symbol: symbol.into(),
            arity: Arity::Binary,
            precedence,
            operation: Arc::new(operation),
        });
    }

    /// Add a unary operator (function), replacing any existing unary operator
    /// with the same symbol.
    pub fn register_unary_operator<S, F>(&self, symbol: S, operation: F)
    where
        S: Into<SmolStr>,
        F: Fn(&[f64]) -> Result<f64, AlgebraicError> + Send + Sync + 'static,
    {
        self.insert(OperatorEntry {
            symbol: symbol.into(),
            arity: Arity::Unary,
            precedence: Precedence::Unary,
            operation: Arc::new(operation),
        });
    }

    fn insert(&self, entry: OperatorEntry) {
        let mut tables = self.tables.write();
        let arity = entry.arity;

        if let Some(previous) =
            tables.table_mut(arity).insert(entry.symbol.clone(), entry)
        {
            log::warn!(
                "Replaced the existing {:?} operator \"{}\"",
                arity,
                previous.symbol
            );
        }
    }

    /// Look up an entry by symbol.
    pub fn get(&self, symbol: &str, arity: Arity) -> Option<OperatorEntry> {
        self.tables.read().table(arity).get(symbol).cloned()
    }

    /// Is `symbol` a binary operator?
    pub fn is_operator(&self, symbol: &str) -> bool {
        self.tables.read().binary.contains_key(symbol)
    }

    /// Is `symbol` a unary operator (function)?
    pub fn is_unary(&self, symbol: &str) -> bool {
        self.tables.read().unary.contains_key(symbol)
    }

    /// The precedence of `symbol`, preferring its binary form when it is
    /// registered as both.
    pub fn precedence_of(&self, symbol: &str) -> Option<Precedence> {
        let tables = self.tables.read();

        tables
            .binary
            .get(symbol)
            .or_else(|| tables.unary.get(symbol))
            .map(|entry| entry.precedence)
    }

    /// Everything except exponentiation groups left to right.
    pub fn is_left_associative(&self, symbol: &str) -> bool { symbol != "^" }

    /// Every binary symbol, longest first.
    pub fn binary_symbols(&self) -> Vec<SmolStr> {
        let mut symbols: Vec<SmolStr> =
            self.tables.read().binary.keys().cloned().collect();
        symbols.sort_by(|left, right| {
            right.len().cmp(&left.len()).then_with(|| left.cmp(right))
        });
        symbols
    }

    /// Invoke a binary operator.
    pub fn apply_binary(
        &self,
        symbol: &str,
        left: f64,
        right: f64,
    ) -> Result<f64, AlgebraicError> {
        self.dispatch(symbol, Arity::Binary, &[left, right])
    }

    /// Invoke a unary operator.
    pub fn apply_unary(
        &self,
        symbol: &str,
        operand: f64,
    ) -> Result<f64, AlgebraicError> {
        self.dispatch(symbol, Arity::Unary, &[operand])
    }

    pub(crate) fn dispatch(
        &self,
        symbol: &str,
        arity: Arity,
        args: &[f64],
    ) -> Result<f64, AlgebraicError> {
        // the lock is released before calling into the operation, which may
        // itself use the registry
        let operation = self
            .tables
            .read()
            .table(arity)
            .get(symbol)
            .map(|entry| Arc::clone(&entry.operation))
            .ok_or(AlgebraicError::OperationNotFound)?;

        operation(args)
    }
}

impl Default for OperatorRegistry {
    fn default() -> Self { OperatorRegistry::with_builtins(&Config::default()) }
}

impl Debug for OperatorRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let tables = self.tables.read();
        let mut binary: Vec<_> = tables.binary.keys().collect();
        let mut unary: Vec<_> = tables.unary.keys().collect();
        binary.sort();
        unary.sort();

        f.debug_struct("OperatorRegistry")
            .field("binary", &binary)
            .field("unary", &unary)
            .finish()
    }
}
