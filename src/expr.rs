//! # Expression Module
//!
//! The abstract syntax tree of an arithmetic expression, and the static
//! evaluator that folds it into the value the generated tape program
//! will have printed.
//!
//! An [`Expr`] is built once by the parser and then only ever read: once
//! by [`Expr::eval`], once by the assembler.
use core::fmt;
use std::collections::HashMap;

use lazy_static::lazy_static;
use maplit::hashmap;

lazy_static! {
    /// Every binary operator symbol the parser accepts.
    pub(crate) static ref OPERATORS: HashMap<char, Arithmetic> = hashmap! {
        '+' => Arithmetic::Add,
        '-' => Arithmetic::Subtract,
        '*' => Arithmetic::Multiply,
    };
}

/// A binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arithmetic {
    Add,
    Subtract,
    Multiply,
}

impl Arithmetic {
    /// Look up the operator written with the given symbol.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        OPERATORS.get(&symbol).copied()
    }

    /// The symbol this operator is written with.
    pub fn symbol(&self) -> char {
        match self {
            Arithmetic::Add => '+',
            Arithmetic::Subtract => '-',
            Arithmetic::Multiply => '*',
        }
    }

    /// Apply the operator with the wrapping semantics of a native `i64`.
    pub fn apply(&self, lhs: i64, rhs: i64) -> i64 {
        match self {
            Arithmetic::Add => lhs.wrapping_add(rhs),
            Arithmetic::Subtract => lhs.wrapping_sub(rhs),
            Arithmetic::Multiply => lhs.wrapping_mul(rhs),
        }
    }
}

impl fmt::Display for Arithmetic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// An arithmetic expression over non-negative integer literals.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// A non-negative integer literal.
    Literal(i64),
    /// A binary operation, which owns both of its operands.
    BinaryOp(Arithmetic, Box<Self>, Box<Self>),
}

impl Expr {
    pub fn literal(value: i64) -> Self {
        Expr::Literal(value)
    }

    pub fn binop(op: Arithmetic, lhs: impl Into<Self>, rhs: impl Into<Self>) -> Self {
        Expr::BinaryOp(op, Box::new(lhs.into()), Box::new(rhs.into()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn add(self, rhs: impl Into<Self>) -> Self {
        Self::binop(Arithmetic::Add, self, rhs)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, rhs: impl Into<Self>) -> Self {
        Self::binop(Arithmetic::Subtract, self, rhs)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn mul(self, rhs: impl Into<Self>) -> Self {
        Self::binop(Arithmetic::Multiply, self, rhs)
    }

    /// Compute the value of this expression at compile time.
    ///
    /// Overflow wraps silently, exactly like native 64-bit signed arithmetic.
    pub fn eval(&self) -> i64 {
        match self {
            Expr::Literal(n) => *n,
            Expr::BinaryOp(op, lhs, rhs) => op.apply(lhs.eval(), rhs.eval()),
        }
    }

    /// The number of cells above its base cell this expression needs
    /// as scratch space while it is being computed on the tape.
    pub fn scratch_cells(&self) -> usize {
        match self {
            Expr::Literal(_) => 0,
            Expr::BinaryOp(op, lhs, rhs) => {
                let own = match op {
                    Arithmetic::Add | Arithmetic::Subtract => 1,
                    Arithmetic::Multiply => 3,
                };
                own.max(lhs.scratch_cells()).max(1 + rhs.scratch_cells())
            }
        }
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Expr::Literal(value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Literal(n) => write!(f, "{n}"),
            Expr::BinaryOp(op, lhs, rhs) => {
                for (i, operand) in [lhs, rhs].into_iter().enumerate() {
                    if i == 1 {
                        write!(f, "{op}")?;
                    }
                    match operand.as_ref() {
                        Expr::Literal(_) => write!(f, "{operand}")?,
                        Expr::BinaryOp(..) => write!(f, "({operand})")?,
                    }
                }
                Ok(())
            }
        }
    }
}
