//! # Error Module
//!
//! Every failure the compiler can report to a user. All of them are
//! fatal: nothing is emitted once one of these is produced.
//!
//! Offsets are byte offsets into the *whole* statement text (name, `=`,
//! and expression), so a frontend can point straight at the bad byte.
use core::fmt;

/// A result whose error is a compiler [`Error`].
pub type Result<T> = core::result::Result<T, Error>;

/// An error produced while reading a `NAME=EXPR` statement.
#[derive(Clone, PartialEq, Eq)]
pub enum Error {
    /// The input has no `=` separating a name from an expression.
    MalformedStatement(String),
    /// A factor was neither `(` nor a run of digits that fits in an `i64`.
    InvalidLiteral { offset: usize, found: String },
    /// An opening parenthesis was never closed (strict parsing only).
    UnclosedParenthesis { offset: usize },
    /// Parentheses or chained operators went deeper than
    /// [`MAX_DEPTH`](crate::parse::MAX_DEPTH) levels.
    NestingTooDeep { offset: usize },
    /// Input remained after a complete expression (strict parsing only).
    TrailingInput { offset: usize, rest: String },
}

impl Error {
    /// The byte offset into the statement that this error refers to, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::MalformedStatement(_) => None,
            Error::InvalidLiteral { offset, .. }
            | Error::UnclosedParenthesis { offset }
            | Error::NestingTooDeep { offset }
            | Error::TrailingInput { offset, .. } => Some(*offset),
        }
    }

    /// The width of the source region this error covers (at least one byte).
    pub fn width(&self) -> usize {
        match self {
            Error::InvalidLiteral { found, .. } => found.len().max(1),
            Error::TrailingInput { rest, .. } => rest.len().max(1),
            _ => 1,
        }
    }

    /// Shift the offset of this error, used when an expression was parsed
    /// out of a larger statement.
    pub(crate) fn shifted(self, by: usize) -> Self {
        match self {
            Error::InvalidLiteral { offset, found } => Error::InvalidLiteral {
                offset: offset + by,
                found,
            },
            Error::UnclosedParenthesis { offset } => Error::UnclosedParenthesis {
                offset: offset + by,
            },
            Error::NestingTooDeep { offset } => Error::NestingTooDeep {
                offset: offset + by,
            },
            Error::TrailingInput { offset, rest } => Error::TrailingInput {
                offset: offset + by,
                rest,
            },
            other => other,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MalformedStatement(input) => {
                write!(f, "malformed statement `{input}`: expected `NAME=EXPR`")
            }
            Error::InvalidLiteral { found, .. } if found.is_empty() => {
                write!(f, "invalid literal: expected a number or `(`, found end of input")
            }
            Error::InvalidLiteral { found, .. } => {
                write!(f, "invalid literal: expected a number or `(`, found `{found}`")
            }
            Error::UnclosedParenthesis { .. } => write!(f, "unclosed parenthesis"),
            Error::NestingTooDeep { .. } => write!(
                f,
                "expression nested more than {} levels deep",
                crate::parse::MAX_DEPTH
            ),
            Error::TrailingInput { rest, .. } => {
                write!(f, "unexpected `{rest}` after the end of the expression")
            }
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MalformedStatement(_) => write!(f, "MalformedStatement: {self}"),
            Error::InvalidLiteral { offset, .. } => write!(f, "InvalidLiteral at {offset}: {self}"),
            Error::UnclosedParenthesis { offset } => {
                write!(f, "UnclosedParenthesis at {offset}: {self}")
            }
            Error::NestingTooDeep { offset } => write!(f, "NestingTooDeep at {offset}: {self}"),
            Error::TrailingInput { offset, .. } => write!(f, "TrailingInput at {offset}: {self}"),
        }
    }
}

impl std::error::Error for Error {}
