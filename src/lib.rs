//! # Tapec
//!
//! A compiler from `NAME=EXPR` arithmetic statements to programs for a
//! one-dimensional byte-tape machine.
//!
//! ```text
//!   +---+---+---+---+---+---+---+---+---+---+---+
//!   | 0 | 1 | 2 | 3 | 4 | 5 | 6 | 7 | 8 | 9 |10 | ...
//!   +---+---+---+---+---+---+---+---+---+---+---+
//!     ^ result                                ^ printing
//! ```
//!
//! The machine has only seven instructions: `>` and `<` move the head,
//! `+` and `-` change the current cell (mod 256), `[` and `]` loop while
//! the current cell is non-zero, and `.` outputs the current cell. There
//! is no addition, subtraction or multiplication instruction, so the
//! compiler builds each of them out of loops that drain one cell into
//! another.
//!
//! ## Index
//!
//! 1. [Parsing expressions](./parse/index.html)
//! 2. [Expressions and their evaluation](./expr/index.html)
//! 3. [Assembling expressions onto the tape](./asm/index.html)
//! 4. [The tape machine's instructions](./vm/index.html)
//! 5. [Compiling whole statements](./statement/index.html)
//!
//! ## Example
//!
//! ```rust
//! let program = tapec::compile("X=2+3*4").unwrap();
//! // Prints `X=14` when run on the tape machine.
//! assert!(program.chars().all(|ch| "<>+-[].".contains(ch)));
//! ```
pub mod asm;
pub mod error;
pub mod expr;
pub mod parse;
pub mod statement;
pub mod vm;

pub use error::{Error, Result};
pub use statement::{compile, compile_statement, Compiled, Config, Statement};
