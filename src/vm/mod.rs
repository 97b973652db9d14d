//! # Virtual Machine Module
//!
//! This module describes the instruction set of the target machine.
//!
//! ### What is this machine?
//!
//! The target is a one-dimensional tape of byte cells, all starting at
//! zero, with a single read/write head starting at cell zero. Cells
//! wrap around modulo 256. There is no register: every instruction works
//! on the cell under the head.
//!
//! ### What can it do?
//!
//! | Op-code | Instruction  | Meaning                                         |
//! |---------|--------------|-------------------------------------------------|
//! | `>`     | `MoveRight`  | move the head one cell right                    |
//! | `<`     | `MoveLeft`   | move the head one cell left                     |
//! | `+`     | `Inc`        | increment the current cell                      |
//! | `-`     | `Dec`        | decrement the current cell                      |
//! | `[`     | `LoopStart`  | skip past the matching `]` if the cell is zero  |
//! | `]`     | `LoopEnd`    | jump back to the matching `[` unless it is zero |
//! | `.`     | `Output`     | write the current cell as a character           |
//!
//! This crate only ever *emits* programs for this machine; it never runs them.

mod core;
pub use self::core::*;

use ::core::fmt;

/// An error in the structure of a tape program.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A `[` was never closed. Holds the index of the opening op.
    UnmatchedLoopStart(usize),
    /// A `]` had no `[` to close. Holds the index of the closing op.
    UnmatchedLoopEnd(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::UnmatchedLoopStart(i) => write!(f, "`[` at op {i} has no matching `]`"),
            Error::UnmatchedLoopEnd(i) => write!(f, "`]` at op {i} has no matching `[`"),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl std::error::Error for Error {}

/// Anything that tape instructions can be appended to.
pub trait VirtualMachineProgram {
    fn append_op(&mut self, op: TapeOp);

    fn comment(&mut self, comment: &str) {
        self.append_op(TapeOp::Comment(comment.to_string()));
    }

    fn move_right(&mut self) {
        self.append_op(TapeOp::MoveRight)
    }

    fn move_left(&mut self) {
        self.append_op(TapeOp::MoveLeft)
    }

    /// Move the head by a number of cells; negative values move left.
    fn move_pointer(&mut self, cells: isize) {
        for _ in 0..cells.unsigned_abs() {
            if cells > 0 {
                self.move_right()
            } else {
                self.move_left()
            }
        }
    }

    fn inc(&mut self) {
        self.append_op(TapeOp::Inc)
    }

    fn dec(&mut self) {
        self.append_op(TapeOp::Dec)
    }

    fn begin_while(&mut self) {
        self.append_op(TapeOp::LoopStart)
    }

    fn end(&mut self) {
        self.append_op(TapeOp::LoopEnd)
    }

    fn putchar(&mut self) {
        self.append_op(TapeOp::Output)
    }
}
