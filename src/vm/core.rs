//! The instructions of the tape machine, and programs made of them.
use super::{Error, VirtualMachineProgram};
use core::{fmt, str::FromStr};
use std::collections::HashMap;

use lazy_static::lazy_static;
use maplit::hashmap;

lazy_static! {
    /// The op-code character for every executable instruction.
    static ref OPCODES: HashMap<char, TapeOp> = hashmap! {
        '>' => TapeOp::MoveRight,
        '<' => TapeOp::MoveLeft,
        '+' => TapeOp::Inc,
        '-' => TapeOp::Dec,
        '[' => TapeOp::LoopStart,
        ']' => TapeOp::LoopEnd,
        '.' => TapeOp::Output,
    };
}

/// An individual tape machine instruction.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TapeOp {
    /// A comment in the program (never part of the emitted op-codes).
    Comment(String),

    /// Move the head one cell to the right.
    MoveRight,
    /// Move the head one cell to the left.
    MoveLeft,

    /// Increment the current cell (mod 256).
    Inc,
    /// Decrement the current cell (mod 256).
    Dec,

    /// Begin a "while the current cell is not zero" loop.
    LoopStart,
    /// End the innermost open loop.
    LoopEnd,

    /// Write the current cell as a character.
    Output,
}

impl TapeOp {
    /// Look up the instruction for an op-code character.
    pub fn from_opcode(ch: char) -> Option<Self> {
        OPCODES.get(&ch).cloned()
    }

    /// The op-code character of this instruction, if it has one.
    pub fn opcode(&self) -> Option<char> {
        Some(match self {
            TapeOp::Comment(_) => return None,
            TapeOp::MoveRight => '>',
            TapeOp::MoveLeft => '<',
            TapeOp::Inc => '+',
            TapeOp::Dec => '-',
            TapeOp::LoopStart => '[',
            TapeOp::LoopEnd => ']',
            TapeOp::Output => '.',
        })
    }
}

impl fmt::Display for TapeOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self, self.opcode()) {
            (TapeOp::Comment(s), _) => write!(f, "// {s}"),
            (_, Some(ch)) => write!(f, "{ch}"),
            (_, None) => Ok(()),
        }
    }
}

/// A program of tape machine instructions.
#[derive(Default, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TapeProgram(pub Vec<TapeOp>);

impl VirtualMachineProgram for TapeProgram {
    fn append_op(&mut self, op: TapeOp) {
        self.0.push(op);
    }
}

impl TapeProgram {
    /// The executable instructions of this program, without comments.
    pub fn ops(&self) -> impl Iterator<Item = &TapeOp> + '_ {
        self.0
            .iter()
            .filter(|op| !matches!(op, TapeOp::Comment(_)))
    }

    /// The number of executable instructions.
    pub fn len(&self) -> usize {
        self.ops().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Confirm that every `[` is closed by a later `]`, and that every
    /// `]` closes an earlier `[`.
    pub fn check_loops(&self) -> Result<(), Error> {
        let mut open = vec![];
        for (i, op) in self.ops().enumerate() {
            match op {
                TapeOp::LoopStart => open.push(i),
                TapeOp::LoopEnd => {
                    open.pop().ok_or(Error::UnmatchedLoopEnd(i))?;
                }
                _ => {}
            }
        }
        match open.pop() {
            Some(i) => Err(Error::UnmatchedLoopStart(i)),
            None => Ok(()),
        }
    }

    /// The deepest loop nesting reached anywhere in the program.
    pub fn max_loop_depth(&self) -> usize {
        let mut depth = 0usize;
        let mut max = 0;
        for op in self.ops() {
            match op {
                TapeOp::LoopStart => {
                    depth += 1;
                    max = max.max(depth);
                }
                TapeOp::LoopEnd => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        max
    }
}

impl FromStr for TapeProgram {
    type Err = Error;

    /// Read op-code characters, ignoring everything else.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let program = TapeProgram(s.chars().filter_map(TapeOp::from_opcode).collect());
        program.check_loops()?;
        Ok(program)
    }
}

impl fmt::Display for TapeProgram {
    /// The plain form writes the bare op-codes. The alternate form (`{:#}`)
    /// writes one block per line, with comments, indented by loop depth.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !f.alternate() {
            for op in self.ops() {
                write!(f, "{op}")?;
            }
            return Ok(());
        }

        let mut indent = 0;
        let mut line_open = false;
        for op in &self.0 {
            match op {
                TapeOp::Comment(comment) => {
                    if line_open {
                        writeln!(f)?;
                        line_open = false;
                    }
                    writeln!(f, "{}// {comment}", "   ".repeat(indent))?;
                }
                TapeOp::LoopStart | TapeOp::LoopEnd => {
                    if line_open {
                        writeln!(f)?;
                        line_open = false;
                    }
                    if *op == TapeOp::LoopEnd {
                        indent = indent.saturating_sub(1);
                    }
                    writeln!(f, "{}{op}", "   ".repeat(indent))?;
                    if *op == TapeOp::LoopStart {
                        indent += 1;
                    }
                }
                _ => {
                    if !line_open {
                        write!(f, "{}", "   ".repeat(indent))?;
                        line_open = true;
                    }
                    write!(f, "{op}")?;
                }
            }
        }
        if line_open {
            writeln!(f)?;
        }
        Ok(())
    }
}
