//! A tape machine interpreter, used only to check what emitted programs do.
#![allow(dead_code)]

use tapec::vm::{TapeOp, TapeProgram};

/// Programs that run longer than this are assumed to be stuck.
const MAX_STEPS: usize = 50_000_000;

/// The state of the tape machine after running a program.
#[derive(Debug, Default, Clone)]
pub struct TestingTape {
    pub cells: Vec<u8>,
    pub pointer: usize,
    pub output: Vec<u8>,
}

impl TestingTape {
    /// Create a machine whose first cells hold the given values.
    pub fn new(cells: Vec<u8>) -> Self {
        Self {
            cells,
            ..Self::default()
        }
    }

    /// Run a program on a zeroed tape.
    pub fn run(program: &TapeProgram) -> Self {
        Self::default().execute(program)
    }

    /// Run a program on this tape, starting with the head on cell 0.
    pub fn execute(mut self, program: &TapeProgram) -> Self {
        let ops: Vec<&TapeOp> = program.ops().collect();

        let mut jumps = vec![0; ops.len()];
        let mut open = vec![];
        for (i, op) in ops.iter().enumerate() {
            match op {
                TapeOp::LoopStart => open.push(i),
                TapeOp::LoopEnd => {
                    let start = open.pop().expect("unbalanced `]`");
                    jumps[start] = i;
                    jumps[i] = start;
                }
                _ => {}
            }
        }
        assert!(open.is_empty(), "unbalanced `[`");

        self.pointer = 0;
        let mut i = 0;
        let mut steps = 0;
        while i < ops.len() {
            steps += 1;
            assert!(steps < MAX_STEPS, "program ran for too long");
            if self.pointer >= self.cells.len() {
                self.cells.resize(self.pointer + 1, 0);
            }

            match ops[i] {
                TapeOp::MoveRight => self.pointer += 1,
                TapeOp::MoveLeft => {
                    self.pointer = self
                        .pointer
                        .checked_sub(1)
                        .expect("moved the head left of cell 0")
                }
                TapeOp::Inc => self.cells[self.pointer] = self.cells[self.pointer].wrapping_add(1),
                TapeOp::Dec => self.cells[self.pointer] = self.cells[self.pointer].wrapping_sub(1),
                TapeOp::LoopStart if self.cells[self.pointer] == 0 => i = jumps[i],
                TapeOp::LoopEnd if self.cells[self.pointer] != 0 => i = jumps[i],
                TapeOp::Output => self.output.push(self.cells[self.pointer]),
                _ => {}
            }
            i += 1;
        }
        self
    }

    /// The value of a cell (zero if the program never reached it).
    pub fn cell(&self, n: usize) -> u8 {
        self.cells.get(n).copied().unwrap_or(0)
    }

    pub fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }
}
