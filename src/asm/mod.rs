//! # Assembly Module
//!
//! This module turns an [`Expr`] into tape machine instructions.
//!
//! ## How are values laid out?
//!
//! Every expression is computed into a *base cell*. A literal is written
//! straight into its base cell. A binary operation computes its left
//! operand into the base cell and its right operand into the cell just
//! above it, and then folds the right operand into the left one.
//! Multiplication borrows two more cells above that as scratch.
//!
//! This gives the invariant the whole generator rests on:
//!
//! * after assembling an expression at base cell `n`, cell `n` holds its
//!   value (mod 256),
//! * cells below `n` are untouched,
//! * cells above `n` are all zero again.
//!
//! ## Where is the head?
//!
//! The [`Assembler`] keeps a cursor with the cell the head will be on
//! after running everything emitted so far. Moves are always emitted as
//! the shortest run of single steps from the cursor to the target.
mod cell;
pub use cell::Cell;

use crate::{
    expr::{Arithmetic, Expr},
    vm::{TapeOp, TapeProgram, VirtualMachineProgram},
};

use log::{debug, trace};

/// The cell the driver prints literal strings from. It sits well past the
/// working cells of any reasonably sized expression.
pub const PRINT_CELL: Cell = Cell(10);

/// Emits tape instructions while tracking where the head is.
#[derive(Default, Clone, Debug)]
pub struct Assembler {
    program: TapeProgram,
    cursor: usize,
    annotate: bool,
}

impl VirtualMachineProgram for Assembler {
    fn append_op(&mut self, op: TapeOp) {
        match op {
            TapeOp::MoveRight => self.cursor += 1,
            TapeOp::MoveLeft => {
                debug_assert!(self.cursor > 0, "moved the head left of cell 0");
                self.cursor -= 1
            }
            _ => {}
        }
        self.program.append_op(op)
    }

    fn comment(&mut self, comment: &str) {
        if self.annotate {
            self.program.append_op(TapeOp::Comment(comment.to_string()));
        }
    }
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an assembler that marks each block it emits with a comment.
    pub fn annotated() -> Self {
        Self {
            annotate: true,
            ..Self::default()
        }
    }

    /// The cell the head is on after everything emitted so far.
    pub fn cursor(&self) -> Cell {
        Cell(self.cursor)
    }

    /// Move the head to a cell with the fewest possible single steps.
    pub fn move_to(&mut self, cell: Cell) {
        if cell.0 > self.cursor {
            for _ in self.cursor..cell.0 {
                self.move_right();
            }
        } else {
            for _ in cell.0..self.cursor {
                self.move_left();
            }
        }
    }

    /// Emit code that leaves the value of `expr` in `base`, restoring
    /// every cell above `base` to zero.
    pub fn assemble_expr(&mut self, expr: &Expr, base: Cell) {
        trace!("assembling `{expr}` at {base}");
        match expr {
            Expr::Literal(n) => {
                self.comment(&format!("{base} = {n}"));
                base.set(*n, self);
            }
            Expr::BinaryOp(op, lhs, rhs) => {
                let rhs_cell = base.offset(1);
                self.assemble_expr(lhs, base);
                self.assemble_expr(rhs, rhs_cell);

                self.comment(&format!("{base} {op}= {rhs_cell}"));
                match op {
                    Arithmetic::Add => rhs_cell.add_to(base, self),
                    Arithmetic::Subtract => rhs_cell.sub_from(base, self),
                    Arithmetic::Multiply => {
                        base.mul_by(rhs_cell, base.offset(2), base.offset(3), self)
                    }
                }
            }
        }
    }

    /// Emit code that writes every byte of `text`, building each one in `cell`.
    pub fn print_str(&mut self, text: &str, cell: Cell) {
        self.comment(&format!("print {text:?}"));
        for byte in text.bytes() {
            cell.set(byte as i64, self);
            cell.putchar(self);
        }
    }

    /// Finish assembling, and return the program.
    pub fn finish(self) -> TapeProgram {
        debug_assert_eq!(self.program.check_loops(), Ok(()));
        debug!(
            "assembled {} ops, head left on {}",
            self.program.len(),
            self.cursor()
        );
        self.program
    }
}

/// Assemble an expression into a fresh program, rooted at `base`.
pub fn assemble(expr: &Expr, base: Cell) -> TapeProgram {
    let mut asm = Assembler::new();
    asm.assemble_expr(expr, base);
    asm.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal() {
        assert_eq!(assemble(&Expr::Literal(3), Cell(0)).to_string(), "[-]+++");
        assert_eq!(assemble(&Expr::Literal(0), Cell(2)).to_string(), ">>[-]");
    }

    #[test]
    fn test_literal_wraps_at_cell_size() {
        assert_eq!(assemble(&Expr::Literal(257), Cell(0)).to_string(), "[-]+");
        assert_eq!(assemble(&Expr::Literal(256), Cell(0)).to_string(), "[-]");
    }

    #[test]
    fn test_add() {
        let program = assemble(&Expr::literal(1).add(Expr::Literal(2)), Cell(0));
        assert_eq!(program.to_string(), "[-]+>[-]++[-<+>]<");
    }

    #[test]
    fn test_subtract() {
        let program = assemble(&Expr::literal(2).sub(Expr::Literal(1)), Cell(0));
        assert_eq!(program.to_string(), "[-]++>[-]+[-<->]<");
    }

    #[test]
    fn test_multiply() {
        let program = assemble(&Expr::literal(2).mul(Expr::Literal(3)), Cell(0));
        assert_eq!(
            program.to_string(),
            concat!(
                "[-]++>[-]+++",         // a = 2, b = 3
                ">[-]>[-]",             // clear the product and the copy of b
                "<<<[-",                // for each unit of a
                ">[->+>+<<]",           // move b into the product and the copy
                ">>[-<<+>>]",           // move the copy back into b
                "<<<]",
                ">>[-<<+>>]",           // move the product into a
                "<[-]<",                // clear b, and return to a
            )
        );
    }

    #[test]
    fn test_cursor_returns_to_base() {
        for expr in [
            Expr::Literal(9),
            Expr::literal(1).add(Expr::Literal(2)),
            Expr::literal(4).sub(Expr::literal(2).mul(Expr::Literal(2))),
            Expr::literal(1).add(Expr::Literal(2)).mul(Expr::literal(3).add(Expr::Literal(4))),
        ] {
            let mut asm = Assembler::new();
            asm.assemble_expr(&expr, Cell(5));
            assert_eq!(asm.cursor(), Cell(5), "after `{expr}`");
        }
    }

    #[test]
    fn test_move_to_is_minimal() {
        let mut asm = Assembler::new();
        asm.move_to(Cell(3));
        asm.move_to(Cell(1));
        asm.move_to(Cell(1));
        assert_eq!(asm.cursor(), Cell(1));
        assert_eq!(asm.finish().to_string(), ">>><<");
    }

    #[test]
    fn test_move_to_far_cells() {
        let mut asm = Assembler::new();
        asm.move_to(Cell(u16::MAX as usize));
        asm.move_to(Cell(0));
        assert_eq!(asm.cursor(), Cell(0));

        let program = asm.finish();
        assert_eq!(program.len(), 2 * u16::MAX as usize);
        assert!(program.to_string().starts_with('>'));
        assert!(program.to_string().ends_with('<'));
    }

    #[test]
    fn test_print_str() {
        let mut asm = Assembler::new();
        asm.move_to(Cell(10));
        asm.print_str("A=", PRINT_CELL);
        let expected = format!("{}[-]{}.[-]{}.", ">".repeat(10), "+".repeat(65), "+".repeat(61));
        assert_eq!(asm.finish().to_string(), expected);
    }

    #[test]
    fn test_annotations_are_comments_only() {
        let expr = Expr::literal(2).add(Expr::literal(3).mul(Expr::Literal(4)));
        let mut plain = Assembler::new();
        plain.assemble_expr(&expr, Cell(0));
        let mut annotated = Assembler::annotated();
        annotated.assemble_expr(&expr, Cell(0));

        let plain = plain.finish();
        let annotated = annotated.finish();
        assert_eq!(plain.to_string(), annotated.to_string());
        assert!(annotated
            .0
            .iter()
            .any(|op| matches!(op, TapeOp::Comment(c) if c == "#1 *= #2")));
        assert!(plain.0.iter().all(|op| !matches!(op, TapeOp::Comment(_))));
    }
}
