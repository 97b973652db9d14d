//! # Tape Cells
//!
//! A [`Cell`] is a fixed position on the tape. Each operation here moves
//! the head to the cells it touches before touching them, so the
//! [`Assembler`]'s cursor always matches the real head.
//!
//! The arithmetic operations are *destructive*: the source operand is
//! drained to zero one unit at a time. Nothing may read a source cell
//! again after it has been folded into its destination.
use super::Assembler;
use crate::vm::VirtualMachineProgram;
use core::fmt;

/// The number of values a single cell can hold.
pub const CELL_SIZE: i64 = 256;

/// A fixed position on the tape.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Cell(pub usize);

impl Cell {
    /// The cell `n` positions to the right of this one.
    pub fn offset(&self, n: usize) -> Self {
        Cell(self.0 + n)
    }

    /// Move the head to this cell.
    pub fn to(&self, asm: &mut Assembler) {
        asm.move_to(*self)
    }

    /// Increment this cell.
    pub fn inc(&self, asm: &mut Assembler) {
        self.to(asm);
        asm.inc();
    }

    /// Decrement this cell.
    pub fn dec(&self, asm: &mut Assembler) {
        self.to(asm);
        asm.dec();
    }

    /// Write this cell as a character.
    pub fn putchar(&self, asm: &mut Assembler) {
        self.to(asm);
        asm.putchar();
    }

    /// Repeat `body` while this cell is non-zero. The head is on this
    /// cell when the loop is tested, both on entry and after each pass.
    pub fn while_nonzero(&self, asm: &mut Assembler, body: impl FnOnce(&mut Assembler)) {
        self.to(asm);
        asm.begin_while();
        body(asm);
        self.to(asm);
        asm.end();
    }

    /// Set this cell to zero, whatever it held before. Zeroing twice is
    /// the same as zeroing once.
    pub fn zero(&self, asm: &mut Assembler) {
        self.while_nonzero(asm, |asm| asm.dec());
    }

    /// Set this cell to `value` (mod 256), whatever it held before.
    ///
    /// Only the residue is emitted: adding `value` and `value mod 256`
    /// leave a byte cell in the same state.
    pub fn set(&self, value: i64, asm: &mut Assembler) {
        self.zero(asm);
        for _ in 0..value.rem_euclid(CELL_SIZE) {
            asm.inc();
        }
    }

    /// `dst += self`, leaving this cell zero and the head on `dst`.
    pub fn add_to(&self, dst: Cell, asm: &mut Assembler) {
        self.while_nonzero(asm, |asm| {
            asm.dec();
            dst.inc(asm);
        });
        dst.to(asm);
    }

    /// `dst -= self`, leaving this cell zero and the head on `dst`.
    pub fn sub_from(&self, dst: Cell, asm: &mut Assembler) {
        self.while_nonzero(asm, |asm| {
            asm.dec();
            dst.dec(asm);
        });
        dst.to(asm);
    }

    /// `self *= rhs` by repeated addition.
    ///
    /// For each unit drained from this cell, `rhs` is drained into both
    /// `product` and `copy`, and then `copy` is drained back into `rhs` so
    /// it survives for the next unit. Afterwards the product is moved into
    /// this cell and `rhs` is cleared. `rhs`, `product` and `copy` are all
    /// zero when this returns, and the head is on this cell.
    pub fn mul_by(&self, rhs: Cell, product: Cell, copy: Cell, asm: &mut Assembler) {
        product.zero(asm);
        copy.zero(asm);
        self.while_nonzero(asm, |asm| {
            self.dec(asm);
            rhs.while_nonzero(asm, |asm| {
                asm.dec();
                product.inc(asm);
                copy.inc(asm);
            });
            copy.while_nonzero(asm, |asm| {
                asm.dec();
                rhs.inc(asm);
            });
        });
        product.while_nonzero(asm, |asm| {
            asm.dec();
            self.inc(asm);
        });
        rhs.zero(asm);
        self.to(asm);
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
