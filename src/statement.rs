//! # Statement Module
//!
//! The driver: read one `NAME=EXPR` statement and build the program that
//! prints `NAME=`, computes `EXPR` on the tape, and prints the value of
//! `EXPR` in decimal.
//!
//! The printed digits come from [`Expr::eval`], not from the tape, so
//! they are exact even when the tape value itself has wrapped.
use crate::{
    asm::{Assembler, Cell, PRINT_CELL},
    error::{Error, Result},
    expr::Expr,
    parse::{parse_expr, ParseMode},
    vm::{TapeProgram, VirtualMachineProgram},
};

use log::{debug, info, warn};

/// The cell every expression is computed into.
pub const RESULT_CELL: Cell = Cell(0);

/// Options for compiling a statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// The cell used to build each printed character.
    pub print_cell: Cell,
    /// How strictly the expression is parsed.
    pub parse_mode: ParseMode,
    /// Mark each emitted block with a comment.
    pub annotate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            print_cell: PRINT_CELL,
            parse_mode: ParseMode::default(),
            annotate: false,
        }
    }
}

/// A parsed `NAME=EXPR` statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Statement {
    /// Everything before the first `=`.
    pub name: String,
    /// The expression after the first `=`.
    pub expr: Expr,
    /// The byte offset of the expression in the untrimmed input.
    pub expr_offset: usize,
}

impl Statement {
    /// Split a statement on its first `=` and parse the expression.
    ///
    /// Surrounding whitespace is trimmed first. Error offsets refer to
    /// the untrimmed input.
    pub fn parse(input: &str, mode: ParseMode) -> Result<Self> {
        let leading = input.len() - input.trim_start().len();
        let text = input.trim();
        let Some((name, expr_src)) = text.split_once('=') else {
            return Err(Error::MalformedStatement(text.to_string()));
        };

        let expr_offset = leading + name.len() + 1;
        let expr = parse_expr(expr_src, mode).map_err(|e| e.shifted(expr_offset))?;
        Ok(Self {
            name: name.to_string(),
            expr,
            expr_offset,
        })
    }
}

/// The result of compiling a statement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Compiled {
    pub statement: Statement,
    /// The value of the expression, as printed by the program.
    pub value: i64,
    pub program: TapeProgram,
}

/// Compile a `NAME=EXPR` statement into a tape program.
pub fn compile_statement(input: &str, config: &Config) -> Result<Compiled> {
    let statement = Statement::parse(input, config.parse_mode)?;
    let value = statement.expr.eval();
    debug!("`{}` evaluates to {value}", statement.expr);

    let scratch = RESULT_CELL.offset(statement.expr.scratch_cells());
    if scratch >= config.print_cell {
        warn!(
            "`{}` uses cells up to {scratch}, overlapping the print cell {}",
            statement.expr, config.print_cell
        );
    }

    let mut asm = if config.annotate {
        Assembler::annotated()
    } else {
        Assembler::new()
    };
    asm.print_str(&format!("{}=", statement.name), config.print_cell);
    asm.comment(&format!("compute {}", statement.expr));
    asm.assemble_expr(&statement.expr, RESULT_CELL);
    asm.print_str(&value.to_string(), config.print_cell);

    let program = asm.finish();
    info!("compiled `{}` into {} ops", statement.name, program.len());
    Ok(Compiled {
        statement,
        value,
        program,
    })
}

/// Compile a `NAME=EXPR` statement with the default configuration, and
/// return the program's op-codes.
pub fn compile(input: &str) -> Result<String> {
    Ok(compile_statement(input, &Config::default())?.program.to_string())
}
