//! # Parsing Module
//!
//! A recursive-descent parser for arithmetic expressions, built out of
//! `nom` combinators. The grammar has the usual precedence, and every
//! operator is left-associative:
//!
//! ```text
//! expr   := term (('+'|'-') term)*
//! term   := factor ('*' factor)*
//! factor := '(' expr ')' | digits+
//! ```
//!
//! Characters are scanned directly; there is no separate token stream,
//! and whitespace is never skipped.
//!
//! ## Parse Modes
//!
//! [`ParseMode::Strict`] rejects an unclosed `(` and any input left over
//! after the expression. [`ParseMode::Lenient`] accepts both silently:
//! a missing `)` is assumed, and leftover input is ignored.
//!
//! ## Depth
//!
//! Every later stage walks the tree recursively, so no expression may be
//! deeper than [`MAX_DEPTH`]. Both nested parentheses and chained operators
//! count towards it.
use crate::{
    error::{Error, Result},
    expr::{Arithmetic, Expr},
};

use log::{debug, trace};
use nom::{
    character::complete::{char, digit1, one_of},
    combinator::map_opt,
    error::{ErrorKind, ParseError},
    IResult,
};

/// The deepest expression tree, and the most nested parentheses, the
/// parser accepts.
pub const MAX_DEPTH: usize = 256;

/// How forgiving the parser is about malformed parentheses and leftovers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ParseMode {
    /// Reject unclosed parentheses and trailing input.
    #[default]
    Strict,
    /// Assume missing closing parentheses and ignore trailing input.
    Lenient,
}

/// Parse a complete arithmetic expression.
///
/// Error offsets are relative to the start of `input`.
pub fn parse_expr(input: &str, mode: ParseMode) -> Result<Expr> {
    let parser = ExprParser { src: input, mode };
    let (rest, (expr, depth)) = parser.expr(input, 0).map_err(|e| parser.error(e))?;

    if !rest.is_empty() {
        match mode {
            ParseMode::Strict => {
                return Err(Error::TrailingInput {
                    offset: parser.offset(rest),
                    rest: rest.to_string(),
                })
            }
            ParseMode::Lenient => debug!("ignoring trailing input `{rest}`"),
        }
    }

    debug!("parsed expression of depth {depth}: {expr}");
    Ok(expr)
}

/// The reasons a parse can fail, anchored at the remaining input.
#[derive(Debug, Clone, PartialEq)]
enum SyntaxError<'a> {
    /// A plain `nom` failure, which the grammar always recovers from.
    Nom(&'a str, ErrorKind),
    /// A factor that is not a usable literal. The second field is the
    /// length of the offending digit run (zero if there were no digits).
    InvalidLiteral(&'a str, usize),
    /// The input starting at an unclosed `(`.
    UnclosedParenthesis(&'a str),
    /// The input starting at the `(` or operator that went past [`MAX_DEPTH`].
    TooDeep(&'a str),
}

impl<'a> ParseError<&'a str> for SyntaxError<'a> {
    fn from_error_kind(input: &'a str, kind: ErrorKind) -> Self {
        SyntaxError::Nom(input, kind)
    }

    fn append(_: &'a str, _: ErrorKind, other: Self) -> Self {
        other
    }
}

type ParseResult<'a, T> = IResult<&'a str, T, SyntaxError<'a>>;

/// An expression together with the depth of its tree.
type Measured = (Expr, usize);

struct ExprParser<'a> {
    src: &'a str,
    mode: ParseMode,
}

impl<'a> ExprParser<'a> {
    fn offset(&self, rest: &str) -> usize {
        self.src.len() - rest.len()
    }

    fn error(&self, err: nom::Err<SyntaxError<'a>>) -> Error {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => match e {
                SyntaxError::InvalidLiteral(rest, 0) | SyntaxError::Nom(rest, _) => {
                    Error::InvalidLiteral {
                        offset: self.offset(rest),
                        found: rest.chars().next().map(String::from).unwrap_or_default(),
                    }
                }
                SyntaxError::InvalidLiteral(rest, digits) => Error::InvalidLiteral {
                    offset: self.offset(rest),
                    found: rest[..digits].to_string(),
                },
                SyntaxError::UnclosedParenthesis(rest) => Error::UnclosedParenthesis {
                    offset: self.offset(rest),
                },
                SyntaxError::TooDeep(rest) => Error::NestingTooDeep {
                    offset: self.offset(rest),
                },
            },
            // Only streaming parsers ask for more input.
            nom::Err::Incomplete(_) => Error::InvalidLiteral {
                offset: self.src.len(),
                found: String::new(),
            },
        }
    }

    /// `expr := term (('+'|'-') term)*`
    fn expr(&self, input: &'a str, nesting: usize) -> ParseResult<'a, Measured> {
        let (mut input, (mut lhs, mut depth)) = self.term(input, nesting)?;
        while let Ok((rest, op)) = operator("+-")(input) {
            let (rest, (rhs, rhs_depth)) = self.term(rest, nesting)?;
            depth = deeper(input, depth, rhs_depth)?;
            lhs = Expr::binop(op, lhs, rhs);
            input = rest;
        }
        Ok((input, (lhs, depth)))
    }

    /// `term := factor ('*' factor)*`
    fn term(&self, input: &'a str, nesting: usize) -> ParseResult<'a, Measured> {
        let (mut input, (mut lhs, mut depth)) = self.factor(input, nesting)?;
        while let Ok((rest, op)) = operator("*")(input) {
            let (rest, (rhs, rhs_depth)) = self.factor(rest, nesting)?;
            depth = deeper(input, depth, rhs_depth)?;
            lhs = Expr::binop(op, lhs, rhs);
            input = rest;
        }
        Ok((input, (lhs, depth)))
    }

    /// `factor := '(' expr ')' | digits+`
    fn factor(&self, input: &'a str, nesting: usize) -> ParseResult<'a, Measured> {
        trace!("parsing factor at offset {}", self.offset(input));
        let Ok((rest, _)) = char::<_, SyntaxError>('(')(input) else {
            return literal(input).map(|(rest, expr)| (rest, (expr, 0)));
        };
        if nesting >= MAX_DEPTH {
            return Err(nom::Err::Failure(SyntaxError::TooDeep(input)));
        }

        let (rest, expr) = self.expr(rest, nesting + 1)?;
        match char::<_, SyntaxError>(')')(rest) {
            Ok((rest, _)) => Ok((rest, expr)),
            Err(_) if self.mode == ParseMode::Lenient => Ok((rest, expr)),
            Err(_) => Err(nom::Err::Failure(SyntaxError::UnclosedParenthesis(input))),
        }
    }
}

/// The depth of a binary node over subtrees of the given depths. `at` is
/// the input starting at the node's operator.
fn deeper(at: &str, lhs: usize, rhs: usize) -> core::result::Result<usize, nom::Err<SyntaxError<'_>>> {
    let depth = 1 + lhs.max(rhs);
    if depth > MAX_DEPTH {
        return Err(nom::Err::Failure(SyntaxError::TooDeep(at)));
    }
    Ok(depth)
}

/// Parse one of the given operator symbols.
fn operator<'a>(symbols: &'static str) -> impl FnMut(&'a str) -> ParseResult<'a, Arithmetic> {
    map_opt(one_of(symbols), Arithmetic::from_symbol)
}

/// Parse a run of decimal digits as an `i64` literal.
///
/// A missing digit run, or one too large for an `i64`, is fatal.
fn literal(input: &str) -> ParseResult<'_, Expr> {
    match digit1::<_, SyntaxError>(input) {
        Ok((rest, digits)) => match digits.parse::<i64>() {
            Ok(n) => Ok((rest, Expr::Literal(n))),
            Err(_) => Err(nom::Err::Failure(SyntaxError::InvalidLiteral(
                input,
                digits.len(),
            ))),
        },
        Err(_) => Err(nom::Err::Failure(SyntaxError::InvalidLiteral(input, 0))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Expr {
        parse_expr(input, ParseMode::Strict).unwrap()
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(parse("0"), Expr::Literal(0));
        assert_eq!(parse("007"), Expr::Literal(7));
        assert_eq!(parse("9223372036854775807"), Expr::Literal(i64::MAX));
    }

    #[test]
    fn test_parse_precedence() {
        assert_eq!(parse("2+3*4"), Expr::literal(2).add(Expr::literal(3).mul(Expr::Literal(4))));
        assert_eq!(parse("2*3+4"), Expr::literal(2).mul(Expr::Literal(3)).add(Expr::Literal(4)));
    }

    #[test]
    fn test_parse_left_associative() {
        assert_eq!(parse("10-4-3"), Expr::literal(10).sub(Expr::Literal(4)).sub(Expr::Literal(3)));
        assert_eq!(parse("2*3*4"), Expr::literal(2).mul(Expr::Literal(3)).mul(Expr::Literal(4)));
        assert_eq!(parse("1-2+3"), Expr::literal(1).sub(Expr::Literal(2)).add(Expr::Literal(3)));
    }

    #[test]
    fn test_parse_parentheses() {
        assert_eq!(
            parse("(1+2)*(3+4)"),
            Expr::literal(1).add(Expr::Literal(2)).mul(Expr::literal(3).add(Expr::Literal(4)))
        );
        assert_eq!(parse("((5))"), Expr::Literal(5));
        assert_eq!(parse("10-(4-3)"), Expr::literal(10).sub(Expr::literal(4).sub(Expr::Literal(3))));
    }

    #[test]
    fn test_invalid_literal() {
        for (input, offset, found) in [
            ("", 0, ""),
            ("+1", 0, "+"),
            ("1+", 2, ""),
            ("()", 1, ")"),
            ("2*x", 2, "x"),
            ("(1+)", 3, ")"),
            ("99999999999999999999", 0, "99999999999999999999"),
        ] {
            for mode in [ParseMode::Strict, ParseMode::Lenient] {
                assert_eq!(
                    parse_expr(input, mode),
                    Err(Error::InvalidLiteral {
                        offset,
                        found: found.to_string()
                    }),
                    "input `{input}` in {mode:?} mode"
                );
            }
        }
    }

    #[test]
    fn test_strict_unclosed_parenthesis() {
        assert_eq!(
            parse_expr("2*(1+2", ParseMode::Strict),
            Err(Error::UnclosedParenthesis { offset: 2 })
        );
    }

    #[test]
    fn test_lenient_unclosed_parenthesis() {
        assert_eq!(
            parse_expr("2*(1+2", ParseMode::Lenient),
            Ok(Expr::literal(2).mul(Expr::literal(1).add(Expr::Literal(2))))
        );
    }

    #[test]
    fn test_strict_trailing_input() {
        assert_eq!(
            parse_expr("1 + 2", ParseMode::Strict),
            Err(Error::TrailingInput {
                offset: 1,
                rest: " + 2".to_string()
            })
        );
        assert_eq!(
            parse_expr("1)", ParseMode::Strict),
            Err(Error::TrailingInput {
                offset: 1,
                rest: ")".to_string()
            })
        );
    }

    #[test]
    fn test_nesting_at_the_limit() {
        let src = format!("{}7{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(parse(&src), Expr::Literal(7));

        let src = format!("1{}", "+1".repeat(MAX_DEPTH));
        assert_eq!(parse(&src).eval(), MAX_DEPTH as i64 + 1);
    }

    #[test]
    fn test_deep_parentheses_are_rejected() {
        let n = 100_000;
        let src = format!("{}1{}", "(".repeat(n), ")".repeat(n));
        for mode in [ParseMode::Strict, ParseMode::Lenient] {
            assert_eq!(
                parse_expr(&src, mode),
                Err(Error::NestingTooDeep { offset: MAX_DEPTH })
            );
        }
    }

    #[test]
    fn test_long_operator_chains_are_rejected() {
        let src = format!("1{}", "*1".repeat(100_000));
        assert_eq!(
            parse_expr(&src, ParseMode::Strict),
            Err(Error::NestingTooDeep {
                offset: 1 + 2 * MAX_DEPTH
            })
        );
    }

    #[test]
    fn test_lenient_trailing_input() {
        assert_eq!(parse_expr("1 + 2", ParseMode::Lenient), Ok(Expr::Literal(1)));
        assert_eq!(parse_expr("3*4=5", ParseMode::Lenient), Ok(Expr::literal(3).mul(Expr::Literal(4))));
    }
}
