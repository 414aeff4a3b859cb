//! 表达式解析
//!
//! ```text
//! expression := term (op term)*
//! term       := '(' expression ')' | '-' term | literalOrVarName
//! ```
//! 运算数读到下一个运算符、空白、`;` 或 `]` 为止。

use std::io::BufRead;

use nea_config::Phase;
use tracing::trace;

use crate::error::{NeaError, NeaResult};
use crate::kit::reader::Scanner;
use crate::tree::looks_decimal;

use super::ast::{BinaryOp, Expression};

const TARGET: &str = "neakit::expr";

/// 运算数的终止字符（空白之外）
const TOKEN_STOPS: [char; 10] = ['&', '|', '=', '!', '+', '-', '*', '/', ';', ']'];

impl Expression {
    /// 解析完整文本，剩余无法识别的内容视为语法错误
    pub fn parse(text: &str) -> NeaResult<Expression> {
        let mut scanner = Scanner::from_text(text);
        let expr = Self::parse_from(&mut scanner)?;
        scanner.skip_whitespace();
        match scanner.peek() {
            None => Ok(expr),
            Some(c) => Err(NeaError::syntax(
                Phase::Expression,
                format!("unrecognized operator '{c}'"),
                scanner.position(),
            )),
        }
    }

    /// 从扫描器解析一个表达式，停在第一个不是运算符的字符前
    pub fn parse_from<R: BufRead>(scanner: &mut Scanner<R>) -> NeaResult<Expression> {
        let mut left = Self::parse_operand(scanner)?;
        loop {
            scanner.skip_whitespace();
            let Some(op) = scanner.peek().and_then(BinaryOp::from_char) else {
                break;
            };
            scanner.next_char();
            if matches!(op, BinaryOp::Equal | BinaryOp::Unequal) {
                // 同时接受 `==` 与 `!=`
                scanner.match_char('=');
            }
            let right = Self::parse_operand(scanner)?;
            left = Expression::binary(op, left, right);
        }
        trace!(target: TARGET, expr = %left, "Parsed expression");
        Ok(left)
    }

    fn parse_operand<R: BufRead>(scanner: &mut Scanner<R>) -> NeaResult<Expression> {
        scanner.skip_whitespace();
        let position = scanner.position();

        if scanner.check('(') {
            let mut section = scanner.enter_section('(', ')')?;
            let inner = Self::parse_from(&mut section)?;
            section.skip_whitespace();
            if let Some(c) = section.peek() {
                return Err(NeaError::syntax(
                    Phase::Expression,
                    format!("unrecognized operator '{c}'"),
                    section.position(),
                ));
            }
            return Ok(inner);
        }

        if scanner.match_char('-') {
            return Ok(match Self::parse_operand(scanner)? {
                Expression::Literal(text) if looks_decimal(&text) && !text.starts_with(&['-', '+'][..]) => {
                    Expression::Literal(format!("-{text}"))
                }
                other => Expression::Negative(Box::new(other)),
            });
        }

        let token = scanner.read_until_whitespace_or(&TOKEN_STOPS, false);
        if token.is_empty() {
            let found = scanner
                .peek()
                .map_or_else(|| "end of input".to_string(), |c| format!("'{c}'"));
            return Err(NeaError::syntax(
                Phase::Expression,
                format!("expected an operand, found {found}"),
                position,
            ));
        }
        Ok(Expression::Literal(token))
    }
}
