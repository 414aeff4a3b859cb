//! 表达式树

use std::fmt;

/// 二元运算符
///
/// 没有优先级：所有运算符严格从左到右结合。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Equal,
    Unequal,
    Plus,
    Minus,
    Multiply,
    Divide,
}

impl BinaryOp {
    pub const SYMBOLS: [char; 8] = ['&', '|', '=', '!', '+', '-', '*', '/'];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '&' => Some(BinaryOp::And),
            '|' => Some(BinaryOp::Or),
            '=' => Some(BinaryOp::Equal),
            '!' => Some(BinaryOp::Unequal),
            '+' => Some(BinaryOp::Plus),
            '-' => Some(BinaryOp::Minus),
            '*' => Some(BinaryOp::Multiply),
            '/' => Some(BinaryOp::Divide),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::And => "&",
            BinaryOp::Or => "|",
            BinaryOp::Equal => "=",
            BinaryOp::Unequal => "!=",
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
        }
    }

    /// 结果是否为布尔值（逻辑运算与比较）
    pub fn is_boolean(&self) -> bool {
        matches!(
            self,
            BinaryOp::And | BinaryOp::Or | BinaryOp::Equal | BinaryOp::Unequal
        )
    }
}

/// 表达式
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// 字面量或变量名，求值时按需解释
    Literal(String),
    /// 取负，只能在数值域求值
    Negative(Box<Expression>),
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
}

impl Expression {
    pub fn literal(text: impl Into<String>) -> Self {
        Expression::Literal(text.into())
    }

    pub fn binary(op: BinaryOp, left: Expression, right: Expression) -> Self {
        Expression::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expression::Literal(_))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Literal(text) => f.write_str(text),
            Expression::Negative(inner) => write!(f, "-{inner}"),
            Expression::Binary { op, left, right } => {
                write!(f, "({left} {} {right})", op.symbol())
            }
        }
    }
}
