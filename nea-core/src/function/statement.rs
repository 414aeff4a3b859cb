//! 语句与关键字

use std::fmt;

use crate::expr::{ExpressionHolder, ValueDomain};

use super::native::NativeFn;

/// 语句关键字
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    Param,
    Bool,
    Int,
    Decimal,
}

impl Keyword {
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "param" => Some(Keyword::Param),
            "bool" => Some(Keyword::Bool),
            "int" => Some(Keyword::Int),
            "decimal" => Some(Keyword::Decimal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Param => "param",
            Keyword::Bool => "bool",
            Keyword::Int => "int",
            Keyword::Decimal => "decimal",
        }
    }

    /// 关键字决定的值域；`param` 没有值域
    pub fn domain(&self) -> Option<ValueDomain> {
        match self {
            Keyword::Param => None,
            Keyword::Bool => Some(ValueDomain::Boolean),
            Keyword::Int => Some(ValueDomain::Integer),
            Keyword::Decimal => Some(ValueDomain::Decimal),
        }
    }
}

/// 可执行语句
#[derive(Clone)]
pub enum Statement {
    /// 将表达式结果写入变量
    Assignment {
        target: String,
        holder: ExpressionHolder,
    },
    /// 调用原生函数
    Call {
        name: String,
        native: NativeFn,
        args: Vec<ExpressionHolder>,
    },
}

impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Assignment { target, holder } => f
                .debug_struct("Assignment")
                .field("target", target)
                .field("holder", holder)
                .finish(),
            Statement::Call { name, args, .. } => f
                .debug_struct("Call")
                .field("name", name)
                .field("args", args)
                .finish_non_exhaustive(),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Assignment { target, holder } => {
                write!(f, "{target} <- {holder}")
            }
            Statement::Call { name, args, .. } => {
                let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                write!(f, "{name}[{}]", args.join("; "))
            }
        }
    }
}
