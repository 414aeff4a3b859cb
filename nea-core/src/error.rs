//! 统一错误类型
//!
//! 所有解析与求值操作都返回 [`NeaResult`]。变量查找失败不是错误：
//! 缺失的变量按所在值域的零值处理。

use std::io;

use nea_config::Phase;
use thiserror::Error;

use crate::kit::reader::SourcePosition;

/// NeaKit 错误类型
#[derive(Error, Debug)]
pub enum NeaError {
    /// 括号/终止符结构错误、无法识别的运算符、未知语句
    #[error("[{position}] {message}")]
    Syntax {
        phase: Phase,
        message: String,
        position: SourcePosition,
    },

    /// 字面量无法解析为目标类型
    #[error("cannot parse '{text}' as {expected}")]
    Format { text: String, expected: &'static str },

    /// 调用参数个数不匹配
    #[error("function '{function}' expects {expected} argument(s), got {found}")]
    Arity {
        function: String,
        expected: usize,
        found: usize,
    },

    /// 运算符在请求的值域中无意义
    #[error("operator '{operator}' cannot produce a {domain} value")]
    EvaluationType {
        operator: &'static str,
        domain: &'static str,
    },

    /// 存储的标量无法满足请求的类型
    #[error("value '{value}' of '{key}' cannot be read as {requested}")]
    TypeCoercion {
        key: String,
        value: String,
        requested: &'static str,
    },

    #[error("division by zero")]
    DivideByZero,

    /// 底层 reader 的 I/O 错误
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// NeaKit 结果类型
pub type NeaResult<T> = Result<T, NeaError>;

impl NeaError {
    pub fn syntax(phase: Phase, message: impl Into<String>, position: SourcePosition) -> Self {
        NeaError::Syntax {
            phase,
            message: message.into(),
            position,
        }
    }

    pub fn format(text: impl Into<String>, expected: &'static str) -> Self {
        NeaError::Format {
            text: text.into(),
            expected,
        }
    }

    /// 获取错误所属阶段
    pub fn phase(&self) -> Phase {
        match self {
            NeaError::Syntax { phase, .. } => *phase,
            NeaError::Format { .. } | NeaError::Io(_) => Phase::Reader,
            NeaError::Arity { .. } => Phase::Function,
            NeaError::EvaluationType { .. } | NeaError::DivideByZero => Phase::Expression,
            NeaError::TypeCoercion { .. } => Phase::Tree,
        }
    }

    /// 获取错误行号（如果有）
    pub fn line(&self) -> Option<usize> {
        self.position().map(|p| p.line)
    }

    /// 获取错误列号（如果有）
    pub fn column(&self) -> Option<usize> {
        self.position().map(|p| p.column)
    }

    fn position(&self) -> Option<SourcePosition> {
        match self {
            NeaError::Syntax { position, .. } => Some(*position),
            _ => None,
        }
    }
}
