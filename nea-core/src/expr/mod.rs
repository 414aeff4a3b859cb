//! 表达式引擎
//!
//! 布尔与小数两个值域的二元表达式，严格左结合，没有优先级。

mod ast;
mod eval;
mod parse;

pub use ast::{BinaryOp, Expression};
pub use eval::{ExpressionHolder, Primitive, Scopes, ValueDomain};
