//! 函数块
//!
//! 函数块由参数声明、带类型的局部变量赋值和原生函数调用组成。
//! 原生函数由宿主通过 [`NativeRegistry`] 提供，在解析时按名字解析。

mod definition;
mod native;
mod statement;

pub use definition::FunctionDef;
pub use native::{NativeFn, NativeRegistry};
pub use statement::{Keyword, Statement};
