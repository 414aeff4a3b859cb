//! 值树：带键的标量叶子与可嵌套的复合节点

mod node;
mod parse;
mod scalar;

pub use node::{NodeBody, ValueNode};
pub use parse::ParseMode;
pub use scalar::Scalar;

pub(crate) use scalar::{looks_decimal, truncate_to_integer};
