//! NeaKit Core - data language, expressions and function blocks (pure logic)
//!
//! Contains the character reader, the value tree, the expression engine and
//! the statement engine. Text comes in through [`std::io::BufRead`] or `&str`;
//! nothing here touches files or the terminal.
//!
//! Configuration is passed explicitly via parameters, not via global state.

pub mod collections;
pub mod error;
pub mod expr;
pub mod function;
pub mod kit;
pub mod tree;

// Re-export common types
pub use collections::{Keyed, KeyedList, ValuePair};
pub use error::{NeaError, NeaResult};
pub use expr::{BinaryOp, Expression, ExpressionHolder, Primitive, Scopes, ValueDomain};
pub use function::{FunctionDef, NativeFn, NativeRegistry, Statement};
pub use kit::reader::{Scanner, SourcePosition};
pub use tree::{NodeBody, ParseMode, Scalar, ValueNode};

// Re-export config types from nea-config
pub use nea_config::{EngineConfig, Phase, WritePolicy};
