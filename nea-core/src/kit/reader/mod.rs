//! 文本读取器
//!
//! 分两层：
//! - [`CharCursor`]：按行缓冲的字符游标，统一换行符，提供 EOF 哨兵
//! - [`Scanner`]：在游标之上实现空白跳过、"读到终止符"、括号段提取等原语

pub mod cursor;
pub mod position;
pub mod scanner;

pub use cursor::{CharCursor, StreamResult};
pub use position::SourcePosition;
pub use scanner::{parse_boolean, section_of, Scanner, SectionScanner};
