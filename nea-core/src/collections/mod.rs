//! 容器

pub mod keyed_list;

pub use keyed_list::{Keyed, KeyedList, ValuePair};
