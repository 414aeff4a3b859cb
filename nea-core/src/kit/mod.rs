//! 基础工具：字符游标与扫描器

pub mod reader;
