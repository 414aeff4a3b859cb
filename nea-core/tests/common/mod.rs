//! 测试辅助工具
//!
//! 提供记录原生函数调用的注册表和作用域构造函数

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use nea_core::{KeyedList, NativeRegistry, Primitive, ValueNode};

/// 原生函数调用记录：(函数名, 参数)
pub type CallLog = Rc<RefCell<Vec<(String, Vec<Primitive>)>>>;

/// 注册记录调用的原生函数
pub fn recording_natives(names: &[&str]) -> (NativeRegistry, CallLog) {
    let log: CallLog = Rc::new(RefCell::new(Vec::new()));
    let mut natives = NativeRegistry::new();
    for name in names {
        let sink = Rc::clone(&log);
        let owned = name.to_string();
        natives.register(*name, move |args: &[Primitive]| {
            sink.borrow_mut().push((owned.clone(), args.to_vec()));
        });
    }
    (natives, log)
}

/// 从 (键, 文本) 构造作用域
pub fn scope(entries: &[(&str, &str)]) -> KeyedList<ValueNode> {
    entries
        .iter()
        .map(|(key, text)| ValueNode::leaf_from_text(*key, text))
        .collect()
}

/// 取出记录的参数，全部读作小数
pub fn decimals(args: &[Primitive]) -> Vec<f64> {
    args.iter().filter_map(Primitive::as_decimal).collect()
}
