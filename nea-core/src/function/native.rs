//! 原生函数注册表
//!
//! 宿主程序提供的回调，按名字在函数块解析时解析。回调接收按顺序排列的
//! 基本值，没有返回值。

use std::fmt;
use std::rc::Rc;

use crate::collections::{KeyedList, ValuePair};
use crate::expr::Primitive;

/// 原生回调
pub type NativeFn = Rc<dyn Fn(&[Primitive])>;

/// 名字到原生回调的映射
#[derive(Clone, Default)]
pub struct NativeRegistry {
    natives: KeyedList<ValuePair<String, NativeFn>>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册回调，同名的旧回调被替换
    pub fn register(&mut self, name: impl Into<String>, native: impl Fn(&[Primitive]) + 'static) -> &mut Self {
        let name = name.into();
        self.natives.remove(&name);
        self.natives.add(ValuePair::new(name, Rc::new(native) as NativeFn));
        self
    }

    pub fn get(&self, name: &str) -> Option<NativeFn> {
        self.natives.get_key(name).map(|pair| Rc::clone(pair.value()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.natives.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.natives.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.natives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.natives.is_empty()
    }
}

impl fmt::Debug for NativeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeRegistry")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
