//! 按键排序的动态数组
//!
//! 每次插入后整体保持按键升序；键查找使用标准二分查找，
//! 找不到时可以委托给一个后备列表。允许重复键，重复键之间的查找结果不作保证。
//!
//! 键可以是任意 `Ord` 类型。查找参数与 `BTreeMap` 一样通过 [`Borrow`]
//! 匹配，`String` 键的列表可以直接用 `&str` 查找。

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::slice;

use tracing::trace;

const TARGET: &str = "neakit::tree";

/// 默认容量
pub const DEFAULT_CAPACITY: usize = 16;

/// 带有可排序键的值
pub trait Keyed {
    type Key: Ord + ?Sized;

    fn key(&self) -> &Self::Key;
}

/// 按键排序的列表
#[derive(Clone, PartialEq)]
pub struct KeyedList<V> {
    items: Vec<V>,
    /// 逻辑容量，始终为 2 的幂
    capacity: usize,
}

impl<V: Keyed> KeyedList<V> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// 创建空列表，容量向上取整到 2 的幂
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1).next_power_of_two();
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 按位置读取；越界返回 `None`
    pub fn get(&self, index: usize) -> Option<&V> {
        self.items.get(index)
    }

    /// 按键读取
    pub fn get_key<Q>(&self, key: &Q) -> Option<&V>
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position_of(key).map(|i| &self.items[i])
    }

    /// 按键读取，本列表中没有时查询后备列表
    pub fn get_or<'a, Q>(&'a self, key: &Q, fallback: Option<&'a KeyedList<V>>) -> Option<&'a V>
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get_key(key)
            .or_else(|| fallback.and_then(|list| list.get_key(key)))
    }

    /// 按键读取可变引用
    ///
    /// 不能通过该引用修改键，否则排序不变式被破坏。
    pub fn get_key_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        match self.position_of(key) {
            Some(i) => self.items.get_mut(i),
            None => None,
        }
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.position_of(key).is_some()
    }

    /// 追加到末尾，然后向左冒泡直到恢复有序
    pub fn add(&mut self, item: V) {
        if self.items.len() >= self.capacity {
            self.capacity *= 2;
            self.items.reserve_exact(self.capacity - self.items.len());
            trace!(target: TARGET, capacity = self.capacity, "KeyedList grown");
        }
        self.items.push(item);

        let mut pos = self.items.len() - 1;
        while pos > 0 && self.items[pos].key() < self.items[pos - 1].key() {
            self.items.swap(pos, pos - 1);
            pos -= 1;
        }
    }

    pub fn add_all(&mut self, items: impl IntoIterator<Item = V>) {
        for item in items {
            self.add(item);
        }
    }

    /// 线性查找并移除第一个键为 `key` 的元素，后续元素左移
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let pos = self
            .items
            .iter()
            .position(|item| compare_key(item, key) == Ordering::Equal)?;
        Some(self.items.remove(pos))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn iter(&self) -> slice::Iter<'_, V> {
        self.items.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &V::Key> {
        self.items.iter().map(Keyed::key)
    }

    pub fn as_slice(&self) -> &[V] {
        &self.items
    }

    fn position_of<Q>(&self, key: &Q) -> Option<usize>
    where
        V::Key: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.items.binary_search_by(|item| compare_key(item, key)).ok()
    }
}

fn compare_key<V, Q>(item: &V, key: &Q) -> Ordering
where
    V: Keyed,
    V::Key: Borrow<Q>,
    Q: Ord + ?Sized,
{
    Ord::cmp(<V::Key as Borrow<Q>>::borrow(item.key()), key)
}

impl<V: Keyed> Default for KeyedList<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Keyed> FromIterator<V> for KeyedList<V> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut list = Self::new();
        list.add_all(iter);
        list
    }
}

impl<V: Keyed> Extend<V> for KeyedList<V> {
    fn extend<I: IntoIterator<Item = V>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

impl<'a, V> IntoIterator for &'a KeyedList<V> {
    type Item = &'a V;
    type IntoIter = slice::Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<V: fmt::Debug> fmt::Debug for KeyedList<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

/// 通用键值对
#[derive(Debug, Clone, PartialEq)]
pub struct ValuePair<K, V> {
    key: K,
    value: V,
}

impl<K, V> ValuePair<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }

    pub fn into_value(self) -> V {
        self.value
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut V {
        &mut self.value
    }
}

impl<K: Ord, V> Keyed for ValuePair<K, V> {
    type Key = K;

    fn key(&self) -> &K {
        &self.key
    }
}
