//! 值树节点

use std::fmt;

use crate::collections::{Keyed, KeyedList};
use crate::error::{NeaError, NeaResult};

use super::scalar::Scalar;

/// 节点内容：标量或子节点，二者只有其一
#[derive(Debug, Clone, PartialEq)]
pub enum NodeBody {
    Leaf(Scalar),
    Composite(KeyedList<ValueNode>),
}

/// 值树节点
///
/// 叶子形如 `Key: value;`，复合节点形如 `[Key: child*]`。
/// 复合节点的子节点按键排序且键唯一。
#[derive(Debug, Clone, PartialEq)]
pub struct ValueNode {
    key: String,
    body: NodeBody,
}

impl Keyed for ValueNode {
    type Key = str;

    fn key(&self) -> &str {
        &self.key
    }
}

impl ValueNode {
    pub fn leaf(key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            key: key.into(),
            body: NodeBody::Leaf(value.into()),
        }
    }

    /// 从文本构造叶子，按整数、小数、文本的顺序推断类型
    pub fn leaf_from_text(key: impl Into<String>, text: &str) -> Self {
        Self::leaf(key, Scalar::infer(text))
    }

    /// 构造复合节点；重复键以后出现的为准
    pub fn composite(key: impl Into<String>, children: impl IntoIterator<Item = ValueNode>) -> Self {
        let mut node = Self {
            key: key.into(),
            body: NodeBody::Composite(KeyedList::new()),
        };
        if let NodeBody::Composite(list) = &mut node.body {
            for child in children {
                insert_unique(list, child);
            }
        }
        node
    }

    /// 输入格式错误时产生的占位节点：空键、空文本
    pub fn placeholder() -> Self {
        Self::leaf(String::new(), Scalar::default())
    }

    pub fn is_placeholder(&self) -> bool {
        self.key.is_empty() && matches!(&self.body, NodeBody::Leaf(Scalar::Text(t)) if t.is_empty())
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn body(&self) -> &NodeBody {
        &self.body
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.body, NodeBody::Leaf(_))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.body, NodeBody::Composite(_))
    }

    pub fn scalar(&self) -> Option<&Scalar> {
        match &self.body {
            NodeBody::Leaf(value) => Some(value),
            NodeBody::Composite(_) => None,
        }
    }

    /// 子节点列表；叶子返回 `None`
    pub fn children(&self) -> Option<&KeyedList<ValueNode>> {
        match &self.body {
            NodeBody::Composite(list) => Some(list),
            NodeBody::Leaf(_) => None,
        }
    }

    /// 子节点个数，叶子为 0
    pub fn len(&self) -> usize {
        self.children().map_or(0, KeyedList::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &str) -> Option<&ValueNode> {
        self.children().and_then(|list| list.get_key(key))
    }

    /// 按键读取子节点，不存在时查询后备列表
    pub fn get_or<'a>(
        &'a self,
        key: &str,
        fallback: Option<&'a KeyedList<ValueNode>>,
    ) -> Option<&'a ValueNode> {
        match self.children() {
            Some(list) => list.get_or(key, fallback),
            None => fallback.and_then(|list| list.get_key(key)),
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ValueNode> {
        match &mut self.body {
            NodeBody::Composite(list) => list.get_key_mut(key),
            NodeBody::Leaf(_) => None,
        }
    }

    pub fn child_at(&self, index: usize) -> Option<&ValueNode> {
        self.children().and_then(|list| list.get(index))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// 添加子节点，替换同键的旧节点
    pub fn add(&mut self, child: ValueNode) -> NeaResult<()> {
        match &mut self.body {
            NodeBody::Composite(list) => {
                insert_unique(list, child);
                Ok(())
            }
            NodeBody::Leaf(value) => Err(NeaError::TypeCoercion {
                key: self.key.clone(),
                value: value.to_string(),
                requested: "composite",
            }),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<ValueNode> {
        match &mut self.body {
            NodeBody::Composite(list) => list.remove(key),
            NodeBody::Leaf(_) => None,
        }
    }

    /// 设置标量值，节点变为叶子
    pub fn set_scalar(&mut self, value: impl Into<Scalar>) {
        self.body = NodeBody::Leaf(value.into());
    }

    /// 从文本设置标量值（推断类型）
    pub fn set_text(&mut self, text: &str) {
        self.set_scalar(Scalar::infer(text));
    }

    pub fn as_text(&self) -> NeaResult<String> {
        self.leaf_value("text").map(Scalar::as_text)
    }

    pub fn as_integer(&self) -> NeaResult<i64> {
        let value = self.leaf_value("integer")?;
        value.as_integer().ok_or_else(|| self.coercion_error(value, "integer"))
    }

    pub fn as_decimal(&self) -> NeaResult<f64> {
        let value = self.leaf_value("decimal")?;
        value.as_decimal().ok_or_else(|| self.coercion_error(value, "decimal"))
    }

    pub fn as_bool(&self) -> NeaResult<bool> {
        let value = self.leaf_value("boolean")?;
        value.as_bool().ok_or_else(|| self.coercion_error(value, "boolean"))
    }

    /// 以空白分隔的单词列表
    pub fn as_string_list(&self) -> NeaResult<Vec<String>> {
        Ok(self
            .as_text()?
            .split_whitespace()
            .map(str::to_string)
            .collect())
    }

    /// 序列化为行：叶子一行，复合节点每个子行缩进一个制表符
    pub fn to_lines(&self) -> Vec<String> {
        match &self.body {
            NodeBody::Leaf(value) => vec![format!("{}: {};", self.key, value)],
            NodeBody::Composite(list) => {
                let mut lines = vec![format!("[{}:", self.key)];
                for child in list {
                    lines.extend(child.to_lines().into_iter().map(|line| format!("\t{line}")));
                }
                lines.push("]".to_string());
                lines
            }
        }
    }

    /// 序列化为文本，每行前加 `indent` 个制表符
    pub fn save(&self, indent: usize) -> String {
        let prefix = "\t".repeat(indent);
        self.to_lines()
            .iter()
            .map(|line| format!("{prefix}{line}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn leaf_value(&self, requested: &'static str) -> NeaResult<&Scalar> {
        self.scalar().ok_or_else(|| NeaError::TypeCoercion {
            key: self.key.clone(),
            value: format!("<{} children>", self.len()),
            requested,
        })
    }

    fn coercion_error(&self, value: &Scalar, requested: &'static str) -> NeaError {
        NeaError::TypeCoercion {
            key: self.key.clone(),
            value: value.to_string(),
            requested,
        }
    }
}

impl fmt::Display for ValueNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.save(0))
    }
}

fn insert_unique(list: &mut KeyedList<ValueNode>, child: ValueNode) {
    list.remove(child.key.as_str());
    list.add(child);
}
