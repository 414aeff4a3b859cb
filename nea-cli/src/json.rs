//! 值树到 JSON 的转换

use nea_core::{NodeBody, Scalar, ValueNode};
use serde_json::{Map, Number, Value};

/// 把一个节点的值转换为 JSON；复合节点成为按键排序的对象
pub fn node_value(node: &ValueNode) -> Value {
    match node.body() {
        NodeBody::Leaf(scalar) => scalar_value(scalar),
        NodeBody::Composite(children) => Value::Object(object(children)),
    }
}

/// 多个顶层节点合并为一个对象，同名节点后者覆盖前者
pub fn document<'a>(nodes: impl IntoIterator<Item = &'a ValueNode>) -> Value {
    Value::Object(object(nodes))
}

fn object<'a>(nodes: impl IntoIterator<Item = &'a ValueNode>) -> Map<String, Value> {
    nodes
        .into_iter()
        .filter(|node| !node.is_placeholder())
        .map(|node| (node.key().to_string(), node_value(node)))
        .collect()
}

fn scalar_value(scalar: &Scalar) -> Value {
    match scalar {
        Scalar::Text(text) => Value::String(text.clone()),
        Scalar::Integer(i) => Value::Number((*i).into()),
        Scalar::Decimal(d) => Number::from_f64(*d).map_or(Value::Null, Value::Number),
        Scalar::Boolean(b) => Value::Bool(*b),
    }
}
