//! 表达式求值
//!
//! 两个值域：布尔与小数。叶子先按字面量解释，失败时作为变量名在主作用域、
//! 后备作用域中依次查找；都找不到时取该值域的零值。

use std::fmt;

use tracing::trace;

use crate::collections::KeyedList;
use crate::error::{NeaError, NeaResult};
use crate::tree::{looks_decimal, truncate_to_integer, Scalar, ValueNode};

use super::ast::{BinaryOp, Expression};

const TARGET: &str = "neakit::expr";

/// 求值上下文：主作用域与可选的后备作用域
#[derive(Debug, Clone, Copy)]
pub struct Scopes<'a> {
    pub primary: &'a KeyedList<ValueNode>,
    pub fallback: Option<&'a KeyedList<ValueNode>>,
}

impl<'a> Scopes<'a> {
    pub fn new(primary: &'a KeyedList<ValueNode>) -> Self {
        Self {
            primary,
            fallback: None,
        }
    }

    pub fn with_fallback(primary: &'a KeyedList<ValueNode>, fallback: &'a KeyedList<ValueNode>) -> Self {
        Self {
            primary,
            fallback: Some(fallback),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&'a ValueNode> {
        self.primary.get_or(name, self.fallback)
    }
}

/// 表达式结果的目标值域
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueDomain {
    Integer,
    Decimal,
    Boolean,
}

impl ValueDomain {
    pub fn name(&self) -> &'static str {
        match self {
            ValueDomain::Integer => "integer",
            ValueDomain::Decimal => "decimal",
            ValueDomain::Boolean => "boolean",
        }
    }

    /// 该值域的零值
    pub fn zero(&self) -> Primitive {
        match self {
            ValueDomain::Integer => Primitive::Integer(0),
            ValueDomain::Decimal => Primitive::Decimal(0.0),
            ValueDomain::Boolean => Primitive::Boolean(false),
        }
    }
}

/// 传给原生函数、由表达式求值产生的基本值
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
}

impl Primitive {
    pub fn domain(&self) -> ValueDomain {
        match self {
            Primitive::Integer(_) => ValueDomain::Integer,
            Primitive::Decimal(_) => ValueDomain::Decimal,
            Primitive::Boolean(_) => ValueDomain::Boolean,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Primitive::Integer(i) => Some(*i as f64),
            Primitive::Decimal(d) => Some(*d),
            Primitive::Boolean(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Primitive::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Scalar::from(*self), f)
    }
}

impl From<Primitive> for Scalar {
    fn from(value: Primitive) -> Self {
        match value {
            Primitive::Integer(i) => Scalar::Integer(i),
            Primitive::Decimal(d) => Scalar::Decimal(d),
            Primitive::Boolean(b) => Scalar::Boolean(b),
        }
    }
}

/// 表达式与其结果值域
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionHolder {
    pub expression: Expression,
    pub domain: ValueDomain,
}

impl ExpressionHolder {
    pub fn new(expression: Expression, domain: ValueDomain) -> Self {
        Self { expression, domain }
    }

    /// 求值并转换到声明的值域
    ///
    /// 整数向零截断；结果超出 `i64` 范围时返回 [`NeaError::Format`]。
    pub fn evaluate(&self, scopes: &Scopes<'_>) -> NeaResult<Primitive> {
        match self.domain {
            ValueDomain::Boolean => self.expression.evaluate_bool(scopes).map(Primitive::Boolean),
            ValueDomain::Decimal => self.expression.evaluate_decimal(scopes).map(Primitive::Decimal),
            ValueDomain::Integer => {
                let d = self.expression.evaluate_decimal(scopes)?;
                truncate_to_integer(d)
                    .map(Primitive::Integer)
                    .ok_or_else(|| NeaError::format(format!("{d:?}"), "integer"))
            }
        }
    }
}

impl fmt::Display for ExpressionHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.domain.name(), self.expression)
    }
}

impl Expression {
    /// 布尔求值
    ///
    /// 字面量只接受 `true`/`false`（大小写不敏感），其余作为变量名。
    /// `=` 与 `!=` 比较两边的数值。
    pub fn evaluate_bool(&self, scopes: &Scopes<'_>) -> NeaResult<bool> {
        match self {
            Expression::Literal(text) => {
                if text.eq_ignore_ascii_case("true") {
                    return Ok(true);
                }
                if text.eq_ignore_ascii_case("false") {
                    return Ok(false);
                }
                match scopes.lookup(text) {
                    Some(node) => node.as_bool(),
                    None => {
                        trace!(target: TARGET, name = %text, "Unbound variable, using false");
                        Ok(false)
                    }
                }
            }
            Expression::Negative(_) => Err(NeaError::EvaluationType {
                operator: "-",
                domain: ValueDomain::Boolean.name(),
            }),
            Expression::Binary { op, left, right } => match op {
                BinaryOp::And => Ok(left.evaluate_bool(scopes)? && right.evaluate_bool(scopes)?),
                BinaryOp::Or => Ok(left.evaluate_bool(scopes)? || right.evaluate_bool(scopes)?),
                BinaryOp::Equal => Ok(left.evaluate_decimal(scopes)? == right.evaluate_decimal(scopes)?),
                BinaryOp::Unequal => Ok(left.evaluate_decimal(scopes)? != right.evaluate_decimal(scopes)?),
                _ => Err(NeaError::EvaluationType {
                    operator: op.symbol(),
                    domain: ValueDomain::Boolean.name(),
                }),
            },
        }
    }

    /// 小数求值
    pub fn evaluate_decimal(&self, scopes: &Scopes<'_>) -> NeaResult<f64> {
        match self {
            Expression::Literal(text) => {
                if looks_decimal(text) {
                    if let Ok(value) = text.parse::<f64>() {
                        return Ok(value);
                    }
                }
                match scopes.lookup(text) {
                    Some(node) => node.as_decimal(),
                    None => {
                        trace!(target: TARGET, name = %text, "Unbound variable, using 0");
                        Ok(0.0)
                    }
                }
            }
            Expression::Negative(inner) => Ok(-inner.evaluate_decimal(scopes)?),
            Expression::Binary { op, left, right } => match op {
                BinaryOp::Plus => Ok(left.evaluate_decimal(scopes)? + right.evaluate_decimal(scopes)?),
                BinaryOp::Minus => Ok(left.evaluate_decimal(scopes)? - right.evaluate_decimal(scopes)?),
                BinaryOp::Multiply => Ok(left.evaluate_decimal(scopes)? * right.evaluate_decimal(scopes)?),
                BinaryOp::Divide => {
                    let l = left.evaluate_decimal(scopes)?;
                    let r = right.evaluate_decimal(scopes)?;
                    if r == 0.0 {
                        return Err(NeaError::DivideByZero);
                    }
                    Ok(l / r)
                }
                BinaryOp::And | BinaryOp::Or | BinaryOp::Equal | BinaryOp::Unequal => {
                    Err(NeaError::EvaluationType {
                        operator: op.symbol(),
                        domain: ValueDomain::Decimal.name(),
                    })
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(entries: &[(&str, &str)]) -> KeyedList<ValueNode> {
        entries
            .iter()
            .map(|(k, v)| ValueNode::leaf_from_text(*k, v))
            .collect()
    }

    fn decimal(text: &str, vars: &KeyedList<ValueNode>) -> NeaResult<f64> {
        Expression::parse(text)?.evaluate_decimal(&Scopes::new(vars))
    }

    fn boolean(text: &str, vars: &KeyedList<ValueNode>) -> NeaResult<bool> {
        Expression::parse(text)?.evaluate_bool(&Scopes::new(vars))
    }

    #[test]
    fn test_no_precedence() {
        let empty = KeyedList::new();
        assert_eq!(decimal("2 + 3 * 4", &empty).unwrap(), 20.0);
        assert_eq!(decimal("2 + (3 * 4)", &empty).unwrap(), 14.0);
        assert_eq!(decimal("10 - 4 - 3", &empty).unwrap(), 3.0);
    }

    #[test]
    fn test_variables() {
        let vars = scope(&[("hp", "12"), ("bonus", "0.5")]);
        assert_eq!(decimal("hp * 2 + bonus", &vars).unwrap(), 24.5);
        assert_eq!(decimal("-hp", &vars).unwrap(), -12.0);
    }

    #[test]
    fn test_missing_variable_defaults() {
        let empty = KeyedList::new();
        assert_eq!(decimal("missing + 1", &empty).unwrap(), 1.0);
        assert!(!boolean("missing", &empty).unwrap());
        assert!(boolean("missing | true", &empty).unwrap());
    }

    #[test]
    fn test_boolean_logic() {
        let vars = scope(&[("x", "true"), ("y", "false")]);
        assert!(!boolean("x & y", &vars).unwrap());
        assert!(boolean("x | y", &vars).unwrap());
        assert!(boolean("TRUE & x", &vars).unwrap());
    }

    #[test]
    fn test_numeric_equality() {
        let vars = scope(&[("a", "3"), ("b", "3.0"), ("c", "4")]);
        assert!(boolean("a = b", &vars).unwrap());
        assert!(boolean("a != c", &vars).unwrap());
        assert!(!boolean("a = c", &vars).unwrap());
        assert!(boolean("a + 1 = c", &vars).unwrap());
    }

    #[test]
    fn test_fallback_scope() {
        let primary = scope(&[("x", "1")]);
        let fallback = scope(&[("x", "100"), ("y", "2")]);
        let scopes = Scopes::with_fallback(&primary, &fallback);
        let expr = Expression::parse("x + y").unwrap();
        assert_eq!(expr.evaluate_decimal(&scopes).unwrap(), 3.0);
    }

    #[test]
    fn test_domain_mismatch() {
        let empty = KeyedList::new();
        assert!(matches!(
            boolean("1 + 2", &empty),
            Err(NeaError::EvaluationType { operator: "+", domain: "boolean" })
        ));
        assert!(matches!(
            decimal("true & false", &empty),
            Err(NeaError::EvaluationType { operator: "&", domain: "decimal" })
        ));
        assert!(matches!(boolean("-x", &empty), Err(NeaError::EvaluationType { .. })));
    }

    #[test]
    fn test_divide_by_zero() {
        let empty = KeyedList::new();
        assert!(matches!(decimal("1 / 0", &empty), Err(NeaError::DivideByZero)));
        assert_eq!(decimal("1 / 4", &empty).unwrap(), 0.25);
    }

    #[test]
    fn test_variable_type_mismatch() {
        let vars = scope(&[("name", "Archer")]);
        assert!(matches!(
            decimal("name + 1", &vars),
            Err(NeaError::TypeCoercion { .. })
        ));
    }

    #[test]
    fn test_holder_domains() {
        let vars = scope(&[("x", "7")]);
        let scopes = Scopes::new(&vars);
        let int = ExpressionHolder::new(Expression::parse("x / 2").unwrap(), ValueDomain::Integer);
        assert_eq!(int.evaluate(&scopes).unwrap(), Primitive::Integer(3));
        let dec = ExpressionHolder::new(Expression::parse("x / 2").unwrap(), ValueDomain::Decimal);
        assert_eq!(dec.evaluate(&scopes).unwrap(), Primitive::Decimal(3.5));
        let b = ExpressionHolder::new(Expression::parse("x = 7").unwrap(), ValueDomain::Boolean);
        assert_eq!(b.evaluate(&scopes).unwrap(), Primitive::Boolean(true));
        assert_eq!(b.to_string(), "boolean (x = 7)");
    }

    #[test]
    fn test_integer_domain_out_of_range() {
        let vars = scope(&[]);
        let scopes = Scopes::new(&vars);
        let int = ExpressionHolder::new(Expression::parse("1e300 * 10").unwrap(), ValueDomain::Integer);
        assert!(matches!(
            int.evaluate(&scopes),
            Err(NeaError::Format { expected: "integer", .. })
        ));
        let dec = ExpressionHolder::new(Expression::parse("1e300 * 10").unwrap(), ValueDomain::Decimal);
        assert!(matches!(dec.evaluate(&scopes), Ok(Primitive::Decimal(d)) if d > 1e300));
    }

    #[test]
    fn test_primitive_display() {
        assert_eq!(Primitive::Integer(5).to_string(), "5");
        assert_eq!(Primitive::Decimal(5.0).to_string(), "5.0");
        assert_eq!(Primitive::Boolean(true).to_string(), "true");
        assert_eq!(ValueDomain::Integer.zero(), Primitive::Integer(0));
    }
}
