//! 叶子节点的标量值

use std::fmt;

use crate::kit::reader::parse_boolean;

/// 标量：文本、整数、小数或布尔
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Boolean(bool),
}

impl Scalar {
    /// 从文本推断类型：整数优先，其次小数，否则保留为文本
    pub fn infer(text: &str) -> Self {
        let trimmed = text.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Scalar::Integer(i);
        }
        if looks_decimal(trimmed) {
            if let Ok(d) = trimmed.parse::<f64>() {
                return Scalar::Decimal(d);
            }
        }
        Scalar::Text(text.to_string())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Scalar::Text(_) => "text",
            Scalar::Integer(_) => "integer",
            Scalar::Decimal(_) => "decimal",
            Scalar::Boolean(_) => "boolean",
        }
    }

    /// 小数向零截断；超出 `i64` 范围的小数、布尔值和非整数文本返回 `None`
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Scalar::Integer(i) => Some(*i),
            Scalar::Decimal(d) => truncate_to_integer(*d),
            Scalar::Text(t) => t.trim().parse().ok(),
            Scalar::Boolean(_) => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Scalar::Integer(i) => Some(*i as f64),
            Scalar::Decimal(d) => Some(*d),
            Scalar::Text(t) => {
                let t = t.trim();
                if looks_decimal(t) {
                    t.parse().ok()
                } else {
                    None
                }
            }
            Scalar::Boolean(_) => None,
        }
    }

    /// 文本按宽松布尔词汇解析；数值不能读作布尔
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Boolean(b) => Some(*b),
            Scalar::Text(t) => parse_boolean(t.trim()).ok(),
            Scalar::Integer(_) | Scalar::Decimal(_) => None,
        }
    }

    pub fn as_text(&self) -> String {
        self.to_string()
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Text(String::new())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Text(t) => f.write_str(t),
            Scalar::Integer(i) => write!(f, "{i}"),
            // Debug 格式保留小数点（3.0 而不是 3），重新解析时仍为小数
            Scalar::Decimal(d) => write!(f, "{d:?}"),
            Scalar::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(text: &str) -> Self {
        Scalar::infer(text)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Integer(i)
    }
}

impl From<f64> for Scalar {
    fn from(d: f64) -> Self {
        Scalar::Decimal(d)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Boolean(b)
    }
}

/// 向零截断为整数；非有限值或超出 `i64` 范围时返回 `None`
pub(crate) fn truncate_to_integer(d: f64) -> Option<i64> {
    // i64::MAX as f64 向上取整为 2^63，本身已越界
    const UPPER: f64 = i64::MAX as f64;
    const LOWER: f64 = i64::MIN as f64;
    let t = d.trunc();
    if t.is_finite() && (LOWER..UPPER).contains(&t) {
        Some(t as i64)
    } else {
        None
    }
}

/// 小数字面量：只含数字、符号、小数点和指数符号，且至少有一位数字
///
/// 排除 `inf`、`NaN` 这类 `f64::from_str` 能接受的单词。
pub(crate) fn looks_decimal(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer() {
        assert_eq!(Scalar::infer("42"), Scalar::Integer(42));
        assert_eq!(Scalar::infer(" -7 "), Scalar::Integer(-7));
        assert_eq!(Scalar::infer("2.5"), Scalar::Decimal(2.5));
        assert_eq!(Scalar::infer("1e3"), Scalar::Decimal(1000.0));
        assert_eq!(Scalar::infer("hello"), Scalar::Text("hello".to_string()));
        assert_eq!(Scalar::infer("inf"), Scalar::Text("inf".to_string()));
        assert_eq!(Scalar::infer("NaN"), Scalar::Text("NaN".to_string()));
        assert_eq!(Scalar::infer("true"), Scalar::Text("true".to_string()));
        assert_eq!(Scalar::infer(""), Scalar::Text(String::new()));
    }

    #[test]
    fn test_integer_coercion() {
        assert_eq!(Scalar::Decimal(3.9).as_integer(), Some(3));
        assert_eq!(Scalar::Decimal(-3.9).as_integer(), Some(-3));
        assert_eq!(Scalar::Text("12".into()).as_integer(), Some(12));
        assert_eq!(Scalar::Text("1.5".into()).as_integer(), None);
        assert_eq!(Scalar::Boolean(true).as_integer(), None);
        assert_eq!(Scalar::Decimal(1e300).as_integer(), None);
        assert_eq!(Scalar::Decimal(f64::NAN).as_integer(), None);
        assert_eq!(Scalar::Decimal(-9.2e18).as_integer(), Some(-9_200_000_000_000_000_000));
    }

    #[test]
    fn test_truncate_range_edges() {
        assert_eq!(truncate_to_integer(i64::MIN as f64), Some(i64::MIN));
        assert_eq!(truncate_to_integer(9.223372036854775807e18), None);
        assert_eq!(truncate_to_integer(f64::INFINITY), None);
        assert_eq!(truncate_to_integer(-0.5), Some(0));
    }

    #[test]
    fn test_decimal_coercion() {
        assert_eq!(Scalar::Integer(3).as_decimal(), Some(3.0));
        assert_eq!(Scalar::Text("0.25".into()).as_decimal(), Some(0.25));
        assert_eq!(Scalar::Text("infinity".into()).as_decimal(), None);
        assert_eq!(Scalar::Boolean(false).as_decimal(), None);
    }

    #[test]
    fn test_bool_coercion() {
        assert_eq!(Scalar::Text("Yes".into()).as_bool(), Some(true));
        assert_eq!(Scalar::Text("n".into()).as_bool(), Some(false));
        assert_eq!(Scalar::Boolean(true).as_bool(), Some(true));
        assert_eq!(Scalar::Integer(1).as_bool(), None);
    }

    #[test]
    fn test_display_keeps_domain() {
        assert_eq!(Scalar::Decimal(3.0).to_string(), "3.0");
        assert_eq!(Scalar::infer(&Scalar::Decimal(3.0).to_string()), Scalar::Decimal(3.0));
        assert_eq!(Scalar::Integer(-4).to_string(), "-4");
        assert_eq!(Scalar::Boolean(false).to_string(), "false");
    }
}
