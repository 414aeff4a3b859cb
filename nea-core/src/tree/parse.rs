//! 值树解析
//!
//! ```text
//! composite := '[' key ':' node* ']'
//! leaf      := key ':' scalar ';'
//! ```
//! 键是第一个 `[`、`:` 或 `]` 之前的文本（去除首尾空白）。

use std::io::BufRead;

use nea_config::Phase;
use tracing::{debug, trace};

use crate::error::{NeaError, NeaResult};
use crate::kit::reader::Scanner;

use super::node::ValueNode;
use super::scalar::Scalar;

const TARGET: &str = "neakit::tree";

/// 复合节点内容的解析方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// 递归解析子节点
    #[default]
    Recursive,
    /// 段内容整体保留为一个文本叶子
    Flat,
}

impl ValueNode {
    /// 解析一个节点
    pub fn parse(text: &str) -> NeaResult<ValueNode> {
        Self::parse_from(&mut Scanner::from_text(text), ParseMode::Recursive)
    }

    /// 解析文本中的所有顶层节点
    pub fn parse_all(text: &str) -> NeaResult<Vec<ValueNode>> {
        Self::parse_all_from(&mut Scanner::from_text(text), ParseMode::Recursive)
    }

    /// 从 reader 解析所有顶层节点
    pub fn from_reader<R: BufRead>(reader: R, mode: ParseMode) -> NeaResult<Vec<ValueNode>> {
        let mut scanner = Scanner::new(reader);
        let result = Self::parse_all_from(&mut scanner, mode);
        if let Some(e) = scanner.take_io_error() {
            return Err(e.into());
        }
        result
    }

    pub fn parse_all_from<R: BufRead>(
        scanner: &mut Scanner<R>,
        mode: ParseMode,
    ) -> NeaResult<Vec<ValueNode>> {
        let mut nodes = Vec::new();
        loop {
            scanner.skip_whitespace();
            if scanner.is_eof() {
                break;
            }
            nodes.push(Self::parse_from(scanner, mode)?);
        }
        debug!(target: TARGET, count = nodes.len(), "Parsed top-level nodes");
        Ok(nodes)
    }

    /// 从扫描器当前位置解析一个节点
    ///
    /// 键位置遇到 `]` 时消费它并返回占位节点。
    pub fn parse_from<R: BufRead>(scanner: &mut Scanner<R>, mode: ParseMode) -> NeaResult<ValueNode> {
        scanner.skip_whitespace();
        let start = scanner.position();
        let key = scanner.read_until_any(&['[', ':', ']'], false);

        match scanner.peek() {
            None => Err(NeaError::syntax(
                Phase::Tree,
                "unexpected end of input, expected a node",
                start,
            )),
            Some(']') => {
                scanner.next_char();
                debug!(target: TARGET, position = %start, "Stray ']', producing placeholder");
                Ok(ValueNode::placeholder())
            }
            Some(':') => {
                scanner.next_char();
                scanner.skip_whitespace();
                let value = scanner.read_until(';', false);
                if !scanner.match_char(';') {
                    return Err(NeaError::syntax(
                        Phase::Tree,
                        format!("missing ';' after value of '{}'", key.trim()),
                        start,
                    ));
                }
                trace!(target: TARGET, key = key.trim(), "Parsed leaf");
                Ok(ValueNode::leaf_from_text(key.trim(), value.trim_end()))
            }
            Some(_) => {
                if !key.trim().is_empty() {
                    return Err(NeaError::syntax(
                        Phase::Tree,
                        format!("unexpected text '{}' before '['", key.trim()),
                        start,
                    ));
                }
                Self::parse_composite(scanner, mode)
            }
        }
    }

    fn parse_composite<R: BufRead>(scanner: &mut Scanner<R>, mode: ParseMode) -> NeaResult<ValueNode> {
        let mut section = scanner.enter_section('[', ']')?;
        section.skip_whitespace();
        let key_position = section.position();
        let key = section.read_until(':', false);
        if !section.match_char(':') {
            return Err(NeaError::syntax(
                Phase::Tree,
                format!("missing ':' after key '{}'", key.trim()),
                key_position,
            ));
        }
        let key = key.trim();

        match mode {
            ParseMode::Flat => {
                let raw = section.read_to_end();
                Ok(ValueNode::leaf(key, Scalar::Text(raw.trim().to_string())))
            }
            ParseMode::Recursive => {
                let mut node = ValueNode::composite(key, Vec::new());
                loop {
                    section.skip_whitespace();
                    if section.is_eof() {
                        break;
                    }
                    node.add(Self::parse_from(&mut section, mode)?)?;
                }
                debug!(target: TARGET, key, children = node.len(), "Parsed composite");
                Ok(node)
            }
        }
    }
}
