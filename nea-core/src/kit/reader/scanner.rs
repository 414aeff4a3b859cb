//! 扫描器
//!
//! 在 [`CharCursor`] 之上提供"读到某个终止符为止"一类的原语。
//! 多字符终止符匹配失败时，已试探消费的字符通过回退缓冲区重新扫描。

use std::collections::VecDeque;
use std::io::{self, BufRead};

use nea_config::Phase;
use tracing::trace;

use super::cursor::{CharCursor, StreamResult};
use super::position::SourcePosition;
use crate::error::{NeaError, NeaResult};

const TARGET: &str = "neakit::reader";

/// 持有自身文本的扫描器，用于解析截取出的括号段
pub type SectionScanner = Scanner<io::Cursor<String>>;

/// 文本扫描器
///
/// 所有读取方法在输入结束时都会停止；`None` 表示输入结束。
pub struct Scanner<R> {
    cursor: CharCursor<R>,
    /// 回退缓冲区，优先于游标读取
    pending: VecDeque<char>,
}

impl<'a> Scanner<&'a [u8]> {
    /// 从内存文本创建扫描器
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl Scanner<io::Cursor<String>> {
    /// 从自有文本创建扫描器，位置从 `origin` 开始计数
    pub fn from_string(text: String, origin: SourcePosition) -> Self {
        Self {
            cursor: CharCursor::new(io::Cursor::new(text)).starting_at(origin),
            pending: VecDeque::new(),
        }
    }
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: R) -> Self {
        Self {
            cursor: CharCursor::new(reader),
            pending: VecDeque::new(),
        }
    }

    /// 当前位置
    pub fn position(&self) -> SourcePosition {
        self.cursor.position()
    }

    /// 预读下一个字符
    pub fn peek(&mut self) -> Option<char> {
        match self.pending.front() {
            Some(&c) => Some(c),
            None => self.cursor.peek().ok(),
        }
    }

    /// 读取并消费一个字符
    pub fn next_char(&mut self) -> Option<char> {
        match self.pending.pop_front() {
            Some(c) => Some(c),
            None => match self.cursor.advance() {
                StreamResult::Ok(c) => Some(c),
                StreamResult::Eof => None,
            },
        }
    }

    /// 将文本放回到输入最前面
    pub fn unread(&mut self, text: &str) {
        for c in text.chars().rev() {
            self.pending.push_front(c);
        }
    }

    pub fn is_eof(&mut self) -> bool {
        self.peek().is_none()
    }

    pub fn check(&mut self, expected: char) -> bool {
        self.peek() == Some(expected)
    }

    pub fn check_in(&mut self, chars: &[char]) -> bool {
        matches!(self.peek(), Some(c) if chars.contains(&c))
    }

    pub fn match_char(&mut self, expected: char) -> bool {
        if self.check(expected) {
            self.next_char();
            true
        } else {
            false
        }
    }

    /// 取出底层 reader 的 I/O 错误（如果有）
    pub fn take_io_error(&mut self) -> Option<io::Error> {
        self.cursor.take_io_error()
    }

    /// 跳过空白符
    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.next_char();
        }
    }

    /// 累积字符直到 `stop` 返回 true 或输入结束，不消费停止字符
    fn take_until(&mut self, mut stop: impl FnMut(char) -> bool) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if stop(c) {
                break;
            }
            text.push(c);
            self.next_char();
        }
        text
    }

    /// 读到字符 `t` 为止；`discard` 决定是否消费 `t`
    pub fn read_until(&mut self, t: char, discard: bool) -> String {
        let text = self.take_until(|c| c == t);
        if discard {
            self.next_char();
        }
        text
    }

    /// 读到集合中任一字符为止
    pub fn read_until_any(&mut self, set: &[char], discard: bool) -> String {
        let text = self.take_until(|c| set.contains(&c));
        if discard {
            self.next_char();
        }
        text
    }

    /// 读到空白符或集合中任一字符为止
    pub fn read_until_whitespace_or(&mut self, set: &[char], discard: bool) -> String {
        let text = self.take_until(|c| c.is_whitespace() || set.contains(&c));
        if discard {
            self.next_char();
        }
        text
    }

    /// 只要字符在集合中就继续读
    pub fn read_until_not(&mut self, set: &[char], discard: bool) -> String {
        let text = self.take_until(|c| !set.contains(&c));
        if discard {
            self.next_char();
        }
        text
    }

    /// 读到候选字符串中最早出现的一个为止
    ///
    /// 返回读到的文本（不含终止串）和匹配到的终止串；输入结束时终止串为 `None`。
    /// 终止串本身会被消费。
    pub fn read_until_any_str(&mut self, terminators: &[&str]) -> (String, Option<String>) {
        let terminators: Vec<&str> = terminators.iter().copied().filter(|t| !t.is_empty()).collect();
        let mut text = String::new();

        while let Some(c) = self.next_char() {
            let mut candidate = String::from(c);
            loop {
                if terminators.iter().any(|t| *t == candidate) {
                    return (text, Some(candidate));
                }
                let extendable = terminators
                    .iter()
                    .any(|t| t.len() > candidate.len() && t.starts_with(candidate.as_str()));
                if !extendable {
                    break;
                }
                match self.next_char() {
                    Some(next) => candidate.push(next),
                    None => break,
                }
            }

            // 试探失败：首字符归入文本，其余字符放回重新扫描
            let mut rest = candidate.chars();
            if let Some(first) = rest.next() {
                text.push(first);
            }
            let rest = rest.as_str().to_string();
            self.unread(&rest);
        }

        (text, None)
    }

    /// 读到字符串 `t` 为止，`t` 被消费
    pub fn read_until_str(&mut self, t: &str) -> String {
        self.read_until_any_str(&[t]).0
    }

    /// 跳到字符 `t`；`discard` 决定是否消费 `t`
    pub fn skip_until(&mut self, t: char, discard: bool) {
        while let Some(c) = self.peek() {
            if c == t {
                break;
            }
            self.next_char();
        }
        if discard {
            self.next_char();
        }
    }

    /// 跳过第一次出现的字符串 `t` 及其之前的内容，返回是否找到
    pub fn skip_until_str(&mut self, t: &str) -> bool {
        self.read_until_any_str(&[t]).1.is_some()
    }

    /// 读取当前行剩余部分，行尾被消费
    pub fn read_line(&mut self) -> String {
        self.read_until('\n', true)
    }

    /// 读取剩余全部文本（不含末尾补上的换行）
    pub fn read_to_end(&mut self) -> String {
        let mut text = self.take_until(|_| false);
        if text.ends_with('\n') {
            text.pop();
        }
        text
    }

    /// 跳过空白后读到下一个空白为止，该空白被消费
    pub fn read_word(&mut self) -> String {
        self.skip_whitespace();
        let word = self.take_until(char::is_whitespace);
        self.next_char();
        word
    }

    /// 跳过空白后读取一个字符
    pub fn read_char(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.next_char()
    }

    pub fn read_int(&mut self) -> NeaResult<i64> {
        let word = self.read_word();
        word.parse::<i64>()
            .map_err(|_| NeaError::format(word, "integer"))
    }

    pub fn read_decimal(&mut self) -> NeaResult<f64> {
        let word = self.read_word();
        word.parse::<f64>()
            .map_err(|_| NeaError::format(word, "decimal"))
    }

    pub fn read_bool(&mut self) -> NeaResult<bool> {
        parse_boolean(&self.read_word())
    }

    /// 括号段提取
    ///
    /// 跳到第一个 `start`，之后按嵌套深度累积，深度归零时停止。
    /// 结果不含最外层的一对括号，内层括号原样保留。
    pub fn read_section(&mut self, start: char, end: char) -> NeaResult<String> {
        self.read_section_at(start, end).map(|(text, _)| text)
    }

    /// 提取括号段并返回一个从段内容开始扫描的新扫描器
    pub fn enter_section(&mut self, start: char, end: char) -> NeaResult<SectionScanner> {
        let (text, origin) = self.read_section_at(start, end)?;
        Ok(Scanner::from_string(text, origin))
    }

    fn read_section_at(&mut self, start: char, end: char) -> NeaResult<(String, SourcePosition)> {
        let searched_from = self.position();
        self.skip_until(start, false);
        if !self.match_char(start) {
            return Err(NeaError::syntax(
                Phase::Reader,
                format!("expected '{start}'"),
                searched_from,
            ));
        }

        let origin = self.position();
        let mut text = String::new();
        let mut depth = 1usize;
        loop {
            match self.next_char() {
                None => {
                    return Err(NeaError::syntax(
                        Phase::Reader,
                        format!("unterminated section, expected '{end}'"),
                        origin,
                    ))
                }
                Some(c) if c == end => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    text.push(c);
                }
                Some(c) if c == start => {
                    depth += 1;
                    text.push(c);
                }
                Some(c) => text.push(c),
            }
        }

        trace!(target: TARGET, %origin, len = text.len(), "Read section");
        Ok((text, origin))
    }

    /// 多字符定界符版本的括号段提取
    pub fn read_section_str(&mut self, start: &str, end: &str) -> NeaResult<String> {
        let searched_from = self.position();
        if !self.skip_until_str(start) {
            return Err(NeaError::syntax(
                Phase::Reader,
                format!("expected '{start}'"),
                searched_from,
            ));
        }

        let origin = self.position();
        let mut text = String::new();
        let mut depth = 1usize;
        loop {
            let (chunk, terminator) = self.read_until_any_str(&[start, end]);
            text.push_str(&chunk);
            match terminator {
                None => {
                    return Err(NeaError::syntax(
                        Phase::Reader,
                        format!("unterminated section, expected '{end}'"),
                        origin,
                    ))
                }
                Some(t) if t == end => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                    text.push_str(&t);
                }
                Some(t) => {
                    depth += 1;
                    text.push_str(&t);
                }
            }
        }
        Ok(text)
    }
}

/// 从内存文本中提取第一个括号段
pub fn section_of(source: &str, start: char, end: char) -> NeaResult<String> {
    Scanner::from_text(source).read_section(start, end)
}

/// 宽松的布尔解析：大小写不敏感的 {true, yes, y} / {false, no, n}
pub fn parse_boolean(text: &str) -> NeaResult<bool> {
    match text.to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" => Ok(true),
        "false" | "no" | "n" => Ok(false),
        _ => Err(NeaError::format(text, "boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_until_discard() {
        let mut s = Scanner::from_text("key: value;");
        assert_eq!(s.read_until(':', true), "key");
        assert_eq!(s.peek(), Some(' '));

        let mut s = Scanner::from_text("key: value;");
        assert_eq!(s.read_until(':', false), "key");
        assert_eq!(s.peek(), Some(':'));
    }

    #[test]
    fn test_read_until_hits_eof() {
        let mut s = Scanner::from_text("abc");
        assert_eq!(s.read_until(';', true), "abc\n");
        assert!(s.is_eof());
    }

    #[test]
    fn test_read_until_any_and_whitespace() {
        let mut s = Scanner::from_text("name[1]");
        assert_eq!(s.read_until_any(&['[', ':'], false), "name");
        assert!(s.check('['));

        let mut s = Scanner::from_text("int x");
        assert_eq!(s.read_until_whitespace_or(&['['], false), "int");
        assert!(s.check(' '));
    }

    #[test]
    fn test_read_until_not() {
        let mut s = Scanner::from_text("0011x");
        assert_eq!(s.read_until_not(&['0', '1'], false), "0011");
        assert_eq!(s.peek(), Some('x'));
    }

    #[test]
    fn test_read_until_any_str_earliest_match() {
        let mut s = Scanner::from_text("a -b --> c");
        let (text, term) = s.read_until_any_str(&["-->", "<!--"]);
        assert_eq!(text, "a -b ");
        assert_eq!(term.as_deref(), Some("-->"));
        assert_eq!(s.read_to_end(), " c");
    }

    #[test]
    fn test_read_until_any_str_rollback_overlap() {
        // "aab" 的第一次试探 "aa" 失败，回退后从第二个 'a' 重新匹配
        let mut s = Scanner::from_text("xaab");
        let (text, term) = s.read_until_any_str(&["ab"]);
        assert_eq!(text, "xa");
        assert_eq!(term.as_deref(), Some("ab"));
    }

    #[test]
    fn test_read_until_any_str_eof() {
        let mut s = Scanner::from_text("abc");
        let (text, term) = s.read_until_any_str(&["zz"]);
        assert_eq!(text, "abc\n");
        assert_eq!(term, None);
    }

    #[test]
    fn test_skip_until_str() {
        let mut s = Scanner::from_text("junk /* keep");
        assert!(s.skip_until_str("/*"));
        assert_eq!(s.read_word(), "keep");
        assert!(!s.skip_until_str("*/"));
    }

    #[test]
    fn test_read_line_and_to_end() {
        let mut s = Scanner::from_text("first\r\nsecond\nthird\n");
        assert_eq!(s.read_line(), "first");
        assert_eq!(s.read_to_end(), "second\nthird");
        assert!(s.is_eof());
    }

    #[test]
    fn test_read_line_splits_on_carriage_return() {
        let mut s = Scanner::from_text("first\rsecond\rthird");
        assert_eq!(s.read_line(), "first");
        assert_eq!(s.read_line(), "second");
        assert_eq!(s.position().line, 3);
        assert_eq!(s.read_to_end(), "third");
    }

    #[test]
    fn test_read_word_and_typed_values() {
        let mut s = Scanner::from_text("  42 -3.5 Yes  x");
        assert_eq!(s.read_int().unwrap(), 42);
        assert_eq!(s.read_decimal().unwrap(), -3.5);
        assert!(s.read_bool().unwrap());
        assert_eq!(s.read_char(), Some('x'));
    }

    #[test]
    fn test_read_int_format_error() {
        let mut s = Scanner::from_text("4x2");
        let err = s.read_int().unwrap_err();
        assert!(matches!(err, NeaError::Format { expected: "integer", .. }));
    }

    #[test]
    fn test_read_section_nested() {
        assert_eq!(section_of("[a[b]c]d", '[', ']').unwrap(), "a[b]c");

        let mut s = Scanner::from_text("prefix (x (y)) rest");
        assert_eq!(s.read_section('(', ')').unwrap(), "x (y)");
        assert_eq!(s.read_to_end(), " rest");
    }

    #[test]
    fn test_read_section_errors() {
        assert!(matches!(
            section_of("no brackets", '[', ']'),
            Err(NeaError::Syntax { .. })
        ));
        let err = section_of("[a[b]", '[', ']').unwrap_err();
        assert!(err.to_string().contains("unterminated"));
    }

    #[test]
    fn test_read_section_str() {
        let mut s = Scanner::from_text("x <% a <% b %> c %> y");
        assert_eq!(s.read_section_str("<%", "%>").unwrap(), " a <% b %> c ");
        assert_eq!(s.read_to_end(), " y");
    }

    #[test]
    fn test_enter_section_keeps_position() {
        let mut s = Scanner::from_text("\n  [inner]");
        let mut inner = s.enter_section('[', ']').unwrap();
        assert_eq!(inner.position().line, 2);
        assert_eq!(inner.position().column, 4);
        assert_eq!(inner.read_to_end(), "inner");
    }

    #[test]
    fn test_unread() {
        let mut s = Scanner::from_text("cd");
        s.unread("ab");
        assert_eq!(s.read_until('\n', false), "abcd");
    }

    #[test]
    fn test_parse_boolean_vocabulary() {
        for t in ["true", "TRUE", "Yes", "y", "Y"] {
            assert!(parse_boolean(t).unwrap(), "{t}");
        }
        for f in ["false", "False", "NO", "n"] {
            assert!(!parse_boolean(f).unwrap(), "{f}");
        }
        assert!(parse_boolean("maybe").is_err());
    }
}
