//! 字符游标
//!
//! 按行从 `BufRead` 拉取文本，行尾统一报告为单个 `\n`（无论源文本用
//! `\n`、`\r\n` 还是单独的 `\r`），最后一行即使没有换行符也会补一个 `\n`。
//! 输入结束后报告 [`StreamResult::Eof`]。

use std::collections::VecDeque;
use std::io::{self, BufRead};

use tracing::{trace, warn};

use super::position::SourcePosition;

const TARGET: &str = "neakit::reader";

/// 读取结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamResult<T> {
    /// 成功读取
    Ok(T),
    /// 输入已结束
    Eof,
}

impl<T> StreamResult<T> {
    /// 转换为 `Option`，`Eof` 映射为 `None`
    pub fn ok(self) -> Option<T> {
        match self {
            StreamResult::Ok(v) => Some(v),
            StreamResult::Eof => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, StreamResult::Eof)
    }
}

/// 字符游标
///
/// 独占其底层 reader；一个游标只属于一个 [`Scanner`](super::Scanner)。
pub struct CharCursor<R> {
    reader: R,
    /// 当前行（不含行尾）
    line: Vec<char>,
    /// 同一次读取中被单独 `\r` 分隔出的后续行
    queued: VecDeque<Vec<char>>,
    /// 行内偏移；等于 `line.len()` 时指向行尾的 `\n`
    offset: usize,
    has_line: bool,
    finished: bool,
    position: SourcePosition,
    io_error: Option<io::Error>,
}

impl<'a> CharCursor<&'a [u8]> {
    /// 从内存文本创建游标
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl<R: BufRead> CharCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            queued: VecDeque::new(),
            offset: 0,
            has_line: false,
            finished: false,
            position: SourcePosition::start(),
            io_error: None,
        }
    }

    /// 以给定位置作为起点（用于从外层文本截取出的片段）
    pub fn starting_at(mut self, origin: SourcePosition) -> Self {
        self.position = origin;
        self
    }

    /// 当前位置
    pub fn position(&self) -> SourcePosition {
        self.position
    }

    /// 预读下一个字符（不消费）
    pub fn peek(&mut self) -> StreamResult<char> {
        if !self.fill_line() {
            return StreamResult::Eof;
        }
        match self.line.get(self.offset) {
            Some(&c) => StreamResult::Ok(c),
            None => StreamResult::Ok('\n'),
        }
    }

    /// 读取并消费一个字符
    pub fn advance(&mut self) -> StreamResult<char> {
        let result = self.peek();
        if let StreamResult::Ok(c) = result {
            self.position.advance(c);
            if self.offset < self.line.len() {
                self.offset += 1;
            } else {
                self.has_line = false;
            }
        }
        result
    }

    /// 检查当前字符是否匹配（不消费）
    pub fn check(&mut self, expected: char) -> bool {
        matches!(self.peek(), StreamResult::Ok(c) if c == expected)
    }

    /// 检查当前字符是否在集合中（不消费）
    pub fn check_in(&mut self, chars: &[char]) -> bool {
        matches!(self.peek(), StreamResult::Ok(c) if chars.contains(&c))
    }

    /// 消费当前字符如果匹配
    pub fn match_char(&mut self, expected: char) -> bool {
        if self.check(expected) {
            let _ = self.advance();
            true
        } else {
            false
        }
    }

    pub fn is_eof(&mut self) -> bool {
        self.peek().is_eof()
    }

    /// 取出读取过程中遇到的 I/O 错误
    ///
    /// I/O 错误发生时游标按 EOF 处理，调用方可在解析结束后检查。
    pub fn take_io_error(&mut self) -> Option<io::Error> {
        self.io_error.take()
    }

    fn start_line(&mut self, line: Vec<char>) {
        self.line = line;
        self.offset = 0;
        self.has_line = true;
    }

    /// 确保有可用的行，返回 false 表示输入结束
    fn fill_line(&mut self) -> bool {
        if self.has_line {
            return true;
        }
        if let Some(line) = self.queued.pop_front() {
            self.start_line(line);
            return true;
        }
        if self.finished {
            return false;
        }

        let mut buf = String::new();
        match self.reader.read_line(&mut buf) {
            Ok(0) => {
                trace!(target: TARGET, position = %self.position, "End of input");
                self.finished = true;
                false
            }
            Ok(_) => {
                if buf.ends_with('\n') {
                    buf.pop();
                }
                // 末尾的 `\r` 属于本行的行尾，不再产生一个空行
                if buf.ends_with('\r') {
                    buf.pop();
                }
                let mut lines = buf.split('\r').map(|line| line.chars().collect::<Vec<char>>());
                let first = lines.next().unwrap_or_default();
                self.queued.extend(lines);
                self.start_line(first);
                true
            }
            Err(e) => {
                warn!(target: TARGET, position = %self.position, error = %e, "Read failed, treating as end of input");
                self.io_error = Some(e);
                self.finished = true;
                false
            }
        }
    }
}
