//! CLI 格式化输出
//!
//! 提供命令行友好的错误显示和源码上下文打印。

use nea_core::NeaError;

/// 打印错误并显示源代码上下文
pub fn print_error_with_source(e: &NeaError, source: &str) {
    eprintln!("error[{}]: {}", e.phase().as_str(), e);

    if let (Some(error_line), Some(col)) = (e.line(), e.column()) {
        print_source_context(source, error_line, col);
    }
}

/// 打印源代码上下文（显示错误行前后几行）
pub fn print_source_context(source: &str, error_line: usize, error_col: usize) {
    const CONTEXT_LINES: usize = 3;

    let lines: Vec<&str> = source.lines().collect();
    let total_lines = lines.len();

    if error_line == 0 || error_line > total_lines {
        return;
    }

    let start_line = error_line.saturating_sub(CONTEXT_LINES).max(1);
    let end_line = (error_line + CONTEXT_LINES).min(total_lines);
    let width = end_line.to_string().len();

    let separator = "-".repeat(width + 1);
    eprintln!("{separator}|--");

    for (line_idx, content) in lines.iter().enumerate().take(end_line).skip(start_line - 1) {
        let number = line_idx + 1;
        eprintln!("{number:>width$} | {content}");
        if number == error_line {
            // 列号按码点计数，制表符原样输出以保持对齐
            let marker: String = content
                .chars()
                .take(error_col.saturating_sub(1))
                .map(|c| if c == '\t' { '\t' } else { ' ' })
                .collect();
            eprintln!("{:width$} | {marker}^", "");
        }
    }

    eprintln!("{separator}|--");
}
