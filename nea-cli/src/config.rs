//! CLI 配置
//!
//! 包含 CLI 特有的配置：日志配置和引擎配置的组合

use std::collections::BTreeMap;

use nea_config::{EngineConfig, Phase};
use serde::Deserialize;
use tracing::Level;

/// CLI 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: Level,
    pub reader: Option<Level>,
    pub tree: Option<Level>,
    pub expr: Option<Level>,
    pub function: Option<Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::WARN,
            reader: None,
            tree: None,
            expr: None,
            function: None,
        }
    }
}

impl LogConfig {
    /// Get log level for a specific phase
    pub fn level_for(&self, phase: Phase) -> Level {
        let level = match phase {
            Phase::Reader => self.reader,
            Phase::Tree => self.tree,
            Phase::Expression => self.expr,
            Phase::Function => self.function,
        };
        level.unwrap_or(self.global)
    }

    fn set(&mut self, phase: Phase, level: Level) {
        let slot = match phase {
            Phase::Reader => &mut self.reader,
            Phase::Tree => &mut self.tree,
            Phase::Expression => &mut self.expr,
            Phase::Function => &mut self.function,
        };
        *slot = Some(level);
    }
}

/// nea.json 结构
///
/// ```json
/// {
///   "engine": { "strict_natives": true, "write_policy": "local_first" },
///   "log_level": "info",
///   "phase_log_levels": { "function": "trace" }
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// 引擎配置
    pub engine: EngineConfig,
    /// 日志级别: "silent", "error", "warn", "info", "debug", "trace"
    pub log_level: Option<String>,
    /// 按阶段覆盖日志级别，键为 "reader"、"tree"、"expr"、"function"
    pub phase_log_levels: BTreeMap<String, String>,
}

impl CliConfig {
    /// 生成日志配置，命令行传入的级别优先
    pub fn log_config(&self, cli_level: Option<&str>) -> Result<LogConfig, String> {
        let mut config = LogConfig::default();
        if let Some(level) = cli_level.or(self.log_level.as_deref()) {
            config.global = parse_log_level(level)?;
        }
        for (name, level) in &self.phase_log_levels {
            let phase = Phase::ALL
                .into_iter()
                .find(|phase| phase.as_str() == name.as_str())
                .ok_or_else(|| format!("unknown phase '{name}' in phase_log_levels"))?;
            config.set(phase, parse_log_level(level)?);
        }
        Ok(config)
    }
}

/// Parse log level string
pub fn parse_log_level(s: &str) -> Result<Level, String> {
    match s.to_lowercase().as_str() {
        "silent" | "error" => Ok(Level::ERROR), // silent = only errors
        "warn" => Ok(Level::WARN),
        "info" => Ok(Level::INFO),
        "debug" => Ok(Level::DEBUG),
        "trace" => Ok(Level::TRACE),
        _ => Err(format!("unknown log level '{s}'")),
    }
}
