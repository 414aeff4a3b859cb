//! NeaKit Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! Engines receive a copy of [`EngineConfig`] explicitly; nothing here is
//! process-wide.

use serde::Deserialize;

/// Where an assignment inside a function block writes its result, and which
/// scope is consulted first when a name is read.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Caller scope is primary: reads consult the caller scope first, and a
    /// write lands in the caller scope whenever the name already exists there.
    #[default]
    CallerFirst,
    /// Conventional shadowing: the function's locals win for both reads and writes.
    LocalFirst,
}

/// Configuration for the statement engine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Reject calls to natives that are not registered at parse time
    /// instead of dropping them.
    pub strict_natives: bool,
    /// Assignment target resolution
    pub write_policy: WritePolicy,
}

impl EngineConfig {
    /// Default configuration with strict native resolution switched on
    pub fn strict() -> Self {
        Self {
            strict_natives: true,
            ..Self::default()
        }
    }

    pub fn with_write_policy(mut self, write_policy: WritePolicy) -> Self {
        self.write_policy = write_policy;
        self
    }
}

/// Processing phase, used for log targets and error reports
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Reader,
    Tree,
    Expression,
    Function,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Reader,
        Phase::Tree,
        Phase::Expression,
        Phase::Function,
    ];

    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Reader => "reader",
            Phase::Tree => "tree",
            Phase::Expression => "expr",
            Phase::Function => "function",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> &'static str {
        match self {
            Phase::Reader => "neakit::reader",
            Phase::Tree => "neakit::tree",
            Phase::Expression => "neakit::expr",
            Phase::Function => "neakit::function",
        }
    }
}
