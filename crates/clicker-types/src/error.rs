//! Error types for clicker.

use std::fmt;
use std::io;

/// Which keyed table a slot reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Register,
    Hotkey,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register => write!(f, "register"),
            Self::Hotkey => write!(f, "hotkey"),
        }
    }
}

/// Errors produced by clicker.
///
/// Every variant renders as a single line; the shell prints that line as the
/// diagnostic for a failed verb.
#[derive(Debug, thiserror::Error)]
pub enum ClickerError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid number of arguments for {verb}, usage: {usage}")]
    Arity { verb: &'static str, usage: &'static str },

    #[error("invalid {kind} name '{key}'")]
    InvalidKey { kind: SlotKind, key: String },

    #[error("no command found in {kind} '{key}'")]
    EmptySlot { kind: SlotKind, key: char },

    #[error("option {0} not found")]
    UnknownOption(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("recall depth limit ({0}) exceeded")]
    RecallDepth(usize),

    #[error("device error: {0}")]
    Device(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("failed to open file {path}: {source}")]
    File { path: String, source: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ClickerError>;
