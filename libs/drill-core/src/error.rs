//! Error types for drill-core.

use thiserror::Error;

/// Result type alias using ParseError.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Errors that can occur while parsing a word list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing answer (W:) at line {line}")]
    MissingAnswer { line: usize },

    #[error("invalid blank index at line {line}: {value}")]
    InvalidBlank { line: usize, value: String },

    #[error("unknown field {key:?} at line {line}")]
    UnknownField { line: usize, key: String },
}

/// Errors raised when a session is configured with unusable items.
///
/// These are fatal: a session cannot be built from such a list.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("item list is empty")]
    EmptyItemList,

    #[error("item {index} has an empty answer")]
    MissingAnswer { index: usize },
}
