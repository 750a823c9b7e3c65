//! Error types for expression compilation and configuration loading.

use thiserror::Error;

/// Every way compiling an expression can fail.
///
/// Compilation never recovers locally: the first error aborts the current
/// expression and no partial output is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    #[error("Illegal character '{ch}' (code point {}) in expression: '{expr}'", code_point(.ch))]
    IllegalCharacter { ch: char, expr: String },

    #[error("Illegal character in filter: '{ch}' for expression: '{expr}'")]
    IllegalFilterCharacter { ch: char, expr: String },

    #[error("Unterminated string {token} in expression: '{expr}'")]
    UnterminatedString { token: String, expr: String },

    #[error("Number '{token}' cannot have multiple decimal points in expression: '{expr}'")]
    MultipleDecimalPoints { token: String, expr: String },

    /// A token appeared after a token it may not follow.
    #[error("Misplaced {what} '{token}' in expression: '{expr}'")]
    Misplaced {
        what: &'static str,
        token: String,
        expr: String,
    },

    #[error("Incomplete operator '{token}' in expression: '{expr}'")]
    IncompleteSymbol { token: String, expr: String },

    #[error("Missing ')' in expression: '{expr}'")]
    UnbalancedGroup { expr: String },

    /// `exists` or `empty` without a variable right after it.
    #[error("Keyword '{keyword}' must be used before a variable in expression: {expr}")]
    MissingOperand { keyword: String, expr: String },

    #[error("Keyword 'in' must be used between two arrays or strings in expression: {expr}")]
    InOperands { expr: String },

    #[error("Filter \"{filter}\" does not exist{}", in_template(.origin))]
    NoSuchFilter {
        filter: String,
        origin: Option<String>,
    },

    #[error("The '{filter}' filter {message}")]
    FilterArguments { filter: String, message: String },

    #[error("Invalid filter name '{0}'")]
    InvalidFilterName(String),

    #[error("Invalid variable '{var}' in template \"{origin}\": {message}")]
    InvalidVariable {
        var: String,
        origin: String,
        message: String,
    },
}

fn code_point(ch: &char) -> u32 {
    u32::from(*ch)
}

fn in_template(origin: &Option<String>) -> String {
    match origin {
        Some(name) => format!(" in template \"{}\".", name),
        None => ".".to_string(),
    }
}

/// Errors raised while loading [`crate::config::CompilerOptions`].
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SyntaxError>;
