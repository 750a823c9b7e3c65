//! CLI support for hydrogen-expr
//!
//! Provides programmatic access to the `hyx` subcommands so they can be
//! embedded in other tools and tested without spawning a process.

mod check;
mod docs;
mod tokens;

pub use check::{CheckOptions, CheckResult, execute_check, list_filters};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use tokens::{TokensOptions, list_tokens};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Syntax error: {0}")]
    Syntax(#[from] crate::SyntaxError),

    #[error("{0}")]
    Config(#[from] crate::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No expression provided. Pass one as an argument or pipe it to stdin.")]
    NoInput,

    #[error("Unknown category: '{0}'\nRun 'hyx docs' to see available categories.")]
    UnknownCategory(String),
}
