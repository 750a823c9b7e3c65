//! Token stream listing

use super::CliError;
use crate::tokenize;

/// Options for the tokens command
#[derive(Debug, Clone, Default)]
pub struct TokensOptions {
    pub expression: String,
    /// Print a JSON array instead of one token per line
    pub json: bool,
}

/// Lex an expression and render its tokens.
///
/// Plain output is one `kind<TAB>value` line per token.
pub fn list_tokens(options: &TokensOptions) -> Result<String, CliError> {
    let tokens = tokenize(&options.expression)?;

    if options.json {
        return Ok(serde_json::to_string_pretty(&tokens)?);
    }

    Ok(tokens
        .iter()
        .map(|token| format!("{}\t{}", token.kind, token.value))
        .collect::<Vec<_>>()
        .join("\n"))
}
