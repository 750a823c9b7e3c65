//! Compile or syntax-check expressions

use std::path::PathBuf;

use super::CliError;
use crate::{CompilerOptions, DEFAULT_ORIGIN, ExpressionCompiler, OutputContext};

/// Options for the compile and check commands
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The expression to compile
    pub expression: String,
    /// Template name reported in errors
    pub origin: Option<String>,
    /// JSON file with compiler options
    pub config: Option<PathBuf>,
    /// Turn auto-escaping off regardless of the config
    pub no_escape: bool,
    /// Validate without returning the compiled code
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug, PartialEq, Eq)]
pub enum CheckResult {
    /// The expression is valid
    SyntaxValid,
    /// The expression compiled
    Compiled {
        /// Helper declarations the code depends on, one per line
        helpers: String,
        code: String,
    },
}

impl CheckOptions {
    fn compiler_options(&self) -> Result<CompilerOptions, CliError> {
        let mut options = match &self.config {
            Some(path) => CompilerOptions::load(path)?,
            None => CompilerOptions::default(),
        };
        if self.no_escape {
            options.auto_escape = false;
        }
        Ok(options)
    }
}

/// Execute a compile or check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let expression = options.expression.trim();
    if expression.is_empty() {
        return Err(CliError::NoInput);
    }

    let mut ctx = OutputContext::with_options(options.compiler_options()?);
    let origin = options.origin.as_deref().unwrap_or(DEFAULT_ORIGIN);
    let compiler = ExpressionCompiler::new();

    // Every pass runs either way: misused keywords and unknown filters
    // only surface after tokenizing.
    if options.syntax_only {
        compiler.compile_tokens(expression, &mut ctx, origin)?;
        return Ok(CheckResult::SyntaxValid);
    }

    let code = compiler.compile(expression, &mut ctx, origin)?;

    Ok(CheckResult::Compiled {
        helpers: ctx.render_helpers(),
        code,
    })
}

/// Built-in filter names, one per line
pub fn list_filters() -> String {
    ExpressionCompiler::new().registry().names().join("\n")
}
