pub mod ast;
pub mod cli;
pub mod compiler;
pub mod config;
pub mod context;
pub mod error;
pub mod expander;
pub mod filters;
pub mod lexer;
pub mod resolver;
pub mod variable;

pub use ast::{FilterArg, FilterCall, Token, TokenKind, VariablePath};
pub use compiler::{DEFAULT_ORIGIN, ExpressionCompiler, compile_expression};
pub use config::CompilerOptions;
pub use context::OutputContext;
pub use error::{ConfigError, SyntaxError};
pub use filters::{Filter, FilterRegistry};
pub use lexer::{Lexer, tokenize};
pub use resolver::{Lookup, ResolveMode, VariableResolver};
pub use variable::parse_variable;
