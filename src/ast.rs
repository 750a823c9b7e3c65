//! # Hydrogen Expressions - Syntax Types
//!
//! Types shared by every pass of the expression compiler.
//!
//! - **[tokens]** - Tokens produced by the lexer and rewritten by later passes
//! - **[path]** - The structured form of a variable token (levels + filters)
//!
//! ## Quick Start
//!
//! ```text
//! user.name|capfirst == "Alice" and not empty user.roles
//! ```
//!
//! Lexes to a flat token stream:
//!
//! ```text
//! Variable(user.name|capfirst) Comparator(==) String("Alice")
//! Joiner(&&) Invert(!) Function(empty) Variable(user.roles)
//! ```
//!
//! ## Variables
//!
//! A variable is a dotted path into the render context followed by an
//! optional filter chain. Filter arguments follow the filter name, each one
//! introduced by `:`:
//!
//! ```text
//! post.title|lower|default:"untitled"
//! ```
pub mod path;
pub mod tokens;

pub use path::{FilterArg, FilterCall, VariablePath};
pub use tokens::{Token, TokenKind};
