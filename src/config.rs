//! Compiler configuration.
//!
//! Controls the names used in emitted code. The defaults produce code for
//! the Hydrogen PHP runtime, where the render context is `$context` and
//! every context value is wrapped in an object exposing `getValue()`.
//!
//! Options can be loaded from JSON; missing keys keep their defaults:
//!
//! ```
//! use hydrogen_expr::config::CompilerOptions;
//!
//! let options = CompilerOptions::from_json_str(r#"{"auto_escape": false}"#).unwrap();
//! assert!(!options.auto_escape);
//! assert_eq!(options.context_var, "$context");
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Expression naming the render context.
    pub context_var: String,

    /// Method called on the final level to unwrap the raw value.
    pub value_accessor: String,

    /// Method on the context used for null-safe lookups of the first level.
    pub wrapped_accessor: String,

    /// Function wrapped around variable output while auto-escaping is on.
    pub escape_function: String,

    /// Whether variables start out auto-escaped. Filters may still turn
    /// escaping off for their variable.
    pub auto_escape: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        CompilerOptions {
            context_var: "$context".to_string(),
            value_accessor: "getValue".to_string(),
            wrapped_accessor: "getWrapped".to_string(),
            escape_function: "htmlentities".to_string(),
            auto_escape: true,
        }
    }
}

impl CompilerOptions {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads options from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }
}
