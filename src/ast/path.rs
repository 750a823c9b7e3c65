use serde::Serialize;

/// Separates the levels of a variable path: `user.profile.name`.
pub const LEVEL_SEPARATOR: char = '.';

/// Introduces a filter: `name|capfirst`.
pub const FILTER_SEPARATOR: char = '|';

/// Introduces each filter argument: `price|add:tax:2`.
pub const ARGUMENT_SEPARATOR: char = ':';

/// The structured form of a variable token.
///
/// # Examples
///
/// For `user.name|default:"anon"|capfirst`:
/// - `levels` is `["user", "name"]`
/// - `filters` is `default("anon")` followed by `capfirst()`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariablePath {
    /// Attribute-access levels, outermost first. Never empty.
    pub levels: Vec<String>,

    /// Filters in the order they are applied.
    pub filters: Vec<FilterCall>,
}

/// One `|name:arg:arg` segment of a variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCall {
    pub name: String,
    pub args: Vec<FilterArg>,
}

/// A filter argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum FilterArg {
    /// Quoted string literal, quotes and escapes kept verbatim
    ///
    /// # Example
    /// ```text
    /// default:"n/a"
    /// ```
    String(String),

    /// Numeric literal, kept verbatim
    ///
    /// # Example
    /// ```text
    /// add:-1.5
    /// ```
    Number(String),

    /// Another context variable, levels only
    ///
    /// # Example
    /// ```text
    /// add:cart.shipping
    /// ```
    Variable(Vec<String>),
}
