//! Parsing of variable tokens into [`VariablePath`]s.
//!
//! A variable token arrives from the lexer as one string, for example
//! `cart.total|add:shipping:"1.50"|md5`. This module splits it into its
//! levels and filter chain.

use std::sync::LazyLock;

use regex::Regex;

use crate::{
    ast::{
        FilterArg, FilterCall, VariablePath,
        path::{ARGUMENT_SEPARATOR, FILTER_SEPARATOR, LEVEL_SEPARATOR},
    },
    error::{Result, SyntaxError},
};

static LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("valid level pattern"));

pub(crate) static FILTER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").expect("valid filter pattern"));

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(\d+\.?\d*|\.\d+)$").expect("valid number pattern"));

/// Parses the payload of a variable token.
///
/// `origin` names the template the variable came from and only ends up in
/// error messages.
///
/// # Examples
///
/// ```
/// use hydrogen_expr::variable::parse_variable;
/// use hydrogen_expr::ast::FilterArg;
///
/// let path = parse_variable("page", "user.name|default:\"anon\"").unwrap();
/// assert_eq!(path.levels, vec!["user", "name"]);
/// assert_eq!(path.filters[0].name, "default");
/// assert_eq!(path.filters[0].args, vec![FilterArg::String("\"anon\"".into())]);
/// ```
pub fn parse_variable(origin: &str, raw: &str) -> Result<VariablePath> {
    let invalid = |message: String| SyntaxError::InvalidVariable {
        var: raw.to_string(),
        origin: origin.to_string(),
        message,
    };

    let mut sections = split_unquoted(raw, FILTER_SEPARATOR).map_err(&invalid)?.into_iter();
    let head = sections.next().unwrap_or_default();
    let levels = parse_levels(head).map_err(&invalid)?;

    let filters = sections
        .map(|section| parse_filter(section).map_err(&invalid))
        .collect::<Result<Vec<_>>>()?;

    Ok(VariablePath { levels, filters })
}

fn parse_levels(head: &str) -> std::result::Result<Vec<String>, String> {
    head.split(LEVEL_SEPARATOR)
        .map(|level| {
            if level.is_empty() {
                Err("empty variable level".to_string())
            } else if LEVEL.is_match(level) {
                Ok(level.to_string())
            } else {
                Err(format!("illegal variable level '{}'", level))
            }
        })
        .collect()
}

fn parse_filter(section: &str) -> std::result::Result<FilterCall, String> {
    let mut parts = split_unquoted(section, ARGUMENT_SEPARATOR)?.into_iter();
    let name = parts.next().unwrap_or_default();
    if name.is_empty() {
        return Err("empty filter name".to_string());
    }
    if !FILTER_NAME.is_match(name) {
        return Err(format!("illegal filter name '{}'", name));
    }

    let args = parts.map(parse_argument).collect::<std::result::Result<_, _>>()?;
    Ok(FilterCall {
        name: name.to_string(),
        args,
    })
}

fn parse_argument(arg: &str) -> std::result::Result<FilterArg, String> {
    if arg.is_empty() {
        return Err("empty filter argument".to_string());
    }
    if arg.starts_with('"') {
        // split_unquoted already rejected unterminated quotes, so a quoted
        // argument that doesn't end on its closing quote has trailing junk.
        if arg.len() < 2 || !arg.ends_with('"') || closing_quote(arg) != Some(arg.len() - 1) {
            return Err(format!("malformed string argument {}", arg));
        }
        return Ok(FilterArg::String(arg.to_string()));
    }
    if NUMBER.is_match(arg) {
        return Ok(FilterArg::Number(arg.to_string()));
    }
    parse_levels(arg).map(FilterArg::Variable)
}

/// Byte index of the quote that closes the string opening at index 0.
fn closing_quote(arg: &str) -> Option<usize> {
    let mut escaping = false;
    for (i, ch) in arg.char_indices().skip(1) {
        if escaping {
            escaping = false;
        } else if ch == '\\' {
            escaping = true;
        } else if ch == '"' {
            return Some(i);
        }
    }
    None
}

/// Splits on `separator` wherever it is not inside a double-quoted string.
fn split_unquoted(input: &str, separator: char) -> std::result::Result<Vec<&str>, String> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut escaping = false;

    for (i, ch) in input.char_indices() {
        if in_quotes {
            if escaping {
                escaping = false;
            } else if ch == '\\' {
                escaping = true;
            } else if ch == '"' {
                in_quotes = false;
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == separator {
            parts.push(&input[start..i]);
            start = i + ch.len_utf8();
        }
    }

    if in_quotes {
        return Err("unterminated string".to_string());
    }
    parts.push(&input[start..]);
    Ok(parts)
}
