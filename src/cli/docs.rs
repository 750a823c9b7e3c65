//! Documentation content for the hyx CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Functions,
    Filters,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "syntax" | "variables" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "functions" | "keywords" => Some(Self::Functions),
            "filters" | "filter" => Some(Self::Filters),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"HYDROGEN EXPRESSION DOCUMENTATION

Hydrogen expressions appear in template tags such as {% if %}. They combine
context variables, literals and operators, and compile to PHP that runs
against the render context.

DOCUMENTATION CATEGORIES

  syntax            Variables, levels, literals and grouping
  operators         Arithmetic, comparison, joining and concatenation
  functions         The exists, empty and in keywords
  filters           Filter chains, arguments and auto-escaping

QUICK REFERENCE

  user.name         Variable with two levels
  name|capfirst     Variable with a filter
  "text"  42  -1.5  Literals
  a == b  a != b    Comparison (a bare = means ==)
  a and b  a && b   Joiners (also or / ||)
  not a  !a         Inversion
  a . " " . b       Concatenation
  exists a          a is set
  empty a           a is null, "" or an empty array
  "x" in a          a contains "x"

Run 'hyx doc <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Functions) => Ok(FUNCTIONS_DOC),
        Some(DocCategory::Filters) => Ok(FILTERS_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX - Variables and Literals

VARIABLES
  name
  name.level.level
    A context variable. Names start with a letter and contain letters,
    digits and underscores. Each '.' steps one level deeper.

    Example:
      Expression: user.address.city
      Compiles:   htmlentities($context->user->address->city->getValue())

NUMBERS
  42  3.14  .5  -7
    At most one decimal point. A '-' directly before a digit is a negative
    number when nothing that could be subtracted from precedes it:

      -5          The number -5
      total - 5   Subtraction
      total -5    Subtraction

STRINGS
  "text"
    Double quotes only. A backslash escapes the next character.

GROUPING
  ( ... )
    Parentheses must balance. A group may not directly follow a variable
    or number: there are no calls or indexing.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS

ARITHMETIC
  -  +  *  /  %
    Between variables, numbers and groups.

COMPARISON
  <  >  <=  >=  ==  !=
    A bare '=' is read as '=='.

JOINERS
  &&  ||  and  or
    'and' and 'or' compile to '&&' and '||'.

INVERSION
  !  not
    At the start of an expression, or after a comparator, joiner or '('.

CONCATENATION
  .
    A dot standing on its own joins strings:

      first . " " . last
"#;

const FUNCTIONS_DOC: &str = r#"FUNCTIONS

EXISTS
  exists var
    True when var is set. Missing variables don't raise an error.

    Example:
      Expression: exists user
      Compiles:   !is_null( $context->getWrapped('user', true)->getValue() )

EMPTY
  empty var
    True when var is null, the empty string, or an array with no elements.
    Missing variables count as empty.

IN
  needle in haystack
    When haystack is an array, true if needle is one of its elements.
    Otherwise true if needle is a substring of haystack. Both sides must be
    a variable or a string.

    Example:
      "admin" in user.roles

  Operands are evaluated once per place they appear in the compiled code.
"#;

const FILTERS_DOC: &str = r#"FILTERS

CHAINS
  var|filter|filter
    Filters apply left to right.

ARGUMENTS
  var|filter:arg:arg
    Arguments are numbers, double-quoted strings or variables.

      price|add:tax:2
      price|add:-1.5:cart.shipping
      title|default:"untitled"

AUTO-ESCAPING
    Variables are wrapped in htmlentities() unless a filter in the chain
    turns escaping off. md5, add, length and raw do; capfirst, upper,
    lower and default don't. Operands of exists, empty and in are never
    escaped.

BUILT-IN FILTERS
  add:n...      Sum of the value and every argument
  capfirst      First character uppercased
  default:x     x when the value is falsy
  length        Element count, or string length
  lower         Lowercased
  md5           MD5 hex digest
  raw           Unescaped value
  upper         Uppercased

Run 'hyx filters' to list the filters known to the compiler.
"#;
