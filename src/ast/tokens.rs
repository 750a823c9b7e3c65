use std::fmt;

use serde::Serialize;

/// The kind of a [`Token`].
///
/// The lexer also uses these as its states: while a token is being
/// accumulated, the current state is the kind it will be emitted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    /// No token yet. The lexer's resting state, and the "previous token"
    /// at the very start of an expression.
    None,

    /// Arithmetic operator
    ///
    /// # Examples
    /// ```text
    /// -  +  /  *  %
    /// ```
    Operator,

    /// Comparison operator
    ///
    /// A bare `=` is accepted and emitted as `==`.
    ///
    /// # Examples
    /// ```text
    /// <  >  ==  !=  <=  >=
    /// ```
    Comparator,

    /// Boolean join, either as a symbol or as the words `and` / `or`
    ///
    /// # Examples
    /// ```text
    /// &&  ||
    /// ```
    Joiner,

    /// Numeric literal, optionally negative, at most one decimal point
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 3.14
    /// .5
    /// -10
    /// ```
    Number,

    /// Context variable with an optional filter chain
    ///
    /// # Examples
    /// ```text
    /// user
    /// user.profile.name
    /// title|lower|capfirst
    /// price|add:tax:shipping
    /// ```
    Variable,

    /// `(`
    OpenGroup,

    /// `)`
    CloseGroup,

    /// Boolean negation, either `!` or the word `not`
    Invert,

    /// String literal enclosed in double quotes, quotes included
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// "say \"hi\""
    /// ```
    String,

    /// String concatenation (`.` standing on its own)
    ///
    /// # Examples
    /// ```text
    /// first . " " . last
    /// ```
    Concat,

    /// One of the built-in function keywords
    ///
    /// # Examples
    /// ```text
    /// exists user
    /// empty cart.items
    /// "admin" in user.roles
    /// ```
    Function,

    /// Target code injected by the expansion and resolution passes.
    OutputCode,
}

impl TokenKind {
    /// Lowercase name used in diagnostics and the CLI token listing.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::None => "none",
            TokenKind::Operator => "operator",
            TokenKind::Comparator => "comparator",
            TokenKind::Joiner => "joiner",
            TokenKind::Number => "number",
            TokenKind::Variable => "variable",
            TokenKind::OpenGroup => "open-group",
            TokenKind::CloseGroup => "close-group",
            TokenKind::Invert => "invert",
            TokenKind::String => "string",
            TokenKind::Concat => "concat",
            TokenKind::Function => "function",
            TokenKind::OutputCode => "output-code",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified piece of an expression: its kind plus the text it carries.
///
/// Source tokens carry the lexeme (already normalized, so `and` arrives as
/// `&&`); [`TokenKind::OutputCode`] tokens carry finished target code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>) -> Self {
        Token {
            kind,
            value: value.into(),
        }
    }

    pub fn code(value: impl Into<String>) -> Self {
        Token::new(TokenKind::OutputCode, value)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

/// Tokens display as their payload, which is what the assembled output is
/// made of.
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
