use std::mem;

use log::trace;

use crate::{
    ast::{
        Token, TokenKind,
        path::{ARGUMENT_SEPARATOR, FILTER_SEPARATOR, LEVEL_SEPARATOR},
    },
    error::{Result, SyntaxError},
};

pub const OPERATORS: &[&str] = &["-", "+", "/", "*", "%"];

pub const COMPARATORS: &[&str] = &["<", ">", "==", "!=", "<=", ">="];

pub const JOINERS: &[&str] = &["&&", "||"];

pub const FUNCTIONS: &[&str] = &["in", "empty", "exists"];

/// Words that lex as symbols.
fn keyword_translation(word: &str) -> Option<(TokenKind, &'static str)> {
    match word {
        "and" => Some((TokenKind::Joiner, "&&")),
        "or" => Some((TokenKind::Joiner, "||")),
        "not" => Some((TokenKind::Invert, "!")),
        _ => None,
    }
}

/// Single-character comparator prefixes that mean something on their own.
fn comparator_translation(symbol: &str) -> Option<(TokenKind, &'static str)> {
    match symbol {
        "=" => Some((TokenKind::Comparator, "==")),
        "!" => Some((TokenKind::Invert, "!")),
        _ => None,
    }
}

fn symbols_for(kind: TokenKind) -> &'static [&'static str] {
    match kind {
        TokenKind::Operator => OPERATORS,
        TokenKind::Comparator => COMPARATORS,
        TokenKind::Joiner => JOINERS,
        _ => &[],
    }
}

fn has_prefix(symbols: &[&str], prefix: &str) -> bool {
    symbols.iter().any(|symbol| symbol.starts_with(prefix))
}

/// What the scan loop does after a character has been handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// The character was consumed.
    Advance,
    /// A token boundary was found; handle the same character again in the
    /// new state.
    Retry,
}

/// Character-at-a-time state machine turning an expression into tokens.
///
/// The current state is the [`TokenKind`] being accumulated. Legality of a
/// token is decided when it is emitted, by looking at the kind of the token
/// before it, so no backtracking is ever needed.
pub struct Lexer {
    source: String,
    input: Vec<char>,
    state: TokenKind,
    token: String,
    tokens: Vec<Token>,
    last: TokenKind,
    var_in_quotes: bool,
    var_escaping: bool,
    var_in_filter: bool,
    var_in_argument: bool,
    num_has_dot: bool,
    string_escaping: bool,
    groups: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            source: input.to_string(),
            input: input.chars().collect(),
            state: TokenKind::None,
            token: String::new(),
            tokens: Vec::new(),
            last: TokenKind::None,
            var_in_quotes: false,
            var_escaping: false,
            var_in_filter: false,
            var_in_argument: false,
            num_has_dot: false,
            string_escaping: false,
            groups: 0,
        }
    }

    /// Runs the state machine over the whole input.
    ///
    /// The scan goes one character past the end, reading a space there, so
    /// whatever token is open at the end of the input gets flushed.
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut position = 0;
        while position <= self.input.len() {
            let ch = self.input.get(position).copied().unwrap_or(' ');
            match self.step(ch)? {
                Step::Advance => position += 1,
                Step::Retry => {}
            }
        }

        let unterminated = match self.state {
            TokenKind::String => true,
            TokenKind::Variable => self.var_in_quotes,
            _ => false,
        };
        if unterminated {
            // Drop the synthetic trailing space.
            self.token.pop();
            return Err(SyntaxError::UnterminatedString {
                token: mem::take(&mut self.token),
                expr: self.source,
            });
        }

        if self.groups != 0 {
            return Err(SyntaxError::UnbalancedGroup { expr: self.source });
        }

        Ok(self.tokens)
    }

    fn step(&mut self, ch: char) -> Result<Step> {
        match self.state {
            TokenKind::None => self.start_token(ch),
            TokenKind::String => self.lex_string(ch),
            TokenKind::Number => self.lex_number(ch),
            TokenKind::Variable => self.lex_variable(ch),
            TokenKind::Operator | TokenKind::Comparator | TokenKind::Joiner => {
                self.lex_symbol(ch)
            }
            TokenKind::OpenGroup => self.lex_open_group(),
            TokenKind::CloseGroup => self.lex_close_group(),
            TokenKind::Invert => self.lex_invert(),
            TokenKind::Concat => self.lex_concat(),
            TokenKind::Function | TokenKind::OutputCode => {
                unreachable!("lexer never rests in the {} state", self.state)
            }
        }
    }

    fn emit(&mut self, kind: TokenKind) {
        let value = mem::take(&mut self.token);
        trace!("lexed {} {:?}", kind, value);
        self.tokens.push(Token::new(kind, value));
        self.last = kind;
        self.state = TokenKind::None;
    }

    fn last_is(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.last)
    }

    fn misplaced(&self, what: &'static str) -> SyntaxError {
        SyntaxError::Misplaced {
            what,
            token: self.token.clone(),
            expr: self.source.clone(),
        }
    }

    /// Picks the state for the first character of a new token.
    fn start_token(&mut self, ch: char) -> Result<Step> {
        self.token.clear();
        self.token.push(ch);
        let single = ch.to_string();

        self.state = if ch.is_ascii_digit() || ch == '.' {
            TokenKind::Number
        } else if ch.is_ascii_alphabetic() {
            TokenKind::Variable
        } else if has_prefix(OPERATORS, &single) {
            TokenKind::Operator
        } else if has_prefix(COMPARATORS, &single) {
            TokenKind::Comparator
        } else if has_prefix(JOINERS, &single) {
            TokenKind::Joiner
        } else if ch == '(' {
            TokenKind::OpenGroup
        } else if ch == ')' {
            TokenKind::CloseGroup
        } else if ch == '"' {
            TokenKind::String
        } else if ch.is_ascii_whitespace() {
            self.token.clear();
            TokenKind::None
        } else {
            return Err(SyntaxError::IllegalCharacter {
                ch,
                expr: self.source.clone(),
            });
        };
        Ok(Step::Advance)
    }

    fn lex_string(&mut self, ch: char) -> Result<Step> {
        self.token.push(ch);
        if !self.string_escaping && ch == '"' {
            if !self.last_is(&[
                TokenKind::None,
                TokenKind::Comparator,
                TokenKind::Concat,
                TokenKind::Function,
                TokenKind::Joiner,
                TokenKind::OpenGroup,
            ]) {
                return Err(self.misplaced("string"));
            }
            self.emit(TokenKind::String);
        } else if self.string_escaping {
            self.string_escaping = false;
        } else if ch == '\\' {
            self.string_escaping = true;
        }
        Ok(Step::Advance)
    }

    fn lex_number(&mut self, ch: char) -> Result<Step> {
        if self.token == "." {
            self.num_has_dot = true;
        }

        if ch.is_ascii_digit() {
            self.token.push(ch);
            return Ok(Step::Advance);
        }

        if ch == '.' {
            if self.num_has_dot {
                return Err(SyntaxError::MultipleDecimalPoints {
                    token: self.token.clone(),
                    expr: self.source.clone(),
                });
            }
            self.token.push(ch);
            self.num_has_dot = true;
            return Ok(Step::Advance);
        }

        self.num_has_dot = false;

        // A dot with no digits after it is the concatenation operator.
        if self.token == "." {
            self.state = TokenKind::Concat;
            return Ok(Step::Retry);
        }

        if !self.last_is(&[
            TokenKind::None,
            TokenKind::Comparator,
            TokenKind::Joiner,
            TokenKind::Operator,
            TokenKind::OpenGroup,
            TokenKind::Concat,
        ]) {
            return Err(self.misplaced("numeric"));
        }
        self.emit(TokenKind::Number);
        Ok(Step::Retry)
    }

    fn lex_variable(&mut self, ch: char) -> Result<Step> {
        if self.var_in_quotes {
            if ch == '"' && !self.var_escaping {
                self.var_in_quotes = false;
            } else if ch == '\\' || self.var_escaping {
                self.var_escaping = !self.var_escaping;
            }
            self.token.push(ch);
            return Ok(Step::Advance);
        }

        if ch == FILTER_SEPARATOR {
            if self.token.ends_with(FILTER_SEPARATOR) {
                return self.split_joiner();
            }
            if self.token.ends_with(ARGUMENT_SEPARATOR) {
                return Err(self.illegal_in_filter(ch));
            }
            self.token.push(ch);
            self.var_in_filter = true;
            self.var_in_argument = false;
            return Ok(Step::Advance);
        }

        let accepted = if self.var_in_filter {
            match self.token.chars().last() {
                Some(FILTER_SEPARATOR) if ch.is_ascii_alphabetic() => true,
                Some(FILTER_SEPARATOR) => return Err(self.illegal_in_filter(ch)),
                Some(ARGUMENT_SEPARATOR) if ch == '"' => {
                    self.var_in_quotes = true;
                    true
                }
                // `add:-1`, `add:.5`
                Some(ARGUMENT_SEPARATOR) if ch == '-' || ch == LEVEL_SEPARATOR => true,
                Some(last) => {
                    if ch.is_ascii_alphanumeric() || ch == '_' || ch == ARGUMENT_SEPARATOR {
                        true
                    } else if ch == LEVEL_SEPARATOR && self.var_in_argument {
                        // `add:1.5`, `add:cart.fee`
                        true
                    } else if last == ARGUMENT_SEPARATOR {
                        return Err(self.illegal_in_filter(ch));
                    } else {
                        false
                    }
                }
                None => false,
            }
        } else {
            ch.is_ascii_alphanumeric() || ch == '_' || ch == LEVEL_SEPARATOR
        };

        if accepted {
            if self.var_in_filter && ch == ARGUMENT_SEPARATOR {
                self.var_in_argument = true;
            }
            self.token.push(ch);
            Ok(Step::Advance)
        } else {
            self.finish_variable()
        }
    }

    /// `a||b`: the `|` taken as a filter separator was the first half of a
    /// joiner. Emit the variable before it and continue as `||`.
    fn split_joiner(&mut self) -> Result<Step> {
        self.token.pop();
        self.finish_variable()?;
        if self.state != TokenKind::None {
            return Err(self.illegal_in_filter(FILTER_SEPARATOR));
        }
        self.state = TokenKind::Joiner;
        self.token = "||".to_string();
        Ok(Step::Advance)
    }

    fn illegal_in_filter(&self, ch: char) -> SyntaxError {
        SyntaxError::IllegalFilterCharacter {
            ch,
            expr: self.source.clone(),
        }
    }

    fn finish_variable(&mut self) -> Result<Step> {
        if let Some((kind, symbol)) = keyword_translation(&self.token) {
            self.state = kind;
            self.token = symbol.to_string();
            return Ok(Step::Retry);
        }

        if FUNCTIONS.contains(&self.token.as_str()) {
            self.emit(TokenKind::Function);
            return Ok(Step::Retry);
        }

        if !self.last_is(&[
            TokenKind::None,
            TokenKind::Comparator,
            TokenKind::Invert,
            TokenKind::Joiner,
            TokenKind::Operator,
            TokenKind::OpenGroup,
            TokenKind::Function,
            TokenKind::Concat,
        ]) {
            return Err(self.misplaced("variable"));
        }
        self.emit(TokenKind::Variable);
        self.var_in_filter = false;
        self.var_in_argument = false;
        self.var_escaping = false;
        self.var_in_quotes = false;
        Ok(Step::Retry)
    }

    fn lex_symbol(&mut self, ch: char) -> Result<Step> {
        let symbols = symbols_for(self.state);

        let mut candidate = self.token.clone();
        candidate.push(ch);
        if has_prefix(symbols, &candidate) {
            self.token = candidate;
            return Ok(Step::Advance);
        }

        if self.state == TokenKind::Comparator {
            if let Some((kind, symbol)) = comparator_translation(&self.token) {
                self.state = kind;
                self.token = symbol.to_string();
                return Ok(Step::Retry);
            }
        }

        // `-` directly in front of a digit, where no operand precedes it,
        // starts a negative number.
        if self.state == TokenKind::Operator
            && self.token == "-"
            && ch.is_ascii_digit()
            && self.last_is(&[
                TokenKind::None,
                TokenKind::Comparator,
                TokenKind::Joiner,
                TokenKind::Operator,
                TokenKind::OpenGroup,
            ])
        {
            self.state = TokenKind::Number;
            return Ok(Step::Retry);
        }

        if !symbols.contains(&self.token.as_str()) {
            return Err(SyntaxError::IncompleteSymbol {
                token: self.token.clone(),
                expr: self.source.clone(),
            });
        }

        if !self.last_is(&[TokenKind::Variable, TokenKind::Number, TokenKind::CloseGroup]) {
            return Err(self.misplaced(self.state.name()));
        }
        self.emit(self.state);
        Ok(Step::Retry)
    }

    fn lex_open_group(&mut self) -> Result<Step> {
        // `name(` or `5(` would be a call or an index, neither of which exists.
        if self.last_is(&[TokenKind::Variable, TokenKind::Number]) {
            return Err(self.misplaced("group"));
        }
        self.emit(TokenKind::OpenGroup);
        self.groups += 1;
        Ok(Step::Retry)
    }

    fn lex_close_group(&mut self) -> Result<Step> {
        if self.groups == 0
            || !self.last_is(&[
                TokenKind::Variable,
                TokenKind::Number,
                TokenKind::String,
                TokenKind::CloseGroup,
            ])
        {
            return Err(self.misplaced("group"));
        }
        self.emit(TokenKind::CloseGroup);
        self.groups -= 1;
        Ok(Step::Retry)
    }

    fn lex_invert(&mut self) -> Result<Step> {
        if !self.last_is(&[
            TokenKind::None,
            TokenKind::Comparator,
            TokenKind::Joiner,
            TokenKind::OpenGroup,
        ]) {
            return Err(self.misplaced("invert"));
        }
        self.emit(TokenKind::Invert);
        Ok(Step::Retry)
    }

    fn lex_concat(&mut self) -> Result<Step> {
        if !self.last_is(&[
            TokenKind::CloseGroup,
            TokenKind::Number,
            TokenKind::String,
            TokenKind::Variable,
        ]) {
            return Err(self.misplaced("concat"));
        }
        self.emit(TokenKind::Concat);
        Ok(Step::Retry)
    }
}

/// Tokenizes a whole expression.
pub fn tokenize(expr: &str) -> Result<Vec<Token>> {
    Lexer::new(expr).tokenize()
}

#[test]
fn test_keywords() {
    let tokens = tokenize("a and not b or c").unwrap();
    let kinds: Vec<_> = tokens.iter().map(|t| (t.kind, t.value.as_str())).collect();
    assert_eq!(
        kinds,
        vec![
            (TokenKind::Variable, "a"),
            (TokenKind::Joiner, "&&"),
            (TokenKind::Invert, "!"),
            (TokenKind::Variable, "b"),
            (TokenKind::Joiner, "||"),
            (TokenKind::Variable, "c"),
        ]
    );
}

#[test]
fn test_filter_section() {
    let tokens = tokenize("title|lower|default:\"a b\" == x").unwrap();
    assert_eq!(tokens[0], Token::new(TokenKind::Variable, "title|lower|default:\"a b\""));
    assert_eq!(tokens[1], Token::new(TokenKind::Comparator, "=="));
    assert_eq!(tokens[2], Token::new(TokenKind::Variable, "x"));
}
