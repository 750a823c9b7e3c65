//! Expansion of the `exists`, `empty` and `in` keywords.
//!
//! Each keyword and its operands are replaced in the token stream by a run
//! of output code:
//!
//! ```text
//! exists user       !is_null( U )
//! empty user        (is_null( U ) || U === "" || (is_array( U ) && count( U ) === 0))
//! "a" in list       ((!is_array( L ) && strpos( L , "a" ) !== false) || (is_array( L ) && in_array( "a" , L )))
//! ```
//!
//! Operands are repeated rather than evaluated once into a temporary, so a
//! filter chain on an operand runs once per occurrence. That is harmless
//! while filters are pure; a filter with side effects would see them
//! repeated.

use log::trace;

use crate::{
    ast::{Token, TokenKind},
    context::OutputContext,
    error::{Result, SyntaxError},
    resolver::{ResolveMode, VariableResolver},
};

/// Expands every function keyword in `tokens`, in place, left to right.
///
/// `expr` is the source expression, used in error messages.
pub fn expand_functions(
    tokens: &mut Vec<Token>,
    resolver: &VariableResolver<'_>,
    expr: &str,
    ctx: &mut OutputContext,
) -> Result<()> {
    let mut cursor = 0;
    while cursor < tokens.len() {
        if !tokens[cursor].is(TokenKind::Function) {
            cursor += 1;
            continue;
        }

        let (start, consumed, replacement) = match tokens[cursor].value.as_str() {
            "exists" => (cursor, 2, expand_exists(tokens, cursor, resolver, expr, ctx)?),
            "empty" => (cursor, 2, expand_empty(tokens, cursor, resolver, expr, ctx)?),
            "in" => {
                // Fails when nothing precedes `in`, so `cursor - 1` is safe.
                let replacement = expand_in(tokens, cursor, resolver, expr, ctx)?;
                (cursor - 1, 3, replacement)
            }
            _ => {
                cursor += 1;
                continue;
            }
        };

        trace!(
            "expanded '{}' into {} tokens",
            tokens[cursor].value,
            replacement.len()
        );
        let inserted = replacement.len();
        tokens.splice(start..start + consumed, replacement);
        cursor = start + inserted;
    }
    Ok(())
}

/// The variable right after the keyword at `at`, resolved null-safe.
fn presence_operand(
    tokens: &[Token],
    at: usize,
    resolver: &VariableResolver<'_>,
    expr: &str,
    ctx: &mut OutputContext,
) -> Result<Token> {
    match tokens.get(at + 1) {
        Some(operand) if operand.is(TokenKind::Variable) => {
            let code = resolver.resolve(&operand.value, ResolveMode::PRESENCE, ctx)?;
            Ok(Token::code(code))
        }
        _ => Err(SyntaxError::MissingOperand {
            keyword: tokens[at].value.clone(),
            expr: expr.to_string(),
        }),
    }
}

fn expand_exists(
    tokens: &[Token],
    at: usize,
    resolver: &VariableResolver<'_>,
    expr: &str,
    ctx: &mut OutputContext,
) -> Result<Vec<Token>> {
    let var = presence_operand(tokens, at, resolver, expr, ctx)?;
    Ok(vec![Token::code("!is_null("), var, Token::code(")")])
}

fn expand_empty(
    tokens: &[Token],
    at: usize,
    resolver: &VariableResolver<'_>,
    expr: &str,
    ctx: &mut OutputContext,
) -> Result<Vec<Token>> {
    let var = presence_operand(tokens, at, resolver, expr, ctx)?;
    Ok(vec![
        Token::code("(is_null("),
        var.clone(),
        Token::code(") ||"),
        var.clone(),
        Token::code("=== \"\" || (is_array("),
        var.clone(),
        Token::code(") && count("),
        var,
        Token::code(") === 0))"),
    ])
}

fn expand_in(
    tokens: &[Token],
    at: usize,
    resolver: &VariableResolver<'_>,
    expr: &str,
    ctx: &mut OutputContext,
) -> Result<Vec<Token>> {
    let is_operand =
        |token: &Token| token.is(TokenKind::Variable) || token.is(TokenKind::String);

    let (needle, haystack) = match (at.checked_sub(1).map(|i| &tokens[i]), tokens.get(at + 1)) {
        (Some(needle), Some(haystack)) if is_operand(needle) && is_operand(haystack) => {
            (needle, haystack)
        }
        _ => {
            return Err(SyntaxError::InOperands {
                expr: expr.to_string(),
            });
        }
    };

    // Every occurrence is resolved on its own.
    let mut copy = |token: &Token| -> Result<Token> {
        if token.is(TokenKind::Variable) {
            Ok(Token::code(resolver.resolve(
                &token.value,
                ResolveMode::OPERAND,
                ctx,
            )?))
        } else {
            Ok(token.clone())
        }
    };

    Ok(vec![
        Token::code("((!is_array("),
        copy(haystack)?,
        Token::code(") && strpos("),
        copy(haystack)?,
        Token::code(","),
        copy(needle)?,
        Token::code(") !== false) || (is_array("),
        copy(haystack)?,
        Token::code(") && in_array("),
        copy(needle)?,
        Token::code(","),
        copy(haystack)?,
        Token::code(")))"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{filters::FilterRegistry, lexer::tokenize};

    fn expand(expr: &str) -> Result<Vec<Token>> {
        let registry = FilterRegistry::with_builtins();
        let resolver = VariableResolver::new(&registry, "test");
        let mut ctx = OutputContext::new();
        let mut tokens = tokenize(expr)?;
        expand_functions(&mut tokens, &resolver, expr, &mut ctx)?;
        Ok(tokens)
    }

    #[test]
    fn expansion_leaves_cursor_after_replacement() {
        let tokens = expand("exists a && exists b").unwrap();
        let functions = tokens.iter().filter(|t| t.is(TokenKind::Function)).count();
        assert_eq!(functions, 0);
        assert_eq!(tokens.len(), 7);
        assert_eq!(tokens[3], Token::new(TokenKind::Joiner, "&&"));
    }

    #[test]
    fn in_consumes_both_neighbours() {
        let tokens = expand("\"x\" in list == y").unwrap();
        assert_eq!(tokens.len(), 13 + 2);
        assert!(tokens[..13].iter().all(|t| t.is(TokenKind::OutputCode) || t.is(TokenKind::String)));
        assert_eq!(tokens[13], Token::new(TokenKind::Comparator, "=="));
        assert_eq!(tokens[14], Token::new(TokenKind::Variable, "y"));
    }

    #[test]
    fn operands_must_be_adjacent() {
        assert!(matches!(
            expand("exists (a)"),
            Err(SyntaxError::MissingOperand { ref keyword, .. }) if keyword == "exists"
        ));
        assert!(matches!(expand("empty"), Err(SyntaxError::MissingOperand { .. })));
        assert!(matches!(expand("1 in a"), Err(SyntaxError::InOperands { .. })));
        assert!(matches!(expand("a in (b)"), Err(SyntaxError::InOperands { .. })));
    }
}
