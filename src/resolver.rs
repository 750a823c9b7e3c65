//! Turns variable tokens into target code.
//!
//! For `user.name|capfirst` with the default options the emitted code is
//!
//! ```text
//! htmlentities(ucfirst($context->user->name->getValue()))
//! ```
//!
//! built in four steps: navigate the levels, unwrap the value, run the
//! filter chain, and escape unless a filter turned escaping off.

use log::trace;

use crate::{
    ast::{Token, TokenKind, VariablePath},
    compiler::DEFAULT_ORIGIN,
    config::CompilerOptions,
    context::OutputContext,
    error::Result,
    filters::FilterRegistry,
    variable::parse_variable,
};

/// What happens when the first level of a variable is missing from the
/// render context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lookup {
    /// The lookup fails at render time.
    #[default]
    Strict,
    /// The lookup yields a wrapped null.
    NullSafe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolveMode {
    pub lookup: Lookup,
    /// Whether the escape wrapper may be applied at all. Even when true,
    /// it is skipped if auto-escaping is off in the options or a filter
    /// turned it off.
    pub escape: bool,
}

impl ResolveMode {
    /// A variable whose value is printed or compared.
    pub const OUTPUT: Self = ResolveMode {
        lookup: Lookup::Strict,
        escape: true,
    };

    /// An operand of `in`, inspected for its type.
    pub const OPERAND: Self = ResolveMode {
        lookup: Lookup::Strict,
        escape: false,
    };

    /// An operand of `exists` or `empty`, which must not fail on absence.
    pub const PRESENCE: Self = ResolveMode {
        lookup: Lookup::NullSafe,
        escape: false,
    };
}

/// Code fetching the raw value at `levels`.
pub fn lookup_code(levels: &[String], lookup: Lookup, options: &CompilerOptions) -> String {
    let mut code = options.context_var.clone();
    let mut rest = levels;

    if lookup == Lookup::NullSafe {
        if let Some((first, tail)) = levels.split_first() {
            code.push_str(&format!("->{}('{}', true)", options.wrapped_accessor, first));
            rest = tail;
        }
    }

    for level in rest {
        code.push_str("->");
        code.push_str(level);
    }
    code.push_str(&format!("->{}()", options.value_accessor));
    code
}

pub fn strict_lookup(levels: &[String], options: &CompilerOptions) -> String {
    lookup_code(levels, Lookup::Strict, options)
}

/// Resolves variables against one filter registry, on behalf of one
/// template.
pub struct VariableResolver<'a> {
    registry: &'a FilterRegistry,
    origin: &'a str,
}

impl<'a> VariableResolver<'a> {
    pub fn new(registry: &'a FilterRegistry, origin: &'a str) -> Self {
        VariableResolver { registry, origin }
    }

    pub fn origin(&self) -> &str {
        self.origin
    }

    /// The template name for error messages, unless none was given.
    fn template(&self) -> Option<&str> {
        (self.origin != DEFAULT_ORIGIN).then_some(self.origin)
    }

    /// Parses a variable token's payload and resolves it.
    pub fn resolve(&self, raw: &str, mode: ResolveMode, ctx: &mut OutputContext) -> Result<String> {
        let path = parse_variable(self.origin, raw)?;
        self.resolve_path(&path, mode, ctx)
    }

    pub fn resolve_path(
        &self,
        path: &VariablePath,
        mode: ResolveMode,
        ctx: &mut OutputContext,
    ) -> Result<String> {
        let mut code = lookup_code(&path.levels, mode.lookup, ctx.options());
        let mut escape = mode.escape && ctx.options().auto_escape;

        for call in &path.filters {
            let filter = self.registry.get(&call.name, self.template())?;
            code = filter.apply(&code, &call.args, &mut escape, ctx)?;
            trace!("applied filter '{}': {}", call.name, code);
        }

        if escape {
            code = format!("{}({})", ctx.options().escape_function, code);
        }
        Ok(code)
    }

    /// Rewrites every remaining variable token into output code.
    pub fn resolve_tokens(&self, tokens: &mut [Token], ctx: &mut OutputContext) -> Result<()> {
        for token in tokens.iter_mut().filter(|token| token.is(TokenKind::Variable)) {
            token.value = self.resolve(&token.value, ResolveMode::OUTPUT, ctx)?;
            token.kind = TokenKind::OutputCode;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(path: &[&str]) -> Vec<String> {
        path.iter().map(|level| level.to_string()).collect()
    }

    #[test]
    fn strict_lookup_walks_every_level() {
        let options = CompilerOptions::default();
        assert_eq!(
            lookup_code(&levels(&["a", "b"]), Lookup::Strict, &options),
            "$context->a->b->getValue()"
        );
    }

    #[test]
    fn null_safe_lookup_wraps_first_level() {
        let options = CompilerOptions::default();
        assert_eq!(
            lookup_code(&levels(&["a", "b"]), Lookup::NullSafe, &options),
            "$context->getWrapped('a', true)->b->getValue()"
        );
    }

    #[test]
    fn escape_follows_options_and_filters() {
        let registry = FilterRegistry::with_builtins();
        let resolver = VariableResolver::new(&registry, "t");

        let mut ctx = OutputContext::new();
        assert_eq!(
            resolver.resolve("a", ResolveMode::OUTPUT, &mut ctx).unwrap(),
            "htmlentities($context->a->getValue())"
        );
        assert_eq!(
            resolver.resolve("a|raw", ResolveMode::OUTPUT, &mut ctx).unwrap(),
            "$context->a->getValue()"
        );

        let mut ctx = OutputContext::with_options(CompilerOptions {
            auto_escape: false,
            ..CompilerOptions::default()
        });
        assert_eq!(
            resolver.resolve("a", ResolveMode::OUTPUT, &mut ctx).unwrap(),
            "$context->a->getValue()"
        );
    }

    #[test]
    fn default_origin_is_not_named_as_template() {
        let registry = FilterRegistry::new();
        let mut ctx = OutputContext::new();

        let resolver = VariableResolver::new(&registry, DEFAULT_ORIGIN);
        let err = resolver.resolve("a|nope", ResolveMode::OUTPUT, &mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "Filter \"nope\" does not exist.");

        let resolver = VariableResolver::new(&registry, "list.html");
        let err = resolver.resolve("a|nope", ResolveMode::OUTPUT, &mut ctx).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Filter \"nope\" does not exist in template \"list.html\"."
        );
    }
}
