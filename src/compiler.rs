use std::sync::LazyLock;

use log::debug;

use crate::{
    ast::Token,
    context::OutputContext,
    error::Result,
    expander::expand_functions,
    filters::FilterRegistry,
    lexer::tokenize,
    resolver::VariableResolver,
};

/// Origin reported in errors when the caller doesn't name a template.
pub const DEFAULT_ORIGIN: &str = "expression";

/// Compiles expressions against a fixed filter registry.
///
/// Compiling holds no state between calls, so one compiler can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct ExpressionCompiler {
    registry: FilterRegistry,
}

impl Default for ExpressionCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionCompiler {
    /// A compiler with the built-in filters.
    pub fn new() -> Self {
        Self::with_registry(FilterRegistry::with_builtins())
    }

    pub fn with_registry(registry: FilterRegistry) -> Self {
        ExpressionCompiler { registry }
    }

    pub fn registry(&self) -> &FilterRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FilterRegistry {
        &mut self.registry
    }

    /// Compiles `expr` to target code.
    ///
    /// Filters may declare helpers in `ctx`; the caller is responsible for
    /// emitting those ahead of the returned code. `origin` names the
    /// template the expression came from, for error messages.
    ///
    /// # Examples
    ///
    /// ```
    /// use hydrogen_expr::{ExpressionCompiler, OutputContext};
    ///
    /// let compiler = ExpressionCompiler::new();
    /// let mut ctx = OutputContext::new();
    /// let code = compiler.compile("count > 2 and name|md5", &mut ctx, "inbox").unwrap();
    /// assert_eq!(
    ///     code,
    ///     "htmlentities($context->count->getValue()) > 2 && md5($context->name->getValue())"
    /// );
    /// ```
    pub fn compile(&self, expr: &str, ctx: &mut OutputContext, origin: &str) -> Result<String> {
        debug!("compiling {:?} from {}", expr, origin);
        self.compile_tokens(expr, ctx, origin)
            .map(|tokens| assemble(&tokens))
            .inspect(|code| debug!("compiled {:?} to {:?}", expr, code))
            .inspect_err(|err| debug!("failed to compile {:?}: {}", expr, err))
    }

    /// Runs every pass but assembly, returning the final token stream.
    pub fn compile_tokens(
        &self,
        expr: &str,
        ctx: &mut OutputContext,
        origin: &str,
    ) -> Result<Vec<Token>> {
        let mut tokens = tokenize(expr)?;
        let resolver = VariableResolver::new(&self.registry, origin);
        expand_functions(&mut tokens, &resolver, expr, ctx)?;
        resolver.resolve_tokens(&mut tokens, ctx)?;
        Ok(tokens)
    }
}

/// Joins token payloads with single spaces.
pub fn assemble(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|token| token.value.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

static DEFAULT_COMPILER: LazyLock<ExpressionCompiler> = LazyLock::new(ExpressionCompiler::new);

/// Compiles `expr` with the built-in filters.
///
/// Pass [`DEFAULT_ORIGIN`] as `origin` when there is no template name.
pub fn compile_expression(expr: &str, ctx: &mut OutputContext, origin: &str) -> Result<String> {
    DEFAULT_COMPILER.compile(expr, ctx, origin)
}
