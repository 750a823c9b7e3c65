//! Filters and the registry that names them.
//!
//! A filter rewrites the code fragment for a variable. Filters never see
//! values: `title|capfirst` compiles to code that capitalizes at render
//! time. Each filter may also switch off auto-escaping for its variable,
//! which is how filters producing markup or numbers avoid being wrapped in
//! the escape function.

mod builtins;

use std::{collections::HashMap, fmt, sync::Arc};

use log::debug;

use crate::{
    ast::FilterArg,
    context::OutputContext,
    error::{Result, SyntaxError},
    resolver::strict_lookup,
    variable::FILTER_NAME,
};

pub use builtins::{Add, Capfirst, DefaultValue, Length, Lower, Md5, Raw, Upper};

/// A named transformation over a code fragment.
///
/// `auto_escape` is shared by every filter in a variable's chain; whatever
/// value it holds after the last filter decides whether the variable is
/// escaped. Apart from that flag, a filter may only affect the caller by
/// declaring helpers in `ctx`.
pub trait Filter: Send + Sync {
    fn apply(
        &self,
        code: &str,
        args: &[FilterArg],
        auto_escape: &mut bool,
        ctx: &mut OutputContext,
    ) -> Result<String>;
}

impl<F> Filter for F
where
    F: Fn(&str, &[FilterArg], &mut bool, &mut OutputContext) -> Result<String> + Send + Sync,
{
    fn apply(
        &self,
        code: &str,
        args: &[FilterArg],
        auto_escape: &mut bool,
        ctx: &mut OutputContext,
    ) -> Result<String> {
        self(code, args, auto_escape, ctx)
    }
}

impl FilterArg {
    /// Target code evaluating to this argument.
    pub fn to_code(&self, ctx: &OutputContext) -> String {
        match self {
            FilterArg::String(literal) | FilterArg::Number(literal) => literal.clone(),
            FilterArg::Variable(levels) => strict_lookup(levels, ctx.options()),
        }
    }
}

/// Filter names mapped to implementations.
///
/// Names are stored lowercased. Lookups try the name as written first and
/// then fall back to its lowercase form, so `Capfirst` finds `capfirst`.
#[derive(Clone, Default)]
pub struct FilterRegistry {
    filters: HashMap<String, Arc<dyn Filter>>,
}

impl FilterRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in filter.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        builtins::register_all(&mut registry);
        registry
    }

    /// Adds or replaces the filter called `name`.
    pub fn register(&mut self, name: &str, filter: impl Filter + 'static) -> Result<()> {
        if !FILTER_NAME.is_match(name) {
            return Err(SyntaxError::InvalidFilterName(name.to_string()));
        }
        self.insert(name, filter);
        Ok(())
    }

    fn insert(&mut self, name: &str, filter: impl Filter + 'static) {
        self.filters.insert(name.to_lowercase(), Arc::new(filter));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Finds the filter called `name`.
    ///
    /// `origin`, when known, names the template using the filter and is
    /// included in the error if there is no such filter.
    pub fn get(&self, name: &str, origin: Option<&str>) -> Result<&dyn Filter> {
        self.lookup(name)
            .ok_or_else(|| SyntaxError::NoSuchFilter {
                filter: name.to_string(),
                origin: origin.map(str::to_string),
            })
    }

    fn lookup(&self, name: &str) -> Option<&dyn Filter> {
        if let Some(filter) = self.filters.get(name) {
            return Some(filter.as_ref());
        }
        let lower = name.to_lowercase();
        let filter = self.filters.get(&lower)?;
        debug!("filter '{}' resolved as '{}'", name, lower);
        Some(filter.as_ref())
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.filters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("filters", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_falls_back_to_lowercase() {
        let registry = FilterRegistry::with_builtins();
        assert!(registry.contains("capfirst"));
        assert!(registry.contains("CapFirst"));
        assert!(!registry.contains("shout"));
    }

    #[test]
    fn closures_register_as_filters() {
        let mut registry = FilterRegistry::new();
        registry
            .register(
                "Shout",
                |code: &str, _: &[FilterArg], _: &mut bool, _: &mut OutputContext| -> Result<String> {
                    Ok(format!("strtoupper({})", code))
                },
            )
            .unwrap();
        assert_eq!(registry.names(), vec!["shout"]);

        let mut escape = true;
        let mut ctx = OutputContext::new();
        let code = registry
            .get("shout", None)
            .unwrap()
            .apply("$x", &[], &mut escape, &mut ctx)
            .unwrap();
        assert_eq!(code, "strtoupper($x)");
    }

    #[test]
    fn rejects_bad_names() {
        let mut registry = FilterRegistry::new();
        let err = registry.register("2fast", Raw).unwrap_err();
        assert_eq!(err, SyntaxError::InvalidFilterName("2fast".into()));
    }

    #[test]
    fn missing_filter_error_carries_origin() {
        let registry = FilterRegistry::new();
        let err = registry.get("nope", Some("home.html")).err().unwrap();
        assert_eq!(
            err,
            SyntaxError::NoSuchFilter {
                filter: "nope".into(),
                origin: Some("home.html".into()),
            }
        );
    }
}
