//! The output-emission context handed through a compile.

use crate::config::CompilerOptions;

/// Where compiled code is headed.
///
/// Expressions compile to a single string, but filters sometimes need
/// supporting declarations (a helper function, say) placed once ahead of
/// the code that uses them. Those are collected here, in the order they were
/// first declared, and the caller emits them with
/// [`OutputContext::render_helpers`].
#[derive(Debug, Clone, Default)]
pub struct OutputContext {
    options: CompilerOptions,
    helpers: Vec<(String, String)>,
}

impl OutputContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: CompilerOptions) -> Self {
        OutputContext {
            options,
            helpers: Vec::new(),
        }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Registers a helper declaration under `name`.
    ///
    /// Returns `false`, leaving the first declaration in place, when `name`
    /// is already declared.
    pub fn declare_helper(&mut self, name: &str, declaration: impl Into<String>) -> bool {
        if self.has_helper(name) {
            return false;
        }
        self.helpers.push((name.to_string(), declaration.into()));
        true
    }

    pub fn has_helper(&self, name: &str) -> bool {
        self.helpers.iter().any(|(existing, _)| existing == name)
    }

    pub fn helpers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.helpers
            .iter()
            .map(|(name, declaration)| (name.as_str(), declaration.as_str()))
    }

    /// All helper declarations, one per line.
    pub fn render_helpers(&self) -> String {
        self.helpers
            .iter()
            .map(|(_, declaration)| declaration.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
