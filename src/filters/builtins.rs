use crate::{
    ast::FilterArg,
    context::OutputContext,
    error::{Result, SyntaxError},
};

use super::{Filter, FilterRegistry};

pub(super) fn register_all(registry: &mut FilterRegistry) {
    registry.insert("add", Add);
    registry.insert("capfirst", Capfirst);
    registry.insert("default", DefaultValue);
    registry.insert("length", Length);
    registry.insert("lower", Lower);
    registry.insert("md5", Md5);
    registry.insert("raw", Raw);
    registry.insert("upper", Upper);
}

fn wrong_arguments(filter: &str, message: &str) -> SyntaxError {
    SyntaxError::FilterArguments {
        filter: filter.to_string(),
        message: message.to_string(),
    }
}

/// `md5`: hashes the value. Hex digests never need escaping.
pub struct Md5;

impl Filter for Md5 {
    fn apply(
        &self,
        code: &str,
        _args: &[FilterArg],
        auto_escape: &mut bool,
        _ctx: &mut OutputContext,
    ) -> Result<String> {
        *auto_escape = false;
        Ok(format!("md5({})", code))
    }
}

/// `capfirst`: uppercases the first character.
pub struct Capfirst;

impl Filter for Capfirst {
    fn apply(
        &self,
        code: &str,
        _args: &[FilterArg],
        _auto_escape: &mut bool,
        _ctx: &mut OutputContext,
    ) -> Result<String> {
        Ok(format!("ucfirst({})", code))
    }
}

/// `upper`
pub struct Upper;

impl Filter for Upper {
    fn apply(
        &self,
        code: &str,
        _args: &[FilterArg],
        _auto_escape: &mut bool,
        _ctx: &mut OutputContext,
    ) -> Result<String> {
        Ok(format!("strtoupper({})", code))
    }
}

/// `lower`
pub struct Lower;

impl Filter for Lower {
    fn apply(
        &self,
        code: &str,
        _args: &[FilterArg],
        _auto_escape: &mut bool,
        _ctx: &mut OutputContext,
    ) -> Result<String> {
        Ok(format!("strtolower({})", code))
    }
}

/// `add:a:b...`: sums the value and every argument.
pub struct Add;

impl Filter for Add {
    fn apply(
        &self,
        code: &str,
        args: &[FilterArg],
        auto_escape: &mut bool,
        ctx: &mut OutputContext,
    ) -> Result<String> {
        if args.is_empty() {
            return Err(wrong_arguments("add", "requires at least one argument."));
        }
        *auto_escape = false;
        let mut sum = format!("({}", code);
        for arg in args {
            sum.push('+');
            sum.push_str(&arg.to_code(ctx));
        }
        sum.push(')');
        Ok(sum)
    }
}

/// `default:fallback`: the fallback when the value is falsy.
pub struct DefaultValue;

impl Filter for DefaultValue {
    fn apply(
        &self,
        code: &str,
        args: &[FilterArg],
        _auto_escape: &mut bool,
        ctx: &mut OutputContext,
    ) -> Result<String> {
        match args {
            [fallback] => Ok(format!("({} ?: {})", code, fallback.to_code(ctx))),
            _ => Err(wrong_arguments("default", "requires exactly one argument.")),
        }
    }
}

const LENGTH_HELPER: &str = "hydrogen_length";

/// `length`: element count for arrays and countables, character count for
/// anything else.
pub struct Length;

impl Filter for Length {
    fn apply(
        &self,
        code: &str,
        _args: &[FilterArg],
        auto_escape: &mut bool,
        ctx: &mut OutputContext,
    ) -> Result<String> {
        ctx.declare_helper(
            LENGTH_HELPER,
            format!(
                "if (!function_exists('{0}')) {{ function {0}($value) {{ \
                 return is_array($value) || $value instanceof \\Countable \
                 ? count($value) : strlen((string) $value); }} }}",
                LENGTH_HELPER
            ),
        );
        *auto_escape = false;
        Ok(format!("{}({})", LENGTH_HELPER, code))
    }
}

/// `raw`: marks the value as safe, turning escaping off.
pub struct Raw;

impl Filter for Raw {
    fn apply(
        &self,
        code: &str,
        _args: &[FilterArg],
        auto_escape: &mut bool,
        _ctx: &mut OutputContext,
    ) -> Result<String> {
        *auto_escape = false;
        Ok(code.to_string())
    }
}
