// tests/filter_tests.rs

use hydrogen_expr::{
    FilterArg, FilterRegistry, OutputContext, SyntaxError,
    filters::{Add, Capfirst, DefaultValue, Filter, Length, Md5, Raw},
};
use pretty_assertions::assert_eq;

const X: &str = "$context->x->getValue()";

/// Applies `filter` with auto-escaping on, returning the code and the flag.
fn apply(filter: &dyn Filter, args: &[FilterArg]) -> (String, bool) {
    let mut escape = true;
    let mut ctx = OutputContext::new();
    let code = filter
        .apply(X, args, &mut escape, &mut ctx)
        .unwrap_or_else(|e| panic!("filter failed: {}", e));
    (code, escape)
}

fn number(n: &str) -> FilterArg {
    FilterArg::Number(n.to_string())
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn test_builtin_names() {
    let registry = FilterRegistry::with_builtins();
    assert_eq!(
        registry.names(),
        vec!["add", "capfirst", "default", "length", "lower", "md5", "raw", "upper"]
    );
}

#[test]
fn test_empty_registry_has_no_filters() {
    let registry = FilterRegistry::new();
    assert!(registry.names().is_empty());
    assert!(matches!(
        registry.get("md5", None),
        Err(SyntaxError::NoSuchFilter { origin: None, .. })
    ));
}

#[test]
fn test_missing_filter_message() {
    let registry = FilterRegistry::new();
    let without = registry.get("nope", None).err().unwrap();
    let with = registry.get("nope", Some("mail.html")).err().unwrap();
    assert_eq!(without.to_string(), "Filter \"nope\" does not exist.");
    assert_eq!(
        with.to_string(),
        "Filter \"nope\" does not exist in template \"mail.html\"."
    );
}

#[test]
fn test_register_replaces_existing() {
    let mut registry = FilterRegistry::with_builtins();
    registry.register("MD5", Raw).unwrap();
    let (code, _) = apply(registry.get("md5", None).unwrap(), &[]);
    assert_eq!(code, X);
    assert_eq!(registry.names().len(), 8);
}

#[test]
fn test_invalid_names_rejected() {
    let mut registry = FilterRegistry::new();
    for name in ["", "2x", "a-b", "a b", "_x"] {
        assert_eq!(
            registry.register(name, Raw).unwrap_err(),
            SyntaxError::InvalidFilterName(name.to_string()),
            "name {:?}",
            name
        );
    }
}

// ============================================================================
// Built-in Filters
// ============================================================================

#[test]
fn test_md5_disables_escaping() {
    assert_eq!(apply(&Md5, &[]), (format!("md5({})", X), false));
}

#[test]
fn test_capfirst_keeps_escaping() {
    assert_eq!(apply(&Capfirst, &[]), (format!("ucfirst({})", X), true));
}

#[test]
fn test_case_filters() {
    let registry = FilterRegistry::with_builtins();
    assert_eq!(
        apply(registry.get("upper", None).unwrap(), &[]),
        (format!("strtoupper({})", X), true)
    );
    assert_eq!(
        apply(registry.get("lower", None).unwrap(), &[]),
        (format!("strtolower({})", X), true)
    );
}

#[test]
fn test_add() {
    assert_eq!(
        apply(&Add, &[number("1")]),
        (format!("({}+1)", X), false)
    );
    assert_eq!(
        apply(
            &Add,
            &[
                number("-2.5"),
                FilterArg::Variable(vec!["cart".into(), "fee".into()]),
            ]
        ),
        (format!("({}+-2.5+$context->cart->fee->getValue())", X), false)
    );
}

#[test]
fn test_add_requires_arguments() {
    let mut escape = true;
    let mut ctx = OutputContext::new();
    let err = Add.apply(X, &[], &mut escape, &mut ctx).unwrap_err();
    assert_eq!(
        err,
        SyntaxError::FilterArguments {
            filter: "add".into(),
            message: "requires at least one argument.".into(),
        }
    );
    assert!(escape, "a failed filter leaves escaping alone");
}

#[test]
fn test_default() {
    assert_eq!(
        apply(&DefaultValue, &[FilterArg::String("\"n/a\"".into())]),
        (format!("({} ?: \"n/a\")", X), true)
    );

    let mut escape = true;
    let mut ctx = OutputContext::new();
    for args in [vec![], vec![number("1"), number("2")]] {
        assert!(matches!(
            DefaultValue.apply(X, &args, &mut escape, &mut ctx),
            Err(SyntaxError::FilterArguments { .. })
        ));
    }
}

#[test]
fn test_length_declares_helper() {
    let mut escape = true;
    let mut ctx = OutputContext::new();
    let code = Length.apply(X, &[], &mut escape, &mut ctx).unwrap();
    assert_eq!(code, format!("hydrogen_length({})", X));
    assert!(!escape);
    assert!(ctx.has_helper("hydrogen_length"));

    Length.apply("$y", &[], &mut escape, &mut ctx).unwrap();
    assert_eq!(ctx.helpers().count(), 1);
}

#[test]
fn test_raw() {
    assert_eq!(apply(&Raw, &[]), (X.to_string(), false));
}

// ============================================================================
// Arguments
// ============================================================================

#[test]
fn test_argument_code_uses_options() {
    let ctx = OutputContext::with_options(hydrogen_expr::CompilerOptions {
        context_var: "$c".into(),
        ..Default::default()
    });
    assert_eq!(
        FilterArg::Variable(vec!["a".into()]).to_code(&ctx),
        "$c->a->getValue()"
    );
    assert_eq!(FilterArg::String("\"s\"".into()).to_code(&ctx), "\"s\"");
    assert_eq!(number("3").to_code(&ctx), "3");
}
