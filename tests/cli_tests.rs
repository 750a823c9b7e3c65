// tests/cli_tests.rs

use std::{fs, path::PathBuf};

use hydrogen_expr::cli::{
    CheckOptions, CheckResult, CliError, DocCategory, TokensOptions, execute_check,
    get_doc_category, get_docs_overview, list_filters, list_tokens,
};
use pretty_assertions::assert_eq;

fn check(expression: &str) -> Result<CheckResult, CliError> {
    execute_check(&CheckOptions {
        expression: expression.to_string(),
        ..CheckOptions::default()
    })
}

fn temp_config(name: &str, json: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("hyx-{}-{}.json", name, std::process::id()));
    fs::write(&path, json).unwrap();
    path
}

// ============================================================================
// Compile and Check
// ============================================================================

#[test]
fn test_compile() {
    assert_eq!(
        check("a > 1").unwrap(),
        CheckResult::Compiled {
            helpers: String::new(),
            code: "htmlentities($context->a->getValue()) > 1".into(),
        }
    );
}

#[test]
fn test_compile_trims_input() {
    assert_eq!(
        check("  1 + 2\n").unwrap(),
        CheckResult::Compiled {
            helpers: String::new(),
            code: "1 + 2".into(),
        }
    );
}

#[test]
fn test_compile_reports_helpers() {
    match check("items|length > 0").unwrap() {
        CheckResult::Compiled { helpers, code } => {
            assert!(helpers.starts_with("if (!function_exists('hydrogen_length'))"));
            assert_eq!(code, "hydrogen_length($context->items->getValue()) > 0");
        }
        other => panic!("expected compiled output, got {:?}", other),
    }
}

#[test]
fn test_empty_input() {
    assert!(matches!(check(""), Err(CliError::NoInput)));
    assert!(matches!(check(" \t "), Err(CliError::NoInput)));
}

fn check_only(expression: &str) -> Result<CheckResult, CliError> {
    execute_check(&CheckOptions {
        expression: expression.to_string(),
        syntax_only: true,
        ..CheckOptions::default()
    })
}

#[test]
fn test_syntax_only() {
    assert_eq!(check_only("a > 1 and exists b").unwrap(), CheckResult::SyntaxValid);

    for expression in ["in foo", "exists \"x\"", "a|nope > 1", "(a", "a|add"] {
        assert!(
            matches!(check_only(expression), Err(CliError::Syntax(_))),
            "expected {:?} to be rejected",
            expression
        );
    }
}

#[test]
fn test_origin_in_errors() {
    let options = CheckOptions {
        expression: "a|nope".into(),
        origin: Some("index.html".into()),
        ..CheckOptions::default()
    };
    let err = execute_check(&options).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Syntax error: Filter \"nope\" does not exist in template \"index.html\"."
    );
}

#[test]
fn test_no_escape() {
    let options = CheckOptions {
        expression: "a".into(),
        no_escape: true,
        ..CheckOptions::default()
    };
    assert_eq!(
        execute_check(&options).unwrap(),
        CheckResult::Compiled {
            helpers: String::new(),
            code: "$context->a->getValue()".into(),
        }
    );
}

#[test]
fn test_config_file() {
    let path = temp_config("options", r#"{"context_var": "$data", "escape_function": "e"}"#);
    let options = CheckOptions {
        expression: "a".into(),
        config: Some(path.clone()),
        ..CheckOptions::default()
    };
    let result = execute_check(&options);
    fs::remove_file(&path).ok();

    assert_eq!(
        result.unwrap(),
        CheckResult::Compiled {
            helpers: String::new(),
            code: "e($data->a->getValue())".into(),
        }
    );
}

#[test]
fn test_bad_config_file() {
    let path = temp_config("broken", "{ not json");
    let options = CheckOptions {
        expression: "a".into(),
        config: Some(path.clone()),
        ..CheckOptions::default()
    };
    let result = execute_check(&options);
    fs::remove_file(&path).ok();
    assert!(matches!(result, Err(CliError::Config(_))));

    let options = CheckOptions {
        expression: "a".into(),
        config: Some(PathBuf::from("/nonexistent/hyx.json")),
        ..CheckOptions::default()
    };
    assert!(matches!(execute_check(&options), Err(CliError::Config(_))));
}

// ============================================================================
// Tokens
// ============================================================================

#[test]
fn test_tokens_plain() {
    let listing = list_tokens(&TokensOptions {
        expression: "not a || 2".into(),
        json: false,
    })
    .unwrap();
    assert_eq!(listing, "invert\t!\nvariable\ta\njoiner\t||\nnumber\t2");
}

#[test]
fn test_tokens_json() {
    let listing = list_tokens(&TokensOptions {
        expression: "(x)".into(),
        json: true,
    })
    .unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&listing).unwrap();
    assert_eq!(
        parsed,
        serde_json::json!([
            {"kind": "open-group", "value": "("},
            {"kind": "variable", "value": "x"},
            {"kind": "close-group", "value": ")"}
        ])
    );
}

#[test]
fn test_tokens_error() {
    let result = list_tokens(&TokensOptions {
        expression: "a &".into(),
        json: false,
    });
    assert!(matches!(result, Err(CliError::Syntax(_))));
}

// ============================================================================
// Filters and Docs
// ============================================================================

#[test]
fn test_list_filters() {
    let listing = list_filters();
    assert_eq!(listing.lines().count(), 8);
    assert_eq!(listing.lines().next(), Some("add"));
    assert!(listing.lines().any(|name| name == "md5"));
}

#[test]
fn test_docs_overview_lists_categories() {
    let overview = get_docs_overview();
    for category in ["syntax", "operators", "functions", "filters"] {
        assert!(overview.contains(category), "missing {}", category);
        assert!(get_doc_category(category).is_ok());
    }
}

#[test]
fn test_doc_aliases() {
    assert_eq!(DocCategory::from_name("OPS"), Some(DocCategory::Operators));
    assert_eq!(DocCategory::from_name("keywords"), Some(DocCategory::Functions));
    assert_eq!(DocCategory::from_name("nope"), None);
    assert!(matches!(
        get_doc_category("nope"),
        Err(CliError::UnknownCategory(ref name)) if name == "nope"
    ));
}
