//! Tests for the lexical pre-compilation checks.
use kisoku::validator::{
    DIVISION_BY_ZERO, EMPTY_EXPRESSION, MIXED_EQUALITY, UNBALANCED_PARENTHESES,
    UNDEFINED_VALUES, validate,
};

#[test]
fn test_unbalanced_parentheses_is_the_only_error() {
    let result = validate("Math.min(sale.Amount, 100");
    assert!(!result.is_valid);
    assert_eq!(result.errors, vec![UNBALANCED_PARENTHESES.to_string()]);
}

#[test]
fn test_unbalanced_parentheses_detected_for_any_mismatch() {
    for expression in ["(", ")", "((a)", "(a))", ")(", "((("] {
        let result = validate(expression);
        if expression == ")(" {
            // Counts match; the shallow check does not look at order.
            assert!(result.is_valid, "{}", expression);
            continue;
        }
        assert!(
            result.errors.contains(&UNBALANCED_PARENTHESES.to_string()),
            "{} should be unbalanced",
            expression
        );
    }
}

#[test]
fn test_empty_expression_short_circuits() {
    for expression in ["", "   ", "\n\t"] {
        let result = validate(expression);
        assert!(!result.is_valid);
        assert_eq!(result.errors, vec![EMPTY_EXPRESSION.to_string()]);
        assert!(result.warnings.is_empty());
    }
}

#[test]
fn test_findings_accumulate() {
    let result = validate("(undefined == 1 && x === 2 || y / 0");
    assert!(!result.is_valid);
    assert_eq!(
        result.errors,
        vec![
            UNBALANCED_PARENTHESES.to_string(),
            UNDEFINED_VALUES.to_string()
        ]
    );
    assert_eq!(
        result.warnings,
        vec![MIXED_EQUALITY.to_string(), DIVISION_BY_ZERO.to_string()]
    );
}

#[test]
fn test_undefined_matches_whole_words_only() {
    assert!(!validate("sale.Amount === undefined").is_valid);
    assert!(validate("user.undefinedCount > 1").is_valid);
}

#[test]
fn test_warnings_do_not_invalidate() {
    let result = validate("sale.Amount / 0 > 1");
    assert!(result.is_valid);
    assert_eq!(result.warnings, vec![DIVISION_BY_ZERO.to_string()]);

    // Decimal divisors are not flagged.
    assert!(validate("sale.Amount / 0.5").warnings.is_empty());
    assert!(validate("sale.Amount / 0.05").warnings.is_empty());
    assert!(validate("sale.Amount / 10").warnings.is_empty());
}

#[test]
fn test_every_spelling_of_a_zero_divisor_warns() {
    for source in [
        "sale.Amount / 0.0",
        "sale.Amount /  0",
        "sale.Amount / 00",
        "sale.Amount/0",
        "(sale.Amount / 0.00) > 1",
    ] {
        assert_eq!(
            validate(source).warnings,
            vec![DIVISION_BY_ZERO.to_string()],
            "{}",
            source
        );
    }
}

#[test]
fn test_strict_equality_alone_is_not_mixed() {
    assert!(validate("a === 1 && b !== 2").warnings.is_empty());
    assert!(validate("a == 1 && b != 2").warnings.is_empty());
    assert_eq!(
        validate("a === 1 && b != 2").warnings,
        vec![MIXED_EQUALITY.to_string()]
    );
}

#[test]
fn test_validation_result_serializes_camel_case() {
    let json = serde_json::to_value(validate("1 > 0")).unwrap();
    assert_eq!(json["isValid"], serde_json::json!(true));
    assert!(json["errors"].as_array().unwrap().is_empty());
}
