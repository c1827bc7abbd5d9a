use crate::expression::{evaluate, EvalError};
use crate::value::{Context, Value};
use serde_json::json;

fn context() -> Context {
    Context::from_json(json!({
        "name": "Ada",
        "count": 3,
        "zero": 0,
        "active": true,
        "missing_flag": false,
        "user": { "name": "Grace", "address": { "city": "London" } },
        "items": [10, 20, 30],
        "tags": ["a", "b"],
    }))
}

#[test]
fn test_fast_path_returns_context_value_directly() {
    let ctx = context();

    assert_eq!(evaluate("name", &ctx).unwrap(), Value::String("Ada".into()));
    assert_eq!(
        evaluate("  count  ", &ctx).unwrap(),
        Value::Number(3.0)
    );
}

#[test]
fn test_fast_path_covers_keys_that_are_not_valid_expressions() {
    // A context key that the expression grammar could never parse still
    // resolves through the direct-lookup fast path.
    let mut ctx = Context::new();
    ctx.set("weird key!", Value::Number(7.0));

    assert_eq!(evaluate("weird key!", &ctx).unwrap(), Value::Number(7.0));
}

#[test]
fn test_member_access() {
    let ctx = context();

    assert_eq!(
        evaluate("user.name", &ctx).unwrap(),
        Value::String("Grace".into())
    );
    assert_eq!(
        evaluate("user.address.city", &ctx).unwrap(),
        Value::String("London".into())
    );
}

#[test]
fn test_index_access() {
    let ctx = context();

    assert_eq!(evaluate("items[0]", &ctx).unwrap(), Value::Number(10.0));
    assert_eq!(evaluate("items[1 + 1]", &ctx).unwrap(), Value::Number(30.0));
    assert_eq!(
        evaluate("user[\"name\"]", &ctx).unwrap(),
        Value::String("Grace".into())
    );
}

#[test]
fn test_arithmetic() {
    let ctx = context();

    assert_eq!(evaluate("count + 1", &ctx).unwrap(), Value::Number(4.0));
    assert_eq!(evaluate("count * 2 - 1", &ctx).unwrap(), Value::Number(5.0));
    assert_eq!(evaluate("count / 2", &ctx).unwrap(), Value::Number(1.5));
    assert_eq!(evaluate("-count", &ctx).unwrap(), Value::Number(-3.0));
}

#[test]
fn test_string_concatenation() {
    let ctx = context();

    assert_eq!(
        evaluate("name + '!'", &ctx).unwrap(),
        Value::String("Ada!".into())
    );
}

#[test]
fn test_comparisons() {
    let ctx = context();

    assert_eq!(evaluate("count > 2", &ctx).unwrap(), Value::Boolean(true));
    assert_eq!(evaluate("count >= 3", &ctx).unwrap(), Value::Boolean(true));
    assert_eq!(evaluate("count < 3", &ctx).unwrap(), Value::Boolean(false));
    assert_eq!(
        evaluate("name == 'Ada'", &ctx).unwrap(),
        Value::Boolean(true)
    );
    assert_eq!(
        evaluate("name != 'Ada'", &ctx).unwrap(),
        Value::Boolean(false)
    );
    assert_eq!(
        evaluate("'abc' < 'abd'", &ctx).unwrap(),
        Value::Boolean(true)
    );
}

#[test]
fn test_logical_operators_use_truthiness() {
    let ctx = context();

    assert_eq!(
        evaluate("active && count", &ctx).unwrap(),
        Value::Boolean(true)
    );
    assert_eq!(
        evaluate("zero || name", &ctx).unwrap(),
        Value::Boolean(true)
    );
    assert_eq!(
        evaluate("zero && name", &ctx).unwrap(),
        Value::Boolean(false)
    );
    assert_eq!(evaluate("!active", &ctx).unwrap(), Value::Boolean(false));
    assert_eq!(evaluate("!zero", &ctx).unwrap(), Value::Boolean(true));
}

#[test]
fn test_logical_operators_short_circuit() {
    let ctx = context();

    // The right side would fail to evaluate, but is never reached
    assert_eq!(
        evaluate("zero && nonexistent.bad", &ctx).unwrap(),
        Value::Boolean(false)
    );
    assert_eq!(
        evaluate("active || nonexistent.bad", &ctx).unwrap(),
        Value::Boolean(true)
    );
}

#[test]
fn test_undefined_variable_fails() {
    let ctx = context();

    assert!(matches!(
        evaluate("nonexistent", &ctx),
        Err(EvalError::VariableNotFound { .. })
    ));
}

#[test]
fn test_missing_property_fails() {
    let ctx = context();

    assert!(matches!(
        evaluate("user.age", &ctx),
        Err(EvalError::VariableNotFound { .. })
    ));
}

#[test]
fn test_property_on_non_object_fails() {
    let ctx = context();

    assert!(matches!(
        evaluate("count.value", &ctx),
        Err(EvalError::TypeError { .. })
    ));
}

#[test]
fn test_index_out_of_bounds_fails() {
    let ctx = context();

    assert!(matches!(
        evaluate("items[99]", &ctx),
        Err(EvalError::TypeError { .. })
    ));
}

#[test]
fn test_division_by_zero_fails() {
    let ctx = context();

    assert!(matches!(
        evaluate("count / zero", &ctx),
        Err(EvalError::DivisionByZero { .. })
    ));
}

#[test]
fn test_mismatched_operands_fail() {
    let ctx = context();

    assert!(matches!(
        evaluate("name - 1", &ctx),
        Err(EvalError::InvalidOperands { .. })
    ));
    assert!(matches!(
        evaluate("name + 1", &ctx),
        Err(EvalError::InvalidOperands { .. })
    ));
}

#[test]
fn test_syntax_error_fails() {
    let ctx = context();

    assert!(matches!(
        evaluate("count +", &ctx),
        Err(EvalError::Parse(_))
    ));
    assert!(matches!(evaluate("", &ctx), Err(EvalError::Parse(_))));
}

#[test]
fn test_literal_expressions() {
    let ctx = Context::new();

    assert_eq!(evaluate("42", &ctx).unwrap(), Value::Number(42.0));
    assert_eq!(
        evaluate("'text'", &ctx).unwrap(),
        Value::String("text".into())
    );
    assert_eq!(evaluate("false", &ctx).unwrap(), Value::Boolean(false));
    assert_eq!(evaluate("null", &ctx).unwrap(), Value::Null);
}
