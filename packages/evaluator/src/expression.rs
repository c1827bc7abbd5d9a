use crate::value::{Context, Value};
use lightbox_parser::ast::{BinaryOp, Expression, Span, UnaryOp};
use lightbox_parser::{parse_expression, ParseError};
use thiserror::Error;

pub type EvalResult<T> = Result<T, EvalError>;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Variable '{name}' not found at {span:?}")]
    VariableNotFound { name: String, span: Span },

    #[error("Division by zero at {span:?}")]
    DivisionByZero { span: Span },

    #[error("Invalid operands for operator {operator} at {span:?}: {details}")]
    InvalidOperands {
        operator: String,
        details: String,
        span: Span,
    },

    #[error("Type error at {span:?}: {message}")]
    TypeError { message: String, span: Span },
}

/// Evaluate a directive expression string against a context.
///
/// An expression that is exactly an existing context key resolves directly,
/// with no expression parse. Anything else is interpreted with every context
/// key directly referenceable as an identifier.
pub fn evaluate(expression: &str, context: &Context) -> EvalResult<Value> {
    let trimmed = expression.trim();

    if let Some(value) = context.get(trimmed) {
        return Ok(value.clone());
    }

    let ast = parse_expression(trimmed)?;
    eval_expression(&ast, context)
}

fn eval_expression(expr: &Expression, context: &Context) -> EvalResult<Value> {
    match expr {
        Expression::Literal { value, .. } => Ok(Value::String(value.clone())),

        Expression::Number { value, .. } => Ok(Value::Number(*value)),

        Expression::Boolean { value, .. } => Ok(Value::Boolean(*value)),

        Expression::Null { .. } => Ok(Value::Null),

        Expression::Variable { name, span } => {
            context
                .get(name)
                .cloned()
                .ok_or_else(|| EvalError::VariableNotFound {
                    name: name.clone(),
                    span: span.clone(),
                })
        }

        Expression::Member {
            object,
            property,
            span,
        } => {
            let obj_value = eval_expression(object, context)?;

            match obj_value {
                Value::Object(map) => {
                    map.get(property)
                        .cloned()
                        .ok_or_else(|| EvalError::VariableNotFound {
                            name: property.clone(),
                            span: span.clone(),
                        })
                }
                other => Err(EvalError::TypeError {
                    message: format!(
                        "Cannot access property {} on {}",
                        property,
                        other.type_name()
                    ),
                    span: span.clone(),
                }),
            }
        }

        Expression::Index {
            object,
            index,
            span,
        } => {
            let obj_value = eval_expression(object, context)?;
            let index_value = eval_expression(index, context)?;

            match (obj_value, index_value) {
                (Value::Array(items), Value::Number(n)) => {
                    if n < 0.0 || n.fract() != 0.0 {
                        return Err(EvalError::TypeError {
                            message: format!("Invalid array index {}", n),
                            span: span.clone(),
                        });
                    }
                    items
                        .get(n as usize)
                        .cloned()
                        .ok_or_else(|| EvalError::TypeError {
                            message: format!("Index {} out of bounds", n),
                            span: span.clone(),
                        })
                }
                (Value::Object(map), Value::String(key)) => {
                    map.get(&key)
                        .cloned()
                        .ok_or_else(|| EvalError::VariableNotFound {
                            name: key,
                            span: span.clone(),
                        })
                }
                (obj, idx) => Err(EvalError::TypeError {
                    message: format!(
                        "Cannot index {} with {}",
                        obj.type_name(),
                        idx.type_name()
                    ),
                    span: span.clone(),
                }),
            }
        }

        Expression::Unary {
            operator,
            operand,
            span,
        } => {
            let operand_value = eval_expression(operand, context)?;

            match operator {
                UnaryOp::Not => Ok(Value::Boolean(!operand_value.is_truthy())),
                UnaryOp::Negate => match operand_value {
                    Value::Number(n) => Ok(Value::Number(-n)),
                    other => Err(EvalError::InvalidOperands {
                        operator: "-".to_string(),
                        details: format!("Expected number, got {}", other.type_name()),
                        span: span.clone(),
                    }),
                },
            }
        }

        Expression::Binary {
            left,
            operator,
            right,
            span,
        } => {
            // Logical operators short-circuit on truthiness
            match operator {
                BinaryOp::And => {
                    let left_val = eval_expression(left, context)?;
                    if !left_val.is_truthy() {
                        return Ok(Value::Boolean(false));
                    }
                    let right_val = eval_expression(right, context)?;
                    return Ok(Value::Boolean(right_val.is_truthy()));
                }
                BinaryOp::Or => {
                    let left_val = eval_expression(left, context)?;
                    if left_val.is_truthy() {
                        return Ok(Value::Boolean(true));
                    }
                    let right_val = eval_expression(right, context)?;
                    return Ok(Value::Boolean(right_val.is_truthy()));
                }
                _ => {}
            }

            let left_val = eval_expression(left, context)?;
            let right_val = eval_expression(right, context)?;

            match operator {
                BinaryOp::Add => match (&left_val, &right_val) {
                    (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
                    (Value::String(a), Value::String(b)) => {
                        Ok(Value::String(format!("{}{}", a, b)))
                    }
                    _ => Err(EvalError::InvalidOperands {
                        operator: "+".to_string(),
                        details: format!(
                            "Expected number + number or string + string, got {} + {}",
                            left_val.type_name(),
                            right_val.type_name()
                        ),
                        span: span.clone(),
                    }),
                },
                BinaryOp::Subtract => numeric_op(&left_val, &right_val, span, "-", |a, b| a - b),
                BinaryOp::Multiply => numeric_op(&left_val, &right_val, span, "*", |a, b| a * b),
                BinaryOp::Divide => match (&left_val, &right_val) {
                    (Value::Number(a), Value::Number(b)) => {
                        if *b != 0.0 {
                            Ok(Value::Number(a / b))
                        } else {
                            Err(EvalError::DivisionByZero { span: span.clone() })
                        }
                    }
                    _ => Err(EvalError::InvalidOperands {
                        operator: "/".to_string(),
                        details: format!(
                            "Expected number / number, got {} / {}",
                            left_val.type_name(),
                            right_val.type_name()
                        ),
                        span: span.clone(),
                    }),
                },
                BinaryOp::Equals => Ok(Value::Boolean(left_val == right_val)),
                BinaryOp::NotEquals => Ok(Value::Boolean(left_val != right_val)),
                BinaryOp::LessThan => ordering_op(&left_val, &right_val, span, "<", |o| {
                    o == std::cmp::Ordering::Less
                }),
                BinaryOp::LessThanOrEqual => ordering_op(&left_val, &right_val, span, "<=", |o| {
                    o != std::cmp::Ordering::Greater
                }),
                BinaryOp::GreaterThan => ordering_op(&left_val, &right_val, span, ">", |o| {
                    o == std::cmp::Ordering::Greater
                }),
                BinaryOp::GreaterThanOrEqual => {
                    ordering_op(&left_val, &right_val, span, ">=", |o| {
                        o != std::cmp::Ordering::Less
                    })
                }
                BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
            }
        }
    }
}

fn numeric_op(
    left: &Value,
    right: &Value,
    span: &Span,
    operator: &str,
    op: impl Fn(f64, f64) -> f64,
) -> EvalResult<Value> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => Ok(Value::Number(op(*a, *b))),
        _ => Err(EvalError::InvalidOperands {
            operator: operator.to_string(),
            details: format!(
                "Expected number {} number, got {} {} {}",
                operator,
                left.type_name(),
                operator,
                right.type_name()
            ),
            span: span.clone(),
        }),
    }
}

/// Comparisons are defined for number pairs and string pairs
fn ordering_op(
    left: &Value,
    right: &Value,
    span: &Span,
    operator: &str,
    accept: impl Fn(std::cmp::Ordering) -> bool,
) -> EvalResult<Value> {
    let ordering = match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.partial_cmp(b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        _ => None,
    };

    match ordering {
        Some(ordering) => Ok(Value::Boolean(accept(ordering))),
        None => Err(EvalError::InvalidOperands {
            operator: operator.to_string(),
            details: format!(
                "Cannot compare {} {} {}",
                left.type_name(),
                operator,
                right.type_name()
            ),
            span: span.clone(),
        }),
    }
}
