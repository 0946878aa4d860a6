//! Scalar predicates: one runtime kind each.
use crate::value::Value;

pub fn is_boolean(value: &Value) -> bool {
    matches!(value, Value::Bool(_))
}

/// NaN is still a number.
pub fn is_number(value: &Value) -> bool {
    matches!(value, Value::Number(_))
}

pub fn is_string(value: &Value) -> bool {
    matches!(value, Value::String(_))
}

/// A date that is also a valid instant; the invalid-date sentinel fails.
pub fn is_date(value: &Value) -> bool {
    matches!(value, Value::Date(date) if date.is_valid())
}

pub fn is_undefined(value: &Value) -> bool {
    matches!(value, Value::Undefined)
}

pub fn is_null(value: &Value) -> bool {
    matches!(value, Value::Null)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
