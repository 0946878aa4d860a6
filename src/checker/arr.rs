use super::{Checker, Spec};
use crate::value::Value;

/// Sequence checker: passes iff `value` is an array and every element passes
/// the item spec. The empty array always passes.
pub fn is_array(item: impl Into<Spec>) -> Checker {
    let item = item.into().into_checker();
    Checker::new(move |value| match value {
        Value::Array(items) => items.iter().all(|x| item.check(x)),
        _ => false,
    })
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
