//! Checkers, checker specs, and the two composite builders.
//!
//! A [`Checker`] is an immutable predicate over [`Value`]. A [`Spec`] is either
//! a single checker or a non-empty union of checkers; it is resolved into one
//! effective checker when a composite is built, so validation never branches
//! on the spec's shape.
//!
//! Composites nest to any depth:
//!
//! ```
//! use typeguard::{any_of, is_array, is_number, is_object, is_string, shape, Value};
//!
//! let point = is_object(shape! { x: is_number, y: is_number });
//! let checker = is_object(shape! {
//!     id: any_of![is_number, is_string],
//!     path: is_array(point),
//! });
//! let value = Value::from(serde_json::json!({"id": 7, "path": [{"x": 0, "y": 1}]}));
//! assert!(checker.check(&value));
//! ```
pub mod arr;
pub mod obj;

use std::fmt;
use std::sync::Arc;
use thiserror::Error;

use crate::value::Value;

pub use arr::is_array;
pub use obj::{is_object, Shape};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// A pure predicate `&Value -> bool`. Cheap to clone, shareable across threads.
#[derive(Clone)]
pub struct Checker(Arc<dyn Fn(&Value) -> bool + Send + Sync>);

/// A field or element spec: one checker, or a union ("any of").
#[derive(Clone, Debug)]
pub enum Spec {
    Single(Checker),
    AnyOf(AnyOf),
}

/// Ordered, non-empty list of checkers. Passes iff any arm passes.
#[derive(Clone, Debug)]
pub struct AnyOf {
    first: Checker,
    rest: Vec<Checker>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    #[error("a union spec needs at least one checker")]
    EmptyUnion,
    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),
}

// ————————————————————————————————————————————————————————————————————————————
// CHECKER
// ————————————————————————————————————————————————————————————————————————————

impl Checker {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn check(&self, value: &Value) -> bool {
        (self.0)(value)
    }
}

impl<F> From<F> for Checker
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Checker::new(f)
    }
}

impl fmt::Debug for Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Checker(..)")
    }
}

// ————————————————————————————————————————————————————————————————————————————
// SPEC
// ————————————————————————————————————————————————————————————————————————————

impl AnyOf {
    pub fn new(first: Checker, rest: Vec<Checker>) -> Self {
        Self { first, rest }
    }

    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    pub fn arms(&self) -> impl Iterator<Item = &Checker> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }
}

impl Spec {
    /// Union with at least one arm guaranteed by the signature.
    pub fn any_of(first: impl Into<Checker>, rest: Vec<Checker>) -> Self {
        Spec::AnyOf(AnyOf::new(first.into(), rest))
    }

    /// Union from a dynamic list; an empty list is rejected here rather than
    /// producing a checker that can never pass.
    pub fn try_any_of<I>(checkers: I) -> Result<Self, SpecError>
    where
        I: IntoIterator,
        I::Item: Into<Checker>,
    {
        let mut it = checkers.into_iter().map(Into::into);
        let first = it.next().ok_or(SpecError::EmptyUnion)?;
        Ok(Spec::AnyOf(AnyOf::new(first, it.collect())))
    }

    /// Resolve to a single effective checker. One-arm unions collapse to the
    /// bare checker.
    pub fn into_checker(self) -> Checker {
        match self {
            Spec::Single(checker) => checker,
            Spec::AnyOf(AnyOf { first, rest }) if rest.is_empty() => first,
            Spec::AnyOf(AnyOf { first, rest }) => {
                let mut arms = Vec::with_capacity(1 + rest.len());
                arms.push(first);
                arms.extend(rest);
                Checker::new(move |value| arms.iter().any(|arm| arm.check(value)))
            }
        }
    }
}

impl From<Checker> for Spec {
    fn from(checker: Checker) -> Self {
        Spec::Single(checker)
    }
}

impl From<AnyOf> for Spec {
    fn from(union: AnyOf) -> Self {
        Spec::AnyOf(union)
    }
}

impl<F> From<F> for Spec
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Spec::Single(Checker::new(f))
    }
}

impl From<Spec> for Checker {
    fn from(spec: Spec) -> Self {
        spec.into_checker()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// MACROS
// ————————————————————————————————————————————————————————————————————————————

/// Union spec: `any_of![is_number, is_string]`. Needs at least one arm.
#[macro_export]
macro_rules! any_of {
    ($first:expr $(, $rest:expr)* $(,)?) => {
        $crate::Spec::any_of(
            $crate::Checker::from($first),
            ::std::vec![$($crate::Checker::from($rest)),*],
        )
    };
}

/// Record shape literal: `shape! { a: is_number, b: any_of![is_string, is_null] }`.
#[macro_export]
macro_rules! shape {
    ($($name:ident : $spec:expr),* $(,)?) => {
        $crate::Shape::new()
            $(.field(::std::stringify!($name), $spec))*
    };
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::*;
    use crate::value::Date;
    use serde_json::json;

    fn v(json: serde_json::Value) -> Value {
        Value::from(json)
    }

    #[test]
    fn union_spec_is_or() {
        let checker = any_of![is_number, is_string].into_checker();
        assert!(checker.check(&v(json!(123))));
        assert!(checker.check(&v(json!("text"))));
        assert!(!checker.check(&v(json!(null))));
        assert!(!checker.check(&v(json!({}))));
    }

    #[test]
    fn single_arm_union_equals_bare_checker() {
        let union = any_of![is_boolean].into_checker();
        let bare = Spec::from(is_boolean).into_checker();
        for sample in [json!(true), json!(1), json!(null), json!([])] {
            let sample = v(sample);
            assert_eq!(union.check(&sample), bare.check(&sample));
        }
    }

    #[test]
    fn empty_dynamic_union_is_rejected() {
        let err = Spec::try_any_of(Vec::<Checker>::new()).unwrap_err();
        assert_eq!(err, SpecError::EmptyUnion);

        let spec = Spec::try_any_of([is_null, is_undefined]).unwrap();
        let Spec::AnyOf(union) = &spec else { panic!("expected union") };
        assert_eq!(union.len(), 2);
        assert_eq!(union.arms().count(), 2);
    }

    #[test]
    fn closures_and_composites_mix_in_unions() {
        let positive = Checker::new(|value| matches!(value, Value::Number(n) if *n > 0.0));
        let checker = any_of![positive, is_array(is_string)].into_checker();
        assert!(checker.check(&v(json!(3))));
        assert!(checker.check(&v(json!(["a"]))));
        assert!(!checker.check(&v(json!(-3))));
        assert!(!checker.check(&v(json!([1]))));
    }

    #[test]
    fn nested_object_round_trip() {
        let checker = is_object(shape! {
            a: is_number,
            b: is_object(shape! { c: is_string }),
        });
        assert!(checker.check(&v(json!({"a": 1, "b": {"c": "x"}}))));
        assert!(!checker.check(&v(json!({"a": 1, "b": {"c": 100}}))));
        assert!(!checker.check(&v(json!({"a": "1", "b": {"c": "x"}}))));
    }

    // a: number; b: { c: string; d: boolean[] }; e: { f: Date; g: { h: number }[] }
    fn deep_checker() -> Checker {
        is_object(shape! {
            a: is_number,
            b: is_object(shape! {
                c: is_string,
                d: is_array(is_boolean),
            }),
            e: is_object(shape! {
                f: is_date,
                g: is_array(is_object(shape! { h: is_number })),
            }),
        })
    }

    fn deep_sample(c: Value, f: Value, h: Value) -> Value {
        Value::object([
            ("a", Value::from(1.0)),
            ("b", Value::object([
                ("c", c),
                ("d", v(json!([true, false]))),
            ])),
            ("e", Value::object([
                ("f", f),
                ("g", Value::array([Value::object([("h", h)])])),
            ])),
        ])
    }

    #[test]
    fn deep_nesting_accepts_conforming_value() {
        let checker = deep_checker();
        let ok = deep_sample(Value::from("test"), Value::Date(Date::now()), Value::from(42.0));
        assert!(checker.check(&ok));
    }

    #[test]
    fn deep_nesting_rejects_any_mismatched_leaf() {
        let checker = deep_checker();
        let now = || Value::Date(Date::now());
        // b.c not a string
        assert!(!checker.check(&deep_sample(Value::from(100.0), now(), Value::from(42.0))));
        // e.f not a date
        assert!(!checker.check(&deep_sample(Value::from("test"), Value::from("not a date"), Value::from(42.0))));
        // e.f an invalid date
        assert!(!checker.check(&deep_sample(Value::from("test"), Value::Date(Date::invalid()), Value::from(42.0))));
        // e.g[0].h not a number (depth 4)
        assert!(!checker.check(&deep_sample(Value::from("test"), now(), Value::from("not a number"))));
    }

    #[test]
    fn array_of_nested_objects() {
        let checker = is_array(is_object(shape! {
            x: is_number,
            y: is_object(shape! { z: is_array(is_string) }),
        }));
        assert!(checker.check(&v(json!([
            {"x": 1, "y": {"z": ["a", "b"]}},
            {"x": 2, "y": {"z": ["c", "d"]}},
        ]))));
        assert!(!checker.check(&v(json!([
            {"x": "not a number", "y": {"z": ["a", "b"]}},
            {"x": 2, "y": {"z": ["c", "d"]}},
        ]))));
        assert!(!checker.check(&v(json!([
            {"x": 1, "y": {"z": [1, 2]}},
            {"x": 2, "y": {"z": ["c", "d"]}},
        ]))));
        assert!(!checker.check(&v(json!([
            {"x": 1, "y": null},
            {"x": 2, "y": {"z": ["c", "d"]}},
        ]))));
        assert!(checker.check(&v(json!([]))));
    }

    #[test]
    fn union_fields() {
        let checker = is_object(shape! {
            a: any_of![is_number, is_string],
            b: any_of![is_boolean, is_date],
        });
        let with = |a: Value, b: Value| Value::object([("a", a), ("b", b)]);
        assert!(checker.check(&with(Value::from(123.0), Value::Bool(true))));
        assert!(checker.check(&with(Value::from("text"), Value::Date(Date::now()))));
        assert!(!checker.check(&with(Value::Null, Value::Bool(true))));
        assert!(!checker.check(&with(Value::from("text"), Value::from("not a boolean or date"))));
    }

    #[test]
    fn checkers_are_idempotent_and_shareable() {
        let checker = deep_checker();
        let sample = deep_sample(Value::from("t"), Value::Date(Date::now()), Value::from(1.0));
        let first = checker.check(&sample);
        assert_eq!(first, checker.check(&sample));

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| checker.clone().check(&sample)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), first);
            }
        });
    }
}
