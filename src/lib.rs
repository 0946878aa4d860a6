//! Composable runtime type checkers over untyped values.
//!
//! Scalar predicates (`is_boolean`, `is_number`, `is_string`, `is_date`,
//! `is_undefined`, `is_null`) classify a single [`Value`]. The builders
//! [`is_object`] and [`is_array`] combine checkers, including unions built with
//! [`any_of!`], into new checkers that nest to any depth. A checker never
//! errors: non-conforming input yields `false`.
pub mod value;
pub mod scalar;
pub mod checker;
pub mod narrow;
pub mod jq_exec;
pub mod cli;

pub use value::{Date, Value};
pub use scalar::{is_boolean, is_date, is_null, is_number, is_string, is_undefined};
pub use checker::{is_array, is_object, AnyOf, Checker, Shape, Spec, SpecError};
pub use narrow::{Guard, NarrowError};
