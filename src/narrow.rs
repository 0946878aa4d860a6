//! Typed narrowing on top of a checker.
//!
//! `Guard<T>` pairs a checker with the Rust type a passing value is known to
//! have. `narrow` only hands out a `T` for values the checker accepts; the
//! check itself is unchanged by the type parameter.
use std::fmt;
use std::marker::PhantomData;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::checker::{Checker, Spec};
use crate::value::Value;

pub struct Guard<T> {
    checker: Checker,
    _target: PhantomData<fn() -> T>,
}

#[derive(Debug, Error)]
pub enum NarrowError {
    #[error("value does not conform")]
    Rejected,
    /// The checker accepted the value but `T` is stricter than the checker.
    #[error("at JSON path {path} → {message}")]
    Deserialize { path: String, message: String },
}

impl<T> Guard<T> {
    pub fn new(spec: impl Into<Spec>) -> Self {
        Self { checker: spec.into().into_checker(), _target: PhantomData }
    }

    pub fn test(&self, value: &Value) -> bool {
        self.checker.check(value)
    }

    pub fn checker(&self) -> &Checker {
        &self.checker
    }
}

impl<T: DeserializeOwned> Guard<T> {
    pub fn narrow(&self, value: &Value) -> Result<T, NarrowError> {
        if !self.test(value) {
            return Err(NarrowError::Rejected);
        }
        from_value_with_path(value.to_json())
    }
}

/// Deserialize with JSON-path context in error messages.
fn from_value_with_path<T: DeserializeOwned>(json: serde_json::Value) -> Result<T, NarrowError> {
    match serde_path_to_error::deserialize::<_, T>(json) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(NarrowError::Deserialize { path, message: err.into_inner().to_string() })
        }
    }
}

impl<T> Clone for Guard<T> {
    fn clone(&self) -> Self {
        Self { checker: self.checker.clone(), _target: PhantomData }
    }
}

impl<T> fmt::Debug for Guard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard")
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T> From<Guard<T>> for Checker {
    fn from(guard: Guard<T>) -> Self {
        guard.checker
    }
}

impl<T> From<Guard<T>> for Spec {
    fn from(guard: Guard<T>) -> Self {
        Spec::Single(guard.checker)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
