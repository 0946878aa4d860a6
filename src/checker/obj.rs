use indexmap::IndexMap;
use indexmap::map::Entry;

use super::{Checker, Spec, SpecError};
use crate::value::Value;

/// Field name → spec. Every declared field is required; make one optional by
/// putting `is_undefined` in its union.
#[derive(Clone, Debug, Default)]
pub struct Shape {
    fields: IndexMap<String, Spec>,
}

impl Shape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field. Redeclaring a name replaces the earlier spec, the way a
    /// map literal would.
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<Spec>) -> Self {
        self.fields.insert(name.into(), spec.into());
        self
    }

    /// Build from dynamic field lists. Duplicate names are rejected.
    pub fn try_from_fields<K, S, I>(fields: I) -> Result<Self, SpecError>
    where
        K: Into<String>,
        S: Into<Spec>,
        I: IntoIterator<Item = (K, S)>,
    {
        let mut out: IndexMap<String, Spec> = IndexMap::new();
        for (name, spec) in fields {
            match out.entry(name.into()) {
                Entry::Occupied(entry) => {
                    return Err(SpecError::DuplicateField(entry.key().clone()));
                }
                Entry::Vacant(entry) => {
                    entry.insert(spec.into());
                }
            }
        }
        Ok(Self { fields: out })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

/// Record checker: passes iff `value` is an object (not null, not an array)
/// and every declared field passes its spec. Undeclared fields are ignored.
pub fn is_object(shape: Shape) -> Checker {
    let fields: Vec<(String, Checker)> = shape
        .fields
        .into_iter()
        .map(|(name, spec)| (name, spec.into_checker()))
        .collect();

    Checker::new(move |value| {
        if !matches!(value, Value::Object(_)) {
            return false;
        }
        fields.iter().all(|(name, checker)| checker.check(value.get(name)))
    })
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
