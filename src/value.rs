//! The universal input domain every checker accepts.
//!
//! `Value` keeps the distinctions the predicates care about and that
//! `serde_json::Value` cannot express on its own: an explicit `Undefined`
//! (absent field) separate from `Null`, NaN numbers, and date instants that may
//! be invalid.
use std::fmt;
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use indexmap::IndexMap;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(Date),
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

/// A date/time value; `None` is the invalid-date sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Date(Option<DateTime<FixedOffset>>);

static UNDEFINED: Value = Value::Undefined;

// ————————————————————————————————————————————————————————————————————————————
// DATE
// ————————————————————————————————————————————————————————————————————————————

impl Date {
    pub fn now() -> Self {
        Self(Some(Utc::now().fixed_offset()))
    }

    pub fn invalid() -> Self {
        Self(None)
    }

    /// Parse RFC 3339 or a bare `YYYY-MM-DD` (midnight UTC).
    /// Unparsable input yields an invalid date rather than an error.
    pub fn parse(src: &str) -> Self {
        let src = src.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(src) {
            return Self(Some(dt));
        }
        NaiveDate::parse_from_str(src, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| Self(Some(naive.and_utc().fixed_offset())))
            .unwrap_or_else(Self::invalid)
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn instant(&self) -> Option<DateTime<FixedOffset>> {
        self.0
    }
}

impl<Tz: chrono::TimeZone> From<DateTime<Tz>> for Date {
    fn from(dt: DateTime<Tz>) -> Self {
        Self(Some(dt.fixed_offset()))
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => f.write_str("Invalid Date"),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// VALUE
// ————————————————————————————————————————————————————————————————————————————

impl Value {
    /// Read a field; anything that is not a present key of an object reads
    /// as `Undefined`.
    pub fn get(&self, key: &str) -> &Value {
        match self {
            Value::Object(map) => map.get(key).unwrap_or(&UNDEFINED),
            _ => &UNDEFINED,
        }
    }

    pub fn object<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn array<I: IntoIterator<Item = Value>>(items: I) -> Self {
        Value::Array(items.into_iter().collect())
    }

    /// Like `From<serde_json::Value>`, but strings `Date::parse` accepts as a
    /// valid instant become dates. Other strings are kept as strings.
    pub fn from_json_parsing_dates(json: serde_json::Value) -> Self {
        lift(json, true)
    }

    /// Lower back to JSON the way a JSON encoder treats these kinds:
    /// undefined fields are dropped, undefined array slots, NaN and invalid
    /// dates become `null`, valid dates become RFC 3339 strings.
    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;
        match self {
            Value::Undefined | Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(*b),
            Value::Number(n) => serde_json::Number::from_f64(*n)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.clone()),
            Value::Date(d) => match d.instant() {
                Some(dt) => Json::String(dt.to_rfc3339()),
                None => Json::Null,
            },
            Value::Array(xs) => Json::Array(xs.iter().map(Value::to_json).collect()),
            Value::Object(map) => Json::Object(
                map.iter()
                    .filter(|(_, v)| !matches!(v, Value::Undefined))
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
        }
    }

    /// Short kind label, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Date(_) => "date",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }
}

fn lift(json: serde_json::Value, parse_dates: bool) -> Value {
    use serde_json::Value as Json;
    match json {
        Json::Null => Value::Null,
        Json::Bool(b) => Value::Bool(b),
        Json::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        Json::String(s) => {
            if parse_dates {
                let date = Date::parse(&s);
                if date.is_valid() {
                    return Value::Date(date);
                }
            }
            Value::String(s)
        }
        Json::Array(xs) => Value::Array(xs.into_iter().map(|x| lift(x, parse_dates)).collect()),
        Json::Object(m) => Value::Object(
            m.into_iter().map(|(k, v)| (k, lift(v, parse_dates))).collect(),
        ),
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        lift(json, false)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Value::Bool(b) }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self { Value::Number(n) }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self { Value::Number(n as f64) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Value::String(s.to_owned()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Value::String(s) }
}

impl From<Date> for Value {
    fn from(d: Date) -> Self { Value::Date(d) }
}

impl From<Vec<Value>> for Value {
    fn from(xs: Vec<Value>) -> Self { Value::Array(xs) }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn absent_field_reads_as_undefined() {
        let v = Value::from(json!({"a": null}));
        assert_eq!(v.get("a"), &Value::Null);
        assert_eq!(v.get("b"), &Value::Undefined);
        // non-objects have no fields
        assert_eq!(Value::from(json!([1, 2])).get("0"), &Value::Undefined);
        assert_eq!(Value::Null.get("a"), &Value::Undefined);
    }

    #[test]
    fn date_parse_accepts_rfc3339_and_plain_dates() {
        assert!(Date::parse("2024-01-01T12:30:00Z").is_valid());
        assert!(Date::parse("2024-01-01T12:30:00+09:00").is_valid());
        assert!(Date::parse("2024-01-01").is_valid());
        assert!(!Date::parse("invalid date").is_valid());
        assert!(!Date::parse("2024-13-45").is_valid());
        assert_eq!(Date::invalid().to_string(), "Invalid Date");
    }

    #[test]
    fn json_lift_keeps_strings_unless_asked() {
        let src = json!({"at": "2024-01-01T00:00:00Z", "name": "x"});
        let plain = Value::from(src.clone());
        assert!(matches!(plain.get("at"), Value::String(_)));

        let dated = Value::from_json_parsing_dates(src);
        assert!(matches!(dated.get("at"), Value::Date(d) if d.is_valid()));
        assert!(matches!(dated.get("name"), Value::String(_)));
    }

    #[test]
    fn json_lift_uses_the_same_date_rules_as_parse() {
        let dated = Value::from_json_parsing_dates(json!(["2024-01-01", "2024-13-45", "soon"]));
        let Value::Array(xs) = dated else { panic!("expected array") };
        assert_eq!(xs[0], Value::Date(Date::parse("2024-01-01")));
        // unparsable and out-of-range strings stay strings, never invalid dates
        assert_eq!(xs[1], Value::from("2024-13-45"));
        assert_eq!(xs[2], Value::from("soon"));
    }

    #[test]
    fn to_json_drops_undefined_and_nulls_nan() {
        let v = Value::object([
            ("a", Value::Number(1.0)),
            ("gone", Value::Undefined),
            ("nan", Value::Number(f64::NAN)),
            ("bad", Value::Date(Date::invalid())),
            ("xs", Value::array([Value::Undefined, Value::Bool(true)])),
        ]);
        assert_eq!(
            v.to_json(),
            json!({"a": 1.0, "nan": null, "bad": null, "xs": [null, true]})
        );
    }

    #[test]
    fn object_preserves_insertion_order() {
        let v = Value::from(json!({"z": 1, "a": 2, "m": 3}));
        let Value::Object(map) = v else { panic!("expected object") };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }
}
