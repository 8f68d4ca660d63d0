use crate::case::to_camel;
use crate::error::CrmaResult;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde_json::{Map, Number, Value};
use std::fmt;

/// Objects that can convert themselves into a mapping before encoding
pub trait ToMapping: Send + Sync {
    fn to_mapping(&self) -> Vec<(Encodable, Encodable)>;
}

/// A structured value awaiting normalization into JSON
///
/// Outgoing request bodies are built from these and serialized only through
/// [`normalize`], so no non-JSON-native type reaches the wire unconverted.
pub enum Encodable {
    Null,
    Str(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Bytes(Vec<u8>),
    DateTime(DateTime<Utc>),
    Date(NaiveDate),
    /// Rendered as a membership object `{member: true}`
    Set(Vec<Encodable>),
    /// Enumerated value carrying its underlying scalar
    Enum(Box<Encodable>),
    Object(Box<dyn ToMapping>),
    Map(Vec<(Encodable, Encodable)>),
    Seq(Vec<Encodable>),
    /// Already JSON-safe
    Json(Value),
    /// Fallback rendered through `Display`
    Other(String),
}

impl Encodable {
    pub fn object(value: impl ToMapping + 'static) -> Self {
        Self::Object(Box::new(value))
    }

    pub fn enumeration(scalar: impl Into<Encodable>) -> Self {
        Self::Enum(Box::new(scalar.into()))
    }

    pub fn display(value: impl fmt::Display) -> Self {
        Self::Other(value.to_string())
    }
}

impl fmt::Debug for Encodable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", normalize(self))
    }
}

impl From<&str> for Encodable {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for Encodable {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for Encodable {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for Encodable {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Encodable {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<Vec<u8>> for Encodable {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<DateTime<Utc>> for Encodable {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl From<NaiveDate> for Encodable {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<Value> for Encodable {
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl<T: Into<Encodable>> From<Option<T>> for Encodable {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Build a mapping entry keyed by the camelCase wire name of `name`
pub fn field(name: &str, value: impl Into<Encodable>) -> (Encodable, Encodable) {
    (Encodable::Str(to_camel(name)), value.into())
}

/// Recursively normalize a value into JSON-safe primitives
pub fn normalize(value: &Encodable) -> Value {
    match value {
        Encodable::Null => Value::Null,
        Encodable::Str(s) => Value::String(s.clone()),
        Encodable::Bool(b) => Value::Bool(*b),
        Encodable::Int(i) => Value::Number((*i).into()),
        Encodable::Float(f) => Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        Encodable::Bytes(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        Encodable::DateTime(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::AutoSi, false)),
        Encodable::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
        Encodable::Set(members) => Value::Object(
            members
                .iter()
                .map(|member| (key_string(normalize(member)), Value::Bool(true)))
                .collect(),
        ),
        Encodable::Enum(scalar) => normalize(scalar),
        Encodable::Object(object) => normalize_mapping(&object.to_mapping()),
        Encodable::Map(entries) => normalize_mapping(entries),
        Encodable::Seq(items) => Value::Array(items.iter().map(normalize).collect()),
        Encodable::Json(json) => json.clone(),
        Encodable::Other(text) => Value::String(text.clone()),
    }
}

/// Normalize and serialize a request body
pub fn to_json_vec(value: &Encodable) -> CrmaResult<Vec<u8>> {
    Ok(serde_json::to_vec(&normalize(value))?)
}

fn normalize_mapping(entries: &[(Encodable, Encodable)]) -> Value {
    let mut map = Map::with_capacity(entries.len());
    for (key, value) in entries {
        map.insert(key_string(normalize(key)), normalize(value));
    }
    Value::Object(map)
}

// JSON object keys must be strings; anything else uses its JSON text.
fn key_string(key: Value) -> String {
    match key {
        Value::String(s) => s,
        other => other.to_string(),
    }
}
