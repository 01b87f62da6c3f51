//! The JSON-like runtime value.
//!
//! [`Value`] is used uniformly for request variables, coerced arguments,
//! resolver sources and results. It differs from JSON in one respect:
//! [`Value::Undefined`] ("not present") is distinct from [`Value::Null`]
//! ("explicitly null"). Encoding skips `undefined` object entries entirely;
//! decoding never produces them.

mod convert;
#[macro_use]
mod macros;
mod object;

use std::fmt;

use indexmap::IndexMap;
use serde::{
    de,
    ser::{SerializeMap, SerializeSeq},
    Deserialize, Serialize,
};

pub use self::{convert::FromValue, object::Object};

/// The map of variable values accompanying a request.
pub type Variables = IndexMap<String, Value>;

/// A JSON-like value produced by and handed to resolvers.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// An explicit `null`.
    #[default]
    Null,
    /// The absence of a value. Serialization skips object entries holding
    /// this; in any other position it encodes as `null`.
    Undefined,
    Boolean(bool),
    Int(i32),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Object(Object),
}

impl Value {
    // CONSTRUCTORS

    /// Constructs a `null` value.
    pub fn null() -> Self {
        Self::Null
    }

    /// Constructs a list value.
    pub fn list(l: Vec<Self>) -> Self {
        Self::List(l)
    }

    /// Constructs an object value.
    pub fn object(o: Object) -> Self {
        Self::Object(o)
    }

    // DISCRIMINATORS

    /// Does this value represent `null`?
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Does this value represent the absence of a value?
    pub fn is_undefined(&self) -> bool {
        matches!(self, Self::Undefined)
    }

    /// `null` and `undefined` both count as "no value".
    pub fn is_null_or_undefined(&self) -> bool {
        matches!(self, Self::Null | Self::Undefined)
    }

    /// Views the underlying boolean, if present.
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Views the underlying integer, if present.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Views the underlying float, accepting integer values as well.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(f64::from(*i)),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Views the underlying string value, if present.
    pub fn as_string_value(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Views the underlying object value, if present.
    pub fn as_object_value(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Mutable view into the underlying object value, if present.
    pub fn as_mut_object_value(&mut self) -> Option<&mut Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Converts this value into an [`Object`], if it is one.
    pub fn into_object(self) -> Option<Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Views the underlying list value, if present.
    pub fn as_list_value(&self) -> Option<&[Self]> {
        match self {
            Self::List(l) => Some(l),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null | Self::Undefined => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Self::List(list) => {
                write!(f, "[")?;
                for (idx, item) in list.iter().enumerate() {
                    write!(f, "{item}")?;
                    if idx < list.len() - 1 {
                        write!(f, ", ")?;
                    }
                }
                write!(f, "]")
            }
            Self::Object(obj) => {
                write!(f, "{{")?;
                for (idx, (key, value)) in obj.iter().enumerate() {
                    write!(f, "\"{key}\": {value}")?;
                    if idx < obj.field_count() - 1 {
                        write!(f, ", ")?;
                    }
                }
                write!(f, "}}")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null | Self::Undefined => serializer.serialize_unit(),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Int(i) => serializer.serialize_i32(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(l) => {
                let mut seq = serializer.serialize_seq(Some(l.len()))?;
                for v in l {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            Self::Object(o) => {
                let mut map = serializer.serialize_map(None)?;
                for (k, v) in o.iter() {
                    if !v.is_undefined() {
                        map.serialize_entry(k, v)?;
                    }
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl<'de> de::Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a valid input value")
            }

            fn visit_bool<E>(self, b: bool) -> Result<Value, E> {
                Ok(Value::Boolean(b))
            }

            fn visit_i64<E: de::Error>(self, n: i64) -> Result<Value, E> {
                match i32::try_from(n) {
                    Ok(n) => Ok(Value::Int(n)),
                    Err(_) => Ok(Value::Float(n as f64)),
                }
            }

            fn visit_u64<E: de::Error>(self, n: u64) -> Result<Value, E> {
                match i32::try_from(n) {
                    Ok(n) => Ok(Value::Int(n)),
                    Err(_) => Ok(Value::Float(n as f64)),
                }
            }

            fn visit_f64<E>(self, f: f64) -> Result<Value, E> {
                Ok(Value::Float(f))
            }

            fn visit_str<E: de::Error>(self, s: &str) -> Result<Value, E> {
                Ok(Value::String(s.into()))
            }

            fn visit_string<E>(self, s: String) -> Result<Value, E> {
                Ok(Value::String(s))
            }

            fn visit_none<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_unit<E>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_seq<V: de::SeqAccess<'de>>(self, mut visitor: V) -> Result<Value, V::Error> {
                let mut values = Vec::new();
                while let Some(el) = visitor.next_element()? {
                    values.push(el);
                }
                Ok(Value::List(values))
            }

            fn visit_map<V: de::MapAccess<'de>>(self, mut visitor: V) -> Result<Value, V::Error> {
                let mut object = Object::with_capacity(visitor.size_hint().unwrap_or(0));
                while let Some((key, value)) = visitor.next_entry::<String, Value>()? {
                    object.add_field(key, value);
                }
                Ok(Value::Object(object))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<arcstr::ArcStr> for Value {
    fn from(s: arcstr::ArcStr) -> Self {
        Self::String(s.as_str().into())
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl<T> From<Vec<T>> for Value
where
    Value: From<T>,
{
    fn from(l: Vec<T>) -> Self {
        Self::List(l.into_iter().map(Value::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{Object, Value};

    #[test]
    fn display_follows_graphql_literal_syntax() {
        assert_eq!(graphql_value!(null).to_string(), "null");
        assert_eq!(graphql_value!(123).to_string(), "123");
        assert_eq!(graphql_value!(123.456).to_string(), "123.456");
        assert_eq!(graphql_value!("foo").to_string(), "\"foo\"");
        assert_eq!(graphql_value!(true).to_string(), "true");
        assert_eq!(graphql_value!([1, null, "foo"]).to_string(), "[1, null, \"foo\"]");
        assert_eq!(
            graphql_value!({"int": 1, "null": null, "string": "foo"}).to_string(),
            r#"{"int": 1, "null": null, "string": "foo"}"#
        );
    }

    #[test]
    fn object_preserves_insertion_order() {
        let value = graphql_value!({"zebra": 1, "alpha": 2, "mid": 3});
        let obj = value.as_object_value().unwrap();
        let keys: Vec<_> = obj.keys().map(String::as_str).collect();
        assert_eq!(keys, ["zebra", "alpha", "mid"]);
    }

    #[test]
    fn nested_objects_merge_on_add() {
        let mut obj = Object::new();
        obj.add_field("a", graphql_value!({"x": 1}));
        obj.add_field("a", graphql_value!({"y": 2}));

        assert_eq!(Value::Object(obj), graphql_value!({"a": {"x": 1, "y": 2}}));
    }

    #[test]
    fn serialization_skips_undefined_keys() {
        let mut obj = Object::new();
        obj.add_field("present", Value::Int(1));
        obj.add_field("missing", Value::Undefined);
        obj.add_field("null", Value::Null);

        let json = serde_json::to_string(&Value::Object(obj)).unwrap();
        assert_eq!(json, r#"{"present":1,"null":null}"#);
    }

    #[test]
    fn json_round_trip_removes_undefined() {
        let mut obj = Object::new();
        obj.add_field("a", graphql_value!([1, 2.5, "three", true, null]));
        obj.add_field("gone", Value::Undefined);
        obj.add_field("b", graphql_value!({"nested": {"deep": "yes"}}));
        let value = Value::Object(obj);

        let json = serde_json::to_string(&value).unwrap();
        let back: Value = serde_json::from_str(&json).unwrap();

        let expected = graphql_value!({
            "a": [1, 2.5, "three", true, null],
            "b": {"nested": {"deep": "yes"}},
        });
        assert_eq!(back, expected);
    }

    #[test]
    fn undefined_is_not_null() {
        assert_ne!(Value::Undefined, Value::Null);
        assert!(Value::Undefined.is_null_or_undefined());
        assert!(Value::Null.is_null_or_undefined());
    }
}
