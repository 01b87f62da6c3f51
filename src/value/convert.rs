use crate::{executor::FieldError, value::Value};

/// Decoding of a runtime [`Value`] into a Rust data type.
///
/// Implemented per input type by the embedding application; this replaces
/// runtime reflection over user structs. Resolvers typically call it through
/// [`Arguments::get`](crate::executor::Arguments::get).
pub trait FromValue: Sized {
    /// Performs the conversion.
    fn from_value(v: &Value) -> Result<Self, FieldError>;
}

impl FromValue for Value {
    fn from_value(v: &Value) -> Result<Self, FieldError> {
        Ok(v.clone())
    }
}

impl FromValue for bool {
    fn from_value(v: &Value) -> Result<Self, FieldError> {
        v.as_boolean()
            .ok_or_else(|| FieldError::from(format!("Expected `Boolean`, found: {v}")))
    }
}

impl FromValue for i32 {
    fn from_value(v: &Value) -> Result<Self, FieldError> {
        v.as_int()
            .ok_or_else(|| FieldError::from(format!("Expected `Int`, found: {v}")))
    }
}

impl FromValue for f64 {
    fn from_value(v: &Value) -> Result<Self, FieldError> {
        v.as_float()
            .ok_or_else(|| FieldError::from(format!("Expected `Float`, found: {v}")))
    }
}

impl FromValue for String {
    fn from_value(v: &Value) -> Result<Self, FieldError> {
        v.as_string_value()
            .map(Into::into)
            .ok_or_else(|| FieldError::from(format!("Expected `String`, found: {v}")))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(v: &Value) -> Result<Self, FieldError> {
        if v.is_null_or_undefined() {
            Ok(None)
        } else {
            T::from_value(v).map(Some)
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(v: &Value) -> Result<Self, FieldError> {
        match v {
            Value::List(l) => l.iter().map(T::from_value).collect(),
            // Single values coerce to single-element lists.
            v => Ok(vec![T::from_value(v)?]),
        }
    }
}
