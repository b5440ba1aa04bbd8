use crate::common::{Document, Value};
use crate::errors::{ErrorKind, RepoError, RepoResult};

/// Maps a Rust type to and from the [Value] a document store holds.
///
/// Entities implement this (usually with `#[derive(Convertible)]`) so the
/// repository can materialize raw query results into typed items.
pub trait Convertible {
    type Output;

    fn to_value(&self) -> RepoResult<Value>;
    fn from_value(value: &Value) -> RepoResult<Self::Output>;
}

fn mapping_error(value: &Value, expected: &str) -> RepoError {
    log::error!("Value {} is not {}", value, expected);
    RepoError::new(
        &format!("Value is not {}", expected),
        ErrorKind::ObjectMappingError,
    )
}

// JSON stores do not keep integer widths, so any integer variant that fits is accepted.
macro_rules! impl_convertible_for_integers {
    ($($t:ty => $name:literal),*) => {
        $(
            impl Convertible for $t {
                type Output = $t;

                fn to_value(&self) -> RepoResult<Value> {
                    Ok(Value::from(*self))
                }

                fn from_value(value: &Value) -> RepoResult<Self> {
                    let converted = match value {
                        Value::I64(i) => <$t>::try_from(*i).ok(),
                        Value::U64(u) => <$t>::try_from(*u).ok(),
                        _ => None,
                    };
                    converted.ok_or_else(|| mapping_error(value, $name))
                }
            }
        )*
    };
}

impl_convertible_for_integers!(
    i8 => "an i8",
    i16 => "an i16",
    i32 => "an i32",
    i64 => "an i64",
    u8 => "a u8",
    u16 => "a u16",
    u32 => "a u32",
    u64 => "a u64",
    usize => "a usize"
);

impl Convertible for f64 {
    type Output = f64;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::F64(*self))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        value.as_f64().ok_or_else(|| mapping_error(value, "an f64"))
    }
}

impl Convertible for f32 {
    type Output = f32;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::F64(*self as f64))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        value
            .as_f64()
            .map(|f| f as f32)
            .ok_or_else(|| mapping_error(value, "an f32"))
    }
}

impl Convertible for bool {
    type Output = bool;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        value.as_bool().ok_or_else(|| mapping_error(value, "a bool"))
    }
}

impl Convertible for String {
    type Output = String;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::String(self.clone()))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            _ => Err(mapping_error(value, "a string")),
        }
    }
}

impl Convertible for Document {
    type Output = Document;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::Document(self.clone()))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        match value {
            Value::Document(doc) => Ok(doc.clone()),
            _ => Err(mapping_error(value, "a document")),
        }
    }
}

impl Convertible for Value {
    type Output = Value;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(self.clone())
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        Ok(value.clone())
    }
}

impl<T> Convertible for Option<T>
where
    T: Convertible,
{
    type Output = Option<T::Output>;

    fn to_value(&self) -> RepoResult<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: &Value) -> RepoResult<Self::Output> {
        match value {
            Value::Null => Ok(None),
            _ => Ok(Some(T::from_value(value)?)),
        }
    }
}

impl<T> Convertible for Vec<T>
where
    T: Convertible,
{
    type Output = Vec<T::Output>;

    fn to_value(&self) -> RepoResult<Value> {
        let mut arr = Vec::with_capacity(self.len());
        for item in self {
            arr.push(item.to_value()?);
        }
        Ok(Value::Array(arr))
    }

    fn from_value(value: &Value) -> RepoResult<Self::Output> {
        match value {
            Value::Array(arr) => {
                let mut vec = Vec::with_capacity(arr.len());
                for item in arr {
                    vec.push(T::from_value(item)?);
                }
                Ok(vec)
            }
            _ => Err(mapping_error(value, "an array")),
        }
    }
}

pub fn from_value<T>(value: &Value) -> RepoResult<T::Output>
where
    T: Convertible,
{
    T::from_value(value)
}

pub fn to_value<T>(data: &T) -> RepoResult<Value>
where
    T: Convertible,
{
    data.to_value()
}
