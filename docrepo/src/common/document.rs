use crate::common::{Value, FIELD_SEPARATOR};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use std::collections::btree_map::Iter;
use std::collections::BTreeMap;
use std::fmt::{Debug, Display};

/// A raw document as held by the document store.
///
/// Documents are ordered maps of field name to [Value]. Nested documents are
/// addressed with the field separator (`.`), so for `{"location": {"zip": 1}}`
/// the zip is read with `document.get("location.zip")`.
///
/// Entities never touch documents directly; the repository converts them
/// with [crate::common::Convertible].
#[derive(Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    data: BTreeMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Associates `value` with `key`, creating intermediate documents for
    /// embedded keys such as `"location.zip"`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` if the key (or one of its segments) is empty,
    /// or if an intermediate segment already holds a non-document value.
    pub fn put<T: Into<Value>>(&mut self, key: &str, value: T) -> RepoResult<()> {
        if key.is_empty() {
            log::error!("Document does not support empty key");
            return Err(RepoError::new(
                "Document does not support empty key",
                ErrorKind::InvalidOperation,
            ));
        }

        let value = value.into();
        if key.contains(FIELD_SEPARATOR) {
            let splits: Vec<&str> = key.split(FIELD_SEPARATOR).collect();
            self.deep_put(&splits, value)
        } else {
            self.data.insert(key.to_string(), value);
            Ok(())
        }
    }

    /// Returns the value associated with `key`, or [Value::Null] if absent.
    ///
    /// Embedded keys walk nested documents; a numeric segment indexes into an array.
    pub fn get(&self, key: &str) -> Value {
        match self.data.get(key) {
            Some(value) => value.clone(),
            None if key.contains(FIELD_SEPARATOR) => self.deep_get(key),
            None => Value::Null,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Checks whether `field` resolves to a value, including embedded fields.
    pub fn contains_field(&self, field: &str) -> bool {
        self.contains_key(field) || !self.get(field).is_null()
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    /// Returns the top-level field names in order.
    pub fn fields(&self) -> Vec<String> {
        self.data.keys().cloned().collect()
    }

    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.data.iter()
    }

    /// Returns the value of `key` when it is a non-empty string.
    pub fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Value::String(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    fn deep_put(&mut self, splits: &[&str], value: Value) -> RepoResult<()> {
        let (head, rest) = match splits.split_first() {
            Some(parts) => parts,
            None => return Ok(()),
        };

        if head.is_empty() {
            log::error!("Document does not support empty embedded key");
            return Err(RepoError::new(
                "Document does not support empty embedded key",
                ErrorKind::InvalidOperation,
            ));
        }

        if rest.is_empty() {
            self.data.insert(head.to_string(), value);
            return Ok(());
        }

        let entry = self
            .data
            .entry(head.to_string())
            .or_insert_with(|| Value::Document(Document::new()));

        match entry {
            Value::Document(nested) => nested.deep_put(rest, value),
            Value::Null => {
                let mut nested = Document::new();
                nested.deep_put(rest, value)?;
                *entry = Value::Document(nested);
                Ok(())
            }
            other => {
                log::error!("Field {} holds a {} and cannot be embedded into", head, other.type_name());
                Err(RepoError::new(
                    &format!("Field {} is not a document", head),
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }

    fn deep_get(&self, key: &str) -> Value {
        let mut current = Value::Document(self.clone());
        for segment in key.split(FIELD_SEPARATOR) {
            current = match current {
                Value::Document(doc) => match doc.data.get(segment) {
                    Some(v) => v.clone(),
                    None => return Value::Null,
                },
                Value::Array(values) => match segment.parse::<usize>() {
                    Ok(index) if index < values.len() => values[index].clone(),
                    _ => return Value::Null,
                },
                _ => return Value::Null,
            };
        }
        current
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

/// Creates a [Document] from key/value pairs.
///
/// Keys may be bare identifiers or string literals; values may be expressions,
/// nested `{ .. }` documents or `[ .. ]` arrays.
///
/// ```rust,ignore
/// let doc = doc! {
///     id: "d0001",
///     partition_key: "o00042",
///     location: { city: "Redmond" },
///     tags: ["a", "b"],
/// };
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::common::Document::new()
    };

    ($($key:tt : $value:tt),* $(,)?) => {
        {
            let mut doc = $crate::common::Document::new();
            $(
                doc.put($crate::common::normalize(stringify!($key)), $crate::doc_value!($value))
                    .expect("doc! keys are never empty");
            )*
            doc
        }
    };
}

/// Helper macro converting the values of [doc!].
#[macro_export]
macro_rules! doc_value {
    ({ $($key:tt : $value:tt),* $(,)? }) => {
        $crate::common::Value::Document($crate::doc!{ $($key : $value),* })
    };

    ([ $($value:tt),* $(,)? ]) => {
        $crate::common::Value::Array(vec![$($crate::doc_value!($value)),*])
    };

    ($value:expr) => {
        $crate::common::Value::from($value)
    };
}

/// Strips the quotes `stringify!` leaves around string-literal keys.
pub fn normalize(key: &str) -> &str {
    key.trim_matches('"')
}
