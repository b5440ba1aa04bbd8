use std::{any::Any, fmt::Display};

use crate::{
    common::{Document, Value},
    errors::{ErrorKind, RepoError, RepoResult},
};

use super::{FilterProvider, SqlWriter};

/// A filter that matches all documents.
///
/// Renders as the `true` predicate.
pub(crate) struct AllFilter;

impl FilterProvider for AllFilter {
    fn apply(&self, _entry: &Document) -> RepoResult<bool> {
        Ok(true)
    }

    fn write_sql(&self, _writer: &mut SqlWriter) -> RepoResult<String> {
        Ok("true".to_string())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Display for AllFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AllFilter")
    }
}

/// A filter that matches documents where a field equals a specific value.
///
/// Missing fields read as null, so `eq(Value::Null)` also matches documents
/// without the field.
pub(crate) struct EqualsFilter {
    field_name: String,
    field_value: Value,
}

impl EqualsFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_value: Value) -> Self {
        EqualsFilter {
            field_name,
            field_value,
        }
    }
}

impl Display for EqualsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} == {})", self.field_name, self.field_value)
    }
}

impl FilterProvider for EqualsFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        let value = entry.get(&self.field_name);
        Ok(value == self.field_value)
    }

    fn write_sql(&self, writer: &mut SqlWriter) -> RepoResult<String> {
        let path = writer.field_path(&self.field_name)?;
        let param = writer.bind(self.field_value.clone());
        Ok(format!("{} = {}", path, param))
    }

    fn has_field(&self) -> bool {
        true
    }

    fn get_field_name(&self) -> RepoResult<String> {
        Ok(self.field_name.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A filter that matches documents where a field does not equal a specific value.
pub(crate) struct NotEqualsFilter {
    field_name: String,
    field_value: Value,
}

impl NotEqualsFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_value: Value) -> Self {
        NotEqualsFilter {
            field_name,
            field_value,
        }
    }
}

impl Display for NotEqualsFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} != {})", self.field_name, self.field_value)
    }
}

impl FilterProvider for NotEqualsFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        let value = entry.get(&self.field_name);
        Ok(value != self.field_value)
    }

    fn write_sql(&self, writer: &mut SqlWriter) -> RepoResult<String> {
        let path = writer.field_path(&self.field_name)?;
        let param = writer.bind(self.field_value.clone());
        Ok(format!("{} != {}", path, param))
    }

    fn has_field(&self) -> bool {
        true
    }

    fn get_field_name(&self) -> RepoResult<String> {
        Ok(self.field_name.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn validate_search_terms(field_name: &str, values: &[Value]) -> RepoResult<()> {
    for value in values {
        match value {
            Value::Null => continue,
            Value::Array(_) | Value::Document(_) => {
                log::error!("Cannot filter {} using non comparable value {}", field_name, value);
                return Err(RepoError::new(
                    &format!("Cannot filter using non comparable values {}", field_name),
                    ErrorKind::FilterError,
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

/// A filter that matches documents where a field is one of a set of values.
///
/// An empty set matches nothing and renders as `false`.
pub(crate) struct InFilter {
    field_name: String,
    field_values: Vec<Value>,
}

impl InFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_values: Vec<Value>) -> Self {
        InFilter {
            field_name,
            field_values,
        }
    }
}

impl Display for InFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} in {})", self.field_name, Value::Array(self.field_values.clone()))
    }
}

impl FilterProvider for InFilter {
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        validate_search_terms(&self.field_name, &self.field_values)?;
        let value = entry.get(&self.field_name);
        Ok(self.field_values.iter().any(|v| *v == value))
    }

    fn write_sql(&self, writer: &mut SqlWriter) -> RepoResult<String> {
        validate_search_terms(&self.field_name, &self.field_values)?;
        if self.field_values.is_empty() {
            return Ok("false".to_string());
        }

        let path = writer.field_path(&self.field_name)?;
        let params: Vec<String> = self
            .field_values
            .iter()
            .map(|v| writer.bind(v.clone()))
            .collect();
        Ok(format!("{} IN ({})", path, params.join(", ")))
    }

    fn has_field(&self) -> bool {
        true
    }

    fn get_field_name(&self) -> RepoResult<String> {
        Ok(self.field_name.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A filter that matches documents where a field is none of a set of values.
pub(crate) struct NotInFilter {
    field_name: String,
    field_values: Vec<Value>,
}

impl NotInFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_values: Vec<Value>) -> Self {
        NotInFilter {
            field_name,
            field_values,
        }
    }
}

impl Display for NotInFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} not in {})", self.field_name, Value::Array(self.field_values.clone()))
    }
}

impl FilterProvider for NotInFilter {
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        validate_search_terms(&self.field_name, &self.field_values)?;
        let value = entry.get(&self.field_name);
        Ok(!self.field_values.iter().any(|v| *v == value))
    }

    fn write_sql(&self, writer: &mut SqlWriter) -> RepoResult<String> {
        validate_search_terms(&self.field_name, &self.field_values)?;
        if self.field_values.is_empty() {
            return Ok("true".to_string());
        }

        let path = writer.field_path(&self.field_name)?;
        let params: Vec<String> = self
            .field_values
            .iter()
            .map(|v| writer.bind(v.clone()))
            .collect();
        Ok(format!("NOT ({} IN ({}))", path, params.join(", ")))
    }

    fn has_field(&self) -> bool {
        true
    }

    fn get_field_name(&self) -> RepoResult<String> {
        Ok(self.field_name.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
