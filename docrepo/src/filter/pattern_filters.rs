use std::{any::Any, fmt::Display};

use regex::Regex;

use crate::{
    common::{Document, Value},
    errors::{ErrorKind, RepoError, RepoResult},
};

use super::{FilterProvider, SqlWriter};

/// Matches string fields against a regular expression.
///
/// The pattern is compiled when the filter is created. An invalid pattern is
/// logged and kept, so applying or rendering the filter fails with
/// `FilterError` instead of the builder panicking.
///
/// Rendered with the store's `RegexMatch` function.
pub(crate) struct RegexFilter {
    field_name: String,
    field_value: String,
    pattern: Result<Regex, RepoError>,
}

impl RegexFilter {
    #[inline]
    pub(crate) fn new(field_name: String, field_value: String) -> Self {
        let pattern = Regex::new(&field_value).map_err(|e| {
            log::error!("Invalid regex pattern '{}': {}", field_value, e);
            RepoError::from(e)
        });

        RegexFilter {
            field_name,
            field_value,
            pattern,
        }
    }

    fn pattern(&self) -> RepoResult<&Regex> {
        self.pattern.as_ref().map_err(|e| {
            RepoError::new_with_cause(
                &format!("Invalid regex pattern for filter {}", self),
                ErrorKind::FilterError,
                e.clone(),
            )
        })
    }
}

impl Display for RegexFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} =~ {})", self.field_name, self.field_value)
    }
}

impl FilterProvider for RegexFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        let pattern = self.pattern()?;
        match entry.get(&self.field_name) {
            Value::String(value) => Ok(pattern.is_match(&value)),
            _ => Ok(false),
        }
    }

    fn write_sql(&self, writer: &mut SqlWriter) -> RepoResult<String> {
        self.pattern()?;
        let path = writer.field_path(&self.field_name)?;
        let param = writer.bind(Value::from(self.field_value.as_str()));
        Ok(format!("RegexMatch({}, {})", path, param))
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
