use std::{any::Any, cmp::Ordering, fmt::Display};

use crate::{
    common::{Document, Value},
    errors::{ErrorKind, RepoError, RepoResult},
};

use super::{FilterProvider, SqlWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ComparisonMode {
    Greater,
    GreaterEqual,
    Lesser,
    LesserEqual,
}

impl ComparisonMode {
    fn operator(&self) -> &'static str {
        match self {
            ComparisonMode::Greater => ">",
            ComparisonMode::GreaterEqual => ">=",
            ComparisonMode::Lesser => "<",
            ComparisonMode::LesserEqual => "<=",
        }
    }

    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            ComparisonMode::Greater => ordering == Ordering::Greater,
            ComparisonMode::GreaterEqual => ordering != Ordering::Less,
            ComparisonMode::Lesser => ordering == Ordering::Less,
            ComparisonMode::LesserEqual => ordering != Ordering::Greater,
        }
    }
}

/// Relational comparison of a field against a value.
///
/// Created by `gt()`, `gte()`, `lt()` and `lte()`. Documents whose field is
/// missing or of an incomparable kind do not match.
pub(crate) struct ComparisonFilter {
    field_name: String,
    field_value: Value,
    mode: ComparisonMode,
}

impl ComparisonFilter {
    pub(crate) fn new(field_name: String, field_value: Value, mode: ComparisonMode) -> Self {
        ComparisonFilter {
            field_name,
            field_value,
            mode,
        }
    }

    fn validate(&self) -> RepoResult<()> {
        if self.field_value.is_comparable() {
            Ok(())
        } else {
            log::error!(
                "Cannot compare field {} with {} value {}",
                self.field_name,
                self.field_value.type_name(),
                self.field_value
            );
            Err(RepoError::new(
                &format!("Cannot filter using non comparable value on {}", self.field_name),
                ErrorKind::FilterError,
            ))
        }
    }
}

impl Display for ComparisonFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} {} {})", self.field_name, self.mode.operator(), self.field_value)
    }
}

impl FilterProvider for ComparisonFilter {
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        self.validate()?;
        let value = entry.get(&self.field_name);
        Ok(value
            .compare(&self.field_value)
            .is_some_and(|ordering| self.mode.accepts(ordering)))
    }

    fn write_sql(&self, writer: &mut SqlWriter) -> RepoResult<String> {
        self.validate()?;
        let path = writer.field_path(&self.field_name)?;
        let param = writer.bind(self.field_value.clone());
        Ok(format!("{} {} {}", path, self.mode.operator(), param))
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
