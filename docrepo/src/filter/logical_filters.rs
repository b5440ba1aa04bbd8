use std::{any::Any, fmt::Display};

use crate::{common::Document, errors::RepoResult};

use super::{Filter, FilterProvider, SqlWriter};

fn join_display(filters: &[Filter], separator: &str) -> String {
    let mut joined = String::with_capacity(filters.len() * 16);
    for (i, filter) in filters.iter().enumerate() {
        joined.push_str(&format!("{}", filter));
        if i < filters.len() - 1 {
            joined.push_str(separator);
        }
    }
    joined
}

fn join_sql(filters: &[Filter], writer: &mut SqlWriter, keyword: &str) -> RepoResult<String> {
    let mut parts = Vec::with_capacity(filters.len());
    for filter in filters {
        parts.push(filter.write_sql(writer)?);
    }
    Ok(format!("({})", parts.join(keyword)))
}

/// A filter that applies logical AND on multiple filters.
///
/// Evaluation short-circuits at the first filter that does not match. An
/// empty conjunction matches everything.
pub(crate) struct AndFilter {
    filters: Vec<Filter>,
}

impl AndFilter {
    pub(crate) fn new(filters: Vec<Filter>) -> Self {
        AndFilter { filters }
    }
}

impl Display for AndFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", join_display(&self.filters, " && "))
    }
}

impl FilterProvider for AndFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        for filter in &self.filters {
            if !filter.apply(entry)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn write_sql(&self, writer: &mut SqlWriter) -> RepoResult<String> {
        if self.filters.is_empty() {
            return Ok("true".to_string());
        }
        join_sql(&self.filters, writer, " AND ")
    }

    fn logical_filters(&self) -> RepoResult<Vec<Filter>> {
        Ok(self.filters.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A filter that applies logical OR on multiple filters.
///
/// An empty disjunction matches nothing.
pub(crate) struct OrFilter {
    filters: Vec<Filter>,
}

impl OrFilter {
    pub(crate) fn new(filters: Vec<Filter>) -> Self {
        OrFilter { filters }
    }
}

impl Display for OrFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", join_display(&self.filters, " || "))
    }
}

impl FilterProvider for OrFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        for filter in &self.filters {
            if filter.apply(entry)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn write_sql(&self, writer: &mut SqlWriter) -> RepoResult<String> {
        if self.filters.is_empty() {
            return Ok("false".to_string());
        }
        join_sql(&self.filters, writer, " OR ")
    }

    fn logical_filters(&self) -> RepoResult<Vec<Filter>> {
        Ok(self.filters.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A filter that inverts another filter.
pub(crate) struct NotFilter {
    filter: Filter,
}

impl NotFilter {
    pub(crate) fn new(filter: Filter) -> Self {
        NotFilter { filter }
    }
}

impl Display for NotFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(not {})", self.filter)
    }
}

impl FilterProvider for NotFilter {
    #[inline]
    fn apply(&self, entry: &Document) -> RepoResult<bool> {
        Ok(!self.filter.apply(entry)?)
    }

    fn write_sql(&self, writer: &mut SqlWriter) -> RepoResult<String> {
        Ok(format!("(NOT {})", self.filter.write_sql(writer)?))
    }

    fn logical_filters(&self) -> RepoResult<Vec<Filter>> {
        Ok(vec![self.filter.clone()])
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
