use crate::common::Document;
use crate::errors::{ErrorKind, RepoError, RepoResult};
use std::any::Any;
use std::fmt::Display;
use std::ops::Deref;
use std::sync::Arc;

use super::{AllFilter, AndFilter, NotFilter, OrFilter, SqlWriter};

/// Trait for implementing query filters.
///
/// A `FilterProvider` can both evaluate itself against a raw [Document]
/// and render itself as a store-side SQL predicate. The repository always
/// pushes filters down to the store; `apply` is what a store without a
/// query engine (such as the in-memory client) evaluates.
pub trait FilterProvider: Any + Send + Sync + Display {
    /// Applies the filter to a document and returns whether it matches.
    fn apply(&self, entry: &Document) -> RepoResult<bool>;

    /// Renders the filter as a SQL predicate, binding values through `writer`.
    fn write_sql(&self, writer: &mut SqlWriter) -> RepoResult<String>;

    /// Checks if this filter operates on a specific field.
    #[inline]
    fn has_field(&self) -> bool {
        false
    }

    /// Gets the field name this filter operates on.
    fn get_field_name(&self) -> RepoResult<String> {
        log::error!("Filter {} does not have field name", self);
        Err(RepoError::new(
            "Filter does not have field name",
            ErrorKind::FilterError,
        ))
    }

    fn logical_filters(&self) -> RepoResult<Vec<Filter>> {
        Err(RepoError::new(
            "Filter is not a logical filter",
            ErrorKind::FilterError,
        ))
    }

    fn as_any(&self) -> &dyn Any;
}

/// A query predicate over stored documents.
///
/// `Filter` is a cheap handle (`Arc`) over a [FilterProvider]. Filters are
/// built with the fluent API (`field("owner_id").eq("o00042")`) and combined
/// with `and`, `or` and `not`.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::filter::{all, field};
///
/// let june = field("month").eq(6).and(field("year").eq(2019));
/// let everything = all();
/// ```
#[derive(Clone)]
pub struct Filter {
    inner: Arc<dyn FilterProvider>,
}

impl Filter {
    /// Creates a new filter from a filter provider implementation.
    pub fn new<T: FilterProvider + 'static>(inner: T) -> Self {
        Filter {
            inner: Arc::new(inner),
        }
    }

    /// Combines this filter with another using logical AND.
    ///
    /// `all()` is the identity of AND, so combining with it returns the
    /// other filter unchanged.
    pub fn and(&self, filter: Filter) -> Self {
        if is_all_filter(self) {
            return filter;
        }
        if is_all_filter(&filter) {
            return self.clone();
        }
        Filter::new(AndFilter::new(vec![self.clone(), filter]))
    }

    /// Combines this filter with another using logical OR.
    pub fn or(&self, filter: Filter) -> Self {
        Filter::new(OrFilter::new(vec![self.clone(), filter]))
    }

    /// Negates this filter using logical NOT.
    pub fn not(&self) -> Self {
        Filter::new(NotFilter::new(self.clone()))
    }
}

impl Display for Filter {
    #[inline]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::fmt::Debug for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Filter{}", self.inner)
    }
}

impl Deref for Filter {
    type Target = Arc<dyn FilterProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Creates a filter that matches all documents.
pub fn all() -> Filter {
    Filter::new(AllFilter {})
}

/// Combines multiple filters using logical AND.
pub fn and(filters: Vec<Filter>) -> Filter {
    Filter::new(AndFilter::new(filters))
}

/// Combines multiple filters using logical OR.
pub fn or(filters: Vec<Filter>) -> Filter {
    Filter::new(OrFilter::new(filters))
}

/// Negates a filter using logical NOT.
pub fn not(filter: Filter) -> Filter {
    Filter::new(NotFilter::new(filter))
}

pub fn is_all_filter(filter: &Filter) -> bool {
    filter.as_any().is::<AllFilter>()
}

pub(crate) fn is_and_filter(filter: &Filter) -> bool {
    filter.as_any().is::<AndFilter>()
}
