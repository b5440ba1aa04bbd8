use crate::common::Value;

use super::{
    ComparisonFilter, ComparisonMode, EqualsFilter, Filter, InFilter, NotEqualsFilter,
    NotInFilter, RegexFilter,
};

/// Creates a fluent filter builder for the specified field name.
///
/// Embedded fields use the `.` separator, e.g. `field("location.city")`.
pub fn field(field_name: &str) -> FluentFilter {
    FluentFilter {
        field_name: field_name.to_string(),
    }
}

/// A fluent builder for filters on a single field.
pub struct FluentFilter {
    field_name: String,
}

impl FluentFilter {
    /// Matches documents where the field equals `value`.
    #[inline]
    pub fn eq<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(EqualsFilter::new(self.field_name, value.into()))
    }

    /// Matches documents where the field differs from `value`.
    #[inline]
    pub fn ne<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(NotEqualsFilter::new(self.field_name, value.into()))
    }

    #[inline]
    pub fn gt<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(ComparisonFilter::new(
            self.field_name,
            value.into(),
            ComparisonMode::Greater,
        ))
    }

    #[inline]
    pub fn gte<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(ComparisonFilter::new(
            self.field_name,
            value.into(),
            ComparisonMode::GreaterEqual,
        ))
    }

    #[inline]
    pub fn lt<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(ComparisonFilter::new(
            self.field_name,
            value.into(),
            ComparisonMode::Lesser,
        ))
    }

    #[inline]
    pub fn lte<T: Into<Value>>(self, value: T) -> Filter {
        Filter::new(ComparisonFilter::new(
            self.field_name,
            value.into(),
            ComparisonMode::LesserEqual,
        ))
    }

    /// Matches documents where the field lies in `[lower, upper]`.
    pub fn between<T: Into<Value>>(self, lower: T, upper: T) -> Filter {
        let lower = Filter::new(ComparisonFilter::new(
            self.field_name.clone(),
            lower.into(),
            ComparisonMode::GreaterEqual,
        ));
        let upper = Filter::new(ComparisonFilter::new(
            self.field_name,
            upper.into(),
            ComparisonMode::LesserEqual,
        ));
        lower.and(upper)
    }

    /// Matches string fields against a regular expression.
    pub fn regex(self, value: &str) -> Filter {
        Filter::new(RegexFilter::new(self.field_name, value.to_string()))
    }

    /// Matches documents where the field is one of `values`.
    pub fn in_array<T: Into<Value>>(self, values: Vec<T>) -> Filter {
        Filter::new(InFilter::new(
            self.field_name,
            values.into_iter().map(Into::into).collect(),
        ))
    }

    /// Matches documents where the field is none of `values`.
    pub fn not_in_array<T: Into<Value>>(self, values: Vec<T>) -> Filter {
        Filter::new(NotInFilter::new(
            self.field_name,
            values.into_iter().map(Into::into).collect(),
        ))
    }
}
