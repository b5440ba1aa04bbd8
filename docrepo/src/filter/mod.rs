//! Query predicates over stored documents.
//!
//! Filters are built with the fluent API and pushed down to the document
//! store as parameterized SQL. Every filter can also evaluate itself against
//! a raw [Document](crate::common::Document), which is how the in-memory
//! store executes queries.
//!
//! # Examples
//!
//! ```rust,ignore
//! use docrepo::filter::{all, field};
//!
//! let filter = field("year").eq(2019).and(field("month").between(4, 6));
//! let owner = field("owner_id").regex("^o0004");
//! let everything = all();
//! ```
//!
//! # Supported Operators
//!
//! - **Equality**: `eq`, `ne`
//! - **Comparison**: `gt`, `gte`, `lt`, `lte`, `between`
//! - **Pattern**: `regex`
//! - **Array**: `in_array`, `not_in_array`
//! - **Logical**: `and`, `or`, `not`
//! - **Special**: `all` (match all)

mod filter;
mod fluent;
mod sql;

mod basic_filters;
mod comparison_filters;
mod logical_filters;
mod pattern_filters;

pub(crate) use basic_filters::*;
pub(crate) use comparison_filters::*;
pub use filter::*;
pub use fluent::*;
pub(crate) use logical_filters::*;
pub(crate) use pattern_filters::*;
pub use sql::*;
