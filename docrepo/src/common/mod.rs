//! Raw document model shared by the store client and the repository.
//!
//! - [Value] is a single stored value.
//! - [Document] is an ordered field map with embedded-field access.
//! - [Convertible] maps entities to and from values.

mod convertible;
mod document;
mod value;

pub use convertible::*;
pub use document::*;
pub use value::*;

/// Separator for embedded field names such as `location.zip`.
pub const FIELD_SEPARATOR: &str = ".";

/// Stored name of the document identity field.
pub const DOC_ID: &str = "id";
