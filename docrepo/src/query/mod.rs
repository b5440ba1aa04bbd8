//! Store-facing query surface: options, rendered queries and the client traits.

mod document_client;
mod feed_options;
mod query_definition;

pub use document_client::*;
pub use feed_options::*;
pub use query_definition::*;
