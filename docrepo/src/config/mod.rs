//! Repository configuration: the collection address and query settings.

mod collection_uri;
mod repository_options;

pub use collection_uri::*;
pub use repository_options::*;
