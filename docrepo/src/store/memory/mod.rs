mod client;
mod collection;
mod query;

pub use client::*;
pub use collection::*;
pub use query::*;
