//! Typed repositories over partitioned document collections.
//!
//! A [DocumentRepository] reads one entity kind, described by
//! [DocumentEntity], from a collection reached through a
//! [DocumentClient](crate::query::DocumentClient). Each read is a single
//! store query, scoped to one partition when a partition key is given and
//! cross-partition otherwise.

mod document_repository;
mod entity;

pub use document_repository::*;
pub use entity::*;

#[cfg(test)]
pub(crate) use entity::tests;
