//! Document store implementations.
//!
//! The repository talks to a store only through
//! [DocumentClient](crate::query::DocumentClient). [memory] provides an
//! in-process store with the same partitioning and paging behavior as a
//! remote one.

pub mod memory;
