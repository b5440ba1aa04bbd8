//! # docrepo - Partition-aware document repositories
//!
//! docrepo reads typed entities out of a partitioned NoSQL document store.
//! A repository call takes a filter and an optional partition key and turns
//! them into exactly one store query:
//!
//! - with a non-empty partition key the query is scoped to that partition
//!   and cross-partition execution is off
//! - without one (or with an empty one) the query fans out across all
//!   partitions
//!
//! Every call is measured. A [QueryMetricsTracker](metrics::QueryMetricsTracker)
//! is opened per call, keyed by collection and partition key, and records
//! exactly one outcome: succeeded, failed, or cancelled.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docrepo::config::RepositoryOptions;
//! use docrepo::filter::field;
//! use docrepo::metrics::{LoggingMetricsSink, RepositoryMetricsTracker};
//! use docrepo::repository::DocumentRepository;
//! use docrepo::store::memory::InMemoryDocumentClient;
//!
//! let client = InMemoryDocumentClient::new();
//! let options = RepositoryOptions::builder()
//!     .collection_link("dbs/drones/colls/utilization")
//!     .build()?;
//! client.create_collection(options.collection_uri(), "/partition_key")?;
//!
//! let repo = DocumentRepository::<InternalDroneUtilization>::new(
//!     Arc::new(client),
//!     options,
//!     RepositoryMetricsTracker::new(LoggingMetricsSink),
//! );
//! let june = repo.get_items(field("month").eq(6), Some("o00042")).await?;
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - Documents, values and entity conversion
//! - [`config`] - Collection addressing and repository options
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Query filters and their SQL rendering
//! - [`metrics`] - Per-query metrics, trackers and sinks
//! - [`query`] - Store client contract, feed options and query definitions
//! - [`repository`] - Typed repositories and the entity contract
//! - [`store`] - Store implementations

pub mod common;
pub mod config;
pub mod errors;
pub mod filter;
pub mod metrics;
pub mod query;
pub mod repository;
pub mod store;
