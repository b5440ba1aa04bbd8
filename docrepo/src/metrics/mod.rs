//! Query cost and latency tracking.
//!
//! A [RepositoryMetricsTracker] is shared by a repository and hands out one
//! [QueryMetricsTracker] per query. The per-query tracker accumulates page
//! charges and item counts and delivers a single [QueryMetrics] record to the
//! configured [QueryMetricsSink] when the query succeeds, fails or is dropped.
//!
//! ```rust,ignore
//! use docrepo::metrics::{AggregatingMetricsSink, RepositoryMetricsTracker};
//!
//! let sink = AggregatingMetricsSink::new();
//! let tracker = RepositoryMetricsTracker::new(sink.clone());
//! // ... run queries ...
//! let stats = sink.statistics("utilization", Some("o00042"));
//! ```

mod query_metrics;
mod sinks;
mod tracker;

pub use query_metrics::*;
pub use sinks::*;
pub use tracker::*;
