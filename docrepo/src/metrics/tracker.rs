use crate::errors::RepoError;
use crate::metrics::{NoopMetricsSink, QueryMetrics, QueryMetricsSink, QueryOutcome, QueryScope};
use crate::query::FeedPage;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Hands out one [QueryMetricsTracker] per query.
///
/// Holds nothing but the shared sink, so clones are cheap and calls never
/// share state.
#[derive(Clone)]
pub struct RepositoryMetricsTracker {
    sink: Arc<dyn QueryMetricsSink>,
}

impl RepositoryMetricsTracker {
    pub fn new<S: QueryMetricsSink + 'static>(sink: S) -> Self {
        RepositoryMetricsTracker {
            sink: Arc::new(sink),
        }
    }

    pub fn from_arc(sink: Arc<dyn QueryMetricsSink>) -> Self {
        RepositoryMetricsTracker { sink }
    }

    pub fn noop() -> Self {
        RepositoryMetricsTracker::new(NoopMetricsSink)
    }

    /// Starts tracking a query on `collection`, scoped to `partition_key` or
    /// cross-partition when `None`.
    pub fn query_metrics_tracker(
        &self,
        collection: &str,
        partition_key: Option<&str>,
    ) -> QueryMetricsTracker {
        let scope = QueryScope {
            collection: collection.to_string(),
            partition_key: partition_key.map(str::to_string),
            activity_id: Uuid::new_v4(),
        };
        self.sink.query_started(&scope);

        QueryMetricsTracker {
            sink: self.sink.clone(),
            metrics: QueryMetrics::start(&scope),
            started: Instant::now(),
            finished: false,
        }
    }
}

impl Default for RepositoryMetricsTracker {
    fn default() -> Self {
        Self::noop()
    }
}

/// Tracks a single query and records its outcome exactly once.
///
/// `succeed` and `fail` consume the tracker. A tracker dropped without either
/// (the query future was abandoned) records [QueryOutcome::Cancelled].
pub struct QueryMetricsTracker {
    sink: Arc<dyn QueryMetricsSink>,
    metrics: QueryMetrics,
    started: Instant,
    finished: bool,
}

impl QueryMetricsTracker {
    pub fn activity_id(&self) -> Uuid {
        self.metrics.activity_id
    }

    /// The record as accumulated so far.
    pub fn metrics(&self) -> &QueryMetrics {
        &self.metrics
    }

    pub fn track_page(&mut self, page: &FeedPage) {
        self.metrics.page_count += 1;
        self.metrics.item_count += page.documents.len();
        self.metrics.request_charge += page.request_charge;
    }

    pub fn record_partition_mismatch(&mut self) {
        self.metrics.partition_mismatches += 1;
    }

    pub fn succeed(mut self) {
        self.finish(QueryOutcome::Succeeded);
    }

    pub fn fail(mut self, err: &RepoError) {
        self.finish(QueryOutcome::Failed(err.kind().clone()));
    }

    fn finish(&mut self, outcome: QueryOutcome) {
        if self.finished {
            return;
        }
        self.finished = true;
        self.metrics.elapsed = self.started.elapsed();
        self.metrics.outcome = outcome;

        if let Err(err) = self.sink.record(&self.metrics) {
            log::warn!(
                "Failed to record metrics for query {}: {}",
                self.metrics.activity_id,
                err
            );
        }
    }
}

impl Drop for QueryMetricsTracker {
    fn drop(&mut self) {
        if !self.finished {
            log::debug!("Query {} dropped before completion", self.metrics.activity_id);
            self.finish(QueryOutcome::Cancelled);
        }
    }
}
