use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::metrics::{QueryMetrics, QueryOutcome, QueryScope};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;

/// Destination for query metrics records.
///
/// `record` is called exactly once per query, including failed and cancelled
/// ones. Errors returned from a sink are logged by the tracker and never
/// reach the caller of the query.
pub trait QueryMetricsSink: Send + Sync {
    /// Called when a tracker is acquired, before the store is contacted.
    fn query_started(&self, _scope: &QueryScope) {}

    fn record(&self, metrics: &QueryMetrics) -> RepoResult<()>;
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetricsSink;

impl QueryMetricsSink for NoopMetricsSink {
    fn record(&self, _metrics: &QueryMetrics) -> RepoResult<()> {
        Ok(())
    }
}

/// Writes every record to the `log` facade.
///
/// Successful queries log at info, failed and cancelled ones at warn.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMetricsSink;

impl QueryMetricsSink for LoggingMetricsSink {
    fn query_started(&self, scope: &QueryScope) {
        log::debug!(
            "Query {} started on {} [{}]",
            scope.activity_id,
            scope.collection,
            scope.partition_key.as_deref().unwrap_or("*")
        );
    }

    fn record(&self, metrics: &QueryMetrics) -> RepoResult<()> {
        if metrics.is_success() {
            log::info!("{}", metrics);
        } else {
            log::warn!("{}", metrics);
        }
        Ok(())
    }
}

/// Running totals for one `(collection, partition)` dimension.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryStatistics {
    pub queries: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub cancelled: u64,
    pub request_charge: f64,
    pub elapsed: Duration,
    pub items: u64,
    pub partition_mismatches: u64,
}

impl QueryStatistics {
    fn add(&mut self, metrics: &QueryMetrics) {
        self.queries += 1;
        match metrics.outcome {
            QueryOutcome::Succeeded => self.succeeded += 1,
            QueryOutcome::Failed(_) => self.failed += 1,
            QueryOutcome::Cancelled => self.cancelled += 1,
        }
        self.request_charge += metrics.request_charge;
        self.elapsed += metrics.elapsed;
        self.items += metrics.item_count as u64;
        self.partition_mismatches += metrics.partition_mismatches as u64;
    }

    /// Mean request charge per query, zero when nothing was recorded.
    pub fn average_request_charge(&self) -> f64 {
        if self.queries == 0 {
            0.0
        } else {
            self.request_charge / self.queries as f64
        }
    }
}

type StatisticsKey = (String, Option<String>);

/// Aggregates records per collection and partition key.
///
/// Cross-partition queries are aggregated under a `None` partition key.
#[derive(Debug, Default, Clone)]
pub struct AggregatingMetricsSink {
    statistics: Arc<DashMap<StatisticsKey, QueryStatistics>>,
}

impl AggregatingMetricsSink {
    pub fn new() -> Self {
        AggregatingMetricsSink {
            statistics: Arc::new(DashMap::new()),
        }
    }

    pub fn statistics(&self, collection: &str, partition_key: Option<&str>) -> Option<QueryStatistics> {
        let key = (collection.to_string(), partition_key.map(str::to_string));
        self.statistics.get(&key).map(|entry| entry.value().clone())
    }

    /// Totals for a collection across all partitions and cross-partition queries.
    pub fn collection_statistics(&self, collection: &str) -> QueryStatistics {
        let mut total = QueryStatistics::default();
        for entry in self.statistics.iter() {
            if entry.key().0 != collection {
                continue;
            }
            let stats = entry.value();
            total.queries += stats.queries;
            total.succeeded += stats.succeeded;
            total.failed += stats.failed;
            total.cancelled += stats.cancelled;
            total.request_charge += stats.request_charge;
            total.elapsed += stats.elapsed;
            total.items += stats.items;
            total.partition_mismatches += stats.partition_mismatches;
        }
        total
    }

    pub fn dimensions(&self) -> Vec<StatisticsKey> {
        let mut keys: Vec<StatisticsKey> = self.statistics.iter().map(|e| e.key().clone()).collect();
        keys.sort();
        keys
    }

    pub fn clear(&self) {
        self.statistics.clear();
    }
}

impl QueryMetricsSink for AggregatingMetricsSink {
    fn record(&self, metrics: &QueryMetrics) -> RepoResult<()> {
        let key = (metrics.collection.clone(), metrics.partition_key.clone());
        self.statistics.entry(key).or_default().add(metrics);
        Ok(())
    }
}

/// Fans records out to several sinks.
///
/// Every sink receives every record even when an earlier sink fails; the
/// failures are combined into one `MetricsError`.
#[derive(Default, Clone)]
pub struct CompositeMetricsSink {
    sinks: Vec<Arc<dyn QueryMetricsSink>>,
}

impl CompositeMetricsSink {
    pub fn new() -> Self {
        CompositeMetricsSink { sinks: Vec::new() }
    }

    pub fn with_sink<S: QueryMetricsSink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    pub fn with_shared_sink(mut self, sink: Arc<dyn QueryMetricsSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl QueryMetricsSink for CompositeMetricsSink {
    fn query_started(&self, scope: &QueryScope) {
        for sink in &self.sinks {
            sink.query_started(scope);
        }
    }

    fn record(&self, metrics: &QueryMetrics) -> RepoResult<()> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            if let Err(err) = sink.record(metrics) {
                failures.push(err);
            }
        }

        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0)),
            n => {
                let messages: Vec<&str> = failures.iter().map(|e| e.message()).collect();
                log::error!("{} metrics sinks failed: {}", n, messages.join("; "));
                Err(RepoError::new(
                    &format!("{} metrics sinks failed: {}", n, messages.join("; ")),
                    ErrorKind::MetricsError,
                ))
            }
        }
    }
}
