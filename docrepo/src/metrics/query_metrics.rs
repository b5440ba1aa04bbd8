use crate::errors::ErrorKind;
use chrono::{DateTime, Utc};
use std::fmt::Display;
use std::time::Duration;
use uuid::Uuid;

/// Terminal state of one query execution.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum QueryOutcome {
    Succeeded,
    Failed(ErrorKind),
    /// The caller dropped the query before it completed.
    Cancelled,
}

impl Display for QueryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryOutcome::Succeeded => write!(f, "succeeded"),
            QueryOutcome::Failed(kind) => write!(f, "failed ({})", kind),
            QueryOutcome::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// The dimensions a query is tracked under.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryScope {
    pub collection: String,
    pub partition_key: Option<String>,
    pub activity_id: Uuid,
}

/// Cost and latency of one query execution, handed to a
/// [QueryMetricsSink](crate::metrics::QueryMetricsSink) exactly once.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryMetrics {
    pub collection: String,
    pub partition_key: Option<String>,
    pub activity_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    /// Request charge summed over all pages read.
    pub request_charge: f64,
    pub page_count: usize,
    pub item_count: usize,
    pub partition_mismatches: usize,
    pub outcome: QueryOutcome,
}

impl QueryMetrics {
    pub(crate) fn start(scope: &QueryScope) -> Self {
        QueryMetrics {
            collection: scope.collection.clone(),
            partition_key: scope.partition_key.clone(),
            activity_id: scope.activity_id,
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
            request_charge: 0.0,
            page_count: 0,
            item_count: 0,
            partition_mismatches: 0,
            // replaced when the tracker finishes
            outcome: QueryOutcome::Cancelled,
        }
    }

    pub fn scope(&self) -> QueryScope {
        QueryScope {
            collection: self.collection.clone(),
            partition_key: self.partition_key.clone(),
            activity_id: self.activity_id,
        }
    }

    pub fn is_success(&self) -> bool {
        self.outcome == QueryOutcome::Succeeded
    }

    pub fn is_cross_partition(&self) -> bool {
        self.partition_key.is_none()
    }
}

impl Display for QueryMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "query {} on {} [{}] {} in {:?}: {} items, {} pages, {:.2} RU",
            self.activity_id,
            self.collection,
            self.partition_key.as_deref().unwrap_or("*"),
            self.outcome,
            self.elapsed,
            self.item_count,
            self.page_count,
            self.request_charge
        )?;
        if self.partition_mismatches > 0 {
            write!(f, ", {} partition mismatches", self.partition_mismatches)?;
        }
        Ok(())
    }
}
