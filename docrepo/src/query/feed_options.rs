use crate::errors::{ErrorKind, RepoError, RepoResult};
use std::fmt::Display;

/// Per-query options handed to the document store.
///
/// A query is either scoped to one partition (`partition_key` set,
/// `enable_cross_partition_query` false) or fans out across all partitions
/// (`partition_key` unset, `enable_cross_partition_query` true). Options built
/// by [FeedOptions::for_partition] always satisfy this; [FeedOptions::validate]
/// checks options assembled by hand.
///
/// The default value is neither scoped nor cross-partition and therefore
/// fails validation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeedOptions {
    pub partition_key: Option<String>,
    pub enable_cross_partition_query: bool,
    /// Maximum number of documents per page; the store decides when unset.
    pub max_item_count: Option<u32>,
    pub populate_query_metrics: bool,
}

impl FeedOptions {
    /// Builds the options for a query against `partition_key`.
    ///
    /// An empty key is treated the same as no key.
    pub fn for_partition(partition_key: Option<&str>) -> Self {
        match partition_key {
            Some(key) if !key.is_empty() => FeedOptions {
                partition_key: Some(key.to_string()),
                enable_cross_partition_query: false,
                ..FeedOptions::default()
            },
            _ => FeedOptions {
                partition_key: None,
                enable_cross_partition_query: true,
                ..FeedOptions::default()
            },
        }
    }

    pub fn with_max_item_count(mut self, max_item_count: Option<u32>) -> Self {
        self.max_item_count = max_item_count;
        self
    }

    pub fn with_populate_query_metrics(mut self, populate_query_metrics: bool) -> Self {
        self.populate_query_metrics = populate_query_metrics;
        self
    }

    /// Returns true when the query targets a single partition.
    pub fn is_scoped(&self) -> bool {
        self.partition_key.is_some()
    }

    /// Checks that exactly one of scoped and cross-partition execution is selected.
    pub fn validate(&self) -> RepoResult<()> {
        match (&self.partition_key, self.enable_cross_partition_query) {
            (Some(key), _) if key.is_empty() => {
                log::error!("Feed options carry an empty partition key");
                Err(RepoError::new(
                    "Partition key cannot be empty",
                    ErrorKind::InvalidOperation,
                ))
            }
            (Some(key), true) => {
                log::error!(
                    "Feed options for partition {} also enable cross partition query",
                    key
                );
                Err(RepoError::new(
                    "Partition key and cross partition query cannot both be set",
                    ErrorKind::InvalidOperation,
                ))
            }
            (None, false) => {
                log::error!("Feed options have neither a partition key nor cross partition query");
                Err(RepoError::new(
                    "Either a partition key or cross partition query is required",
                    ErrorKind::InvalidOperation,
                ))
            }
            _ => Ok(()),
        }
    }
}

impl Display for FeedOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.partition_key {
            Some(key) => write!(f, "partition={}", key)?,
            None => write!(f, "cross-partition={}", self.enable_cross_partition_query)?,
        }
        if let Some(count) = self.max_item_count {
            write!(f, ", max_item_count={}", count)?;
        }
        Ok(())
    }
}
