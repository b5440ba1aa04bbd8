use crate::common::Document;
use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::query::{DocumentQuery, FeedOptions, FeedPage, QueryDefinition};
use crate::store::memory::InMemoryCollection;
use async_trait::async_trait;
use std::collections::VecDeque;

const BASE_CHARGE: f64 = 2.0;
const CHARGE_PER_DOCUMENT_SCANNED: f64 = 0.05;
const CHARGE_PER_PARTITION: f64 = 1.0;
const CONTINUATION_CHARGE: f64 = 1.0;

/// Synthetic request charge of the first page of a query.
pub(crate) fn request_charge(scanned: usize, partitions: usize) -> f64 {
    let charge = BASE_CHARGE
        + CHARGE_PER_DOCUMENT_SCANNED * scanned as f64
        + CHARGE_PER_PARTITION * partitions as f64;
    (charge * 100.0).round() / 100.0
}

enum QueryState {
    Pending,
    Paging {
        remaining: VecDeque<Document>,
        page: usize,
    },
    Done,
}

/// A query over an [InMemoryCollection].
///
/// Nothing is read until the first `execute_next`, which evaluates the
/// filter against a snapshot of the selected partitions. Later pages are
/// served from that snapshot.
pub struct InMemoryDocumentQuery {
    collection: InMemoryCollection,
    query: QueryDefinition,
    options: FeedOptions,
    state: QueryState,
}

impl InMemoryDocumentQuery {
    pub(crate) fn new(
        collection: InMemoryCollection,
        query: QueryDefinition,
        options: FeedOptions,
    ) -> Self {
        InMemoryDocumentQuery {
            collection,
            query,
            options,
            state: QueryState::Pending,
        }
    }

    fn page_size(&self) -> usize {
        match self.options.max_item_count {
            Some(count) if count > 0 => count as usize,
            _ => usize::MAX,
        }
    }

    fn next_page(&mut self, mut remaining: VecDeque<Document>, page: usize, charge: f64) -> FeedPage {
        let take = self.page_size().min(remaining.len());
        let documents: Vec<Document> = remaining.drain(..take).collect();

        if remaining.is_empty() {
            self.state = QueryState::Done;
            FeedPage {
                documents,
                request_charge: charge,
                continuation: None,
            }
        } else {
            self.state = QueryState::Paging {
                remaining,
                page: page + 1,
            };
            FeedPage {
                documents,
                request_charge: charge,
                continuation: Some((page + 1).to_string()),
            }
        }
    }
}

#[async_trait]
impl DocumentQuery for InMemoryDocumentQuery {
    fn has_more_results(&self) -> bool {
        !matches!(self.state, QueryState::Done)
    }

    async fn execute_next(&mut self) -> RepoResult<FeedPage> {
        match std::mem::replace(&mut self.state, QueryState::Done) {
            QueryState::Pending => {
                let filter = self.query.filter().clone();
                let partition_key = self.options.partition_key.clone();
                let scan = self
                    .collection
                    .scan(partition_key.as_deref(), |doc| filter.apply(doc))
                    .map_err(|err| {
                        log::error!(
                            "Query {} failed on {}: {}",
                            self.query,
                            self.collection.uri(),
                            err
                        );
                        RepoError::new_with_cause(
                            &format!("Failed to execute query on {}", self.collection.uri()),
                            ErrorKind::QueryExecutionError,
                            err,
                        )
                    })?;

                log::debug!(
                    "Query {} on {} [{}] matched {} of {} documents in {} partitions",
                    self.query,
                    self.collection.uri(),
                    self.options,
                    scan.documents.len(),
                    scan.scanned,
                    scan.partitions
                );

                let charge = request_charge(scan.scanned, scan.partitions);
                Ok(self.next_page(scan.documents.into(), 0, charge))
            }
            QueryState::Paging { remaining, page } => {
                Ok(self.next_page(remaining, page, CONTINUATION_CHARGE))
            }
            QueryState::Done => {
                log::error!("Query {} has no more results", self.query);
                Err(RepoError::new(
                    "Query has no more results",
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }
}
