use crate::common::Document;
use crate::config::CollectionUri;
use crate::errors::RepoResult;
use async_trait::async_trait;

use super::{FeedOptions, QueryDefinition};

/// One page of query results as returned by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedPage {
    pub documents: Vec<Document>,
    /// Request units the store charged for this page.
    pub request_charge: f64,
    /// Token for the next page, `None` on the last page.
    pub continuation: Option<String>,
}

impl FeedPage {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// The document store as seen by the repository.
///
/// Creating a query performs no I/O; pages are fetched from the returned
/// [DocumentQuery]. Implementations own transport, authentication and any
/// retry policy.
pub trait DocumentClient: Send + Sync {
    fn create_document_query(
        &self,
        collection: &CollectionUri,
        query: &QueryDefinition,
        options: &FeedOptions,
    ) -> RepoResult<Box<dyn DocumentQuery>>;
}

/// A lazy, single-use sequence of result pages.
///
/// Dropping the query abandons it; no further pages are requested.
#[async_trait]
pub trait DocumentQuery: Send {
    fn has_more_results(&self) -> bool;

    async fn execute_next(&mut self) -> RepoResult<FeedPage>;
}
