use crate::common::{Convertible, Document, Value};
use crate::config::CollectionUri;
use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::query::{DocumentClient, DocumentQuery, FeedOptions, QueryDefinition};
use crate::repository::{validate_entity, DocumentEntity};
use crate::store::memory::{InMemoryCollection, InMemoryDocumentQuery};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// A [DocumentClient] backed by partitioned in-memory collections.
///
/// # Purpose
/// Stands in for a remote document store in tests and local runs. Query
/// semantics follow the store: a scoped query reads one partition, a
/// cross-partition query reads all of them, and a query that is neither is
/// rejected. Pages are cut by `max_item_count` and carry a synthetic request
/// charge.
///
/// # Usage
/// ```text
/// let client = InMemoryDocumentClient::new();
/// let uri = CollectionUri::new("drones", "utilization")?;
/// client.create_collection(&uri, "/partition_key")?;
/// client.upsert_document(&uri, doc! { id: "d0001", partition_key: "o00042" })?;
/// ```
#[derive(Clone, Default)]
pub struct InMemoryDocumentClient {
    inner: Arc<InMemoryDocumentClientInner>,
}

#[derive(Default)]
struct InMemoryDocumentClientInner {
    collections: DashMap<CollectionUri, InMemoryCollection>,
    query_count: AtomicU64,
}

impl InMemoryDocumentClient {
    pub fn new() -> Self {
        InMemoryDocumentClient::default()
    }

    /// Creates a collection partitioned on `partition_key_path`.
    ///
    /// Creating an existing collection with the same path is a no-op; with a
    /// different path it fails with `InvalidOperation`.
    pub fn create_collection(&self, uri: &CollectionUri, partition_key_path: &str) -> RepoResult<()> {
        let collection = InMemoryCollection::new(uri.clone(), partition_key_path)?;
        let entry = self
            .inner
            .collections
            .entry(uri.clone())
            .or_insert_with(|| collection.clone());

        if entry.partition_key_path() != collection.partition_key_path() {
            log::error!(
                "Collection {} already exists with partition key {}",
                uri,
                entry.partition_key_path()
            );
            return Err(RepoError::new(
                &format!("Collection {} already exists with a different partition key", uri),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }

    pub fn collection(&self, uri: &CollectionUri) -> Option<InMemoryCollection> {
        self.inner.collections.get(uri).map(|c| c.value().clone())
    }

    fn existing_collection(&self, uri: &CollectionUri) -> RepoResult<InMemoryCollection> {
        self.collection(uri).ok_or_else(|| {
            log::error!("Collection {} does not exist", uri);
            RepoError::new(
                &format!("Collection {} does not exist", uri),
                ErrorKind::InvalidOperation,
            )
        })
    }

    /// Inserts or replaces a raw document.
    pub fn upsert_document(&self, uri: &CollectionUri, document: Document) -> RepoResult<()> {
        self.existing_collection(uri)?.upsert(document)
    }

    /// Validates and stores an entity.
    pub fn upsert_entity<T: DocumentEntity>(&self, uri: &CollectionUri, entity: &T) -> RepoResult<()> {
        validate_entity(entity)?;
        match entity.to_value()? {
            Value::Document(document) => self.upsert_document(uri, document),
            other => {
                log::error!("{} entity {} mapped to {}", T::DOCUMENT_TYPE, entity.id(), other.type_name());
                Err(RepoError::new(
                    &format!("{} entity did not map to a document", T::DOCUMENT_TYPE),
                    ErrorKind::ObjectMappingError,
                ))
            }
        }
    }

    pub fn document_count(&self, uri: &CollectionUri) -> RepoResult<usize> {
        Ok(self.existing_collection(uri)?.document_count())
    }

    /// Number of queries requested from this client, including rejected ones.
    pub fn query_count(&self) -> u64 {
        self.inner.query_count.load(Ordering::Relaxed)
    }
}

impl DocumentClient for InMemoryDocumentClient {
    fn create_document_query(
        &self,
        collection: &CollectionUri,
        query: &QueryDefinition,
        options: &FeedOptions,
    ) -> RepoResult<Box<dyn DocumentQuery>> {
        self.inner.query_count.fetch_add(1, Ordering::Relaxed);

        let target = self.collection(collection).ok_or_else(|| {
            log::error!("Query on missing collection {}", collection);
            RepoError::new(
                &format!("Collection {} does not exist", collection),
                ErrorKind::QueryExecutionError,
            )
        })?;

        if options.partition_key.is_none() && !options.enable_cross_partition_query {
            log::error!("Query {} on {} needs a partition key", query, collection);
            return Err(RepoError::new(
                "Cross partition query is required but disabled",
                ErrorKind::QueryExecutionError,
            ));
        }

        Ok(Box::new(InMemoryDocumentQuery::new(
            target,
            query.clone(),
            options.clone(),
        )))
    }
}
