use crate::common::{Document, Value, DOC_ID};
use crate::config::{CollectionUri, RepositoryOptions};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::filter::{all, field, Filter};
use crate::metrics::{QueryMetricsTracker, RepositoryMetricsTracker};
use crate::query::{DocumentClient, FeedOptions, QueryDefinition};
use crate::repository::{document_type_filter, DocumentEntity};
use std::marker::PhantomData;
use std::sync::Arc;

/// Typed, read-only access to one kind of document in a partitioned collection.
///
/// # Purpose
/// Turns a filter and an optional partition key into exactly one store
/// query, runs it under a metrics tracker and returns fully materialized
/// entities. The repository holds no mutable state; the store client and the
/// metrics tracker are injected and shared.
///
/// # Characteristics
/// - A non-empty partition key scopes the query to that partition; no key
///   (or an empty one) runs a cross-partition query
/// - Only documents tagged with `T::DOCUMENT_TYPE` are returned, so several
///   entity kinds can share one collection
/// - Every call records exactly one metrics outcome: succeeded, failed, or
///   cancelled when the returned future is dropped early
/// - Store errors are returned as they are; nothing is retried
/// - Cheap to clone; clones share the client, options and tracker
///
/// # Usage
/// ```ignore
/// let repo = DocumentRepository::<InternalDroneUtilization>::new(
///     Arc::new(client),
///     options,
///     RepositoryMetricsTracker::new(LoggingMetricsSink),
/// );
/// let june = repo.get_items(field("month").eq(6), Some("o00042")).await?;
/// let everywhere = repo.get_all(None).await?;
/// ```
pub struct DocumentRepository<T> {
    inner: Arc<DocumentRepositoryInner>,
    _entity: PhantomData<fn() -> T>,
}

struct DocumentRepositoryInner {
    client: Arc<dyn DocumentClient>,
    options: RepositoryOptions,
    metrics: RepositoryMetricsTracker,
}

impl<T> Clone for DocumentRepository<T> {
    fn clone(&self) -> Self {
        DocumentRepository {
            inner: self.inner.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: DocumentEntity> DocumentRepository<T> {
    pub fn new(
        client: Arc<dyn DocumentClient>,
        options: RepositoryOptions,
        metrics: RepositoryMetricsTracker,
    ) -> Self {
        DocumentRepository {
            inner: Arc::new(DocumentRepositoryInner {
                client,
                options,
                metrics,
            }),
            _entity: PhantomData,
        }
    }

    pub fn collection_uri(&self) -> &CollectionUri {
        self.inner.options.collection_uri()
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.inner.options
    }

    /// Returns every `T` matching `filter`, scoped to `partition_key` when
    /// it is present and non-empty, across all partitions otherwise.
    ///
    /// # Errors
    ///
    /// - `FilterError` if the filter cannot be rendered
    /// - whatever the store client returns (`QueryExecutionError`, `Throttled`, ...)
    /// - `ObjectMappingError` if a returned document cannot be read as `T`
    pub async fn get_items(&self, filter: Filter, partition_key: Option<&str>) -> RepoResult<Vec<T>> {
        let options = self.feed_options(partition_key);
        let mut tracker = self.inner.metrics.query_metrics_tracker(
            self.collection_uri().collection_id(),
            options.partition_key.as_deref(),
        );

        match self.execute(filter, &options, &mut tracker).await {
            Ok(items) => {
                tracker.succeed();
                Ok(items)
            }
            Err(err) => {
                tracker.fail(&err);
                Err(err)
            }
        }
    }

    /// Returns the `T` with the given id, if any.
    ///
    /// # Errors
    ///
    /// `InvalidOperation` if more than one document carries the id, which
    /// happens when a cross-partition lookup finds it in several partitions.
    pub async fn get_item(&self, id: &str, partition_key: Option<&str>) -> RepoResult<Option<T>> {
        let mut items = self.get_items(field(T::ID_FIELD).eq(id), partition_key).await?;
        match items.len() {
            0 => Ok(None),
            1 => Ok(items.pop()),
            n => {
                log::error!("Found {} {} documents with id {}", n, T::DOCUMENT_TYPE, id);
                Err(RepoError::new(
                    &format!("Found {} {} documents with id {}", n, T::DOCUMENT_TYPE, id),
                    ErrorKind::InvalidOperation,
                ))
            }
        }
    }

    /// Returns every `T` in the partition, or in the collection when `None`.
    pub async fn get_all(&self, partition_key: Option<&str>) -> RepoResult<Vec<T>> {
        self.get_items(all(), partition_key).await
    }

    /// Number of `T` matching `filter`.
    pub async fn count(&self, filter: Filter, partition_key: Option<&str>) -> RepoResult<usize> {
        Ok(self.get_items(filter, partition_key).await?.len())
    }

    fn feed_options(&self, partition_key: Option<&str>) -> FeedOptions {
        FeedOptions::for_partition(partition_key)
            .with_max_item_count(self.inner.options.max_item_count())
            .with_populate_query_metrics(self.inner.options.populate_query_metrics())
    }

    async fn execute(
        &self,
        filter: Filter,
        options: &FeedOptions,
        tracker: &mut QueryMetricsTracker,
    ) -> RepoResult<Vec<T>> {
        let query = QueryDefinition::new(filter.and(document_type_filter::<T>()))?;
        log::debug!(
            "Query {} on {} [{}], activity {}",
            query,
            self.collection_uri(),
            options,
            tracker.activity_id()
        );

        let mut results = self
            .inner
            .client
            .create_document_query(self.collection_uri(), &query, options)?;

        let mut items = Vec::new();
        while results.has_more_results() {
            let page = results.execute_next().await?;
            tracker.track_page(&page);

            for document in page.documents {
                let item = materialize::<T>(document)?;
                if let Some(expected) = options.partition_key.as_deref() {
                    if item.partition_key() != expected {
                        tracker.record_partition_mismatch();
                        log::warn!(
                            "{} {} has partition key {} but the query was scoped to {}",
                            T::DOCUMENT_TYPE,
                            item.id(),
                            item.partition_key(),
                            expected
                        );
                        if self.inner.options.enforce_partition_scope() {
                            continue;
                        }
                    }
                }
                items.push(item);
            }
        }
        Ok(items)
    }
}

fn materialize<T: DocumentEntity>(document: Document) -> RepoResult<T> {
    let id = document.get_str(DOC_ID);
    T::from_value(&Value::Document(document)).map_err(|err| {
        log::error!(
            "Failed to read document {} as {}: {}",
            id.as_deref().unwrap_or("<no id>"),
            T::DOCUMENT_TYPE,
            err
        );
        RepoError::new_with_cause(
            &format!(
                "Failed to read document {} as {}",
                id.as_deref().unwrap_or("<no id>"),
                T::DOCUMENT_TYPE
            ),
            ErrorKind::ObjectMappingError,
            err,
        )
    })
}
