use crate::model::InternalDroneUtilization;
use async_trait::async_trait;
use docrepo::common::{Convertible, Value};
use docrepo::config::{CollectionUri, RepositoryOptions, RepositoryOptionsBuilder};
use docrepo::errors::{ErrorKind, RepoError, RepoResult};
use docrepo::metrics::{
    AggregatingMetricsSink, CompositeMetricsSink, QueryMetrics, QueryMetricsSink, QueryScope,
    RepositoryMetricsTracker,
};
use docrepo::query::{DocumentClient, DocumentQuery, FeedOptions, FeedPage, QueryDefinition};
use docrepo::repository::{DocumentEntity, DocumentRepository};
use docrepo::store::memory::InMemoryDocumentClient;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const DATABASE_ID: &str = "fakeDb";
pub const COLLECTION_ID: &str = "fakeCol";
pub const OWNER: &str = "o00042";
pub const PARTITION_KEY_PATH: &str = "/partition_key";

/// An in-memory store with one collection, plus sinks observing every query.
#[derive(Clone)]
pub struct TestContext {
    client: InMemoryDocumentClient,
    uri: CollectionUri,
    recorder: RecordingMetricsSink,
    statistics: AggregatingMetricsSink,
}

impl TestContext {
    pub fn client(&self) -> &InMemoryDocumentClient {
        &self.client
    }

    pub fn uri(&self) -> &CollectionUri {
        &self.uri
    }

    pub fn recorder(&self) -> &RecordingMetricsSink {
        &self.recorder
    }

    pub fn statistics(&self) -> &AggregatingMetricsSink {
        &self.statistics
    }

    /// Tracker feeding both the recorder and the statistics.
    pub fn metrics(&self) -> RepositoryMetricsTracker {
        RepositoryMetricsTracker::new(
            CompositeMetricsSink::new()
                .with_sink(self.recorder.clone())
                .with_sink(self.statistics.clone()),
        )
    }

    pub fn options(&self) -> RepositoryOptionsBuilder {
        RepositoryOptions::builder().collection_uri(self.uri.clone())
    }

    /// Repository over the in-memory store with default options.
    pub fn repository<T: DocumentEntity>(&self) -> RepoResult<DocumentRepository<T>> {
        self.repository_with(Arc::new(self.client.clone()), |options| options)
    }

    /// Repository over `client`, with options adjusted by `configure`.
    pub fn repository_with<T, F>(&self, client: Arc<dyn DocumentClient>, configure: F) -> RepoResult<DocumentRepository<T>>
    where
        T: DocumentEntity,
        F: FnOnce(RepositoryOptionsBuilder) -> RepositoryOptionsBuilder,
    {
        let options = configure(self.options()).build()?;
        Ok(DocumentRepository::new(client, options, self.metrics()))
    }

    pub fn seed<T: DocumentEntity>(&self, items: &[T]) -> RepoResult<()> {
        for item in items {
            self.client.upsert_entity(&self.uri, item)?;
        }
        Ok(())
    }
}

pub fn create_test_context() -> RepoResult<TestContext> {
    let client = InMemoryDocumentClient::new();
    let uri = CollectionUri::new(DATABASE_ID, COLLECTION_ID)?;
    client.create_collection(&uri, PARTITION_KEY_PATH)?;

    Ok(TestContext {
        client,
        uri,
        recorder: RecordingMetricsSink::default(),
        statistics: AggregatingMetricsSink::new(),
    })
}

/// Two June 2019 utilization documents of [OWNER].
pub fn owner_utilization() -> Vec<InternalDroneUtilization> {
    vec![
        InternalDroneUtilization::new("d0001", OWNER, 2019, 6, 10.0, 1.0),
        InternalDroneUtilization::new("d0002", OWNER, 2019, 6, 32.0, 2.0),
    ]
}

/// Utilization documents of owners other than [OWNER].
pub fn other_utilization() -> Vec<InternalDroneUtilization> {
    vec![
        InternalDroneUtilization::new("d0003", "o00043", 2019, 6, 7.5, 1.0),
        InternalDroneUtilization::new("d0004", "o00043", 2019, 7, 12.0, 3.0),
        InternalDroneUtilization::new("d0005", "o00044", 2019, 6, 3.0, 0.5),
    ]
}

/// Sorted ids, for order-insensitive comparisons.
pub fn ids<T: DocumentEntity>(items: &[T]) -> Vec<String> {
    let mut ids: Vec<String> = items.iter().map(|item| item.id().to_string()).collect();
    ids.sort();
    ids
}

pub fn page<T: DocumentEntity>(items: &[T], request_charge: f64) -> RepoResult<FeedPage> {
    let mut documents = Vec::with_capacity(items.len());
    for item in items {
        match item.to_value()? {
            Value::Document(document) => documents.push(document),
            other => {
                return Err(RepoError::new(
                    &format!("{} is not a document", other.type_name()),
                    ErrorKind::ObjectMappingError,
                ))
            }
        }
    }
    Ok(FeedPage {
        documents,
        request_charge,
        continuation: None,
    })
}

/// Keeps every metrics record and counts started queries.
#[derive(Clone, Default)]
pub struct RecordingMetricsSink {
    started: Arc<Mutex<Vec<QueryScope>>>,
    records: Arc<Mutex<Vec<QueryMetrics>>>,
}

impl RecordingMetricsSink {
    pub fn started(&self) -> Vec<QueryScope> {
        self.started.lock().clone()
    }

    pub fn records(&self) -> Vec<QueryMetrics> {
        self.records.lock().clone()
    }

    pub fn last(&self) -> Option<QueryMetrics> {
        self.records.lock().last().cloned()
    }
}

impl QueryMetricsSink for RecordingMetricsSink {
    fn query_started(&self, scope: &QueryScope) {
        self.started.lock().push(scope.clone());
    }

    fn record(&self, metrics: &QueryMetrics) -> RepoResult<()> {
        self.records.lock().push(metrics.clone());
        Ok(())
    }
}

/// A sink that rejects every record.
#[derive(Clone, Copy, Default)]
pub struct FailingMetricsSink;

impl QueryMetricsSink for FailingMetricsSink {
    fn record(&self, _metrics: &QueryMetrics) -> RepoResult<()> {
        Err(RepoError::new("metrics backend unavailable", ErrorKind::MetricsError))
    }
}

/// What a [SpyDocumentClient] was asked to run.
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub collection: CollectionUri,
    pub query_text: String,
    pub options: FeedOptions,
}

/// Records every query, then delegates.
#[derive(Clone)]
pub struct SpyDocumentClient {
    inner: Arc<dyn DocumentClient>,
    calls: Arc<Mutex<Vec<RecordedQuery>>>,
}

impl SpyDocumentClient {
    pub fn new(inner: Arc<dyn DocumentClient>) -> Self {
        SpyDocumentClient {
            inner,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<RecordedQuery> {
        self.calls.lock().clone()
    }

    pub fn last_options(&self) -> Option<FeedOptions> {
        self.calls.lock().last().map(|call| call.options.clone())
    }
}

impl DocumentClient for SpyDocumentClient {
    fn create_document_query(
        &self,
        collection: &CollectionUri,
        query: &QueryDefinition,
        options: &FeedOptions,
    ) -> RepoResult<Box<dyn DocumentQuery>> {
        self.calls.lock().push(RecordedQuery {
            collection: collection.clone(),
            query_text: query.query_text().to_string(),
            options: options.clone(),
        });
        self.inner.create_document_query(collection, query, options)
    }
}

/// Replays a fixed sequence of pages and errors for every query.
#[derive(Clone)]
pub struct ScriptedDocumentClient {
    script: Vec<RepoResult<FeedPage>>,
}

impl ScriptedDocumentClient {
    pub fn new(script: Vec<RepoResult<FeedPage>>) -> Self {
        ScriptedDocumentClient { script }
    }
}

struct ScriptedQuery {
    remaining: VecDeque<RepoResult<FeedPage>>,
}

#[async_trait]
impl DocumentQuery for ScriptedQuery {
    fn has_more_results(&self) -> bool {
        !self.remaining.is_empty()
    }

    async fn execute_next(&mut self) -> RepoResult<FeedPage> {
        self.remaining
            .pop_front()
            .unwrap_or_else(|| Err(RepoError::new("script exhausted", ErrorKind::InvalidOperation)))
    }
}

impl DocumentClient for ScriptedDocumentClient {
    fn create_document_query(
        &self,
        _collection: &CollectionUri,
        _query: &QueryDefinition,
        _options: &FeedOptions,
    ) -> RepoResult<Box<dyn DocumentQuery>> {
        Ok(Box::new(ScriptedQuery {
            remaining: self.script.iter().cloned().collect(),
        }))
    }
}

/// Serves an optional first page, then never answers.
///
/// `dropped()` turns true once the stalled query has been dropped.
#[derive(Clone)]
pub struct StallingDocumentClient {
    first_page: Option<FeedPage>,
    dropped: Arc<AtomicBool>,
}

impl StallingDocumentClient {
    pub fn new(first_page: Option<FeedPage>) -> Self {
        StallingDocumentClient {
            first_page,
            dropped: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn dropped(&self) -> bool {
        self.dropped.load(Ordering::SeqCst)
    }
}

struct StalledQuery {
    first_page: Option<FeedPage>,
    dropped: Arc<AtomicBool>,
}

#[async_trait]
impl DocumentQuery for StalledQuery {
    fn has_more_results(&self) -> bool {
        true
    }

    async fn execute_next(&mut self) -> RepoResult<FeedPage> {
        match self.first_page.take() {
            Some(page) => Ok(page),
            None => std::future::pending().await,
        }
    }
}

impl Drop for StalledQuery {
    fn drop(&mut self) {
        self.dropped.store(true, Ordering::SeqCst);
    }
}

impl DocumentClient for StallingDocumentClient {
    fn create_document_query(
        &self,
        _collection: &CollectionUri,
        _query: &QueryDefinition,
        _options: &FeedOptions,
    ) -> RepoResult<Box<dyn DocumentQuery>> {
        Ok(Box::new(StalledQuery {
            first_page: self.first_page.clone(),
            dropped: self.dropped.clone(),
        }))
    }
}
