use crate::config::CollectionUri;
use crate::errors::{ErrorKind, RepoError, RepoResult};
use std::sync::Arc;

/// Immutable configuration of a [DocumentRepository](crate::repository::DocumentRepository).
///
/// Built once with [RepositoryOptions::builder] and shared by every query the
/// repository issues. Clones share the same settings.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::config::RepositoryOptions;
///
/// let options = RepositoryOptions::builder()
///     .collection_link("dbs/drones/colls/utilization")
///     .max_item_count(100)
///     .build()?;
/// ```
#[derive(Clone, Debug)]
pub struct RepositoryOptions {
    inner: Arc<RepositoryOptionsInner>,
}

#[derive(Debug)]
struct RepositoryOptionsInner {
    collection_uri: CollectionUri,
    max_item_count: Option<u32>,
    populate_query_metrics: bool,
    enforce_partition_scope: bool,
}

impl RepositoryOptions {
    pub fn builder() -> RepositoryOptionsBuilder {
        RepositoryOptionsBuilder::new()
    }

    pub fn collection_uri(&self) -> &CollectionUri {
        &self.inner.collection_uri
    }

    /// Page size requested from the store, if configured.
    pub fn max_item_count(&self) -> Option<u32> {
        self.inner.max_item_count
    }

    /// Whether the store is asked to return per-page query metrics.
    pub fn populate_query_metrics(&self) -> bool {
        self.inner.populate_query_metrics
    }

    /// Whether items outside the requested partition are dropped instead of
    /// only being reported.
    pub fn enforce_partition_scope(&self) -> bool {
        self.inner.enforce_partition_scope
    }
}

/// Builder for [RepositoryOptions].
///
/// The first invalid setting is kept and returned by [RepositoryOptionsBuilder::build].
pub struct RepositoryOptionsBuilder {
    error: Option<RepoError>,
    collection_uri: Option<CollectionUri>,
    max_item_count: Option<u32>,
    populate_query_metrics: bool,
    enforce_partition_scope: bool,
}

impl Default for RepositoryOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryOptionsBuilder {
    pub fn new() -> Self {
        RepositoryOptionsBuilder {
            error: None,
            collection_uri: None,
            max_item_count: None,
            populate_query_metrics: true,
            enforce_partition_scope: false,
        }
    }

    pub fn collection_uri(mut self, collection_uri: CollectionUri) -> Self {
        self.collection_uri = Some(collection_uri);
        self
    }

    /// Sets the collection from a `dbs/{database}/colls/{collection}` link.
    pub fn collection_link(mut self, link: &str) -> Self {
        match CollectionUri::parse(link) {
            Ok(uri) => self.collection_uri = Some(uri),
            Err(err) => self.keep_error(err),
        }
        self
    }

    /// Sets the page size; must be greater than zero.
    pub fn max_item_count(mut self, max_item_count: u32) -> Self {
        if max_item_count == 0 {
            log::error!("Max item count must be greater than zero");
            self.keep_error(RepoError::new(
                "Max item count must be greater than zero",
                ErrorKind::ConfigurationError,
            ));
        } else {
            self.max_item_count = Some(max_item_count);
        }
        self
    }

    pub fn populate_query_metrics(mut self, populate_query_metrics: bool) -> Self {
        self.populate_query_metrics = populate_query_metrics;
        self
    }

    pub fn enforce_partition_scope(mut self, enforce_partition_scope: bool) -> Self {
        self.enforce_partition_scope = enforce_partition_scope;
        self
    }

    fn keep_error(&mut self, err: RepoError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    /// Validates the settings and builds the options.
    ///
    /// # Errors
    ///
    /// `ConfigurationError` for the first invalid setting, or when no
    /// collection was configured.
    pub fn build(self) -> RepoResult<RepositoryOptions> {
        if let Some(error) = self.error {
            return Err(error);
        }

        let collection_uri = self.collection_uri.ok_or_else(|| {
            log::error!("Repository options require a collection uri");
            RepoError::new(
                "Collection uri is not configured",
                ErrorKind::ConfigurationError,
            )
        })?;

        Ok(RepositoryOptions {
            inner: Arc::new(RepositoryOptionsInner {
                collection_uri,
                max_item_count: self.max_item_count,
                populate_query_metrics: self.populate_query_metrics,
                enforce_partition_scope: self.enforce_partition_scope,
            }),
        })
    }
}
