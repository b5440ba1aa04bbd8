use crate::common::{Document, Value, DOC_ID, FIELD_SEPARATOR};
use crate::config::CollectionUri;
use crate::errors::{ErrorKind, RepoError, RepoResult};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

type Partition = BTreeMap<String, Document>;

/// A partitioned collection held in memory.
///
/// Documents are grouped by the value at the partition key path and are
/// unique by id within their partition. Clones share the same data.
#[derive(Clone)]
pub struct InMemoryCollection {
    inner: Arc<InMemoryCollectionInner>,
}

struct InMemoryCollectionInner {
    uri: CollectionUri,
    partition_key_path: String,
    partitions: RwLock<BTreeMap<String, Partition>>,
}

/// Documents read by one scan, with the work it took.
pub(crate) struct ScanResult {
    pub documents: Vec<Document>,
    pub scanned: usize,
    pub partitions: usize,
}

impl InMemoryCollection {
    /// Creates an empty collection partitioned on `partition_key_path`.
    ///
    /// The path may be written store-style (`/owner/id`) or as an embedded
    /// field name (`owner.id`).
    pub fn new(uri: CollectionUri, partition_key_path: &str) -> RepoResult<Self> {
        let path = normalize_path(partition_key_path)?;
        Ok(InMemoryCollection {
            inner: Arc::new(InMemoryCollectionInner {
                uri,
                partition_key_path: path,
                partitions: RwLock::new(BTreeMap::new()),
            }),
        })
    }

    pub fn uri(&self) -> &CollectionUri {
        &self.inner.uri
    }

    /// The partition key as an embedded field name.
    pub fn partition_key_path(&self) -> &str {
        &self.inner.partition_key_path
    }

    /// Inserts or replaces a document, keyed by its id within its partition.
    pub fn upsert(&self, document: Document) -> RepoResult<()> {
        let id = document.get_str(DOC_ID).ok_or_else(|| {
            log::error!("Document {} has no id in {}", document, self.inner.uri);
            RepoError::new(
                "Document must have a non-empty string id",
                ErrorKind::InvalidOperation,
            )
        })?;

        let partition_key = match document.get(&self.inner.partition_key_path) {
            Value::String(key) if !key.is_empty() => key,
            other => {
                log::error!(
                    "Document {} has partition key {} at {} in {}",
                    id,
                    other,
                    self.inner.partition_key_path,
                    self.inner.uri
                );
                return Err(RepoError::new(
                    &format!(
                        "Document {} must have a non-empty string partition key at {}",
                        id, self.inner.partition_key_path
                    ),
                    ErrorKind::InvalidOperation,
                ));
            }
        };

        let mut partitions = self.inner.partitions.write();
        partitions
            .entry(partition_key)
            .or_default()
            .insert(id, document);
        Ok(())
    }

    pub fn document_count(&self) -> usize {
        self.inner.partitions.read().values().map(|p| p.len()).sum()
    }

    pub fn partition_count(&self) -> usize {
        self.inner.partitions.read().len()
    }

    /// Copies the documents of one partition, or of all partitions when
    /// `partition_key` is `None`, that match `predicate`.
    pub(crate) fn scan<F>(&self, partition_key: Option<&str>, mut predicate: F) -> RepoResult<ScanResult>
    where
        F: FnMut(&Document) -> RepoResult<bool>,
    {
        let partitions = self.inner.partitions.read();
        let mut result = ScanResult {
            documents: Vec::new(),
            scanned: 0,
            partitions: 0,
        };

        let selected: Vec<&Partition> = match partition_key {
            Some(key) => partitions.get(key).into_iter().collect(),
            None => partitions.values().collect(),
        };

        for partition in selected {
            result.partitions += 1;
            for document in partition.values() {
                result.scanned += 1;
                if predicate(document)? {
                    result.documents.push(document.clone());
                }
            }
        }
        Ok(result)
    }
}

fn normalize_path(partition_key_path: &str) -> RepoResult<String> {
    let trimmed = partition_key_path.strip_prefix('/').unwrap_or(partition_key_path);
    let path = trimmed.replace('/', FIELD_SEPARATOR);
    if path.is_empty() || path.split(FIELD_SEPARATOR).any(str::is_empty) {
        log::error!("Invalid partition key path '{}'", partition_key_path);
        return Err(RepoError::new(
            &format!("Invalid partition key path '{}'", partition_key_path),
            ErrorKind::ConfigurationError,
        ));
    }
    Ok(path)
}
