use crate::errors::{ErrorKind, RepoError, RepoResult};
use std::fmt::Display;
use std::str::FromStr;

const DATABASES_SEGMENT: &str = "dbs";
const COLLECTIONS_SEGMENT: &str = "colls";
const INVALID_ID_CHARS: [char; 4] = ['/', '\\', '?', '#'];

/// Address of a document collection, `dbs/{database}/colls/{collection}`.
///
/// Both ids are validated on construction, so a `CollectionUri` in hand is
/// always well formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollectionUri {
    database_id: String,
    collection_id: String,
}

impl CollectionUri {
    /// Creates the link for `collection_id` in `database_id`.
    ///
    /// # Errors
    ///
    /// `ConfigurationError` if either id is empty or contains `/`, `\`, `?` or `#`.
    pub fn new(database_id: &str, collection_id: &str) -> RepoResult<Self> {
        validate_id("database", database_id)?;
        validate_id("collection", collection_id)?;
        Ok(CollectionUri {
            database_id: database_id.to_string(),
            collection_id: collection_id.to_string(),
        })
    }

    /// Parses a collection link such as `dbs/drones/colls/utilization`.
    ///
    /// A single leading or trailing `/` is accepted.
    pub fn parse(link: &str) -> RepoResult<Self> {
        let trimmed = link.strip_prefix('/').unwrap_or(link);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        let segments: Vec<&str> = trimmed.split('/').collect();

        match segments.as_slice() {
            [DATABASES_SEGMENT, database_id, COLLECTIONS_SEGMENT, collection_id] => {
                CollectionUri::new(database_id, collection_id)
            }
            _ => {
                log::error!("Malformed collection link '{}'", link);
                Err(RepoError::new(
                    &format!(
                        "Malformed collection link '{}', expected dbs/{{database}}/colls/{{collection}}",
                        link
                    ),
                    ErrorKind::ConfigurationError,
                ))
            }
        }
    }

    pub fn database_id(&self) -> &str {
        &self.database_id
    }

    pub fn collection_id(&self) -> &str {
        &self.collection_id
    }

    pub fn link(&self) -> String {
        self.to_string()
    }
}

fn validate_id(kind: &str, id: &str) -> RepoResult<()> {
    if id.trim().is_empty() {
        log::error!("The {} id of a collection link cannot be empty", kind);
        return Err(RepoError::new(
            &format!("The {} id cannot be empty", kind),
            ErrorKind::ConfigurationError,
        ));
    }

    if let Some(c) = id.chars().find(|c| INVALID_ID_CHARS.contains(c)) {
        log::error!("The {} id '{}' contains invalid character '{}'", kind, id, c);
        return Err(RepoError::new(
            &format!("The {} id '{}' contains invalid character '{}'", kind, id, c),
            ErrorKind::ConfigurationError,
        ));
    }
    Ok(())
}

impl Display for CollectionUri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            DATABASES_SEGMENT, self.database_id, COLLECTIONS_SEGMENT, self.collection_id
        )
    }
}

impl FromStr for CollectionUri {
    type Err = RepoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionUri::parse(s)
    }
}
