use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for repository and store operations.
///
/// Each kind names one category of failure so callers can branch on the
/// category without parsing messages.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::errors::{ErrorKind, RepoError, RepoResult};
///
/// fn example() -> RepoResult<()> {
///     Err(RepoError::new("collection link is empty", ErrorKind::ConfigurationError))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Malformed or missing repository configuration (collection link, options)
    ConfigurationError,
    /// The store failed to execute or enumerate a query
    QueryExecutionError,
    /// The store rejected the request because the request rate was too large
    Throttled,
    /// A filter could not be evaluated or rendered
    FilterError,
    /// A raw document could not be mapped to or from an entity
    ObjectMappingError,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// The query was abandoned before it completed
    Cancelled,
    /// A metrics sink failed to record a query outcome
    MetricsError,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ConfigurationError => write!(f, "Configuration error"),
            ErrorKind::QueryExecutionError => write!(f, "Query execution error"),
            ErrorKind::Throttled => write!(f, "Request rate too large"),
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::ObjectMappingError => write!(f, "Object mapping error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::Cancelled => write!(f, "Cancelled"),
            ErrorKind::MetricsError => write!(f, "Metrics error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Error type for every fallible docrepo operation.
///
/// `RepoError` carries a message, an [ErrorKind], an optional cause and the
/// backtrace captured where it was created. Cloning is cheap; the backtrace
/// is shared.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::errors::{ErrorKind, RepoError};
///
/// let cause = RepoError::new("connection reset", ErrorKind::QueryExecutionError);
/// let err = RepoError::new_with_cause("query failed", ErrorKind::QueryExecutionError, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct RepoError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<RepoError>>,
    backtrace: Arc<Backtrace>,
}

impl RepoError {
    /// Creates a new `RepoError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        RepoError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `RepoError` that wraps an underlying cause.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: RepoError) -> Self {
        RepoError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&RepoError> {
        self.cause.as_deref()
    }

    /// Returns the kind of the innermost error in the cause chain.
    pub fn root_kind(&self) -> &ErrorKind {
        match &self.cause {
            Some(cause) => cause.root_kind(),
            None => &self.error_kind,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for docrepo operations.
pub type RepoResult<T> = Result<T, RepoError>;

impl From<regex::Error> for RepoError {
    fn from(err: regex::Error) -> Self {
        RepoError::new(&format!("Invalid regex pattern: {}", err), ErrorKind::FilterError)
    }
}

impl From<std::fmt::Error> for RepoError {
    fn from(err: std::fmt::Error) -> Self {
        RepoError::new(
            &format!("Formatting error: {}", err),
            ErrorKind::InternalError,
        )
    }
}

impl From<String> for RepoError {
    fn from(msg: String) -> Self {
        RepoError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for RepoError {
    fn from(msg: &str) -> Self {
        RepoError::new(msg, ErrorKind::InternalError)
    }
}
