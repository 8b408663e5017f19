use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;
use std::sync::Arc;

/// Error kinds for doclens operations
///
/// Each kind describes one category of failure so that a request layer can map
/// it to its own external representation (a not-found response, a bad request,
/// a server error and so on).
///
/// # Examples
///
/// ```rust
/// use doclens::errors::{DocLensError, ErrorKind, DocLensResult};
///
/// fn example() -> DocLensResult<()> {
///     Err(DocLensError::new("Collection not found: users", ErrorKind::CollectionNotFound))
/// }
/// assert!(example().is_err());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    /// The requested collection does not exist in the store
    CollectionNotFound,
    /// The store failed to serve a request (I/O, driver, timeout)
    AccessFailure,
    /// A filter specification used an operator outside the supported set
    /// or gave an operator an operand of the wrong shape
    InvalidOperator,
    /// Error during filter evaluation or construction
    FilterError,
    /// The operation is not valid in the current context
    InvalidOperation,
    /// Generic validation error (configuration values, document keys)
    ValidationError,
    /// Invalid data type for operation
    InvalidDataType,
    /// Error encoding or decoding data
    EncodingError,
    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::CollectionNotFound => write!(f, "Collection not found"),
            ErrorKind::AccessFailure => write!(f, "Access failure"),
            ErrorKind::InvalidOperator => write!(f, "Invalid operator"),
            ErrorKind::FilterError => write!(f, "Filter error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InvalidDataType => write!(f, "Invalid data type"),
            ErrorKind::EncodingError => write!(f, "Encoding error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom doclens error type.
///
/// `DocLensError` carries the error message, its kind, an optional cause and the
/// backtrace captured where it was raised.
///
/// # Examples
///
/// ```rust
/// use doclens::errors::{DocLensError, ErrorKind};
///
/// let cause = DocLensError::new("connection reset", ErrorKind::AccessFailure);
/// let err = DocLensError::new_with_cause("Failed to count users", ErrorKind::AccessFailure, cause);
/// assert!(err.cause().is_some());
/// ```
#[derive(Clone)]
pub struct DocLensError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<DocLensError>>,
    backtrace: Arc<Backtrace>,
}

impl DocLensError {
    /// Creates a new `DocLensError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        DocLensError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Creates a new `DocLensError` wrapping the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: DocLensError) -> Self {
        DocLensError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: Arc::new(Backtrace::new()),
        }
    }

    /// Wraps a fault reported by a store backend. The backend message is kept verbatim.
    pub fn access_failure(message: &str) -> Self {
        DocLensError::new(message, ErrorKind::AccessFailure)
    }

    /// Builds the error returned when a read targets a collection the store does not know.
    pub fn collection_not_found(collection_name: &str) -> Self {
        DocLensError::new(
            &format!("Collection not found: {}", collection_name),
            ErrorKind::CollectionNotFound,
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&DocLensError> {
        self.cause.as_deref()
    }
}

impl Display for DocLensError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for DocLensError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        // print error message with stack trace followed by cause
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace),
        }
    }
}

impl Error for DocLensError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for doclens operations.
pub type DocLensResult<T> = Result<T, DocLensError>;

impl From<serde_json::Error> for DocLensError {
    fn from(err: serde_json::Error) -> Self {
        DocLensError::new(&format!("JSON error: {}", err), ErrorKind::EncodingError)
    }
}

impl From<regex::Error> for DocLensError {
    fn from(err: regex::Error) -> Self {
        DocLensError::new(&format!("Invalid pattern: {}", err), ErrorKind::FilterError)
    }
}

impl From<std::fmt::Error> for DocLensError {
    fn from(err: std::fmt::Error) -> Self {
        DocLensError::new(&format!("Formatting error: {}", err), ErrorKind::InternalError)
    }
}

impl From<String> for DocLensError {
    fn from(msg: String) -> Self {
        DocLensError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for DocLensError {
    fn from(msg: &str) -> Self {
        DocLensError::new(msg, ErrorKind::InternalError)
    }
}
