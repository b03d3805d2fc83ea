use std::fmt;
use std::time::Duration;

/// Boxed underlying cause of a backend failure.
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur during blob storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// The requested object was not found.
    NotFound(String),
    /// An I/O error occurred.
    Io(std::io::Error),
    /// The provided content hash is invalid.
    InvalidHash(String),
    /// The storage key is not a safe relative path.
    InvalidKey(String),
    /// A link was requested with an unusable time-to-live.
    InvalidTtl(Duration),
    /// The blob exceeds the configured size limit.
    SizeLimitExceeded { actual: u64, limit: u64 },
    /// The operation did not finish within the configured deadline.
    TimedOut(Duration),
    /// The backend could not be constructed from configuration.
    Config(String),
    /// The backend client failed (network, TLS, signing).
    Backend { context: String, source: BoxedCause },
    /// The remote service answered with a non-success status.
    Remote { operation: String, status: u16 },
}

impl StorageError {
    pub fn backend(context: impl Into<String>, source: impl Into<BoxedCause>) -> Self {
        Self::Backend {
            context: context.into(),
            source: source.into(),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(key) => write!(f, "object not found: {key}"),
            Self::Io(err) => write!(f, "storage IO error: {err}"),
            Self::InvalidHash(msg) => write!(f, "invalid content hash: {msg}"),
            Self::InvalidKey(key) => write!(f, "invalid storage key: {key:?}"),
            Self::InvalidTtl(ttl) => write!(f, "invalid link ttl: {ttl:?}"),
            Self::SizeLimitExceeded { actual, limit } => {
                write!(f, "blob exceeds size limit ({actual} > {limit} bytes)")
            }
            Self::TimedOut(after) => write!(f, "storage operation timed out after {after:?}"),
            Self::Config(msg) => write!(f, "storage configuration error: {msg}"),
            Self::Backend { context, source } => write!(f, "{context}: {source}"),
            Self::Remote { operation, status } => {
                write!(f, "object storage rejected {operation} with status {status}")
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Backend { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
