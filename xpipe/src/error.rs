//! Error types returned by pipe operations.

use std::fmt;

/// Failure categories reported by pipe endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The endpoint's own side has already been closed.
    EndClosed,
    /// Another operation of the same kind is outstanding on this endpoint.
    ConcurrentUse,
    /// The operation waited past its configured deadline.
    Timeout,
    /// The operation observed its cancellation token.
    Cancelled,
    /// Bytes read by a text helper were not valid UTF-8.
    InvalidUtf8,
}

/// Error returned by pipe operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind) -> Self {
        Error { kind }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::EndClosed => write!(f, "Pipe endpoint is closed"),
            ErrorKind::ConcurrentUse => write!(f, "Another operation is already in flight on this endpoint"),
            ErrorKind::Timeout => write!(f, "Operation timed out"),
            ErrorKind::Cancelled => write!(f, "Operation cancelled"),
            ErrorKind::InvalidUtf8 => write!(f, "Pipe data is not valid UTF-8"),
        }
    }
}

impl std::error::Error for Error {}

impl From<Error> for std::io::Error {
    fn from(err: Error) -> std::io::Error {
        // Cancelled must not map to Interrupted: std retries those.
        let kind = match err.kind {
            ErrorKind::EndClosed => std::io::ErrorKind::BrokenPipe,
            ErrorKind::Timeout => std::io::ErrorKind::TimedOut,
            ErrorKind::InvalidUtf8 => std::io::ErrorKind::InvalidData,
            _ => std::io::ErrorKind::Other,
        };
        std::io::Error::new(kind, err)
    }
}

/// Result alias for pipe operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Turns an interruption into a short count when some bytes already moved.
pub(crate) fn partial(done: usize, err: Error) -> Result<usize> {
    if done > 0 { Ok(done) } else { Err(err) }
}
